use crate::output;
use crate::workspace::Workspace;
use colored::Colorize;
use keyflow_resource::Orchestrator;
use std::path::Path;

pub async fn handle(config: Option<&Path>) -> anyhow::Result<()> {
    let workspace = Workspace::load(config)?;
    let registry = workspace.registry()?;

    let lock = workspace.state.acquire_lock().await?;
    let mut state = workspace.state.load().await?;
    if state.resources.is_empty() {
        lock.release().await?;
        println!("管理中のリソースはありません");
        return Ok(());
    }

    println!(
        "{}",
        format!("{} 件のリソースを確認中...", state.resources.len()).blue()
    );
    let result = Orchestrator::new(&registry).refresh(&mut state).await;

    workspace.state.save(&state).await?;
    lock.release().await?;

    output::print_result(&result);
    if !result.is_success() {
        anyhow::bail!("{} 件のリソースを確認できませんでした", result.failed.len());
    }
    Ok(())
}
