use crate::output;
use crate::workspace::Workspace;
use colored::Colorize;
use keyflow_resource::{Orchestrator, destroy_plan};
use std::path::Path;

pub async fn handle(config: Option<&Path>, yes: bool) -> anyhow::Result<()> {
    let workspace = Workspace::load(config)?;
    let registry = workspace.registry()?;
    let orchestrator = Orchestrator::new(&registry);

    let lock = workspace.state.acquire_lock().await?;
    let mut state = workspace.state.load().await?;

    // GitHub 側で既に削除された鍵はステートから外してから削除計画を立てる
    println!("{}", "リモートの状態を確認中...".blue());
    let refreshed = orchestrator.refresh(&mut state).await;
    if !refreshed.is_success() {
        output::print_result(&refreshed);
        anyhow::bail!("リモートの状態を取得できませんでした");
    }

    let plan = destroy_plan(&state);
    if !plan.has_changes {
        workspace.state.save(&state).await?;
        lock.release().await?;
        println!("管理中のリソースはありません");
        return Ok(());
    }

    output::print_plan(&plan);

    if !yes {
        lock.release().await?;
        println!();
        println!(
            "{}",
            "警告: GitHub から鍵を削除します。この操作は取り消せません。".yellow()
        );
        println!("実行するには --yes オプションを指定してください");
        return Ok(());
    }

    println!();
    println!("{}", "鍵を削除中...".blue());
    let result = orchestrator.destroy(&mut state).await;

    workspace.state.save(&state).await?;
    lock.release().await?;

    output::print_result(&result);
    if !result.is_success() {
        anyhow::bail!("{} 件の削除に失敗しました", result.failed.len());
    }
    println!("{}", "✓ すべての鍵を削除しました".green().bold());
    Ok(())
}
