use crate::output;
use crate::workspace::Workspace;
use colored::Colorize;
use keyflow_resource::Orchestrator;
use std::path::Path;

pub async fn handle(config: Option<&Path>) -> anyhow::Result<()> {
    let workspace = Workspace::load(config)?;
    let registry = workspace.registry()?;
    println!(
        "{} {}",
        "プロジェクト:".bold(),
        workspace.manifest.project.cyan()
    );

    // リモートの状態をメモリ上で反映してから差分を計算（ステートは保存しない）
    let mut state = workspace.state.load().await?;
    let refreshed = Orchestrator::new(&registry).refresh(&mut state).await;
    if !refreshed.is_success() {
        output::print_result(&refreshed);
        anyhow::bail!("リモートの状態を取得できませんでした");
    }

    let plan = keyflow_resource::plan(&workspace.manifest.resources, &state, &registry)?;
    println!();
    if !plan.has_changes {
        println!("{}", "✓ 変更はありません".green());
        return Ok(());
    }

    output::print_plan(&plan);
    println!();
    println!("反映するには keyflow apply --yes を実行してください");
    Ok(())
}
