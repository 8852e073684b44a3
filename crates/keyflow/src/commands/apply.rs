use crate::output;
use crate::workspace::Workspace;
use colored::Colorize;
use keyflow_resource::Orchestrator;
use std::path::Path;

pub async fn handle(config: Option<&Path>, yes: bool) -> anyhow::Result<()> {
    let workspace = Workspace::load(config)?;
    let registry = workspace.registry()?;
    let orchestrator = Orchestrator::new(&registry);
    println!(
        "{} {}",
        "プロジェクト:".bold(),
        workspace.manifest.project.cyan()
    );

    let lock = workspace.state.acquire_lock().await?;
    let mut state = workspace.state.load().await?;

    println!("{}", "リモートの状態を確認中...".blue());
    let refreshed = orchestrator.refresh(&mut state).await;
    if !refreshed.is_success() {
        output::print_result(&refreshed);
        anyhow::bail!("リモートの状態を取得できませんでした");
    }

    let desired = &workspace.manifest.resources;
    let plan = keyflow_resource::plan(desired, &state, &registry)?;
    println!();
    if !plan.has_changes {
        workspace.state.save(&state).await?;
        lock.release().await?;
        println!("{}", "✓ 変更はありません".green());
        return Ok(());
    }

    output::print_plan(&plan);

    if !yes {
        lock.release().await?;
        println!();
        println!("実行するには --yes オプションを指定してください");
        return Ok(());
    }

    println!();
    println!("{}", "変更を反映中...".blue());
    let result = orchestrator.apply(&plan, desired, &mut state).await;

    // 途中で失敗しても成功した分はステートに残す
    workspace.state.save(&state).await?;
    lock.release().await?;

    output::print_result(&result);
    if !result.is_success() {
        anyhow::bail!("{} 件のアクションが失敗しました", result.failed.len());
    }
    println!("{}", "✓ 適用が完了しました".green().bold());
    Ok(())
}
