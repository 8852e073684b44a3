use crate::output;
use crate::workspace::Workspace;
use colored::Colorize;
use keyflow_resource::{ResourceRegistry, split_key};
use std::path::Path;

pub async fn handle(config: Option<&Path>) -> anyhow::Result<()> {
    let workspace = Workspace::load(config)?;
    let state = workspace.state.load().await?;
    let registry = workspace.schema_registry()?;

    println!(
        "{} {}",
        "プロジェクト:".bold(),
        workspace.manifest.project.cyan()
    );
    println!("ステート: {}", workspace.root.join(".keyflow").display());
    println!();

    if state.resources.is_empty() {
        println!("管理中のリソースはありません");
        return Ok(());
    }

    for (key, resource) in &state.resources {
        let (resource_type, name) = split_key(key).unwrap_or((key.as_str(), ""));
        let declared = workspace.manifest.resources.get(key).is_some();

        println!("{} {}", resource_type.dimmed(), name.cyan().bold());
        println!("    id: {}", resource.id);
        let internal = internal_fields(&registry, resource_type);
        for (field, value) in output::visible_attributes(resource, &internal) {
            println!("    {}: {}", field, output::format_attribute(value));
        }
        println!(
            "    作成: {}  更新: {}",
            resource.created_at.format("%Y-%m-%d %H:%M:%S"),
            resource.updated_at.format("%Y-%m-%d %H:%M:%S")
        );
        if !declared {
            println!(
                "    {}",
                "マニフェストから削除済み（次回の apply で削除されます）".yellow()
            );
        }
        println!();
    }

    Ok(())
}

fn internal_fields<'a>(registry: &'a ResourceRegistry, resource_type: &str) -> Vec<&'a str> {
    registry
        .schema(resource_type)
        .map(|schema| schema.iter().filter(|f| f.internal).map(|f| f.name).collect())
        .unwrap_or_default()
}
