//! 表示用ヘルパー

use colored::Colorize;
use keyflow_resource::{ActionType, ApplyResult, Plan, ResourceState};
use serde_json::Value;

/// アクション種別の記号
pub fn action_symbol(action_type: ActionType) -> &'static str {
    match action_type {
        ActionType::Create => "+",
        ActionType::Replace => "-/+",
        ActionType::Delete => "-",
        ActionType::NoOp => "=",
    }
}

pub fn print_plan(plan: &Plan) {
    for action in &plan.actions {
        let symbol = action_symbol(action.action_type);
        let line = format!("  {} {}", symbol, action.description);
        match action.action_type {
            ActionType::Create => println!("{}", line.green()),
            ActionType::Replace => println!("{}", line.yellow()),
            ActionType::Delete => println!("{}", line.red()),
            ActionType::NoOp => println!("{}", line.dimmed()),
        }
    }
    println!();
    println!("Plan: {}", plan.summary().to_string().bold());
}

pub fn print_result(result: &ApplyResult) {
    for success in &result.succeeded {
        println!("  ✓ {}", success.message);
    }
    for failure in &result.failed {
        println!(
            "  {} {}: {}",
            "✗".red(),
            failure.action_id,
            failure.error.as_deref().unwrap_or("unknown error")
        );
    }
    println!();
    println!(
        "完了: 成功 {} 件 / 失敗 {} 件 ({} ms)",
        result.succeeded.len(),
        result.failed.len(),
        result.duration_ms
    );
}

/// 属性値を1行で表示する
///
/// 複数行の文字列（ASCII armor など）は先頭行と行数だけを表示します。
pub fn format_attribute(value: &Value) -> String {
    match value {
        Value::String(s) => {
            let mut lines = s.lines();
            match (lines.next(), lines.count()) {
                (None, _) => "\"\"".to_string(),
                (Some(first), 0) => first.to_string(),
                (Some(first), rest) => format!("{} … ({} 行)", first, rest + 1),
            }
        }
        Value::Null => "(なし)".to_string(),
        other => other.to_string(),
    }
}

/// リソースの表示対象属性（内部フィールドを除く）
pub fn visible_attributes<'a>(
    state: &'a ResourceState,
    internal: &[&str],
) -> Vec<(&'a str, &'a Value)> {
    state
        .attributes
        .iter()
        .filter(|(name, _)| !internal.contains(&name.as_str()))
        .map(|(name, value)| (name.as_str(), value))
        .collect()
}
