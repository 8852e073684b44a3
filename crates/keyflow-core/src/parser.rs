//! KDLパーサー
//!
//! ```kdl
//! project "my-keys"
//!
//! github_user_gpg_key "laptop" {
//!     armored_public_key_file "keys/laptop.asc"
//! }
//! ```
//!
//! `project` 以外のトップレベルノードはすべてリソース宣言として扱います。
//! ノード名がリソースタイプ、最初の引数がリソース名です。
//! `<field>_file` はファイル内容を `<field>` の値として読み込みます。

use crate::error::{ManifestError, Result};
use keyflow_resource::{ResourceConfig, ResourceSet};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};

const FILE_SUFFIX: &str = "_file";

/// パース済みマニフェスト
#[derive(Debug, Clone)]
pub struct Manifest {
    pub project: String,
    /// 読み込んだファイル（文字列からパースした場合は None）
    pub path: Option<PathBuf>,
    pub resources: ResourceSet,
}

/// KDLファイルをパースしてManifestを生成
pub fn parse_manifest_file<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ManifestError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let name = base_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string();

    let mut manifest = parse_manifest_string(&content, base_dir, name)?;
    manifest.path = Some(path.to_path_buf());
    Ok(manifest)
}

/// KDL文字列をパース
///
/// `_file` の相対パスは `base_dir` 基準で解決します。
pub fn parse_manifest_string(
    content: &str,
    base_dir: &Path,
    default_name: String,
) -> Result<Manifest> {
    let doc: KdlDocument = content.parse()?;

    let mut project = default_name;
    let mut resources = ResourceSet::new();

    for node in doc.nodes() {
        match node.name().value() {
            "project" => {
                if let Some(name) = first_argument(node).and_then(|e| e.value().as_string()) {
                    project = name.to_string();
                }
            }
            resource_type => {
                let config = parse_resource(resource_type, node, base_dir)?;
                let key = config.key();
                if resources.get(&key).is_some() {
                    return Err(ManifestError::InvalidConfig(format!(
                        "リソース {} が重複しています",
                        key
                    )));
                }
                tracing::debug!("Declared resource {}", key);
                resources.add(config);
            }
        }
    }

    Ok(Manifest {
        project,
        path: None,
        resources,
    })
}

fn parse_resource(resource_type: &str, node: &KdlNode, base_dir: &Path) -> Result<ResourceConfig> {
    let name = first_argument(node)
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| {
            ManifestError::InvalidConfig(format!("{} には名前が必要です", resource_type))
        })?
        .to_string();

    let mut fields = Map::new();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            let field = child.name().value();
            let value = first_argument(child).map(|e| e.value()).ok_or_else(|| {
                ManifestError::InvalidConfig(format!(
                    "{}:{} の {} に値がありません",
                    resource_type, name, field
                ))
            })?;

            let (field, value) = match field.strip_suffix(FILE_SUFFIX) {
                Some(target) => (target, read_field_file(value, base_dir)?),
                None => (field, value_to_json(value).ok_or_else(|| {
                    ManifestError::InvalidConfig(format!(
                        "{}:{} の {} は文字列・整数・真偽値のいずれかで指定してください",
                        resource_type, name, field
                    ))
                })?),
            };

            if fields.insert(field.to_string(), value).is_some() {
                return Err(ManifestError::InvalidConfig(format!(
                    "{}:{} の {} が重複しています（{} と {}{} は同時に指定できません）",
                    resource_type, name, field, field, field, FILE_SUFFIX
                )));
            }
        }
    }

    Ok(ResourceConfig::new(resource_type, name, Value::Object(fields)))
}

fn first_argument(node: &KdlNode) -> Option<&KdlEntry> {
    node.entries().iter().find(|e| e.name().is_none())
}

fn value_to_json(value: &KdlValue) -> Option<Value> {
    if let Some(s) = value.as_string() {
        Some(json!(s))
    } else if let Some(i) = value.as_integer() {
        i64::try_from(i).ok().map(|i| json!(i))
    } else {
        value.as_bool().map(|b| json!(b))
    }
}

fn read_field_file(value: &KdlValue, base_dir: &Path) -> Result<Value> {
    let relative = value.as_string().ok_or_else(|| {
        ManifestError::InvalidConfig("ファイルパスは文字列で指定してください".to_string())
    })?;
    let path = base_dir.join(relative);
    let content = fs::read_to_string(&path).map_err(|e| ManifestError::IoError {
        path: path.clone(),
        message: e.to_string(),
    })?;
    Ok(json!(content))
}
