//! マニフェストファイルの探索

use crate::error::{ManifestError, Result};
use std::path::{Path, PathBuf};

const CANDIDATES: [&str; 2] = ["keyflow.local.kdl", "keyflow.kdl"];
const KEYFLOW_DIR: &str = ".keyflow";

/// カレントディレクトリからマニフェストを探す
pub fn find_manifest() -> Result<PathBuf> {
    let current_dir = std::env::current_dir()?;
    find_manifest_from(&current_dir)
}

/// マニフェストファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 KEYFLOW_CONFIG_PATH (直接パス指定)
/// 2. `start`: keyflow.local.kdl, keyflow.kdl
/// 3. `start/.keyflow/` ディレクトリ内: 同様の順序
pub fn find_manifest_from(start: &Path) -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var("KEYFLOW_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(
            "KEYFLOW_CONFIG_PATH points to a missing file: {}",
            path.display()
        );
    }

    for dir in [start.to_path_buf(), start.join(KEYFLOW_DIR)] {
        for filename in &CANDIDATES {
            let path = dir.join(filename);
            if path.is_file() {
                return Ok(path);
            }
        }
    }

    Err(ManifestError::ManifestNotFound(start.to_path_buf()))
}
