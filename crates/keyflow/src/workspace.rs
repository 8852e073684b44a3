//! マニフェスト・ステート・リソースレジストリの読み込み

use anyhow::Context;
use keyflow_core::Manifest;
use keyflow_github::{GitHubClient, GitHubConfig};
use keyflow_resource::{ResourceRegistry, StateManager};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// コマンド実行に必要なプロジェクト情報
pub struct Workspace {
    pub manifest: Manifest,
    /// ステートを保存するディレクトリ（マニフェストの置き場所）
    pub root: PathBuf,
    pub state: StateManager,
}

impl Workspace {
    /// マニフェストを探索して読み込む
    pub fn load(config: Option<&Path>) -> anyhow::Result<Self> {
        let path = match config {
            Some(path) => path.to_path_buf(),
            None => keyflow_core::find_manifest()?,
        };
        tracing::debug!("Using manifest {}", path.display());

        let manifest = keyflow_core::parse_manifest_file(&path)
            .with_context(|| format!("{} の読み込みに失敗しました", path.display()))?;
        let root = state_root(&path);

        Ok(Self {
            manifest,
            state: StateManager::new(&root),
            root,
        })
    }

    /// GitHub クライアントを組み立ててリソースタイプを登録し、
    /// マニフェストを検証する
    pub fn registry(&self) -> anyhow::Result<ResourceRegistry> {
        let registry = build_registry(GitHubConfig::from_env()?)?;
        registry.validate(&self.manifest.resources)?;
        Ok(registry)
    }

    /// スキーマ参照専用のレジストリ（トークン不要）
    ///
    /// クライアントは認証情報を持たず、呼び出されることもありません。
    pub fn schema_registry(&self) -> anyhow::Result<ResourceRegistry> {
        build_registry(GitHubConfig::new(String::new()))
    }
}

fn build_registry(config: GitHubConfig) -> anyhow::Result<ResourceRegistry> {
    let client = GitHubClient::new(config)?;

    let mut registry = ResourceRegistry::new();
    keyflow_github::register(&mut registry, Arc::new(client));
    Ok(registry)
}

/// `.keyflow/` 内のマニフェストはその親ディレクトリをプロジェクトルートとする
fn state_root(manifest_path: &Path) -> PathBuf {
    let dir = manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    match dir.file_name().and_then(|n| n.to_str()) {
        Some(".keyflow") => dir.parent().unwrap_or(dir).to_path_buf(),
        _ => dir.to_path_buf(),
    }
}
