use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("KDLパースエラー: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("ファイル読み込みエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO エラー: {path}\n理由: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("無効な設定: {0}")]
    InvalidConfig(String),

    #[error(
        "マニフェストが見つかりません\n探索開始位置: {0}\n\
        ヒント: keyflow.kdl を作成するか KEYFLOW_CONFIG_PATH 環境変数で直接指定してください"
    )]
    ManifestNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, ManifestError>;
