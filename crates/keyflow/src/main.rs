mod commands;
mod output;
mod workspace;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "keyflow")]
#[command(about = "GitHub の GPG 鍵を KDL で宣言的に管理する", long_about = None)]
struct Cli {
    /// マニフェストファイルのパス（省略時は自動探索）
    #[arg(short, long, global = true, env = "KEYFLOW_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 変更内容を表示（リモートは変更しない）
    Plan,
    /// マニフェストの内容をGitHubに反映
    Apply {
        /// 確認なしで実行
        #[arg(short, long)]
        yes: bool,
    },
    /// リモートの状態をステートに取り込む
    Refresh,
    /// 管理中の鍵をすべて削除
    Destroy {
        /// 確認なしで実行
        #[arg(short, long)]
        yes: bool,
    },
    /// 管理中のリソースを表示
    Show,
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Plan => commands::plan::handle(config).await,
        Commands::Apply { yes } => commands::apply::handle(config, yes).await,
        Commands::Refresh => commands::refresh::handle(config).await,
        Commands::Destroy { yes } => commands::destroy::handle(config, yes).await,
        Commands::Show => commands::show::handle(config).await,
        Commands::Version => {
            println!("keyflow {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
