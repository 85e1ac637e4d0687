//! ログ初期化

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{default_config_dir, LogConfig};

/// ログファイルのディレクトリ（設定がなければ設定ディレクトリ配下のlogs）
pub fn log_directory(config: &LogConfig) -> Option<PathBuf> {
    config
        .log_dir
        .clone()
        .or_else(|| default_config_dir().map(|dir| dir.join("logs")))
}

/// `RUST_LOG`があればそれを優先し、なければ設定のレベルを使う
pub fn build_env_filter(config: &LogConfig) -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?)
}

/// ログを初期化する。ファイル出力時は返されたガードを保持し続けること。
pub fn init_logging(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_filter(build_env_filter(config)?);

    let mut guard = None;
    let file_layer = match config.enable_file_logging.then(|| log_directory(config)).flatten() {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::daily(&dir, "curator.log");
            let (writer, worker_guard) = tracing_appender::non_blocking(appender);
            guard = Some(worker_guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .json()
                    .with_filter(build_env_filter(config)?),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
