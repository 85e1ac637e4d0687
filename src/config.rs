//! クライアント設定管理モジュール
//!
//! XDGディレクトリを使用した設定ファイルの読み込みと保存を提供します。

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
/// APIのベースURLを上書きする環境変数
pub const API_URL_ENV: &str = "CURATOR_API_URL";

/// XDG設定ディレクトリ（例: ~/.config/curator）
pub fn default_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "ai-content-curator", "curator")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// ログ設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// ログレベル (trace/debug/info/warn/error)
    pub log_level: String,
    /// ファイル出力有効化
    pub enable_file_logging: bool,
    /// カスタムログディレクトリ（Noneの場合は設定ディレクトリ配下のlogs）
    pub log_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            enable_file_logging: false,
            log_dir: None,
        }
    }
}

/// クライアント設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// バックエンドAPIのベースURL
    pub api_url: String,
    /// リクエストタイムアウト（ミリ秒）
    pub request_timeout_ms: u64,
    /// セッション保存先（Noneの場合はXDG設定ディレクトリ）
    pub storage_dir: Option<PathBuf>,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_ms: 30_000,
            storage_dir: None,
            log: LogConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// 環境変数による上書きを適用
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                debug!("API URL overridden by {}: {}", API_URL_ENV, url);
                self.api_url = url.trim().to_string();
            }
        }
    }

    pub fn resolved_storage_dir(&self) -> Option<PathBuf> {
        self.storage_dir.clone().or_else(default_config_dir)
    }
}

/// 設定管理マネージャー
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// XDGディレクトリの設定ファイルを使う
    pub fn new() -> Result<Self> {
        let config_dir = default_config_dir().context("Failed to get project directories")?;
        Ok(Self::with_path(config_dir.join("config.toml")))
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        debug!("Config file path: {}", config_path.display());
        Self { config_path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 設定を読み込み（ファイルがなければデフォルト）
    pub fn load_config(&self) -> Result<ClientConfig> {
        if !self.config_path.exists() {
            info!(
                "Config file not found, using default settings: {}",
                self.config_path.display()
            );
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config: ClientConfig = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })?;

        info!(
            "✅ Configuration loaded from: {}",
            self.config_path.display()
        );
        Ok(config)
    }

    /// 設定を保存
    pub fn save_config(&self, config: &ClientConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(&self.config_path, content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        info!("💾 Configuration saved to: {}", self.config_path.display());
        Ok(())
    }
}
