//! クライアント共通のエラー型

use thiserror::Error;

/// バックエンド呼び出し・永続化・設定で発生するエラー
#[derive(Error, Debug)]
pub enum CuratorError {
    /// バックエンドが非2xxを返した（`detail`はレスポンスの同名フィールド）
    #[error("API error {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    /// 通信エラー（構造化ペイロードなし）
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// レスポンスのデコード失敗
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// セッションストレージの読み書き失敗
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/Oエラー
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML解析エラー
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOMLシリアライズエラー
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CuratorError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// バックエンドの`detail`メッセージ（存在する場合のみ）
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTPステータス（APIエラーの場合のみ）
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// 画面に出すメッセージ: `detail`があればそれ、なければフォールバック
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail()
            .filter(|d| !d.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

pub type CuratorResult<T> = Result<T, CuratorError>;
