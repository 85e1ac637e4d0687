//! バックエンドAPIのワイヤ型

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 分析レコードID
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct AnalysisId(pub i64);

/// 分析の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Sentiment,
    Summary,
    Keywords,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 3] = [Self::Sentiment, Self::Summary, Self::Keywords];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sentiment => "sentiment",
            Self::Summary => "summary",
            Self::Keywords => "keywords",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown analysis type '{0}' (expected sentiment, summary or keywords)")]
pub struct UnknownAnalysisType(pub String);

impl FromStr for AnalysisType {
    type Err = UnknownAnalysisType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownAnalysisType(s.to_string()))
    }
}

/// `GET /auth/me` が返すユーザープロフィール
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub telegram_id: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

/// `POST /auth/token` のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// ユーザー登録ペイロード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// `POST /analysis/` のリクエスト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
    pub analysis_type: AnalysisType,
}

/// 分析レコード（バックエンド所有、クライアントはキャッシュのみ保持）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub analysis_type: AnalysisType,
    #[serde(rename = "original_text", alias = "text")]
    pub text: String,
    pub result: String,
    #[serde(default)]
    pub confidence_score: Option<String>,
    #[serde(default)]
    pub processing_time: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

/// 一覧取得の条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisQuery {
    pub skip: u32,
    pub limit: u32,
    pub analysis_type: Option<AnalysisType>,
}

impl Default for AnalysisQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 20,
            analysis_type: None,
        }
    }
}

impl AnalysisQuery {
    pub fn page(skip: u32, limit: u32) -> Self {
        Self {
            skip,
            limit,
            analysis_type: None,
        }
    }

    pub fn with_type(mut self, analysis_type: AnalysisType) -> Self {
        self.analysis_type = Some(analysis_type);
        self
    }

    /// クエリ文字列用のキー・値ペア（種類未指定ならパラメータ自体を省く）
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("skip".to_string(), self.skip.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(analysis_type) = self.analysis_type {
            pairs.push(("analysis_type".to_string(), analysis_type.to_string()));
        }
        pairs
    }
}

/// `GET /analysis/` のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPage {
    pub analyses: Vec<AnalysisRecord>,
    pub total: i64,
}

/// タイムスタンプ文字列を解釈する。オフセット付き(RFC 3339)はUTCに正規化する。
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok())
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
