//! HTTPトランスポート層
//!
//! ストアはこのトレイト越しにバックエンドを呼ぶ。既定のAuthorizationヘッダーは
//! トランスポートが保持し、以降の全リクエストに付与される。

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::AUTHORIZATION;
use std::time::Duration;

use crate::error::{CuratorError, CuratorResult};

/// HTTPメソッド
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum HttpMethod {
    GET,
    POST,
    DELETE,
}

/// リクエストボディ
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// APIリクエスト（エンドポイントはベースURLからの相対パス）
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub endpoint: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::POST, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::DELETE, endpoint)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }
}

/// バックエンドとの通信を抽象化するトレイト
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// リクエストを送信し、JSONボディを返す（空ボディは`Value::Null`）
    ///
    /// 非2xxは`CuratorError::Api`に変換される。
    async fn send(&self, request: ApiRequest) -> CuratorResult<serde_json::Value>;

    /// 既定のBearerトークンを設定（`None`でヘッダーを削除）
    fn set_bearer_token(&self, token: Option<&str>);

    /// 現在の既定Bearerトークン
    fn bearer_token(&self) -> Option<String>;
}

/// エラーペイロードから`detail`文字列を取り出す
pub fn extract_detail(body: &serde_json::Value) -> Option<String> {
    body.get("detail")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// reqwestベースのトランスポート
#[derive(Debug)]
pub struct HttpTransport {
    base_url: String,
    http_client: reqwest::Client,
    bearer: RwLock<Option<String>>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> CuratorResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("curator-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            bearer: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// エンドポイントから完全なURLを構築
    fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> CuratorResult<serde_json::Value> {
        let url = self.url_for(&request.endpoint);
        let request_id = uuid::Uuid::new_v4();
        tracing::debug!(%request_id, method = %request.method, %url, "📡 Sending API request");

        let mut http_request = match request.method {
            HttpMethod::GET => self.http_client.get(&url),
            HttpMethod::POST => self.http_client.post(&url),
            HttpMethod::DELETE => self.http_client.delete(&url),
        };

        let bearer = self.bearer.read().clone();
        if let Some(token) = bearer {
            http_request = http_request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        if !request.query.is_empty() {
            http_request = http_request.query(&request.query);
        }

        http_request = match request.body {
            RequestBody::Empty => http_request,
            RequestBody::Json(body) => http_request.json(&body),
            RequestBody::Form(fields) => http_request.form(&fields),
        };

        let response = http_request.send().await.map_err(|e| {
            tracing::error!(%request_id, "❌ HTTP request failed: {}", e);
            e
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::error!(%request_id, "❌ Failed to read response text: {}", e);
            e
        })?;

        tracing::debug!(
            %request_id,
            status = status.as_u16(),
            body_len = text.len(),
            "📄 Received API response"
        );

        if !status.is_success() {
            // エラーボディがJSONでない場合はdetailなしとして扱う
            let detail = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .as_ref()
                .and_then(extract_detail);
            tracing::warn!(
                %request_id,
                status = status.as_u16(),
                detail = ?detail,
                "⚠️ API returned error status"
            );
            return Err(CuratorError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(%request_id, "❌ Failed to parse JSON response: {}", e);
            tracing::debug!(
                "🔍 Response text preview: {}",
                text.chars().take(200).collect::<String>()
            );
            CuratorError::Decode(e)
        })
    }

    fn set_bearer_token(&self, token: Option<&str>) {
        *self.bearer.write() = token.map(|t| t.to_string());
    }

    fn bearer_token(&self) -> Option<String> {
        self.bearer.read().clone()
    }
}
