//! 統合テスト用の共通ヘルパー

#![allow(dead_code)]

use async_trait::async_trait;
use curator_client::api::{ApiRequest, ApiTransport};
use curator_client::store::MemoryStorage;
use curator_client::{CuratorApi, CuratorError, CuratorResult};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;

/// 送信されたリクエストと、その時点のBearerトークン
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub request: ApiRequest,
    pub bearer: Option<String>,
}

/// あらかじめ積んだレスポンスを順番に返すトランスポート
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<CuratorResult<Value>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    bearer: Mutex<Option<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_ok(&self, body: Value) {
        self.responses.lock().push_back(Ok(body));
    }

    pub fn push_api_error(&self, status: u16, detail: Option<&str>) {
        self.responses.lock().push_back(Err(CuratorError::Api {
            status,
            detail: detail.map(|d| d.to_string()),
        }));
    }

    /// 構造化ペイロードのない通信障害
    pub fn push_network_error(&self) {
        self.responses.lock().push_back(Err(CuratorError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn pending_responses(&self) -> usize {
        self.responses.lock().len()
    }
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> CuratorResult<Value> {
        let bearer = self.bearer.lock().clone();
        self.requests.lock().push(RecordedRequest { request, bearer });
        self.responses.lock().pop_front().unwrap_or_else(|| {
            Err(CuratorError::Api {
                status: 599,
                detail: Some("unscripted request".to_string()),
            })
        })
    }

    fn set_bearer_token(&self, token: Option<&str>) {
        *self.bearer.lock() = token.map(|t| t.to_string());
    }

    fn bearer_token(&self) -> Option<String> {
        self.bearer.lock().clone()
    }
}

pub fn api(transport: &Arc<ScriptedTransport>) -> CuratorApi {
    CuratorApi::new(transport.clone())
}

pub fn memory_storage() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::new())
}

pub fn user_json() -> Value {
    json!({
        "id": 1,
        "username": "alice",
        "email": "alice@example.com",
        "telegram_id": null,
        "is_active": true,
        "created_at": "2024-04-30T08:00:00"
    })
}

pub fn record_json(id: i64, analysis_type: &str) -> Value {
    json!({
        "id": id,
        "original_text": format!("text #{}", id),
        "analysis_type": analysis_type,
        "result": format!("result #{}", id),
        "confidence_score": "0.9",
        "processing_time": "0.50s",
        "created_at": "2024-05-01T10:00:00"
    })
}
