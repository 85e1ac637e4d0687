//! 型付きAPIファサード

use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::api::models::{
    AnalysisId, AnalysisPage, AnalysisQuery, AnalysisRecord, AnalysisRequest, Registration,
    TokenResponse, UserProfile,
};
use crate::api::transport::{ApiRequest, ApiTransport};
use crate::error::CuratorResult;

pub const TOKEN_ENDPOINT: &str = "/auth/token";
pub const ME_ENDPOINT: &str = "/auth/me";
pub const REGISTER_ENDPOINT: &str = "/auth/register";
pub const ANALYSIS_ENDPOINT: &str = "/analysis/";

/// バックエンドの各エンドポイントを型付きで呼び出すクライアント
#[derive(Clone)]
pub struct CuratorApi {
    transport: Arc<dyn ApiTransport>,
}

impl CuratorApi {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<dyn ApiTransport> {
        &self.transport
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> CuratorResult<T> {
        let body = self.transport.send(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// ユーザー名とパスワードでアクセストークンを取得（フォームエンコード）
    pub async fn request_token(
        &self,
        username: &str,
        password: &str,
    ) -> CuratorResult<TokenResponse> {
        let request = ApiRequest::post(TOKEN_ENDPOINT).with_form(vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ]);
        self.fetch(request).await
    }

    pub async fn current_user(&self) -> CuratorResult<UserProfile> {
        self.fetch(ApiRequest::get(ME_ENDPOINT)).await
    }

    /// 登録のみ。レスポンスボディは使わない。
    pub async fn register(&self, registration: &Registration) -> CuratorResult<()> {
        let request =
            ApiRequest::post(REGISTER_ENDPOINT).with_json(serde_json::to_value(registration)?);
        self.transport.send(request).await?;
        Ok(())
    }

    pub async fn create_analysis(
        &self,
        request: &AnalysisRequest,
    ) -> CuratorResult<AnalysisRecord> {
        let request =
            ApiRequest::post(ANALYSIS_ENDPOINT).with_json(serde_json::to_value(request)?);
        self.fetch(request).await
    }

    pub async fn list_analyses(&self, query: &AnalysisQuery) -> CuratorResult<AnalysisPage> {
        let request = ApiRequest::get(ANALYSIS_ENDPOINT).with_query(query.to_query_pairs());
        self.fetch(request).await
    }

    pub async fn get_analysis(&self, id: AnalysisId) -> CuratorResult<AnalysisRecord> {
        self.fetch(ApiRequest::get(analysis_path(id))).await
    }

    pub async fn delete_analysis(&self, id: AnalysisId) -> CuratorResult<()> {
        self.transport.send(ApiRequest::delete(analysis_path(id))).await?;
        Ok(())
    }
}

pub fn analysis_path(id: AnalysisId) -> String {
    format!("{}{}", ANALYSIS_ENDPOINT, id)
}
