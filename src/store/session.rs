//! 認証セッションストア
//!
//! Anonymous → (login成功) → Authenticated → (logout / check_auth失敗) → Anonymous。
//! registerは状態を遷移させない。

use std::sync::Arc;

use crate::api::models::{Registration, UserProfile};
use crate::api::CuratorApi;
use crate::error::{CuratorError, CuratorResult};
use crate::store::status::{messages, ActionResult, RequestStatus};
use crate::store::storage::{SessionStorage, TOKEN_KEY, USER_KEY};

/// セッション状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub status: RequestStatus,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

pub struct SessionStore {
    api: CuratorApi,
    storage: Arc<dyn SessionStorage>,
    state: SessionState,
}

impl SessionStore {
    pub fn new(api: CuratorApi, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            api,
            storage,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.state.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.state.status.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.status.error.as_deref()
    }

    /// 永続化されたセッションを読み込む（起動時に一度だけ呼ぶ）
    pub fn restore(&mut self) {
        let token = self.storage.get(TOKEN_KEY);
        let user = self.storage.get(USER_KEY).and_then(|raw| {
            serde_json::from_str::<UserProfile>(&raw)
                .map_err(|e| tracing::warn!("⚠️ Ignoring malformed stored user: {}", e))
                .ok()
        });

        if let Some(token) = token.as_deref() {
            self.api.transport().set_bearer_token(Some(token));
        }

        tracing::info!(
            has_token = token.is_some(),
            has_user = user.is_some(),
            "🔄 Session restored from storage"
        );

        self.state.token = token;
        self.state.user = user;
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ActionResult {
        self.state.status.begin();
        let result = match self.try_login(username, password).await {
            Ok(()) => {
                tracing::info!(username, "✅ Logged in");
                Ok(())
            }
            Err(e) => Err(self.state.status.fail(&e, messages::LOGIN_FAILED)),
        };
        self.state.status.settle();
        result
    }

    async fn try_login(&mut self, username: &str, password: &str) -> CuratorResult<()> {
        let token = self.api.request_token(username, password).await?;
        self.set_token(Some(token.access_token))?;

        // トークン保存後にプロフィールを取得する。ここで失敗してもトークンは残る。
        let user = self.api.current_user().await?;
        self.set_user(Some(user))?;
        Ok(())
    }

    pub async fn register(&mut self, registration: &Registration) -> ActionResult {
        self.state.status.begin();
        let result = match self.api.register(registration).await {
            Ok(()) => {
                tracing::info!(username = %registration.username, "✅ Registered");
                Ok(())
            }
            Err(e) => Err(self.state.status.fail(&e, messages::REGISTER_FAILED)),
        };
        self.state.status.settle();
        result
    }

    /// 保持しているトークンを再検証する。失敗は一時障害ではなくセッション無効として扱う。
    ///
    /// loading/errorは変更しない。トークンがなければ何もしない。
    pub async fn check_auth(&mut self) {
        let Some(token) = self.state.token.clone() else {
            return;
        };

        self.api.transport().set_bearer_token(Some(&token));
        let outcome = match self.api.current_user().await {
            Ok(user) => self.set_user(Some(user)),
            Err(e) => Err(e),
        };

        if let Err(e) = outcome {
            tracing::warn!("🔒 Session validation failed, clearing session: {}", e);
            self.clear_session();
        }
    }

    pub fn logout(&mut self) {
        tracing::info!("👋 Logging out");
        self.clear_session();
    }

    pub fn clear_error(&mut self) {
        self.state.status.clear_error();
    }

    fn set_token(&mut self, token: Option<String>) -> CuratorResult<()> {
        self.state.token = token;
        self.api.transport().set_bearer_token(self.state.token.as_deref());
        match self.state.token.as_deref() {
            Some(token) => self.storage.set(TOKEN_KEY, token),
            None => self.storage.remove(TOKEN_KEY),
        }
    }

    fn set_user(&mut self, user: Option<UserProfile>) -> CuratorResult<()> {
        self.state.user = user;
        match &self.state.user {
            Some(user) => {
                let raw = serde_json::to_string(user).map_err(CuratorError::from)?;
                self.storage.set(USER_KEY, &raw)
            }
            None => self.storage.remove(USER_KEY),
        }
    }

    /// トークン・ユーザー・両ストレージキー・認証ヘッダーをすべて消す
    fn clear_session(&mut self) {
        self.state.token = None;
        self.state.user = None;
        self.api.transport().set_bearer_token(None);
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::error!(key, "❌ Failed to remove stored session entry: {}", e);
            }
        }
    }
}
