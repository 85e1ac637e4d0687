//! ストア共通のリクエスト状態とアクション結果

use crate::error::CuratorError;

/// アクション失敗時のフォールバックメッセージ
pub mod messages {
    pub const LOGIN_FAILED: &str = "Ошибка при входе";
    pub const REGISTER_FAILED: &str = "Ошибка при регистрации";
    pub const CREATE_FAILED: &str = "Ошибка при анализе текста";
    pub const LIST_FAILED: &str = "Ошибка при загрузке анализов";
    pub const FETCH_FAILED: &str = "Ошибка при загрузке анализа";
    pub const DELETE_FAILED: &str = "Ошибка при удалении анализа";
}

/// ビューに返す失敗（表示用メッセージのみ）
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ActionError {
    pub message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type ActionResult<T = ()> = Result<T, ActionError>;

/// ストアごとのリクエスト状態（操作ごとに上書き）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStatus {
    pub loading: bool,
    pub error: Option<String>,
}

impl RequestStatus {
    /// 操作開始: loading=true, error=None
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// エラーを記録し、呼び出し元に返す失敗を作る
    pub fn fail(&mut self, err: &CuratorError, fallback: &str) -> ActionError {
        let message = err.user_message(fallback);
        tracing::warn!(
            error = %err,
            status = ?err.status(),
            message = %message,
            "❌ Store action failed"
        );
        self.error = Some(message.clone());
        ActionError { message }
    }

    /// 成否にかかわらず最後に呼ぶ
    pub fn settle(&mut self) {
        self.loading = false;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
