//! アプリケーションコンテキスト
//!
//! 両ストアとルーターを束ねる明示的なコンテナ。グローバル状態は持たない。
//! 初回ナビゲーションの前に`initialize`でセッションを復元・再検証する。

use std::sync::Arc;

use crate::api::{ApiTransport, CuratorApi, HttpTransport};
use crate::config::ClientConfig;
use crate::error::{CuratorError, CuratorResult};
use crate::router::{NavigationDecision, Router};
use crate::store::{AnalysisStore, FileStorage, SessionStorage, SessionStore};

pub struct AppContext {
    pub session: SessionStore,
    pub analyses: AnalysisStore,
    pub router: Router,
    initialized: bool,
}

impl AppContext {
    /// トランスポートとストレージを注入して作成
    pub fn new(transport: Arc<dyn ApiTransport>, storage: Arc<dyn SessionStorage>) -> Self {
        let api = CuratorApi::new(transport);
        Self {
            session: SessionStore::new(api.clone(), storage),
            analyses: AnalysisStore::new(api),
            router: Router::default(),
            initialized: false,
        }
    }

    /// 設定からHTTPトランスポートとファイルストレージを組み立てる
    pub fn from_config(config: &ClientConfig) -> CuratorResult<Self> {
        let transport = HttpTransport::new(&config.api_url, config.request_timeout())?;
        let storage_dir = config
            .resolved_storage_dir()
            .ok_or_else(|| CuratorError::Config("Failed to determine storage directory".into()))?;

        tracing::debug!(
            api_url = %transport.base_url(),
            storage_dir = %storage_dir.display(),
            "🔧 Building application context"
        );

        Ok(Self::new(
            Arc::new(transport),
            Arc::new(FileStorage::new(storage_dir)),
        ))
    }

    /// 起動処理: 永続化セッションの復元 → トークン再検証
    ///
    /// 2回目以降の呼び出しは何もしない。戻り値は初期化後の認証状態。
    pub async fn initialize(&mut self) -> bool {
        if !self.initialized {
            self.session.restore();
            self.session.check_auth().await;
            self.initialized = true;
            tracing::info!(
                authenticated = self.session.is_authenticated(),
                "🚀 Application context initialized"
            );
        }
        self.session.is_authenticated()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// 現在のセッション状態でナビゲーションを判定
    pub fn navigate(&self, path: &str) -> NavigationDecision {
        self.router.navigate(path, self.session.is_authenticated())
    }
}
