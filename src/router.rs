//! ルート定義とナビゲーションガード

pub const LOGIN_PATH: &str = "/login";
pub const LANDING_PATH: &str = "/dashboard";

/// ルートごとのフラグ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// 未ログインなら/loginへ
    pub requires_auth: bool,
    /// ログイン済みなら/dashboardへ（ログイン・登録画面）
    pub hide_for_auth: bool,
}

impl RouteMeta {
    pub const PUBLIC: RouteMeta = RouteMeta {
        requires_auth: false,
        hide_for_auth: false,
    };
    pub const PROTECTED: RouteMeta = RouteMeta {
        requires_auth: true,
        hide_for_auth: false,
    };
    pub const GUEST_ONLY: RouteMeta = RouteMeta {
        requires_auth: false,
        hide_for_auth: true,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub meta: RouteMeta,
}

impl Route {
    pub const fn new(path: &'static str, name: &'static str, meta: RouteMeta) -> Self {
        Self { path, name, meta }
    }
}

/// ナビゲーション判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    Redirect(&'static str),
}

/// ガード本体。副作用なし。
pub fn guard(meta: &RouteMeta, is_authenticated: bool) -> NavigationDecision {
    if meta.requires_auth && !is_authenticated {
        return NavigationDecision::Redirect(LOGIN_PATH);
    }
    if meta.hide_for_auth && is_authenticated {
        return NavigationDecision::Redirect(LANDING_PATH);
    }
    NavigationDecision::Proceed
}

/// ルートテーブル。どれにも一致しないパスはNotFoundに解決される。
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
    not_found: Route,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            routes: vec![
                Route::new("/", "Home", RouteMeta::PUBLIC),
                Route::new(LOGIN_PATH, "Login", RouteMeta::GUEST_ONLY),
                Route::new("/register", "Register", RouteMeta::GUEST_ONLY),
                Route::new(LANDING_PATH, "Dashboard", RouteMeta::PROTECTED),
                Route::new("/analysis", "Analysis", RouteMeta::PROTECTED),
                Route::new("/history", "History", RouteMeta::PROTECTED),
                Route::new("/profile", "Profile", RouteMeta::PROTECTED),
            ],
            not_found: Route {
                path: "/:pathMatch(.*)*",
                name: "NotFound",
                meta: RouteMeta::PUBLIC,
            },
        }
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// パスからルートを解決（クエリ・フラグメントは無視、末尾スラッシュは許容）
    pub fn resolve(&self, path: &str) -> &Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let normalized = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        self.routes
            .iter()
            .find(|route| route.path == normalized)
            .unwrap_or(&self.not_found)
    }

    pub fn navigate(&self, path: &str, is_authenticated: bool) -> NavigationDecision {
        let route = self.resolve(path);
        let decision = guard(&route.meta, is_authenticated);
        tracing::debug!(path, route = route.name, ?decision, "🧭 Navigation checked");
        decision
    }
}
