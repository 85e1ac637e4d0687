pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod router;
pub mod store;

// Re-export the main error types for convenience
pub use error::{CuratorError, CuratorResult};

pub use api::models::{
    AnalysisId, AnalysisPage, AnalysisQuery, AnalysisRecord, AnalysisType, Registration,
    UserProfile,
};
pub use api::{ApiTransport, CuratorApi, HttpTransport};
pub use app::AppContext;
pub use config::{ClientConfig, ConfigManager};
pub use router::{guard, NavigationDecision, RouteMeta, Router};
pub use store::{ActionError, ActionResult, AnalysisStore, SessionStore};
