pub mod analysis; // 分析レコードストア
pub mod session; // 認証セッションストア
pub mod status; // 共通のリクエスト状態
pub mod storage; // セッション永続化

pub use analysis::{AnalysisState, AnalysisStats, AnalysisStore, StatsUpdate};
pub use session::{SessionState, SessionStore};
pub use status::{ActionError, ActionResult, RequestStatus};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
