pub mod client; // 型付きエンドポイント呼び出し
pub mod models; // ワイヤ型
pub mod transport; // HTTPトランスポート

pub use client::CuratorApi;
pub use transport::{ApiRequest, ApiTransport, HttpMethod, HttpTransport, RequestBody};
