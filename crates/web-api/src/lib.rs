//! Web API 层。
//!
//! 提供 Axum 路由，将主应用动作产生的实时通知委托给应用层的用例服务。

mod error;
mod routes;
mod state;

pub use routes::router;
pub use state::AppState;
