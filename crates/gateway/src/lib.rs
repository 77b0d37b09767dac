//! 实时网关
//!
//! 与生产端分进程运行：在 `/internal/events` 接收通知桥投递的
//! 实时事件，在本进程总线上重放，再按各 WebSocket 连接声明的
//! 订阅推送给客户端。

mod bridge;
mod connection;
mod routes;
mod state;
mod ws;

pub use routes::router;
pub use state::GatewayState;
