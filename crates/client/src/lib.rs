//! 客户端
//!
//! 消费端的两件套：网关 WebSocket 连接的薄封装，以及把在线状态
//! 事件流归并为一致视图的客户端缓存。

pub mod presence;
pub mod ws;

pub use presence::PresenceCache;
pub use ws::{ClientError, GatewayClient};
