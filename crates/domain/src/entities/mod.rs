//! 领域实体定义
//!
//! 包含系统的核心实体：服务器、频道、角色、成员、在线状态，
//! 以及 WebSocket 订阅协议的线缆类型。

pub mod channel;
pub mod member;
pub mod presence;
pub mod role;
pub mod server;
pub mod websocket;

// 重新导出核心实体
pub use channel::{Channel, ChannelKind};
pub use member::Member;
pub use presence::{PresenceSnapshot, PresenceStatus};
pub use role::Role;
pub use server::Server;
pub use websocket::{ClientMessage, ServerMessage, SubscriptionTarget};
