//! 应用层实现。
//!
//! 这里提供实时层的用例服务：事件总线与订阅注册表、发布端的
//! 统一发布路径（本地总线 + 通知桥）、以及围绕权限解析引擎的
//! 访问控制协议。对外部适配器（通知桥传输）只定义抽象。

pub mod error;
pub mod event_bus;
pub mod forwarder;
pub mod publisher;
pub mod services;
pub mod subscriptions;

pub use error::ApplicationError;
pub use event_bus::{BusSubscription, EventBus, HandlerId};
pub use forwarder::{EventForwarder, ForwardError, NullEventForwarder};
pub use publisher::EventPublisher;
pub use services::{
    AccessControl, AccessControlDependencies, ChannelMessageRequest, ChannelResolution,
    ConversationMessageRequest, FriendRequestNotice, FriendService, FriendServiceDependencies,
    KickMemberRequest, MembershipService, MembershipServiceDependencies, MessageService,
    MessageServiceDependencies, PresenceService, PresenceServiceDependencies,
    UpdateRolesRequest, UpdateStatusRequest,
};
pub use subscriptions::SubscriptionRegistry;
