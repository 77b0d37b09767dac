//! 用例服务集合

pub mod access_control;
pub mod friend_service;
pub mod membership_service;
pub mod message_service;
pub mod presence_service;

pub use access_control::{AccessControl, AccessControlDependencies, ChannelResolution};
pub use friend_service::{FriendRequestNotice, FriendService, FriendServiceDependencies};
pub use membership_service::{
    KickMemberRequest, MembershipService, MembershipServiceDependencies, UpdateRolesRequest,
};
pub use message_service::{
    ChannelMessageRequest, ConversationMessageRequest, MessageService, MessageServiceDependencies,
};
pub use presence_service::{PresenceService, PresenceServiceDependencies, UpdateStatusRequest};
