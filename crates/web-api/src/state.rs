use std::sync::Arc;

use application::{FriendService, MembershipService, MessageService, PresenceService};

#[derive(Clone)]
pub struct AppState {
    pub message_service: Arc<MessageService>,
    pub presence_service: Arc<PresenceService>,
    pub friend_service: Arc<FriendService>,
    pub membership_service: Arc<MembershipService>,
}

impl AppState {
    pub fn new(
        message_service: Arc<MessageService>,
        presence_service: Arc<PresenceService>,
        friend_service: Arc<FriendService>,
        membership_service: Arc<MembershipService>,
    ) -> Self {
        Self {
            message_service,
            presence_service,
            friend_service,
            membership_service,
        }
    }
}
