//! 好友请求通知服务
//!
//! 好友请求事件不挂在任何实体键下，按接收方身份路由到其收件箱。

use std::sync::Arc;

use domain::{DomainError, FriendRequestAction, FriendRequestEvent, RealtimeEvent, RequestId, UserId};
use uuid::Uuid;

use crate::error::ApplicationError;
use crate::publisher::EventPublisher;

/// 好友服务依赖
pub struct FriendServiceDependencies {
    pub publisher: Arc<EventPublisher>,
}

/// 好友请求通知
#[derive(Debug, Clone)]
pub struct FriendRequestNotice {
    /// 请求 ID
    pub request_id: Uuid,
    /// 发起方用户 ID
    pub sender_id: Uuid,
    /// 发起方展示名
    pub sender_name: String,
    /// 接收方用户 ID
    pub receiver_id: Uuid,
    /// 请求动作
    pub action: FriendRequestAction,
}

/// 好友请求通知服务
pub struct FriendService {
    dependencies: FriendServiceDependencies,
}

impl FriendService {
    pub fn new(dependencies: FriendServiceDependencies) -> Self {
        Self { dependencies }
    }

    /// 发布好友请求事件（完整负载）
    pub async fn notify_friend_request(
        &self,
        notice: FriendRequestNotice,
    ) -> Result<(), ApplicationError> {
        if notice.sender_id == notice.receiver_id {
            return Err(DomainError::ValidationError {
                field: "receiver_id".to_string(),
                message: "不能向自己发送好友请求".to_string(),
            }
            .into());
        }
        let sender_name = notice.sender_name.trim();
        if sender_name.is_empty() {
            return Err(DomainError::ValidationError {
                field: "sender_name".to_string(),
                message: "发起方展示名不能为空".to_string(),
            }
            .into());
        }

        let event = FriendRequestEvent {
            request_id: RequestId::new(notice.request_id),
            sender_id: UserId::new(notice.sender_id),
            sender_name: sender_name.to_string(),
            receiver_id: UserId::new(notice.receiver_id),
            action: notice.action,
        };

        let request_id = event.request_id;
        let receiver_id = event.receiver_id;
        let action = event.action;
        self.dependencies
            .publisher
            .publish(RealtimeEvent::FriendRequest(event))
            .await;

        tracing::info!(
            request_id = %request_id,
            receiver_id = %receiver_id,
            action = ?action,
            "好友请求事件已发布"
        );
        Ok(())
    }
}
