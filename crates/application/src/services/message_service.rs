//! 消息通知服务
//!
//! 频道消息事件只携带频道与消息 ID，订阅端按需回源取正文；
//! 私信会话事件携带完整负载，接收端无需二次查询。

use std::sync::Arc;

use chrono::Utc;
use domain::{
    ChannelId, ChannelMessageEvent, ConversationId, DirectMessage, DomainError, MessageId,
    Permissions, RealtimeEvent, ServerId, UserId,
};
use uuid::Uuid;

use crate::error::ApplicationError;
use crate::publisher::EventPublisher;
use crate::services::access_control::AccessControl;

/// 私信正文长度上限（字符数）
const MAX_CONTENT_LENGTH: usize = 4000;

/// 消息服务依赖
pub struct MessageServiceDependencies {
    pub access_control: Arc<AccessControl>,
    pub publisher: Arc<EventPublisher>,
}

/// 频道消息通知请求
#[derive(Debug, Clone)]
pub struct ChannelMessageRequest {
    /// 服务器 ID
    pub server_id: Uuid,
    /// 频道 ID
    pub channel_id: Uuid,
    /// 发送者用户 ID
    pub sender_id: Uuid,
    /// 已落库的消息 ID
    pub message_id: Uuid,
}

/// 私信会话通知请求
#[derive(Debug, Clone)]
pub struct ConversationMessageRequest {
    /// 会话 ID
    pub conversation_id: Uuid,
    /// 发送者用户 ID
    pub sender_id: Uuid,
    /// 接收者用户 ID
    pub recipient_id: Uuid,
    /// 消息正文
    pub content: String,
}

/// 消息服务
pub struct MessageService {
    dependencies: MessageServiceDependencies,
}

impl MessageService {
    pub fn new(dependencies: MessageServiceDependencies) -> Self {
        Self { dependencies }
    }

    /// 发布频道消息事件（仅 ID）
    ///
    /// 发送者必须在该频道持有发言权限，解析失败或权限不足时不产生事件。
    pub async fn notify_channel_message(
        &self,
        request: ChannelMessageRequest,
    ) -> Result<(), ApplicationError> {
        let server_id = ServerId::new(request.server_id);
        let channel_id = ChannelId::new(request.channel_id);
        let sender_id = UserId::new(request.sender_id);
        let message_id = MessageId::new(request.message_id);

        self.dependencies
            .access_control
            .require(
                server_id,
                channel_id,
                sender_id,
                Permissions::SEND_MESSAGES,
                "send_message",
            )
            .await?;

        self.dependencies
            .publisher
            .publish(RealtimeEvent::ChannelMessage(ChannelMessageEvent {
                channel_id,
                message_id,
            }))
            .await;

        tracing::info!(
            channel_id = %channel_id,
            message_id = %message_id,
            sender_id = %sender_id,
            "频道消息事件已发布"
        );
        Ok(())
    }

    /// 发布私信会话事件（完整负载）
    pub async fn notify_conversation_message(
        &self,
        request: ConversationMessageRequest,
    ) -> Result<DirectMessage, ApplicationError> {
        let content = request.content.trim();
        if content.is_empty() {
            return Err(DomainError::ValidationError {
                field: "content".to_string(),
                message: "消息内容不能为空".to_string(),
            }
            .into());
        }
        if content.chars().count() > MAX_CONTENT_LENGTH {
            return Err(DomainError::ValidationError {
                field: "content".to_string(),
                message: format!("消息内容不能超过 {MAX_CONTENT_LENGTH} 个字符"),
            }
            .into());
        }

        let message = DirectMessage {
            id: MessageId::new(Uuid::new_v4()),
            conversation_id: ConversationId::new(request.conversation_id),
            sender_id: UserId::new(request.sender_id),
            recipient_id: UserId::new(request.recipient_id),
            content: content.to_string(),
            sent_at: Utc::now(),
        };

        self.dependencies
            .publisher
            .publish(RealtimeEvent::ConversationMessage(message.clone()))
            .await;

        tracing::info!(
            conversation_id = %message.conversation_id,
            message_id = %message.id,
            "私信会话事件已发布"
        );
        Ok(message)
    }
}
