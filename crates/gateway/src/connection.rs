//! 每连接消息循环
//!
//! 入站帧解析为 `ClientMessage` 后派发到订阅注册表；出站方向经
//! 无界队列解耦，注册表的送达处理器只做入队，真正的网络写入在
//! 本模块的发送任务里完成。协议错误回送 `Error` 帧，连接保持可用，
//! 其余订阅不受影响。

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedSender};
use uuid::Uuid;

use application::ApplicationError;
use domain::{
    ClientMessage, ConnectionId, DomainError, ServerMessage, SubscriptionTarget, UserId,
};

use crate::state::GatewayState;

pub(crate) async fn handle_socket(socket: WebSocket, state: GatewayState, user_id: UserId) {
    let connection_id = ConnectionId::new(Uuid::new_v4());
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (sender, mut outbound) = mpsc::unbounded_channel::<ServerMessage>();

    state
        .registry
        .register_connection(connection_id, user_id, sender.clone());
    let _ = sender.send(ServerMessage::Ready {
        connection_id,
        user_id,
    });

    let send_task = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            let text = match serde_json::to_string(&frame) {
                Ok(text) => text,
                Err(err) => {
                    tracing::error!(error = %err, "出站帧序列化失败");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(incoming) = ws_receiver.next().await {
        match incoming {
            Ok(Message::Text(text)) => {
                handle_text(&state, connection_id, user_id, text.as_str(), &sender).await;
            }
            Ok(Message::Binary(_)) => {
                let _ = sender.send(protocol_error("UNSUPPORTED_FRAME", "只接受文本帧"));
            }
            // Ping 由 axum 自动应答
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Ok(Message::Close(_)) => break,
            Err(err) => {
                tracing::debug!(connection_id = %connection_id, error = %err, "WebSocket 读取中断");
                break;
            }
        }
    }

    // 连接落下，订阅全部拆除；出站队列随最后一个发送端一起关闭
    state.registry.remove_connection(connection_id);
    drop(sender);
    let _ = send_task.await;
    tracing::info!(connection_id = %connection_id, user_id = %user_id, "连接已关闭");
}

async fn handle_text(
    state: &GatewayState,
    connection_id: ConnectionId,
    user_id: UserId,
    text: &str,
    sender: &UnboundedSender<ServerMessage>,
) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(err) => {
            tracing::debug!(connection_id = %connection_id, error = %err, "客户端消息解析失败");
            let _ = sender.send(protocol_error("MALFORMED_MESSAGE", "无法解析的客户端消息"));
            return;
        }
    };

    if let Err(error) = dispatch(state, connection_id, user_id, message, sender).await {
        tracing::debug!(connection_id = %connection_id, error = %error, "订阅操作被拒绝");
        let _ = sender.send(error_frame(&error));
    }
}

async fn dispatch(
    state: &GatewayState,
    connection_id: ConnectionId,
    user_id: UserId,
    message: ClientMessage,
    sender: &UnboundedSender<ServerMessage>,
) -> Result<(), ApplicationError> {
    match message {
        ClientMessage::SubscribeChannel {
            server_id,
            channel_id,
        } => {
            // 频道订阅有可见性门槛，看不见的频道不能订阅
            if !state
                .access_control
                .can_view(server_id, channel_id, user_id)
                .await?
            {
                return Err(DomainError::PermissionDenied {
                    action: "subscribe_channel".to_string(),
                }
                .into());
            }
            state.registry.subscribe_channel(connection_id, channel_id)?;
            let _ = sender.send(ServerMessage::Subscribed {
                target: SubscriptionTarget::Channel { channel_id },
            });
        }
        ClientMessage::UnsubscribeChannel { channel_id } => {
            let target = SubscriptionTarget::Channel { channel_id };
            state.registry.unsubscribe(connection_id, target)?;
            let _ = sender.send(ServerMessage::Unsubscribed { target });
        }
        ClientMessage::SubscribeConversation { conversation_id } => {
            state
                .registry
                .subscribe_conversation(connection_id, conversation_id)?;
            let _ = sender.send(ServerMessage::Subscribed {
                target: SubscriptionTarget::Conversation { conversation_id },
            });
        }
        ClientMessage::UnsubscribeConversation { conversation_id } => {
            let target = SubscriptionTarget::Conversation { conversation_id };
            state.registry.unsubscribe(connection_id, target)?;
            let _ = sender.send(ServerMessage::Unsubscribed { target });
        }
        ClientMessage::SubscribeInbox => {
            state.registry.subscribe_inbox(connection_id)?;
            let _ = sender.send(ServerMessage::Subscribed {
                target: SubscriptionTarget::Inbox,
            });
        }
        ClientMessage::UnsubscribeInbox => {
            state
                .registry
                .unsubscribe(connection_id, SubscriptionTarget::Inbox)?;
            let _ = sender.send(ServerMessage::Unsubscribed {
                target: SubscriptionTarget::Inbox,
            });
        }
        ClientMessage::WatchPresence { user_ids } => {
            let watched = state.registry.watch_presence(connection_id, user_ids)?;
            let _ = sender.send(ServerMessage::PresenceWatchUpdated { watched });
        }
        ClientMessage::UnwatchPresence => {
            state
                .registry
                .unsubscribe(connection_id, SubscriptionTarget::Presence)?;
            let _ = sender.send(ServerMessage::Unsubscribed {
                target: SubscriptionTarget::Presence,
            });
        }
        ClientMessage::Ping => {
            let _ = sender.send(ServerMessage::Pong);
        }
    }
    Ok(())
}

fn protocol_error(code: &str, message: &str) -> ServerMessage {
    ServerMessage::Error {
        code: code.to_string(),
        message: message.to_string(),
    }
}

fn error_frame(error: &ApplicationError) -> ServerMessage {
    let code = match error {
        ApplicationError::Domain(DomainError::PermissionDenied { .. }) => "PERMISSION_DENIED",
        ApplicationError::Domain(DomainError::ResourceNotFound { .. }) => "NOT_FOUND",
        ApplicationError::Domain(DomainError::ValidationError { .. }) => "VALIDATION_ERROR",
        ApplicationError::Authorization { .. } => "AUTHORIZATION_FAILED",
        ApplicationError::Subscription(_) => "SUBSCRIPTION_ERROR",
        _ => "INTERNAL_ERROR",
    };
    ServerMessage::Error {
        code: code.to_string(),
        message: error.to_string(),
    }
}
