//! 网关连接
//!
//! 对 WebSocket 连接的薄封装：握手后等待 `Ready` 帧拿到连接标识，
//! 之后按协议类型收发帧。

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsFrame;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use domain::{ClientMessage, ConnectionId, ServerMessage, UserId};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("传输错误: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("协议错误: {0}")]
    Protocol(String),
    #[error("连接已关闭")]
    Closed,
}

/// 网关 WebSocket 客户端
pub struct GatewayClient {
    stream: WsStream,
    connection_id: ConnectionId,
    user_id: UserId,
}

impl GatewayClient {
    /// 建立连接并等待 `Ready` 帧
    ///
    /// `gateway_url` 形如 `ws://127.0.0.1:8081`。
    pub async fn connect(gateway_url: &str, user_id: UserId) -> Result<Self, ClientError> {
        let url = format!("{gateway_url}/ws?user_id={user_id}");
        let (mut stream, _) = connect_async(url).await?;

        match next_frame(&mut stream).await? {
            ServerMessage::Ready { connection_id, .. } => {
                tracing::debug!(connection_id = %connection_id, user_id = %user_id, "网关连接就绪");
                Ok(Self {
                    stream,
                    connection_id,
                    user_id,
                })
            }
            other => Err(ClientError::Protocol(format!(
                "握手后的首帧应为 Ready，实际 {other:?}"
            ))),
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// 发送一条协议消息
    pub async fn send(&mut self, message: &ClientMessage) -> Result<(), ClientError> {
        let text = serde_json::to_string(message)
            .map_err(|err| ClientError::Protocol(err.to_string()))?;
        self.stream.send(WsFrame::Text(text.into())).await?;
        Ok(())
    }

    /// 读取下一条服务器帧，跳过控制帧
    pub async fn next_message(&mut self) -> Result<ServerMessage, ClientError> {
        next_frame(&mut self.stream).await
    }

    /// 主动关闭连接
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.stream.close(None).await?;
        Ok(())
    }
}

async fn next_frame(stream: &mut WsStream) -> Result<ServerMessage, ClientError> {
    loop {
        let frame = match stream.next().await {
            Some(frame) => frame?,
            None => return Err(ClientError::Closed),
        };
        match frame {
            WsFrame::Text(text) => {
                return serde_json::from_str(text.as_str())
                    .map_err(|err| ClientError::Protocol(err.to_string()));
            }
            WsFrame::Close(_) => return Err(ClientError::Closed),
            // Ping/Pong 由底层协议栈应答
            _ => {}
        }
    }
}
