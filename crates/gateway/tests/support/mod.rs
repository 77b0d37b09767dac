#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use application::{AccessControl, AccessControlDependencies, EventBus};
use domain::{
    Channel, ChannelId, ChannelKind, ChannelMemberOverride, ChannelRoleOverride, ClientMessage,
    Member, Permissions, RealtimeEvent, Role, Server, ServerId, ServerMessage, UserId,
};
use futures_util::{SinkExt, StreamExt};
use gateway::GatewayState;
use infrastructure::MemoryStore;
use reqwest::StatusCode;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message as WsFrame;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

/// 一座已灌入目录快照并在随机端口上服务的网关：
/// 公开频道对全体成员可见；私有频道对普通成员 deny 查看位，
/// 仅 trusted 持有成员覆写记录（值为空集，仍然可见）。
pub struct GatewayWorld {
    pub addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    pub server_id: ServerId,
    pub owner_id: UserId,
    pub public_channel: ChannelId,
    pub private_channel: ChannelId,
    pub member: UserId,
    pub trusted: UserId,
    shutdown: Option<oneshot::Sender<()>>,
}

impl GatewayWorld {
    pub async fn start() -> Self {
        let store = Arc::new(MemoryStore::new());

        let owner_id = UserId::new(Uuid::new_v4());
        let server = Server::new("general".to_string(), owner_id);
        let server_id = server.id;
        store.insert_server(server);

        let public = Channel::new(server_id, "text".to_string(), ChannelKind::Text);
        let public_channel = public.id;
        store.insert_channel(public);

        let private = Channel::private(server_id, "staff".to_string(), ChannelKind::Text);
        let private_channel = private.id;
        store.insert_channel(private);

        let viewer_role = Role::new(
            server_id,
            "viewer".to_string(),
            Permissions::VIEW_CHANNELS,
            0,
        );
        let viewer_role_id = viewer_role.id;
        store.insert_role(viewer_role);

        // 私有频道对 viewer 角色收回查看位
        store.set_role_override(ChannelRoleOverride::new(
            private_channel,
            viewer_role_id,
            Permissions::empty(),
            Permissions::VIEW_CHANNELS,
        ));

        let member = UserId::new(Uuid::new_v4());
        store.insert_member(Member::with_roles(server_id, member, vec![viewer_role_id]));

        let trusted = UserId::new(Uuid::new_v4());
        let trusted_member = Member::with_roles(server_id, trusted, vec![viewer_role_id]);
        store.set_member_override(ChannelMemberOverride::new(
            private_channel,
            trusted_member.id,
            Permissions::empty(),
        ));
        store.insert_member(trusted_member);

        let bus = Arc::new(EventBus::new());
        let access_control = Arc::new(AccessControl::new(AccessControlDependencies {
            server_repository: store.clone(),
            member_repository: store.clone(),
            channel_repository: store.clone(),
        }));
        let state = GatewayState::new(bus, access_control);
        let router = gateway::router(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // 等待服务器启动
        sleep(Duration::from_millis(100)).await;

        Self {
            addr,
            store,
            server_id,
            owner_id,
            public_channel,
            private_channel,
            member,
            trusted,
            shutdown: Some(shutdown_tx),
        }
    }

    /// 以给定用户身份建立 WebSocket 连接并吃掉 Ready 帧
    pub async fn connect(&self, user_id: UserId) -> WsClient {
        let mut client = WsClient::connect(self.addr, user_id).await;
        let ready = client.recv().await;
        assert!(
            matches!(ready, ServerMessage::Ready { user_id: owner, .. } if owner == user_id),
            "首帧应为 Ready，实际 {ready:?}"
        );
        client
    }

    /// 经通知桥投递一条事件，返回响应状态码
    pub async fn post_event(&self, event: &RealtimeEvent) -> StatusCode {
        reqwest::Client::new()
            .post(format!("http://{}/internal/events", self.addr))
            .json(event)
            .send()
            .await
            .expect("投递事件")
            .status()
    }
}

impl Drop for GatewayWorld {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// 测试用 WebSocket 客户端
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn connect(addr: SocketAddr, user_id: UserId) -> Self {
        let url = format!("ws://{}/ws?user_id={}", addr, user_id);
        let (stream, _) = connect_async(url).await.expect("WebSocket 连接失败");
        Self { stream }
    }

    pub async fn send(&mut self, message: &ClientMessage) {
        let text = serde_json::to_string(message).expect("序列化客户端消息");
        self.send_text(&text).await;
    }

    pub async fn send_text(&mut self, text: &str) {
        self.stream
            .send(WsFrame::Text(text.to_string().into()))
            .await
            .expect("发送帧失败");
    }

    /// 读取下一条服务器帧，超时视为失败
    pub async fn recv(&mut self) -> ServerMessage {
        loop {
            let frame = timeout(Duration::from_secs(1), self.stream.next())
                .await
                .expect("等待服务器帧超时")
                .expect("连接已关闭")
                .expect("读取帧失败");
            if let WsFrame::Text(text) = frame {
                return serde_json::from_str(text.as_str()).expect("解析服务器帧");
            }
        }
    }

    /// 断言一小段时间内没有任何文本帧送达
    pub async fn expect_silence(&mut self) {
        let waited = timeout(Duration::from_millis(200), self.stream.next()).await;
        if let Ok(Some(Ok(WsFrame::Text(text)))) = &waited {
            panic!("不应收到帧，实际 {text}");
        }
    }
}
