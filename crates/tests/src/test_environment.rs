//! 测试环境管理
//!
//! 生产端与网关各自持有独立的总线与订阅注册表，生产端的转发器
//! 指向真实监听中的网关桥接端点；目录快照镜像两端同源。

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use application::{
    services::{
        FriendService, FriendServiceDependencies, MembershipService,
        MembershipServiceDependencies, MessageService, MessageServiceDependencies,
        PresenceService, PresenceServiceDependencies,
    },
    AccessControl, AccessControlDependencies, EventBus, EventPublisher,
};
use axum::Router;
use client::{ClientError, GatewayClient};
use domain::{
    Channel, ChannelId, ChannelKind, Member, Permissions, Role, RoleId, Server, ServerId, UserId,
};
use gateway::GatewayState;
use infrastructure::{HttpEventForwarder, MemoryStore};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::sleep;
use uuid::Uuid;
use web_api::AppState;

/// 双进程拓扑的端到端环境
pub struct TestEnvironment {
    pub api_addr: SocketAddr,
    pub gateway_addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    pub server_id: ServerId,
    pub owner_id: UserId,
    pub channel_id: ChannelId,
    /// 持查看与发言权限的成员
    pub speaker: UserId,
    /// 只持查看权限的成员
    pub watcher: UserId,
    pub speaker_role: RoleId,
    api_shutdown: Option<oneshot::Sender<()>>,
    gateway_shutdown: Option<oneshot::Sender<()>>,
}

impl TestEnvironment {
    pub async fn start() -> Self {
        let store = Arc::new(MemoryStore::new());

        let owner_id = UserId::new(Uuid::new_v4());
        let server = Server::new("general".to_string(), owner_id);
        let server_id = server.id;
        store.insert_server(server);

        let channel = Channel::new(server_id, "text".to_string(), ChannelKind::Text);
        let channel_id = channel.id;
        store.insert_channel(channel);

        let speaker_role = Role::new(
            server_id,
            "speaker".to_string(),
            Permissions::VIEW_CHANNELS | Permissions::SEND_MESSAGES,
            1,
        );
        let viewer_role = Role::new(
            server_id,
            "viewer".to_string(),
            Permissions::VIEW_CHANNELS,
            0,
        );
        let speaker_role_id = speaker_role.id;
        let viewer_role_id = viewer_role.id;
        store.insert_role(speaker_role);
        store.insert_role(viewer_role);

        let speaker = UserId::new(Uuid::new_v4());
        let watcher = UserId::new(Uuid::new_v4());
        store.insert_member(Member::with_roles(server_id, speaker, vec![speaker_role_id]));
        store.insert_member(Member::with_roles(server_id, watcher, vec![viewer_role_id]));

        // 网关先起，生产端的转发器需要它的真实地址
        let gateway_access = Arc::new(AccessControl::new(AccessControlDependencies {
            server_repository: store.clone(),
            member_repository: store.clone(),
            channel_repository: store.clone(),
        }));
        let gateway_state = GatewayState::new(Arc::new(EventBus::new()), gateway_access);
        let (gateway_addr, gateway_shutdown) = serve(gateway::router(gateway_state)).await;

        let forwarder = HttpEventForwarder::new(
            format!("http://{gateway_addr}/internal/events"),
            Duration::from_millis(2000),
        )
        .expect("构造通知桥转发器");
        let publisher = Arc::new(EventPublisher::new(
            Arc::new(EventBus::new()),
            Arc::new(forwarder),
        ));

        let access_control = Arc::new(AccessControl::new(AccessControlDependencies {
            server_repository: store.clone(),
            member_repository: store.clone(),
            channel_repository: store.clone(),
        }));
        let message_service = Arc::new(MessageService::new(MessageServiceDependencies {
            access_control: access_control.clone(),
            publisher: publisher.clone(),
        }));
        let presence_service = Arc::new(PresenceService::new(PresenceServiceDependencies {
            presence_repository: store.clone(),
            publisher: publisher.clone(),
        }));
        let friend_service = Arc::new(FriendService::new(FriendServiceDependencies {
            publisher: publisher.clone(),
        }));
        let membership_service = Arc::new(MembershipService::new(MembershipServiceDependencies {
            access_control,
            server_repository: store.clone(),
            member_repository: store.clone(),
            publisher,
        }));
        let state = AppState::new(
            message_service,
            presence_service,
            friend_service,
            membership_service,
        );
        let (api_addr, api_shutdown) = serve(web_api::router(state)).await;

        tracing::info!(%api_addr, %gateway_addr, "测试环境已启动");

        Self {
            api_addr,
            gateway_addr,
            store,
            server_id,
            owner_id,
            channel_id,
            speaker,
            watcher,
            speaker_role: speaker_role_id,
            api_shutdown: Some(api_shutdown),
            gateway_shutdown: Some(gateway_shutdown),
        }
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("http://{}{}", self.api_addr, path)
    }

    /// 以给定用户身份连上网关并完成 Ready 握手
    pub async fn connect(&self, user_id: UserId) -> Result<GatewayClient, ClientError> {
        GatewayClient::connect(&format!("ws://{}", self.gateway_addr), user_id).await
    }

    /// 关停网关进程，模拟中继不可达
    pub async fn stop_gateway(&mut self) {
        if let Some(shutdown) = self.gateway_shutdown.take() {
            let _ = shutdown.send(());
        }
        sleep(Duration::from_millis(100)).await;
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if let Some(shutdown) = self.api_shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(shutdown) = self.gateway_shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn serve(router: Router) -> (SocketAddr, oneshot::Sender<()>) {
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
    (addr, shutdown_tx)
}
