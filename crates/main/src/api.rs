//! 生产端进程入口
//!
//! 启动面向主应用的通知 HTTP 服务：权限解析 + 事件发布 + 通知桥转发。

use std::{env, sync::Arc};

use application::{
    services::{
        FriendService, FriendServiceDependencies, MembershipService,
        MembershipServiceDependencies, MessageService, MessageServiceDependencies,
        PresenceService, PresenceServiceDependencies,
    },
    AccessControl, AccessControlDependencies, EventBus, EventPublisher,
};
use config::AppConfig;
use infrastructure::{HttpEventForwarder, MemoryStore};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

mod demo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();
    config.validate()?;

    // 目录快照镜像。生产部署由主应用数据库喂入，演示环境灌入固定内容
    let store = Arc::new(MemoryStore::new());
    if env::var("SEED_DEMO").is_ok() {
        demo::seed(&store);
    }

    let bus = Arc::new(EventBus::new());
    let forwarder = Arc::new(HttpEventForwarder::new(
        config.bridge.url.clone(),
        config.bridge.timeout(),
    )?);
    let publisher = Arc::new(EventPublisher::new(bus, forwarder));

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
        member_repository: store,
        publisher,
    }));

    let state = AppState::new(
        message_service,
        presence_service,
        friend_service,
        membership_service,
    );
    let app = router(state);

    let bind_addr = config.api.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("生产端服务启动在 http://{bind_addr}，通知桥指向 {}", config.bridge.url);
    axum::serve(listener, app).await?;

    Ok(())
}
