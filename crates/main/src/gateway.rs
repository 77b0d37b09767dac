//! 网关进程入口
//!
//! 启动 WebSocket 中继：通知桥接收端 + 订阅注册表。

use std::{env, sync::Arc};

use application::{AccessControl, AccessControlDependencies, EventBus};
use config::AppConfig;
use gateway::GatewayState;
use infrastructure::MemoryStore;
use tracing_subscriber::EnvFilter;

mod demo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();
    config.validate()?;

    // 与生产端进程同源的目录快照镜像，订阅准入的可见性检查读它
    let store = Arc::new(MemoryStore::new());
    if env::var("SEED_DEMO").is_ok() {
        demo::seed(&store);
    }

    let access_control = Arc::new(AccessControl::new(AccessControlDependencies {
        server_repository: store.clone(),
        member_repository: store.clone(),
        channel_repository: store,
    }));

    let bus = Arc::new(EventBus::new());
    let state = GatewayState::new(bus, access_control);
    let app = gateway::router(state);

    let bind_addr = config.gateway.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("网关服务启动在 http://{bind_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
