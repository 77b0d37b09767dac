use std::sync::Arc;

use application::{AccessControl, EventBus, SubscriptionRegistry};

/// 网关共享状态
///
/// 总线与注册表是网关进程自己的实例，与生产端互不共享；
/// 权限解析读取的目录快照两端指向同一份外部存储。
#[derive(Clone)]
pub struct GatewayState {
    pub bus: Arc<EventBus>,
    pub registry: Arc<SubscriptionRegistry>,
    pub access_control: Arc<AccessControl>,
}

impl GatewayState {
    pub fn new(bus: Arc<EventBus>, access_control: Arc<AccessControl>) -> Self {
        let registry = Arc::new(SubscriptionRegistry::new(bus.clone()));
        Self {
            bus,
            registry,
            access_control,
        }
    }
}
