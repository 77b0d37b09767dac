//! 发布端统一发布路径

use std::sync::Arc;

use domain::RealtimeEvent;

use crate::event_bus::EventBus;
use crate::forwarder::EventForwarder;

/// 事件发布器：本进程总线 + 通知桥的唯一出口
///
/// 触发方的变更在调用发布器之前已经提交，因此转发失败只记录告警、
/// 绝不向触发方传播，实时推送按「尽力而为」降级。
pub struct EventPublisher {
    bus: Arc<EventBus>,
    forwarder: Arc<dyn EventForwarder>,
}

impl EventPublisher {
    pub fn new(bus: Arc<EventBus>, forwarder: Arc<dyn EventForwarder>) -> Self {
        Self { bus, forwarder }
    }

    /// 发布事件：先本进程总线（不会失败），再经通知桥转发
    pub async fn publish(&self, event: RealtimeEvent) {
        self.bus.publish(&event);

        if let Err(error) = self.forwarder.forward(&event).await {
            tracing::warn!(
                event_kind = %event.kind(),
                error = %error,
                "通知桥转发失败，跨进程实时推送降级"
            );
        }
    }

    /// 本进程总线句柄
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }
}
