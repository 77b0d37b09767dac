//! 进程内类型化事件总线
//!
//! 显式实例，由进程顶层状态持有并以 `Arc` 下发，不经任何全局查找。
//! 处理器按事件种类注册；publish 经分发串行锁完整扇出后才接受下一次，
//! 因此同一事件种类的送达顺序与发布顺序一致（跨种类不作保证）。
//!
//! 处理器必须入队即返回，不得执行同步网络或磁盘 I/O：分发是同步的，
//! 慢处理器会拖延同一事件对后续订阅者的送达。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use domain::{EventKind, RealtimeEvent};

/// 处理器注册凭据，退订时出示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId {
    kind: EventKind,
    seq: u64,
}

impl HandlerId {
    /// 该处理器注册的事件种类
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

#[derive(Clone)]
struct HandlerEntry {
    id: HandlerId,
    callback: Arc<dyn Fn(&RealtimeEvent) + Send + Sync>,
}

/// 类型化发布/订阅总线
pub struct EventBus {
    /// 每个事件种类的处理器注册表；注册/退订与扇出并发安全
    handlers: Mutex<HashMap<EventKind, Vec<HandlerEntry>>>,
    /// 分发串行锁
    dispatch: Mutex<()>,
    next_seq: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(HashMap::new()),
            dispatch: Mutex::new(()),
            next_seq: AtomicU64::new(0),
        }
    }

    /// 注册一个处理器，只接收 `kind` 这一种事件
    pub fn subscribe<F>(&self, kind: EventKind, callback: F) -> HandlerId
    where
        F: Fn(&RealtimeEvent) + Send + Sync + 'static,
    {
        let id = HandlerId {
            kind,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };
        self.lock_handlers()
            .entry(kind)
            .or_default()
            .push(HandlerEntry {
                id,
                callback: Arc::new(callback),
            });
        tracing::debug!(kind = %kind, seq = id.seq, "注册事件处理器");
        id
    }

    /// 退订处理器
    ///
    /// 幂等：重复退订或退订未知凭据都是空操作。允许在处理器回调内
    /// 调用（扇出迭代走快照，不受注册表修改影响）。
    pub fn unsubscribe(&self, id: HandlerId) {
        let mut handlers = self.lock_handlers();
        if let Some(entries) = handlers.get_mut(&id.kind) {
            entries.retain(|entry| entry.id != id);
        }
    }

    /// 发布事件，同步扇出给该种类的全部处理器
    pub fn publish(&self, event: &RealtimeEvent) {
        // 一次 publish 完整扇出后才接受下一次，保证同种类顺序
        let _serial = self
            .dispatch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // 先快照再释放注册表锁，处理器在回调中退订自己或他人
        // 不会破坏进行中的扇出迭代；回调中新注册的处理器从下一条起生效
        let snapshot: Vec<HandlerEntry> = self
            .lock_handlers()
            .get(&event.kind())
            .map(|entries| entries.to_vec())
            .unwrap_or_default();

        tracing::debug!(kind = %event.kind(), handlers = snapshot.len(), "分发事件");
        for entry in &snapshot {
            (entry.callback)(event);
        }
    }

    /// 当前注册在某事件种类上的处理器数量（订阅拆除的观测点）
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.lock_handlers()
            .get(&kind)
            .map(Vec::len)
            .unwrap_or(0)
    }

    // 回调 panic 会使锁中毒；恢复内层数据继续服务，注册表本身不会损坏
    fn lock_handlers(&self) -> MutexGuard<'_, HashMap<EventKind, Vec<HandlerEntry>>> {
        self.handlers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII 订阅凭据：离开作用域即同步退订，任何退出路径都不会泄漏
/// 继续触发的处理器
pub struct BusSubscription {
    bus: Arc<EventBus>,
    id: HandlerId,
}

impl BusSubscription {
    pub fn new<F>(bus: Arc<EventBus>, kind: EventKind, callback: F) -> Self
    where
        F: Fn(&RealtimeEvent) + Send + Sync + 'static,
    {
        let id = bus.subscribe(kind, callback);
        Self { bus, id }
    }

    pub fn id(&self) -> HandlerId {
        self.id
    }
}

impl Drop for BusSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.id);
    }
}
