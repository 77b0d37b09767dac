//! 在线状态缓存
//!
//! 把订阅推送来的在线状态事件归并成按用户的后写胜出视图。
//! 事件一旦写入，该用户的缓存值就压过此后渲染的任何批量载荷里
//! 自带的状态字段，直到更新的事件到来或观察集整体拆除。这保证
//! 列表整页重拉不会在界面上「回退」一条已经以事件形式到达的更新。
//!
//! 只有订阅送达路径这一个写入方，顺序写入，因此不需要内部加锁。

use std::collections::HashMap;

use domain::{PresenceSnapshot, PresenceStatus, RealtimeEvent, UserId};

/// 后写胜出的在线状态视图
#[derive(Debug, Default)]
pub struct PresenceCache {
    statuses: HashMap<UserId, PresenceStatus>,
}

impl PresenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 归并一条实时事件，非在线状态事件原样忽略
    pub fn apply(&mut self, event: &RealtimeEvent) {
        if let RealtimeEvent::Presence(payload) = event {
            self.statuses.insert(payload.user_id, payload.status);
        }
    }

    /// 某用户的缓存状态；没有收到过其事件则为 `None`
    pub fn status_of(&self, user_id: UserId) -> Option<PresenceStatus> {
        self.statuses.get(&user_id).copied()
    }

    /// 渲染时的有效状态：缓存值压过批量载荷自带的值
    pub fn effective_status(&self, user_id: UserId, batch_status: PresenceStatus) -> PresenceStatus {
        self.status_of(user_id).unwrap_or(batch_status)
    }

    /// 把缓存值覆盖进一份批量快照
    pub fn overlay(&self, snapshot: &mut [PresenceSnapshot]) {
        for entry in snapshot {
            if let Some(status) = self.status_of(entry.user_id) {
                entry.status = status;
            }
        }
    }

    /// 观察集拆除时整体清空
    pub fn clear(&mut self) {
        self.statuses.clear();
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
