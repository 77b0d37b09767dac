//! 订阅注册表
//!
//! 为每条活跃连接维护其声明过兴趣的实体键集合，把总线上匹配的事件
//! 推入该连接的出站队列。过滤规则：
//! - 频道/会话消息按 ID 精确相等；
//! - 在线状态按「事件用户 ∈ 观察集」，观察集单调增长，本子系统从不
//!   主动收缩（调用方重建更小集合等价于驱逐）；
//! - 好友请求与成员关系变更按「事件接收方 == 连接属主」（收件箱）。
//!
//! 送达处理器只做无界队列入队，不做任何同步 I/O。订阅的生命周期与
//! 连接声明的兴趣完全一致：拆除即同步退订总线，不存在继续触发的
//! 处理器泄漏。事件引用了订阅方已不再关心的实体不是错误，直接过滤。

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use domain::{
    ChannelId, ConnectionId, ConversationId, EventKind, RealtimeEvent, ServerMessage,
    SubscriptionTarget, UserId,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::error::ApplicationError;
use crate::event_bus::{BusSubscription, EventBus};

/// 观察集：送达处理器共享读取，watch 操作在注册表内扩充
type WatchSet = Arc<RwLock<HashSet<UserId>>>;

struct ConnectionEntry {
    user_id: UserId,
    sender: UnboundedSender<ServerMessage>,
    /// 每个实体键对应的总线订阅（收件箱跨两种事件，持有多个）
    subscriptions: HashMap<SubscriptionTarget, Vec<BusSubscription>>,
    watch_set: Option<WatchSet>,
}

/// 按连接过滤送达的订阅注册表
pub struct SubscriptionRegistry {
    bus: Arc<EventBus>,
    connections: Mutex<HashMap<ConnectionId, ConnectionEntry>>,
}

impl SubscriptionRegistry {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// 登记新连接及其出站队列
    pub fn register_connection(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
        sender: UnboundedSender<ServerMessage>,
    ) {
        let entry = ConnectionEntry {
            user_id,
            sender,
            subscriptions: HashMap::new(),
            watch_set: None,
        };
        // 同名连接重复登记时旧条目整体落下，其订阅随之退订
        self.lock_connections().insert(connection_id, entry);
        tracing::info!(connection_id = %connection_id, user_id = %user_id, "连接已登记");
    }

    /// 移除连接并拆除其全部订阅（幂等）
    pub fn remove_connection(&self, connection_id: ConnectionId) {
        if self.lock_connections().remove(&connection_id).is_some() {
            tracing::info!(connection_id = %connection_id, "连接已移除，订阅全部拆除");
        }
    }

    /// 订阅频道消息（按频道 ID 精确匹配）
    pub fn subscribe_channel(
        &self,
        connection_id: ConnectionId,
        channel_id: ChannelId,
    ) -> Result<(), ApplicationError> {
        let target = SubscriptionTarget::Channel { channel_id };
        let mut connections = self.lock_connections();
        let entry = Self::entry_mut(&mut connections, connection_id)?;
        if entry.subscriptions.contains_key(&target) {
            return Ok(());
        }

        let sender = entry.sender.clone();
        let guard = BusSubscription::new(
            self.bus.clone(),
            EventKind::ChannelMessage,
            move |event: &RealtimeEvent| {
                if event.channel_id() == Some(channel_id) {
                    let _ = sender.send(ServerMessage::Event {
                        event: event.clone(),
                    });
                }
            },
        );
        entry.subscriptions.insert(target, vec![guard]);
        Ok(())
    }

    /// 订阅私信会话消息（按会话 ID 精确匹配）
    pub fn subscribe_conversation(
        &self,
        connection_id: ConnectionId,
        conversation_id: ConversationId,
    ) -> Result<(), ApplicationError> {
        let target = SubscriptionTarget::Conversation { conversation_id };
        let mut connections = self.lock_connections();
        let entry = Self::entry_mut(&mut connections, connection_id)?;
        if entry.subscriptions.contains_key(&target) {
            return Ok(());
        }

        let sender = entry.sender.clone();
        let guard = BusSubscription::new(
            self.bus.clone(),
            EventKind::ConversationMessage,
            move |event: &RealtimeEvent| {
                if event.conversation_id() == Some(conversation_id) {
                    let _ = sender.send(ServerMessage::Event {
                        event: event.clone(),
                    });
                }
            },
        );
        entry.subscriptions.insert(target, vec![guard]);
        Ok(())
    }

    /// 订阅本人收件箱（好友请求 + 成员关系变更，按属主身份匹配）
    pub fn subscribe_inbox(&self, connection_id: ConnectionId) -> Result<(), ApplicationError> {
        let mut connections = self.lock_connections();
        let entry = Self::entry_mut(&mut connections, connection_id)?;
        if entry.subscriptions.contains_key(&SubscriptionTarget::Inbox) {
            return Ok(());
        }

        let owner = entry.user_id;
        let guards = [EventKind::FriendRequest, EventKind::Membership]
            .into_iter()
            .map(|kind| {
                let sender = entry.sender.clone();
                BusSubscription::new(self.bus.clone(), kind, move |event: &RealtimeEvent| {
                    if event.inbox_recipient() == Some(owner) {
                        let _ = sender.send(ServerMessage::Event {
                            event: event.clone(),
                        });
                    }
                })
            })
            .collect();
        entry.subscriptions.insert(SubscriptionTarget::Inbox, guards);
        Ok(())
    }

    /// 创建或单调扩充在线状态观察集，返回扩充后的大小
    pub fn watch_presence(
        &self,
        connection_id: ConnectionId,
        user_ids: Vec<UserId>,
    ) -> Result<usize, ApplicationError> {
        let mut connections = self.lock_connections();
        let entry = Self::entry_mut(&mut connections, connection_id)?;

        if let Some(watch_set) = &entry.watch_set {
            let mut set = watch_set
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            set.extend(user_ids);
            return Ok(set.len());
        }

        let watch_set: WatchSet = Arc::new(RwLock::new(user_ids.into_iter().collect()));
        let watched = watch_set
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len();

        let sender = entry.sender.clone();
        let filter = watch_set.clone();
        let guard = BusSubscription::new(
            self.bus.clone(),
            EventKind::Presence,
            move |event: &RealtimeEvent| {
                if let RealtimeEvent::Presence(payload) = event {
                    let watched = filter
                        .read()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    if watched.contains(&payload.user_id) {
                        let _ = sender.send(ServerMessage::Event {
                            event: event.clone(),
                        });
                    }
                }
            },
        );
        entry
            .subscriptions
            .insert(SubscriptionTarget::Presence, vec![guard]);
        entry.watch_set = Some(watch_set);
        Ok(watched)
    }

    /// 拆除某个实体键的订阅（目标不存在时为空操作）
    pub fn unsubscribe(
        &self,
        connection_id: ConnectionId,
        target: SubscriptionTarget,
    ) -> Result<(), ApplicationError> {
        let mut connections = self.lock_connections();
        let entry = Self::entry_mut(&mut connections, connection_id)?;
        entry.subscriptions.remove(&target);
        if target == SubscriptionTarget::Presence {
            entry.watch_set = None;
        }
        Ok(())
    }

    /// 连接当前活跃的订阅数（测试与诊断用）
    pub fn subscription_count(&self, connection_id: ConnectionId) -> usize {
        self.lock_connections()
            .get(&connection_id)
            .map(|entry| entry.subscriptions.len())
            .unwrap_or(0)
    }

    fn entry_mut<'a>(
        connections: &'a mut HashMap<ConnectionId, ConnectionEntry>,
        connection_id: ConnectionId,
    ) -> Result<&'a mut ConnectionEntry, ApplicationError> {
        connections
            .get_mut(&connection_id)
            .ok_or_else(|| ApplicationError::subscription("connection not registered"))
    }

    fn lock_connections(&self) -> MutexGuard<'_, HashMap<ConnectionId, ConnectionEntry>> {
        self.connections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
