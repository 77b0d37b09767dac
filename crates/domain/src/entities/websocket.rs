//! WebSocket 订阅协议
//!
//! 网关与客户端之间的线缆类型。客户端通过命名实体键（频道、私信会话、
//! 用户集合、本人收件箱）声明兴趣，网关把匹配的实时事件推送回来，
//! 直到客户端退订或连接断开。

use serde::{Deserialize, Serialize};

use crate::events::RealtimeEvent;
use crate::value_objects::{ChannelId, ConnectionId, ConversationId, ServerId, UserId};

/// 订阅目标（实体键）
///
/// 同一连接上的多个订阅相互独立；频道与会话按 ID 精确匹配，
/// 在线状态按观察集合匹配，收件箱按连接属主身份匹配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionTarget {
    /// 频道消息
    Channel {
        /// 频道ID
        channel_id: ChannelId,
    },
    /// 私信会话消息
    Conversation {
        /// 会话ID
        conversation_id: ConversationId,
    },
    /// 在线状态观察集
    Presence,
    /// 本人收件箱（好友请求、成员关系变更）
    Inbox,
}

/// 客户端消息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ClientMessage {
    /// 订阅频道消息（需要先通过频道可见性检查）
    SubscribeChannel {
        /// 服务器ID
        server_id: ServerId,
        /// 频道ID
        channel_id: ChannelId,
    },
    /// 退订频道消息
    UnsubscribeChannel {
        /// 频道ID
        channel_id: ChannelId,
    },
    /// 订阅私信会话消息
    SubscribeConversation {
        /// 会话ID
        conversation_id: ConversationId,
    },
    /// 退订私信会话消息
    UnsubscribeConversation {
        /// 会话ID
        conversation_id: ConversationId,
    },
    /// 订阅本人收件箱
    SubscribeInbox,
    /// 退订本人收件箱
    UnsubscribeInbox,
    /// 创建或单调扩充在线状态观察集
    WatchPresence {
        /// 新增观察的用户ID列表
        user_ids: Vec<UserId>,
    },
    /// 拆除在线状态订阅（重建更小集合等价于驱逐）
    UnwatchPresence,
    /// 心跳
    Ping,
}

/// 服务器推送消息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ServerMessage {
    /// 连接就绪
    Ready {
        /// 网关分配的连接ID
        connection_id: ConnectionId,
        /// 连接属主用户ID
        user_id: UserId,
    },
    /// 匹配某个订阅的实时事件
    Event {
        /// 事件本体
        event: RealtimeEvent,
    },
    /// 订阅已建立（重复订阅同一实体键返回同样的确认）
    Subscribed {
        /// 订阅目标
        target: SubscriptionTarget,
    },
    /// 订阅已拆除（目标不存在时同样返回确认）
    Unsubscribed {
        /// 订阅目标
        target: SubscriptionTarget,
    },
    /// 观察集扩充完毕
    PresenceWatchUpdated {
        /// 当前观察集大小
        watched: usize,
    },
    /// 心跳响应
    Pong,
    /// 协议错误（连接保持可用，其余订阅不受影响）
    Error {
        /// 错误码
        code: String,
        /// 人类可读信息
        message: String,
    },
}
