//! 实时事件定义
//!
//! 事件是瞬态的，从不由本子系统持久化；底层实体的记录源在外部存储。
//! `RealtimeEvent` 的 serde 邻接标签表示同时就是通知桥的线缆格式：
//! `{ "eventKind": "...", "payload": { ... } }`，发送端与接收端不会漂移。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::presence::PresenceStatus;
use crate::value_objects::{
    ChannelId, ConversationId, MessageId, RequestId, ServerId, Timestamp, UserId,
};

/// 事件种类判别值，总线按它注册与分发处理器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// 频道消息
    ChannelMessage,
    /// 私信会话消息
    ConversationMessage,
    /// 在线状态变更
    Presence,
    /// 好友请求
    FriendRequest,
    /// 成员关系变更
    Membership,
}

impl EventKind {
    /// 全部事件种类，用于需要逐变体注册处理器的场合
    pub const ALL: [EventKind; 5] = [
        EventKind::ChannelMessage,
        EventKind::ConversationMessage,
        EventKind::Presence,
        EventKind::FriendRequest,
        EventKind::Membership,
    ];
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::ChannelMessage => write!(f, "channelMessage"),
            EventKind::ConversationMessage => write!(f, "conversationMessage"),
            EventKind::Presence => write!(f, "presence"),
            EventKind::FriendRequest => write!(f, "friendRequest"),
            EventKind::Membership => write!(f, "membership"),
        }
    }
}

/// 频道消息事件载荷
///
/// 刻意只携带标识符：消费端收到后自行回源拉取权威消息内容，
/// 以此绕开消息体本身的陈旧与乱序问题。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMessageEvent {
    /// 频道ID（路由键）
    pub channel_id: ChannelId,
    /// 新消息ID
    pub message_id: MessageId,
}

/// 私信消息完整载荷
///
/// 与频道消息不同，私信消息与好友请求事件携带完整载荷：
/// 消费端直接在通知弹层里渲染，不回源。这是刻意的不对称设计。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessage {
    /// 消息ID
    pub id: MessageId,
    /// 所属会话ID（路由键）
    pub conversation_id: ConversationId,
    /// 发送者用户ID
    pub sender_id: UserId,
    /// 接收者用户ID
    pub recipient_id: UserId,
    /// 消息内容
    pub content: String,
    /// 发送时间
    pub sent_at: Timestamp,
}

/// 在线状态变更事件载荷
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEvent {
    /// 状态发生变化的用户
    pub user_id: UserId,
    /// 新状态
    pub status: PresenceStatus,
}

/// 好友请求动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FriendRequestAction {
    /// 新请求已发出
    Created,
    /// 请求被接受
    Accepted,
    /// 请求被拒绝
    Declined,
}

/// 好友请求事件载荷（完整载荷，按收件箱路由）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestEvent {
    /// 请求ID
    pub request_id: RequestId,
    /// 发起方用户ID
    pub sender_id: UserId,
    /// 发起方显示名称（供通知直接渲染）
    pub sender_name: String,
    /// 事件面向的接收方用户ID（收件箱路由键）
    pub receiver_id: UserId,
    /// 动作
    pub action: FriendRequestAction,
}

/// 成员关系变更种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MembershipChange {
    /// 加入服务器
    Joined,
    /// 主动退出
    Left,
    /// 被踢出
    Kicked,
    /// 角色集合被调整
    RolesUpdated,
}

/// 成员关系变更事件载荷（仅标识符，受影响用户回源刷新）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipEvent {
    /// 相关服务器ID
    pub server_id: ServerId,
    /// 受影响的用户ID（收件箱路由键）
    pub user_id: UserId,
    /// 变更种类
    pub change: MembershipChange,
}

/// 实时事件
///
/// 邻接标签的线缆格式：未知的 `eventKind` 或与载荷形状不符的请求体
/// 在反序列化阶段即失败，通知桥接收端据此返回客户端错误。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventKind", content = "payload", rename_all = "camelCase")]
pub enum RealtimeEvent {
    /// 频道消息（仅标识符）
    ChannelMessage(ChannelMessageEvent),
    /// 私信会话消息（完整载荷）
    ConversationMessage(DirectMessage),
    /// 在线状态变更
    Presence(PresenceEvent),
    /// 好友请求（完整载荷）
    FriendRequest(FriendRequestEvent),
    /// 成员关系变更
    Membership(MembershipEvent),
}

impl RealtimeEvent {
    /// 事件种类判别值
    pub fn kind(&self) -> EventKind {
        match self {
            RealtimeEvent::ChannelMessage(_) => EventKind::ChannelMessage,
            RealtimeEvent::ConversationMessage(_) => EventKind::ConversationMessage,
            RealtimeEvent::Presence(_) => EventKind::Presence,
            RealtimeEvent::FriendRequest(_) => EventKind::FriendRequest,
            RealtimeEvent::Membership(_) => EventKind::Membership,
        }
    }

    /// 事件的频道路由键
    pub fn channel_id(&self) -> Option<ChannelId> {
        match self {
            RealtimeEvent::ChannelMessage(event) => Some(event.channel_id),
            _ => None,
        }
    }

    /// 事件的会话路由键
    pub fn conversation_id(&self) -> Option<ConversationId> {
        match self {
            RealtimeEvent::ConversationMessage(message) => Some(message.conversation_id),
            _ => None,
        }
    }

    /// 事件面向的收件箱属主（好友请求与成员关系变更按身份路由）
    pub fn inbox_recipient(&self) -> Option<UserId> {
        match self {
            RealtimeEvent::FriendRequest(event) => Some(event.receiver_id),
            RealtimeEvent::Membership(event) => Some(event.user_id),
            _ => None,
        }
    }
}
