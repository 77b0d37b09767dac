//! 在线状态

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// 用户在线状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceStatus {
    /// 在线
    Online,
    /// 离开
    Idle,
    /// 忙碌
    Busy,
    /// 离线
    Offline,
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresenceStatus::Online => write!(f, "online"),
            PresenceStatus::Idle => write!(f, "idle"),
            PresenceStatus::Busy => write!(f, "busy"),
            PresenceStatus::Offline => write!(f, "offline"),
        }
    }
}

impl Default for PresenceStatus {
    fn default() -> Self {
        Self::Offline
    }
}

/// 批量读取返回的状态快照（在线状态列表的数据来源）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSnapshot {
    /// 用户ID
    pub user_id: UserId,
    /// 读取时刻的状态
    pub status: PresenceStatus,
}
