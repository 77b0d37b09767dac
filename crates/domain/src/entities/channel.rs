//! 频道实体

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::{ChannelId, ServerId, Timestamp};

/// 频道类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// 文字频道
    Text,
    /// 语音频道
    Voice,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Text => write!(f, "text"),
            ChannelKind::Voice => write!(f, "voice"),
        }
    }
}

/// 频道实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// 频道唯一ID
    pub id: ChannelId,
    /// 所属服务器ID
    pub server_id: ServerId,
    /// 频道名称
    pub name: String,
    /// 频道类型
    pub kind: ChannelKind,
    /// 是否私有频道
    ///
    /// 私有频道的可见性规则特殊：成员拥有该频道的成员覆写记录，
    /// 或解析结果本身授予查看位，二者满足其一才可见。
    pub is_private: bool,
    /// 创建时间
    pub created_at: Timestamp,
}

impl Channel {
    /// 创建公开频道
    pub fn new(server_id: ServerId, name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id: ChannelId::new(Uuid::new_v4()),
            server_id,
            name: name.into(),
            kind,
            is_private: false,
            created_at: chrono::Utc::now(),
        }
    }

    /// 创建私有频道
    pub fn private(server_id: ServerId, name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            is_private: true,
            ..Self::new(server_id, name, kind)
        }
    }
}
