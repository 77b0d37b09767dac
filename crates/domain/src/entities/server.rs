//! 服务器实体

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::{ServerId, Timestamp, UserId};

/// 服务器（社区）实体
///
/// 所有者身份是权限解析之上的最高旁路：所有者在本服务器内
/// 恒定拥有全集权限，调用方在进入解析引擎前统一处理。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// 服务器唯一ID
    pub id: ServerId,
    /// 服务器名称
    pub name: String,
    /// 所有者用户ID
    pub owner_id: UserId,
    /// 创建时间
    pub created_at: Timestamp,
}

impl Server {
    /// 创建新服务器
    pub fn new(name: impl Into<String>, owner_id: UserId) -> Self {
        Self {
            id: ServerId::new(Uuid::new_v4()),
            name: name.into(),
            owner_id,
            created_at: chrono::Utc::now(),
        }
    }
}
