//! 角色实体

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::permissions::Permissions;
use crate::value_objects::{RoleId, ServerId, Timestamp};

/// 角色：可复用的权限位集包，指派给成员
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// 角色唯一ID
    pub id: RoleId,
    /// 所属服务器ID
    pub server_id: ServerId,
    /// 角色名称
    pub name: String,
    /// 基础权限位集
    pub permissions: Permissions,
    /// 展示排序位置（数值越高越靠后解析、决定显示颜色，
    /// 与权限优先级无关：聚合是纯按位 OR，与顺序无关）
    pub position: i32,
    /// 创建时间
    pub created_at: Timestamp,
}

impl Role {
    /// 创建新角色
    pub fn new(
        server_id: ServerId,
        name: impl Into<String>,
        permissions: Permissions,
        position: i32,
    ) -> Self {
        Self {
            id: RoleId::new(Uuid::new_v4()),
            server_id,
            name: name.into(),
            permissions,
            position,
            created_at: chrono::Utc::now(),
        }
    }
}
