//! 成员实体

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::{MemberId, RoleId, ServerId, Timestamp, UserId};

/// 成员：一个用户在一个服务器内的成员身份
///
/// 持有零个或多个角色；每个频道上最多存在一条成员覆写记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// 成员唯一ID
    pub id: MemberId,
    /// 所属服务器ID
    pub server_id: ServerId,
    /// 对应用户ID
    pub user_id: UserId,
    /// 持有的角色ID列表
    pub role_ids: Vec<RoleId>,
    /// 加入时间
    pub joined_at: Timestamp,
}

impl Member {
    /// 创建无角色的新成员
    pub fn new(server_id: ServerId, user_id: UserId) -> Self {
        Self {
            id: MemberId::new(Uuid::new_v4()),
            server_id,
            user_id,
            role_ids: Vec::new(),
            joined_at: chrono::Utc::now(),
        }
    }

    /// 创建携带角色的新成员
    pub fn with_roles(server_id: ServerId, user_id: UserId, role_ids: Vec<RoleId>) -> Self {
        Self {
            role_ids,
            ..Self::new(server_id, user_id)
        }
    }
}
