//! 在线状态Repository接口定义

use async_trait::async_trait;

use crate::entities::presence::{PresenceSnapshot, PresenceStatus};
use crate::errors::DomainResult;
use crate::value_objects::UserId;

/// 在线状态读写接口
///
/// 与其余只读接口不同，状态更新触发器会写入这里。
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// 读取单个用户的状态（无记录视为离线）
    async fn status_of(&self, user_id: UserId) -> DomainResult<PresenceStatus>;

    /// 写入用户状态
    async fn set_status(&self, user_id: UserId, status: PresenceStatus) -> DomainResult<()>;

    /// 批量读取状态快照（在线状态列表的数据来源）
    async fn statuses(&self, user_ids: &[UserId]) -> DomainResult<Vec<PresenceSnapshot>>;
}
