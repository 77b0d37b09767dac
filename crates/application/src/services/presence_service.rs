//! 在线状态服务
//!
//! 状态写入仓储后广播同内容事件，批量快照供网关在建立观察集时
//! 返回基线，后续增量由事件流覆盖。

use std::sync::Arc;

use domain::{PresenceEvent, PresenceRepository, PresenceSnapshot, PresenceStatus, RealtimeEvent, UserId};
use uuid::Uuid;

use crate::error::ApplicationError;
use crate::publisher::EventPublisher;

/// 在线状态服务依赖
pub struct PresenceServiceDependencies {
    pub presence_repository: Arc<dyn PresenceRepository>,
    pub publisher: Arc<EventPublisher>,
}

/// 状态更新请求
#[derive(Debug, Clone)]
pub struct UpdateStatusRequest {
    /// 用户 ID
    pub user_id: Uuid,
    /// 新状态
    pub status: PresenceStatus,
}

/// 在线状态服务
pub struct PresenceService {
    dependencies: PresenceServiceDependencies,
}

impl PresenceService {
    pub fn new(dependencies: PresenceServiceDependencies) -> Self {
        Self { dependencies }
    }

    /// 写入新状态并广播事件
    pub async fn update_status(
        &self,
        request: UpdateStatusRequest,
    ) -> Result<(), ApplicationError> {
        let user_id = UserId::new(request.user_id);
        self.dependencies
            .presence_repository
            .set_status(user_id, request.status)
            .await?;

        self.dependencies
            .publisher
            .publish(RealtimeEvent::Presence(PresenceEvent {
                user_id,
                status: request.status,
            }))
            .await;

        tracing::info!(user_id = %user_id, status = %request.status, "在线状态已更新并广播");
        Ok(())
    }

    /// 批量读取当前状态快照（未知用户按离线返回）
    pub async fn snapshot(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<PresenceSnapshot>, ApplicationError> {
        Ok(self.dependencies.presence_repository.statuses(user_ids).await?)
    }
}
