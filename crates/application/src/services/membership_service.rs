//! 成员关系通知服务
//!
//! 成员关系变更按当事用户的收件箱路由，被移出或被改角色的用户
//! 即使不再订阅该服务器的任何频道也能收到通知。

use std::sync::Arc;

use domain::{
    DomainError, MemberRepository, MembershipChange, MembershipEvent, Permissions, RealtimeEvent,
    ServerId, ServerRepository, UserId,
};
use uuid::Uuid;

use crate::error::ApplicationError;
use crate::publisher::EventPublisher;
use crate::services::access_control::AccessControl;

/// 成员关系服务依赖
pub struct MembershipServiceDependencies {
    pub access_control: Arc<AccessControl>,
    pub server_repository: Arc<dyn ServerRepository>,
    pub member_repository: Arc<dyn MemberRepository>,
    pub publisher: Arc<EventPublisher>,
}

/// 移出成员请求
#[derive(Debug, Clone)]
pub struct KickMemberRequest {
    /// 服务器 ID
    pub server_id: Uuid,
    /// 执行操作的用户 ID
    pub actor_id: Uuid,
    /// 被移出的用户 ID
    pub target_user_id: Uuid,
}

/// 角色变更通知请求
#[derive(Debug, Clone)]
pub struct UpdateRolesRequest {
    /// 服务器 ID
    pub server_id: Uuid,
    /// 执行操作的用户 ID
    pub actor_id: Uuid,
    /// 角色被变更的用户 ID
    pub target_user_id: Uuid,
}

/// 成员关系服务
pub struct MembershipService {
    dependencies: MembershipServiceDependencies,
}

impl MembershipService {
    pub fn new(dependencies: MembershipServiceDependencies) -> Self {
        Self { dependencies }
    }

    /// 移出成员并通知当事人
    ///
    /// 执行者需要服务器层面的移出权限；属主不可被移出。
    pub async fn kick_member(&self, request: KickMemberRequest) -> Result<(), ApplicationError> {
        let server_id = ServerId::new(request.server_id);
        let actor_id = UserId::new(request.actor_id);
        let target_id = UserId::new(request.target_user_id);

        self.dependencies
            .access_control
            .require_server(server_id, actor_id, Permissions::KICK_MEMBERS, "kick_member")
            .await?;

        if self
            .dependencies
            .server_repository
            .is_owner(server_id, target_id)
            .await?
        {
            return Err(ApplicationError::authorization("服务器属主不可被移出"));
        }

        self.dependencies
            .member_repository
            .find_membership(server_id, target_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Member", target_id.to_string()))?;

        self.publish_change(server_id, target_id, MembershipChange::Kicked)
            .await;
        tracing::info!(
            server_id = %server_id,
            actor_id = %actor_id,
            target_id = %target_id,
            "成员已移出，事件已发布"
        );
        Ok(())
    }

    /// 通知成员其角色集合已变更
    pub async fn update_roles(&self, request: UpdateRolesRequest) -> Result<(), ApplicationError> {
        let server_id = ServerId::new(request.server_id);
        let actor_id = UserId::new(request.actor_id);
        let target_id = UserId::new(request.target_user_id);

        self.dependencies
            .access_control
            .require_server(server_id, actor_id, Permissions::MANAGE_ROLES, "update_roles")
            .await?;

        self.dependencies
            .member_repository
            .find_membership(server_id, target_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Member", target_id.to_string()))?;

        self.publish_change(server_id, target_id, MembershipChange::RolesUpdated)
            .await;
        tracing::info!(
            server_id = %server_id,
            target_id = %target_id,
            "角色变更事件已发布"
        );
        Ok(())
    }

    /// 成员加入后的事后通告，要求成员记录已经落库
    pub async fn member_joined(
        &self,
        server_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), ApplicationError> {
        let server_id = ServerId::new(server_id);
        let user_id = UserId::new(user_id);

        self.dependencies
            .member_repository
            .find_membership(server_id, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Member", user_id.to_string()))?;

        self.publish_change(server_id, user_id, MembershipChange::Joined)
            .await;
        Ok(())
    }

    /// 成员主动退出后的事后通告，此时成员记录已经不存在
    pub async fn member_left(
        &self,
        server_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), ApplicationError> {
        let server_id = ServerId::new(server_id);
        let user_id = UserId::new(user_id);

        self.dependencies
            .server_repository
            .find_server(server_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Server", server_id.to_string()))?;

        self.publish_change(server_id, user_id, MembershipChange::Left)
            .await;
        Ok(())
    }

    async fn publish_change(&self, server_id: ServerId, user_id: UserId, change: MembershipChange) {
        self.dependencies
            .publisher
            .publish(RealtimeEvent::Membership(MembershipEvent {
                server_id,
                user_id,
                change,
            }))
            .await;
    }
}
