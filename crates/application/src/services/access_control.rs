//! 访问控制门面
//!
//! 把仓储读取、属主直通、成员校验与纯函数位集解析串成一套完整协议。
//! 属主判定是唯一且统一的前置条件：属主永远视为全权，不进入解析引擎。
//! 解析引擎本身无副作用也不失败，失败只来自仓储访问与成员资格校验。

use std::sync::Arc;

use domain::{
    resolve_channel_permissions, ChannelId, ChannelRepository, DomainError, MemberRepository,
    Permissions, ServerId, ServerRepository, UserId,
};

use crate::error::ApplicationError;

/// 访问控制服务依赖
pub struct AccessControlDependencies {
    pub server_repository: Arc<dyn ServerRepository>,
    pub member_repository: Arc<dyn MemberRepository>,
    pub channel_repository: Arc<dyn ChannelRepository>,
}

/// 一次频道级解析的完整结论
///
/// `has_member_override` 记录该成员在频道上是否存在显式成员覆写记录，
/// 私有频道的可见性规则需要区分「记录存在」与「位集包含查看位」。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelResolution {
    pub permissions: Permissions,
    pub has_member_override: bool,
    pub is_private_channel: bool,
}

impl ChannelResolution {
    /// 私有频道仅对「存在显式成员记录」或「解析位集含查看位」的成员可见，
    /// 公开频道只看查看位
    pub fn can_view(&self) -> bool {
        if self.permissions.contains(Permissions::VIEW_CHANNELS) {
            return true;
        }
        self.is_private_channel && self.has_member_override
    }

    pub fn can_send(&self) -> bool {
        self.permissions.contains(Permissions::SEND_MESSAGES)
    }

    pub fn can_manage(&self) -> bool {
        self.permissions.contains(Permissions::MANAGE_CHANNELS)
    }
}

/// 访问控制服务
pub struct AccessControl {
    dependencies: AccessControlDependencies,
}

impl AccessControl {
    pub fn new(dependencies: AccessControlDependencies) -> Self {
        Self { dependencies }
    }

    /// 解析成员在频道上的有效权限
    ///
    /// 协议：频道必须存在且属于给定服务器；属主直通全权；非成员在进入
    /// 解析前即以授权错误拒绝；角色覆写只取成员实际持有的角色。
    pub async fn member_permissions(
        &self,
        server_id: ServerId,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<ChannelResolution, ApplicationError> {
        let channel = self
            .dependencies
            .channel_repository
            .find_channel(channel_id)
            .await?
            .filter(|channel| channel.server_id == server_id)
            .ok_or_else(|| DomainError::not_found("Channel", channel_id.to_string()))?;

        if self
            .dependencies
            .server_repository
            .is_owner(server_id, user_id)
            .await?
        {
            return Ok(ChannelResolution {
                permissions: Permissions::all(),
                has_member_override: false,
                is_private_channel: channel.is_private,
            });
        }

        let member = self
            .dependencies
            .member_repository
            .find_membership(server_id, user_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::authorization(format!("用户 {user_id} 不是该服务器成员"))
            })?;

        let roles = self.dependencies.member_repository.roles_of(&member).await?;
        let role_permissions: Vec<Permissions> =
            roles.iter().map(|role| role.permissions).collect();

        let held_overrides: Vec<_> = self
            .dependencies
            .channel_repository
            .role_overrides(channel_id)
            .await?
            .into_iter()
            .filter(|overwrite| member.role_ids.contains(&overwrite.role_id))
            .collect();

        let member_override = self
            .dependencies
            .member_repository
            .member_override(channel_id, member.id)
            .await?;
        let has_member_override = member_override.is_some();

        let permissions = resolve_channel_permissions(
            &role_permissions,
            &held_overrides,
            member_override.map(|overwrite| overwrite.permissions),
        );

        Ok(ChannelResolution {
            permissions,
            has_member_override,
            is_private_channel: channel.is_private,
        })
    }

    /// 解析成员在服务器层面的权限（不含任何频道覆写）
    pub async fn member_server_permissions(
        &self,
        server_id: ServerId,
        user_id: UserId,
    ) -> Result<Permissions, ApplicationError> {
        if self
            .dependencies
            .server_repository
            .is_owner(server_id, user_id)
            .await?
        {
            return Ok(Permissions::all());
        }

        let member = self
            .dependencies
            .member_repository
            .find_membership(server_id, user_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::authorization(format!("用户 {user_id} 不是该服务器成员"))
            })?;

        let roles = self.dependencies.member_repository.roles_of(&member).await?;
        let role_permissions: Vec<Permissions> =
            roles.iter().map(|role| role.permissions).collect();

        Ok(resolve_channel_permissions(&role_permissions, &[], None))
    }

    /// 成员能否看到频道（私有频道走可见性特例）
    pub async fn can_view(
        &self,
        server_id: ServerId,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<bool, ApplicationError> {
        let resolution = self
            .member_permissions(server_id, channel_id, user_id)
            .await?;
        Ok(resolution.can_view())
    }

    pub async fn can_send(
        &self,
        server_id: ServerId,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<bool, ApplicationError> {
        let resolution = self
            .member_permissions(server_id, channel_id, user_id)
            .await?;
        Ok(resolution.can_send())
    }

    pub async fn can_manage(
        &self,
        server_id: ServerId,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<bool, ApplicationError> {
        let resolution = self
            .member_permissions(server_id, channel_id, user_id)
            .await?;
        Ok(resolution.can_manage())
    }

    /// 要求成员在频道上持有全部给定位，缺失即拒绝
    pub async fn require(
        &self,
        server_id: ServerId,
        channel_id: ChannelId,
        user_id: UserId,
        needed: Permissions,
        action: &str,
    ) -> Result<(), ApplicationError> {
        let resolution = self
            .member_permissions(server_id, channel_id, user_id)
            .await?;
        if resolution.permissions.contains(needed) {
            return Ok(());
        }
        tracing::debug!(
            user_id = %user_id,
            channel_id = %channel_id,
            action = action,
            "频道权限不足，操作被拒绝"
        );
        Err(DomainError::PermissionDenied {
            action: action.to_string(),
        }
        .into())
    }

    /// 要求成员在服务器层面持有全部给定位
    pub async fn require_server(
        &self,
        server_id: ServerId,
        user_id: UserId,
        needed: Permissions,
        action: &str,
    ) -> Result<(), ApplicationError> {
        let held = self.member_server_permissions(server_id, user_id).await?;
        if held.contains(needed) {
            return Ok(());
        }
        tracing::debug!(
            user_id = %user_id,
            server_id = %server_id,
            action = action,
            "服务器权限不足，操作被拒绝"
        );
        Err(DomainError::PermissionDenied {
            action: action.to_string(),
        }
        .into())
    }
}
