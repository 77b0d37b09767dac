//! 目录快照的内存仓储
//!
//! 实时层对服务器目录（服务器、频道、角色、成员、覆写）只做快照读取，
//! 权威写入发生在主应用的数据库里。这里的写方法是部署进程与测试
//! 用来灌入快照的，不对外承诺任何事务语义。

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use domain::{
    Channel, ChannelId, ChannelMemberOverride, ChannelRepository, ChannelRoleOverride,
    DomainResult, Member, MemberId, MemberRepository, PresenceRepository, PresenceSnapshot,
    PresenceStatus, Role, RoleId, Server, ServerId, ServerRepository, UserId,
};

fn read_or_recover<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_or_recover<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 内存目录仓储，同时实现全部四个读取接口
#[derive(Default)]
pub struct MemoryStore {
    servers: RwLock<HashMap<ServerId, Server>>,
    channels: RwLock<HashMap<ChannelId, Channel>>,
    roles: RwLock<HashMap<RoleId, Role>>,
    members: RwLock<Vec<Member>>,
    role_overrides: RwLock<Vec<ChannelRoleOverride>>,
    member_overrides: RwLock<Vec<ChannelMemberOverride>>,
    presence: RwLock<HashMap<UserId, PresenceStatus>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_server(&self, server: Server) {
        write_or_recover(&self.servers).insert(server.id, server);
    }

    pub fn insert_channel(&self, channel: Channel) {
        write_or_recover(&self.channels).insert(channel.id, channel);
    }

    /// 按 ID 覆盖写入，同一角色再次写入即更新其位集
    pub fn insert_role(&self, role: Role) {
        write_or_recover(&self.roles).insert(role.id, role);
    }

    pub fn insert_member(&self, member: Member) {
        let mut members = write_or_recover(&self.members);
        members.retain(|existing| existing.id != member.id);
        members.push(member);
    }

    /// 删除成员记录（主应用执行移出或退出后同步快照用）
    pub fn remove_member(&self, server_id: ServerId, user_id: UserId) {
        write_or_recover(&self.members)
            .retain(|member| !(member.server_id == server_id && member.user_id == user_id));
    }

    /// 写入角色覆写，同一 (频道, 角色) 键只保留最新一条
    pub fn set_role_override(&self, overwrite: ChannelRoleOverride) {
        let mut overrides = write_or_recover(&self.role_overrides);
        overrides.retain(|existing| {
            !(existing.channel_id == overwrite.channel_id && existing.role_id == overwrite.role_id)
        });
        overrides.push(overwrite);
    }

    /// 写入成员覆写，同一 (频道, 成员) 键只保留最新一条
    pub fn set_member_override(&self, overwrite: ChannelMemberOverride) {
        let mut overrides = write_or_recover(&self.member_overrides);
        overrides.retain(|existing| {
            !(existing.channel_id == overwrite.channel_id
                && existing.member_id == overwrite.member_id)
        });
        overrides.push(overwrite);
    }

    pub fn clear_member_override(&self, channel_id: ChannelId, member_id: MemberId) {
        write_or_recover(&self.member_overrides).retain(|existing| {
            !(existing.channel_id == channel_id && existing.member_id == member_id)
        });
    }
}

#[async_trait]
impl ServerRepository for MemoryStore {
    async fn find_server(&self, server_id: ServerId) -> DomainResult<Option<Server>> {
        Ok(read_or_recover(&self.servers).get(&server_id).cloned())
    }

    async fn is_owner(&self, server_id: ServerId, user_id: UserId) -> DomainResult<bool> {
        Ok(read_or_recover(&self.servers)
            .get(&server_id)
            .map(|server| server.owner_id == user_id)
            .unwrap_or(false))
    }
}

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn find_membership(
        &self,
        server_id: ServerId,
        user_id: UserId,
    ) -> DomainResult<Option<Member>> {
        Ok(read_or_recover(&self.members)
            .iter()
            .find(|member| member.server_id == server_id && member.user_id == user_id)
            .cloned())
    }

    /// 悬空的角色引用直接跳过，成员快照可能先于角色删除到达
    async fn roles_of(&self, member: &Member) -> DomainResult<Vec<Role>> {
        let roles = read_or_recover(&self.roles);
        Ok(member
            .role_ids
            .iter()
            .filter_map(|role_id| roles.get(role_id).cloned())
            .collect())
    }

    async fn member_override(
        &self,
        channel_id: ChannelId,
        member_id: MemberId,
    ) -> DomainResult<Option<ChannelMemberOverride>> {
        Ok(read_or_recover(&self.member_overrides)
            .iter()
            .find(|overwrite| {
                overwrite.channel_id == channel_id && overwrite.member_id == member_id
            })
            .cloned())
    }
}

#[async_trait]
impl ChannelRepository for MemoryStore {
    async fn find_channel(&self, channel_id: ChannelId) -> DomainResult<Option<Channel>> {
        Ok(read_or_recover(&self.channels).get(&channel_id).cloned())
    }

    async fn role_overrides(&self, channel_id: ChannelId) -> DomainResult<Vec<ChannelRoleOverride>> {
        Ok(read_or_recover(&self.role_overrides)
            .iter()
            .filter(|overwrite| overwrite.channel_id == channel_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PresenceRepository for MemoryStore {
    async fn status_of(&self, user_id: UserId) -> DomainResult<PresenceStatus> {
        Ok(read_or_recover(&self.presence)
            .get(&user_id)
            .copied()
            .unwrap_or_default())
    }

    async fn set_status(&self, user_id: UserId, status: PresenceStatus) -> DomainResult<()> {
        write_or_recover(&self.presence).insert(user_id, status);
        Ok(())
    }

    async fn statuses(&self, user_ids: &[UserId]) -> DomainResult<Vec<PresenceSnapshot>> {
        let presence = read_or_recover(&self.presence);
        Ok(user_ids
            .iter()
            .map(|user_id| PresenceSnapshot {
                user_id: *user_id,
                status: presence.get(user_id).copied().unwrap_or_default(),
            })
            .collect())
    }
}
