//! 成员Repository接口定义

use async_trait::async_trait;

use crate::entities::member::Member;
use crate::entities::role::Role;
use crate::errors::DomainResult;
use crate::permissions::ChannelMemberOverride;
use crate::value_objects::{ChannelId, MemberId, ServerId, UserId};

/// 成员数据读取接口
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// 查找用户在服务器内的成员记录
    ///
    /// 无记录时返回 `None`；调用方必须在进入权限解析前以授权错误拒绝。
    async fn find_membership(
        &self,
        server_id: ServerId,
        user_id: UserId,
    ) -> DomainResult<Option<Member>>;

    /// 读取成员所持角色的完整记录
    async fn roles_of(&self, member: &Member) -> DomainResult<Vec<Role>>;

    /// 读取成员在频道上的覆写记录（每频道至多一条）
    async fn member_override(
        &self,
        channel_id: ChannelId,
        member_id: MemberId,
    ) -> DomainResult<Option<ChannelMemberOverride>>;
}
