//! 频道Repository接口定义

use async_trait::async_trait;

use crate::entities::channel::Channel;
use crate::errors::DomainResult;
use crate::permissions::ChannelRoleOverride;
use crate::value_objects::ChannelId;

/// 频道数据读取接口
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// 按ID查找频道
    async fn find_channel(&self, channel_id: ChannelId) -> DomainResult<Option<Channel>>;

    /// 读取频道上的全部角色覆写
    ///
    /// 调用方负责筛选出成员实际持有的角色对应的条目。
    async fn role_overrides(&self, channel_id: ChannelId)
        -> DomainResult<Vec<ChannelRoleOverride>>;
}
