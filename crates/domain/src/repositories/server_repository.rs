//! 服务器Repository接口定义

use async_trait::async_trait;

use crate::entities::server::Server;
use crate::errors::DomainResult;
use crate::value_objects::{ServerId, UserId};

/// 服务器数据读取接口
#[async_trait]
pub trait ServerRepository: Send + Sync {
    /// 按ID查找服务器
    async fn find_server(&self, server_id: ServerId) -> DomainResult<Option<Server>>;

    /// 判断用户是否为服务器所有者
    async fn is_owner(&self, server_id: ServerId, user_id: UserId) -> DomainResult<bool>;
}
