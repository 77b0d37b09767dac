//! 通知桥发送端抽象
//!
//! 把事件从无持久连接的进程搬运到持连接进程的传输接口。刻意保持
//! 至多一次、无重试、无回执的语义；隔离在接口之后，以便将来换成
//! 持久化队列而不改动任何调用方。

use async_trait::async_trait;
use domain::RealtimeEvent;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForwardError {
    /// 中继进程不可达或传输失败
    #[error("forward failed: {0}")]
    Failed(String),
    /// 中继进程拒绝了事件
    #[error("relay rejected event: status {0}")]
    Rejected(u16),
}

impl ForwardError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// 事件转发接口
#[async_trait]
pub trait EventForwarder: Send + Sync {
    /// 把事件转发给中继进程；成功仅表示对方接受了请求，不代表送达
    async fn forward(&self, event: &RealtimeEvent) -> Result<(), ForwardError>;
}

/// 空转发器：单进程部署（网关自身）与测试使用
pub struct NullEventForwarder;

#[async_trait]
impl EventForwarder for NullEventForwarder {
    async fn forward(&self, _event: &RealtimeEvent) -> Result<(), ForwardError> {
        Ok(())
    }
}
