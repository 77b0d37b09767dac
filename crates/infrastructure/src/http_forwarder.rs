//! 通知桥 HTTP 传输
//!
//! 把总线事件以单一 `{eventKind, payload}` JSON 负载 POST 到中继进程。
//! 投递语义是尽力而为：失败由发布端记录并吞掉，不回传调用方。

use std::time::Duration;

use application::{ApplicationError, EventForwarder, ForwardError};
use async_trait::async_trait;
use domain::RealtimeEvent;

/// 通知桥的 HTTP 客户端适配器
pub struct HttpEventForwarder {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpEventForwarder {
    /// 创建指向给定入口的转发器
    ///
    /// `endpoint` 是中继进程的完整事件入口地址，超时覆盖连接与响应全程。
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, ApplicationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                ApplicationError::infrastructure(format!("构建通知桥 HTTP 客户端失败: {err}"))
            })?;

        tracing::info!(endpoint = %endpoint, "通知桥 HTTP 转发器已就绪");
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl EventForwarder for HttpEventForwarder {
    async fn forward(&self, event: &RealtimeEvent) -> Result<(), ForwardError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(event)
            .send()
            .await
            .map_err(|err| ForwardError::failed(format!("通知桥请求失败: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForwardError::Rejected(status.as_u16()));
        }

        tracing::debug!(event_kind = %event.kind(), "事件已转发到通知桥");
        Ok(())
    }
}
