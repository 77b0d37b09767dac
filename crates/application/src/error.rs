use domain::DomainError;
use thiserror::Error;

use crate::forwarder::ForwardError;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("authorization failed: {reason}")]
    Authorization { reason: String },
    #[error("forward error: {0}")]
    Forward(#[from] ForwardError),
    #[error("subscription error: {0}")]
    Subscription(String),
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    /// 创建授权错误
    pub fn authorization(reason: impl Into<String>) -> Self {
        ApplicationError::Authorization {
            reason: reason.into(),
        }
    }

    /// 创建订阅协议错误
    pub fn subscription(message: impl Into<String>) -> Self {
        ApplicationError::Subscription(message.into())
    }

    /// 创建基础设施错误
    pub fn infrastructure(message: impl Into<String>) -> Self {
        ApplicationError::Infrastructure(message.into())
    }
}
