//! 领域模型错误定义

use thiserror::Error;

/// 领域层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 权限不足
    #[error("权限不足: {action}")]
    PermissionDenied { action: String },

    /// 资源不存在
    #[error("资源不存在: {resource_type} {resource_id}")]
    ResourceNotFound {
        resource_type: String,
        resource_id: String,
    },

    /// 输入验证失败
    #[error("验证失败: {field}: {message}")]
    ValidationError { field: String, message: String },

    /// 底层存储错误
    #[error("存储错误: {message}")]
    StorageError { message: String },
}

impl DomainError {
    /// 构造资源不存在错误。
    pub fn not_found(resource_type: impl Into<String>, resource_id: impl ToString) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.into(),
            resource_id: resource_id.to_string(),
        }
    }

    /// 构造存储错误。
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }
}

/// 领域层统一结果类型
pub type DomainResult<T> = Result<T, DomainError>;
