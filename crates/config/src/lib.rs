//! 统一配置中心
//!
//! 提供实时层两个进程的全局配置管理，包括：
//! - 生产端 HTTP 服务
//! - 网关（WebSocket 中继）服务
//! - 通知桥传输

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 生产端服务配置
    pub api: ApiConfig,
    /// 网关服务配置
    pub gateway: GatewayConfig,
    /// 通知桥配置
    pub bridge: BridgeConfig,
}

/// 生产端服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// 网关服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// 通知桥配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// 中继进程的事件入口完整地址
    pub url: String,
    /// 单次转发的总超时（毫秒）
    pub timeout_ms: u64,
}

impl ApiConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl GatewayConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl BridgeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl AppConfig {
    /// 从环境变量加载配置
    ///
    /// 实时层不含安全敏感配置，所有变量缺省时使用本机开发默认值。
    pub fn from_env() -> Self {
        let gateway_host = env::var("GATEWAY_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let gateway_port = env::var("GATEWAY_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8081);

        Self {
            api: ApiConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("API_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8080),
            },
            bridge: BridgeConfig {
                url: env::var("BRIDGE_URL").unwrap_or_else(|_| {
                    format!("http://{gateway_host}:{gateway_port}/internal/events")
                }),
                timeout_ms: env::var("BRIDGE_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2000),
            },
            gateway: GatewayConfig {
                host: gateway_host,
                port: gateway_port,
            },
        }
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.port == 0 {
            return Err(ConfigError::InvalidServerConfig(
                "API port must be greater than 0".to_string(),
            ));
        }
        if self.gateway.port == 0 {
            return Err(ConfigError::InvalidServerConfig(
                "Gateway port must be greater than 0".to_string(),
            ));
        }
        if self.api.host == self.gateway.host && self.api.port == self.gateway.port {
            return Err(ConfigError::InvalidServerConfig(
                "API and gateway cannot share the same address".to_string(),
            ));
        }

        if !self.bridge.url.starts_with("http://") && !self.bridge.url.starts_with("https://") {
            return Err(ConfigError::InvalidBridgeUrl(format!(
                "Bridge URL must be an http(s) endpoint, got: {}",
                self.bridge.url
            )));
        }

        if self.bridge.timeout_ms == 0 || self.bridge.timeout_ms > 60_000 {
            return Err(ConfigError::InvalidBridgeConfig(
                "Bridge timeout must be within 1..=60000 ms".to_string(),
            ));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bridge URL: {0}")]
    InvalidBridgeUrl(String),
    #[error("Invalid bridge configuration: {0}")]
    InvalidBridgeConfig(String),
    #[error("Invalid server configuration: {0}")]
    InvalidServerConfig(String),
    #[error("Environment variable error: {0}")]
    EnvVarError(#[from] std::env::VarError),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
