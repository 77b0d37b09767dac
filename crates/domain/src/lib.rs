//! 实时层核心领域模型
//!
//! 包含权限位集与解析算法、服务器/频道/角色/成员等实体、
//! 实时事件定义以及外部存储的读取接口。

pub mod entities;
pub mod errors;
pub mod events;
pub mod permissions;
pub mod repositories;
pub mod value_objects;

// 重新导出常用类型
pub use entities::*;
pub use errors::*;
pub use events::*;
pub use permissions::*;
pub use repositories::*;
pub use value_objects::*;
