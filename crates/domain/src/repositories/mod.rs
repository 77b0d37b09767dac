//! Repository接口定义
//!
//! 外部存储的读取抽象：内层定义接口，外层实现接口。权限解析需要的
//! 角色、成员、覆写与所有权数据都经由这里读取，读取结果视为解析时刻
//! 的快照，不假设事务隔离（只要求不旧于触发请求）。

pub mod channel_repository;
pub mod member_repository;
pub mod presence_repository;
pub mod server_repository;

// 重新导出所有Repository特征
pub use channel_repository::ChannelRepository;
pub use member_repository::MemberRepository;
pub use presence_repository::PresenceRepository;
pub use server_repository::ServerRepository;
