//! 基础设施层实现。
//!
//! 提供目录快照的内存仓储与通知桥的 HTTP 传输适配器，实现应用/领域层
//! 定义的接口。

pub mod http_forwarder;
pub mod memory;

pub use http_forwarder::HttpEventForwarder;
pub use memory::MemoryStore;
