//! 管理面 API 模块
//!
//! - 服务管理 (ServiceApi)
//! - 主机管理 (HostApi)
//! - 任务管理 (TaskApi)

pub mod host;
pub mod service;
pub mod task;

pub use host::HostApi;
pub use service::ServiceApi;
pub use task::TaskApi;
