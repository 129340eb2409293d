//! Ceph 管理面 REST 客户端
//!
//! 提供与集群管理面 API 交互的客户端实现。
//!
//! # 功能
//!
//! - **服务管理** (`ServiceApi`): 创建服务、查询服务列表
//! - **主机管理** (`HostApi`): 主机列表、主机标签
//! - **任务管理** (`TaskApi`): 后台任务跟踪
//!
//! # 示例
//!
//! ```ignore
//! use cephsvc_dashboard::{DashboardClient, DashboardConfig, ServiceSpec, ServiceType};
//!
//! let mut client = DashboardClient::new("https://mgr0:8443", DashboardConfig::default())?;
//! client.login("admin", "password").await?;
//!
//! let labels = client.host().labels().await?;
//!
//! let mut spec = ServiceSpec::new(ServiceType::Nfs);
//! spec.service_id = Some("share".into());
//! client.service().create(&spec).await?;
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod models;

pub use client::{DashboardClient, DashboardConfig};
pub use error::{DashboardError, Result};

pub use api::{HostApi, ServiceApi, TaskApi};

pub use models::{
    CreateStatus, FinishedTask, Host, Placement, ServiceSpec, ServiceType, Task, TaskList,
};
