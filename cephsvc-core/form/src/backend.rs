//! 表单依赖的外部协作方
//!
//! 表单只通过这里的 trait 访问管理面与界面导航，`DashboardClient`
//! 提供真实实现，测试中可替换为内存实现。

use async_trait::async_trait;
use cephsvc_dashboard::{
    CreateStatus, DashboardClient, FinishedTask, Host, Result, ServiceSpec, Task,
};

/// 服务创建与主机查询
#[async_trait]
pub trait ServiceBackend: Send + Sync {
    /// 提交服务规格
    async fn create_service(&self, spec: &ServiceSpec) -> Result<CreateStatus>;

    /// 查询全部主机标签
    async fn host_labels(&self) -> Result<Vec<String>>;

    /// 查询主机列表
    async fn hosts(&self) -> Result<Vec<Host>>;
}

/// 后台任务状态查询
#[async_trait]
pub trait TaskTracker: Send + Sync {
    /// 任务完成时返回对应条目，仍在执行时返回 `None`
    async fn find_finished(&self, task: &FinishedTask) -> Result<Option<Task>>;
}

/// 界面导航
pub trait Navigator {
    fn navigate(&self, route: &str);
}

#[async_trait]
impl ServiceBackend for DashboardClient {
    async fn create_service(&self, spec: &ServiceSpec) -> Result<CreateStatus> {
        self.service().create(spec).await
    }

    async fn host_labels(&self) -> Result<Vec<String>> {
        self.host().labels().await
    }

    async fn hosts(&self) -> Result<Vec<Host>> {
        self.host().list().await
    }
}

#[async_trait]
impl TaskTracker for DashboardClient {
    async fn find_finished(&self, task: &FinishedTask) -> Result<Option<Task>> {
        self.task().find_finished(task).await
    }
}
