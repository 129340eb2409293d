//! 任务管理 API
//!
//! 管理面把耗时操作放到后台任务中执行，客户端通过任务名称与元数据
//! 在任务列表中定位对应条目以跟踪其状态。

use reqwest::Method;
use tracing::{debug, info};

use crate::client::DashboardClient;
use crate::error::Result;
use crate::models::{FinishedTask, Task, TaskList};

/// 任务管理 API
pub struct TaskApi<'a> {
    client: &'a DashboardClient,
}

impl<'a> TaskApi<'a> {
    /// 创建新的任务 API 实例
    pub(crate) fn new(client: &'a DashboardClient) -> Self {
        Self { client }
    }

    /// 查询任务列表，可按任务名称过滤
    pub async fn list(&self, name: Option<&str>) -> Result<TaskList> {
        info!("查询任务列表: {:?}", name);

        let path = match name {
            Some(n) => format!("/api/task?name={}", urlencoding::encode(n)),
            None => "/api/task".to_string(),
        };

        self.client.request(Method::GET, &path, None::<()>).await
    }

    /// 查找与描述符匹配的已完成任务
    ///
    /// 任务仍在执行或尚未出现时返回 `None`。
    pub async fn find_finished(&self, task: &FinishedTask) -> Result<Option<Task>> {
        let list = self.list(Some(&task.name)).await?;

        let finished = list.finished_tasks.into_iter().find(|t| task.matches(t));
        debug!(
            "任务 {} 状态: {}",
            task.name,
            if finished.is_some() { "已完成" } else { "执行中" }
        );

        Ok(finished)
    }
}
