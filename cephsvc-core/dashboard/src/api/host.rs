//! 主机管理 API

use reqwest::Method;
use tracing::info;

use crate::client::DashboardClient;
use crate::error::Result;
use crate::models::Host;

/// 主机管理 API
pub struct HostApi<'a> {
    client: &'a DashboardClient,
}

impl<'a> HostApi<'a> {
    /// 创建新的主机 API 实例
    pub(crate) fn new(client: &'a DashboardClient) -> Self {
        Self { client }
    }

    /// 查询主机列表
    pub async fn list(&self) -> Result<Vec<Host>> {
        info!("查询主机列表");
        self.client
            .request(Method::GET, "/api/host", None::<()>)
            .await
    }

    /// 查询集群中使用的全部主机标签
    pub async fn labels(&self) -> Result<Vec<String>> {
        info!("查询主机标签");
        self.client
            .request(Method::GET, "/api/host/labels", None::<()>)
            .await
    }
}
