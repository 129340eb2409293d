//! 服务管理 API

use reqwest::{Method, StatusCode};
use tracing::info;

use crate::client::DashboardClient;
use crate::error::Result;
use crate::models::{CreateStatus, ServiceSpec};

/// 服务管理 API
pub struct ServiceApi<'a> {
    client: &'a DashboardClient,
}

impl<'a> ServiceApi<'a> {
    /// 创建新的服务 API 实例
    pub(crate) fn new(client: &'a DashboardClient) -> Self {
        Self { client }
    }

    /// 创建服务
    ///
    /// 返回 202 时服务由后台任务继续创建。
    pub async fn create(&self, spec: &ServiceSpec) -> Result<CreateStatus> {
        let service_name = spec.service_name();
        info!("创建服务: {}", service_name);

        let response = self
            .client
            .send(
                Method::POST,
                "/api/service",
                Some(serde_json::json!({
                    "service_name": service_name,
                    "service_spec": spec,
                })),
            )
            .await?;

        if response.status() == StatusCode::ACCEPTED {
            Ok(CreateStatus::Accepted)
        } else {
            Ok(CreateStatus::Created)
        }
    }

    /// 查询服务列表
    pub async fn list(&self) -> Result<Vec<serde_json::Value>> {
        info!("查询服务列表");
        self.client
            .request(Method::GET, "/api/service", None::<()>)
            .await
    }
}
