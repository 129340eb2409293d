//! 管理面客户端核心实现

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::{HostApi, ServiceApi, TaskApi};
use crate::error::{DashboardError, Result};

/// 管理面 API 版本头
const API_ACCEPT: &str = "application/vnd.ceph.api.v1.0+json";

/// 管理面客户端配置
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// 连接超时（秒）
    pub connect_timeout: u64,

    /// 请求超时（秒）
    pub request_timeout: u64,

    /// 是否验证 SSL 证书
    pub verify_ssl: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            connect_timeout: 10,
            request_timeout: 30,
            verify_ssl: true,
        }
    }
}

/// 管理面客户端
pub struct DashboardClient {
    /// API 基础 URL
    base_url: String,

    /// HTTP 客户端
    http_client: Client,

    /// 认证令牌
    access_token: Arc<RwLock<Option<String>>>,
}

impl DashboardClient {
    /// 创建新的管理面客户端
    pub fn new(base_url: &str, config: DashboardConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| DashboardError::HttpError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    /// 认证登录
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        info!("管理面客户端登录: {}", username);

        let login_url = format!("{}/api/auth", self.base_url);
        let login_data = serde_json::json!({
            "username": username,
            "password": password,
        });

        let response = self
            .http_client
            .post(&login_url)
            .header("Accept", API_ACCEPT)
            .json(&login_data)
            .send()
            .await
            .map_err(|e| DashboardError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DashboardError::AuthError(format!(
                "登录失败 [{}]: {}",
                status.as_u16(),
                error_text
            )));
        }

        let login_result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DashboardError::ParseError(e.to_string()))?;

        let token = login_result["token"]
            .as_str()
            .ok_or_else(|| DashboardError::AuthError("未获取到 Token".to_string()))?
            .to_string();

        *self.access_token.write().await = Some(token);

        info!("管理面客户端登录成功");
        Ok(())
    }

    /// 注销登出
    pub async fn logout(&mut self) -> Result<()> {
        info!("管理面客户端登出");
        *self.access_token.write().await = None;
        Ok(())
    }

    /// 直接设置访问令牌（已有会话时跳过登录）
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.access_token.write().await = Some(token.into());
    }

    /// 获取服务管理 API
    pub fn service(&self) -> ServiceApi<'_> {
        ServiceApi::new(self)
    }

    /// 获取主机管理 API
    pub fn host(&self) -> HostApi<'_> {
        HostApi::new(self)
    }

    /// 获取任务管理 API
    pub fn task(&self) -> TaskApi<'_> {
        TaskApi::new(self)
    }

    /// 发送 HTTP 请求并返回原始响应
    ///
    /// 404 转换为 `NotFound`，其余非 2xx 状态转换为 `ApiError`。
    pub(crate) async fn send<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<T>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("管理面 API 请求: {} {}", method, url);

        let token = self.access_token.read().await;
        let token_str = token
            .as_ref()
            .ok_or_else(|| DashboardError::AuthError("未认证，请先登录".to_string()))?;

        let mut request = self
            .http_client
            .request(method, &url)
            .bearer_auth(token_str)
            .header("Accept", API_ACCEPT);

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DashboardError::Timeout(e.to_string())
                } else {
                    DashboardError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!("API 资源不存在: {}", path);
            return Err(DashboardError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "无法读取错误响应".to_string());
            warn!("API 请求失败: {} - {}", status, error_text);
            return Err(DashboardError::ApiError(status.as_u16(), error_text));
        }

        Ok(response)
    }

    /// 发送 HTTP 请求并解析 JSON 响应
    pub(crate) async fn request<T: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<T>,
    ) -> Result<R> {
        let response = self.send(method, path, body).await?;

        response
            .json::<R>()
            .await
            .map_err(|e| DashboardError::ParseError(e.to_string()))
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 获取当前访问令牌
    pub async fn get_token(&self) -> Result<String> {
        let token = self.access_token.read().await;
        token
            .clone()
            .ok_or_else(|| DashboardError::AuthError("未认证，请先登录".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = DashboardClient::new("https://192.168.1.11:8443/", DashboardConfig::default());
        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url(), "https://192.168.1.11:8443");
    }

    #[tokio::test]
    async fn test_request_without_login() {
        let client = DashboardClient::new("http://127.0.0.1:1", DashboardConfig::default()).unwrap();
        let result = client.host().labels().await;
        assert!(matches!(result, Err(DashboardError::AuthError(_))));
    }
}
