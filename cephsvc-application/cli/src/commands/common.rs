//! 公共工具函数模块
//!
//! 提供各命令模块共享的功能，包括：
//! - 配置加载
//! - 管理面客户端创建和登录

use anyhow::{Context, Result};
use cephsvc_dashboard::DashboardClient;
use tracing::info;

use crate::config::CliConfig;

/// 加载配置并创建已登录的管理面客户端
pub async fn connect(config_path: Option<&str>) -> Result<(CliConfig, DashboardClient)> {
    let config = CliConfig::load(config_path)?;
    let client = create_dashboard_client(&config).await?;
    Ok((config, client))
}

/// 创建并登录管理面客户端
pub async fn create_dashboard_client(config: &CliConfig) -> Result<DashboardClient> {
    let settings = &config.dashboard;
    info!("连接管理面: {}", settings.base_url);

    let mut client = DashboardClient::new(&settings.base_url, settings.client_config())
        .context("创建管理面客户端失败")?;

    let password = settings.resolve_password()?;
    client
        .login(&settings.username, &password)
        .await
        .context("管理面登录失败")?;

    Ok(client)
}
