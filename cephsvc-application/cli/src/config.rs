//! CLI 配置管理
//!
//! **数据存储方式**: TOML 文件 (~/.config/cephsvc/config.toml)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use cephsvc_dashboard::DashboardConfig;
use serde::{Deserialize, Serialize};

/// 密码环境变量，优先于配置文件
pub const PASSWORD_ENV: &str = "CEPHSVC_PASSWORD";

/// CLI 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// 管理面连接
    #[serde(default)]
    pub dashboard: DashboardSettings,

    /// 后台任务跟踪
    #[serde(default)]
    pub task: TaskSettings,
}

/// 管理面连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// 管理面地址
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 用户名
    #[serde(default = "default_username")]
    pub username: String,

    /// 密码
    #[serde(default)]
    pub password: Option<String>,

    /// 是否验证 SSL 证书
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,

    /// 连接超时（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// 请求超时（秒）
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// 后台任务跟踪配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSettings {
    /// 轮询间隔（毫秒）
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// 最长等待时间（秒）
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: default_username(),
            password: None,
            verify_ssl: default_verify_ssl(),
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for TaskSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            wait_timeout_secs: default_wait_timeout_secs(),
        }
    }
}

impl DashboardSettings {
    /// 转换为客户端配置
    pub fn client_config(&self) -> DashboardConfig {
        DashboardConfig {
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
            verify_ssl: self.verify_ssl,
        }
    }

    /// 解析密码：环境变量优先
    pub fn resolve_password(&self) -> Result<String> {
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            return Ok(password);
        }
        self.password
            .clone()
            .with_context(|| format!("未配置管理面密码，请设置 {} 或写入配置文件", PASSWORD_ENV))
    }
}

impl TaskSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

impl CliConfig {
    /// 获取默认配置文件路径
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("无法获取用户主目录")?;
        Ok(home.join(".config").join("cephsvc").join("config.toml"))
    }

    /// 解析配置文件路径，支持 `~` 展开
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(shellexpand::tilde(p).as_ref())),
            None => Self::default_path(),
        }
    }

    /// 加载配置，文件不存在时使用默认值
    pub fn load(path: Option<&str>) -> Result<Self> {
        let path = Self::resolve_path(path)?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {:?}", path))
    }

    /// 保存配置
    pub fn save(&self, path: &Path) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("创建配置目录失败: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("序列化配置失败")?;

        fs::write(path, content).with_context(|| format!("写入配置文件失败: {:?}", path))?;

        Ok(())
    }

    /// 隐藏密码后的副本，用于展示
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.dashboard.password.is_some() {
            config.dashboard.password = Some("***".to_string());
        }
        config
    }
}

// 默认值函数
fn default_base_url() -> String {
    "https://localhost:8443".to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_verify_ssl() -> bool {
    true
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_wait_timeout_secs() -> u64 {
    120
}
