//! 管理面数据模型
//!
//! 服务规格 (`ServiceSpec`) 即提交给 `POST /api/service` 的载荷；
//! 任务模型对应 `GET /api/task` 的返回结构。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// 编排器支持的服务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    Alertmanager,
    Crash,
    Grafana,
    Iscsi,
    Mds,
    Mgr,
    Mon,
    Nfs,
    NodeExporter,
    Prometheus,
    RbdMirror,
    Rgw,
}

impl ServiceType {
    /// 所有服务类型（按名称排序）
    pub const ALL: [ServiceType; 12] = [
        ServiceType::Alertmanager,
        ServiceType::Crash,
        ServiceType::Grafana,
        ServiceType::Iscsi,
        ServiceType::Mds,
        ServiceType::Mgr,
        ServiceType::Mon,
        ServiceType::Nfs,
        ServiceType::NodeExporter,
        ServiceType::Prometheus,
        ServiceType::RbdMirror,
        ServiceType::Rgw,
    ];

    /// 服务类型名称
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Alertmanager => "alertmanager",
            ServiceType::Crash => "crash",
            ServiceType::Grafana => "grafana",
            ServiceType::Iscsi => "iscsi",
            ServiceType::Mds => "mds",
            ServiceType::Mgr => "mgr",
            ServiceType::Mon => "mon",
            ServiceType::Nfs => "nfs",
            ServiceType::NodeExporter => "node-exporter",
            ServiceType::Prometheus => "prometheus",
            ServiceType::RbdMirror => "rbd-mirror",
            ServiceType::Rgw => "rgw",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DashboardError::ParseError(format!("未知的服务类型: {}", s)))
    }
}

/// 放置规则
///
/// 三个字段均为可选，缺省时不出现在 JSON 中。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// 显式主机列表
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,

    /// 主机标签选择器
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// 实例数量
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl Placement {
    pub fn is_empty(&self) -> bool {
        self.hosts.is_none() && self.label.is_none() && self.count.is_none()
    }
}

/// 服务规格
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// 服务类型
    pub service_type: ServiceType,

    /// 服务 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,

    /// 放置规则
    #[serde(default)]
    pub placement: Placement,
}

impl ServiceSpec {
    /// 创建只包含服务类型与空放置规则的规格
    pub fn new(service_type: ServiceType) -> Self {
        Self {
            service_type,
            service_id: None,
            placement: Placement::default(),
        }
    }

    /// 服务显示名称：`type.id`，无 ID 时为 `type`
    pub fn service_name(&self) -> String {
        match self.service_id.as_deref() {
            Some(id) if !id.is_empty() => format!("{}.{}", self.service_type, id),
            _ => self.service_type.to_string(),
        }
    }
}

/// 创建请求的受理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStatus {
    /// 同步完成 (200/201)
    Created,
    /// 已受理，后台任务执行中 (202)
    Accepted,
}

/// 主机信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    /// 主机名
    pub hostname: String,

    /// 地址
    #[serde(default)]
    pub addr: Option<String>,

    /// 标签
    #[serde(default)]
    pub labels: Vec<String>,

    /// 状态
    #[serde(default)]
    pub status: Option<String>,
}

/// 任务描述符（名称 + 元数据）
///
/// 用于把一次异步调用与管理面任务列表中的条目关联起来。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedTask {
    /// 任务名称，如 `service/create`
    pub name: String,

    /// 任务元数据，如 `{"service_name": "nfs.x"}`
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl FinishedTask {
    pub fn new(name: impl Into<String>, metadata: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            metadata,
        }
    }

    /// 判断任务列表中的条目是否对应当前描述符
    pub fn matches(&self, task: &Task) -> bool {
        self.name == task.name && self.metadata == task.metadata
    }
}

/// 管理面任务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub name: String,

    #[serde(default)]
    pub metadata: serde_json::Value,

    #[serde(default)]
    pub begin_time: Option<String>,

    #[serde(default)]
    pub end_time: Option<String>,

    /// 进度 (0-100)
    #[serde(default)]
    pub progress: Option<u32>,

    /// 是否成功（仅已完成任务）
    #[serde(default)]
    pub success: Option<bool>,

    /// 失败详情
    #[serde(default)]
    pub exception: Option<serde_json::Value>,
}

impl Task {
    /// 失败详情文本
    pub fn error_detail(&self) -> String {
        match &self.exception {
            Some(serde_json::Value::Object(map)) => map
                .get("detail")
                .and_then(|d| d.as_str())
                .unwrap_or("未知错误")
                .to_string(),
            Some(serde_json::Value::String(s)) => s.clone(),
            _ => "未知错误".to_string(),
        }
    }
}

/// 任务列表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub executing_tasks: Vec<Task>,

    #[serde(default)]
    pub finished_tasks: Vec<Task>,
}
