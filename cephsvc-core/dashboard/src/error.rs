//! 管理面客户端错误定义

use thiserror::Error;

/// 管理面客户端错误类型
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("HTTP 错误: {0}")]
    HttpError(String),

    #[error("认证错误: {0}")]
    AuthError(String),

    #[error("API 错误 [{0}]: {1}")]
    ApiError(u16, String),

    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("超时错误: {0}")]
    Timeout(String),

    /// 接口返回 404
    #[error("资源不存在: {0}")]
    NotFound(String),

    #[error("任务执行失败: {0}")]
    TaskFailed(String),
}

/// 管理面客户端结果类型
pub type Result<T> = std::result::Result<T, DashboardError>;
