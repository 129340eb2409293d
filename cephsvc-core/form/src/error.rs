//! 表单错误定义

use thiserror::Error;

use crate::validators::ValidationErrors;

/// 表单操作结果类型
pub type Result<T> = std::result::Result<T, FormError>;

/// 表单错误类型
#[derive(Error, Debug)]
pub enum FormError {
    /// 字段校验未通过，提交被拦截
    #[error("表单校验失败: {0}")]
    Invalid(ValidationErrors),

    /// 初始化时查询管理面失败
    #[error("管理面调用失败: {0}")]
    Backend(String),

    /// 提交失败
    #[error("提交失败: {0}")]
    Submit(String),
}
