//! 服务创建表单
//!
//! 收集创建集群服务（NFS、RGW、iSCSI 等）所需的输入，在客户端完成校验，
//! 组装服务规格后经任务包装提交到管理面。
//!
//! # 示例
//!
//! ```ignore
//! use std::sync::Arc;
//! use cephsvc_form::{ServiceForm, TaskWrapper, TracingNotifier};
//!
//! let mut form = ServiceForm::new();
//! form.init(&client).await?;
//! form.patch(|v| {
//!     v.service_type = Some(ServiceType::Rgw);
//!     v.service_id = Some("main".into());
//! });
//!
//! let tasks = TaskWrapper::new(Arc::new(TracingNotifier));
//! let name = form.submit(&client, &tasks, &navigator).await?;
//! ```

pub mod backend;
pub mod error;
pub mod label_search;
pub mod service_form;
pub mod task_wrapper;
pub mod validators;

pub use backend::{Navigator, ServiceBackend, TaskTracker};
pub use error::{FormError, Result};
pub use label_search::{LabelSearch, DEFAULT_DEBOUNCE, MAX_RESULTS};
pub use service_form::{
    FormErrorFlag, FormState, HostOption, PlacementMode, ServiceForm, ServiceFormValue,
    CREATE_TASK, SERVICE_LIST_ROUTE,
};
pub use task_wrapper::{Notification, NotificationType, Notifier, TaskWrapper, TracingNotifier};
pub use validators::{Condition, Field, FieldValue, FormValues, Op, ValidationError, ValidationErrors, Validator};
