//! 服务创建表单
//!
//! 表单生命周期：`new` 构建字段与校验规则 → `init` 拉取主机与标签 →
//! 用户编辑 → `submit` 组装服务规格并提交，成功后跳转到服务列表。

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use cephsvc_dashboard::{FinishedTask, ServiceSpec, ServiceType};
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backend::{Navigator, ServiceBackend};
use crate::error::{FormError, Result};
use crate::label_search::LabelSearch;
use crate::task_wrapper::TaskWrapper;
use crate::validators::{validate_all, Condition, Field, FieldValue, FormValues, ValidationErrors, Validator};

/// 服务列表页路由
pub const SERVICE_LIST_ROUTE: &str = "/services";

/// 创建服务的任务名称
pub const CREATE_TASK: &str = "service/create";

/// 放置方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    #[default]
    Hosts,
    Label,
}

impl PlacementMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementMode::Hosts => "hosts",
            PlacementMode::Label => "label",
        }
    }
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlacementMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "hosts" => Ok(PlacementMode::Hosts),
            "label" => Ok(PlacementMode::Label),
            other => Err(format!("未知的放置方式: {} (可选 hosts/label)", other)),
        }
    }
}

/// 表单取值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceFormValue {
    // 通用
    pub service_type: Option<ServiceType>,
    pub service_id: Option<String>,
    pub placement: PlacementMode,
    pub label: Option<String>,
    pub hosts: Vec<String>,
    pub count: Option<i64>,

    // NFS
    pub pool: Option<String>,
    pub namespace: Option<String>,

    // RGW
    pub rgw_realm: Option<String>,
    pub rgw_zone: Option<String>,
    pub subcluster: Option<String>,
    pub rgw_frontend_port: Option<u16>,
    pub ssl: Option<bool>,

    // iSCSI
    pub trusted_ip_list: Option<String>,
    pub api_port: Option<u16>,
    pub api_user: Option<String>,
    pub api_password: Option<String>,
    pub api_secure: Option<bool>,
    pub ssl_cert: Option<String>,
    pub ssl_key: Option<String>,
}

fn text(value: &Option<String>) -> FieldValue {
    FieldValue::from(value.as_deref())
}

fn port(value: Option<u16>) -> FieldValue {
    FieldValue::from(value.map(i64::from))
}

impl FormValues for ServiceFormValue {
    fn get(&self, field: Field) -> FieldValue {
        match field {
            Field::ServiceType => FieldValue::from(self.service_type.map(|t| t.as_str())),
            Field::ServiceId => text(&self.service_id),
            Field::Placement => FieldValue::from(self.placement.as_str()),
            Field::Label => text(&self.label),
            Field::Hosts => FieldValue::List(self.hosts.clone()),
            Field::Count => FieldValue::from(self.count),
            Field::Pool => text(&self.pool),
            Field::Namespace => text(&self.namespace),
            Field::RgwRealm => text(&self.rgw_realm),
            Field::RgwZone => text(&self.rgw_zone),
            Field::Subcluster => text(&self.subcluster),
            Field::RgwFrontendPort => port(self.rgw_frontend_port),
            Field::Ssl => FieldValue::from(self.ssl),
            Field::TrustedIpList => text(&self.trusted_ip_list),
            Field::ApiPort => port(self.api_port),
            Field::ApiUser => text(&self.api_user),
            Field::ApiPassword => text(&self.api_password),
            Field::ApiSecure => FieldValue::from(self.api_secure),
            Field::SslCert => text(&self.ssl_cert),
            Field::SslKey => text(&self.ssl_key),
        }
    }
}

/// 表单级错误标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormErrorFlag {
    /// 提交失败，提交按钮显示错误状态
    SubmitButton,
}

/// 表单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitting,
    Failed,
    Succeeded,
}

/// 可选主机
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostOption {
    pub name: String,
    pub enabled: bool,
}

/// 服务创建表单
pub struct ServiceForm {
    value: ServiceFormValue,
    rules: Vec<(Field, Validator)>,
    form_errors: BTreeSet<FormErrorFlag>,
    state: FormState,
    labels: LabelSearch,
    hosts: Vec<HostOption>,
}

impl Default for ServiceForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceForm {
    pub fn new() -> Self {
        Self {
            value: ServiceFormValue::default(),
            rules: Self::create_form(),
            form_errors: BTreeSet::new(),
            state: FormState::Editing,
            labels: LabelSearch::default(),
            hosts: Vec::new(),
        }
    }

    /// 字段校验规则
    fn create_form() -> Vec<(Field, Validator)> {
        vec![
            (Field::ServiceType, Validator::Required),
            (
                Field::Label,
                Validator::RequiredIf(vec![Condition::equals(Field::Placement, "label")]),
            ),
            (Field::Count, Validator::Min(1)),
            (Field::Count, Validator::Max(i64::from(u32::MAX))),
            (
                Field::Pool,
                Validator::RequiredIf(vec![Condition::equals(Field::ServiceType, "nfs")]),
            ),
            (
                Field::RgwRealm,
                Validator::RequiredIf(vec![Condition::equals(Field::Ssl, true)]),
            ),
            (
                Field::RgwRealm,
                Validator::RequiredIf(vec![Condition::not_empty(Field::RgwZone)]),
            ),
            (
                Field::RgwZone,
                Validator::RequiredIf(vec![Condition::equals(Field::Ssl, true)]),
            ),
            (
                Field::RgwZone,
                Validator::RequiredIf(vec![Condition::not_empty(Field::RgwRealm)]),
            ),
        ]
    }

    pub fn value(&self) -> &ServiceFormValue {
        &self.value
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// 替换全部取值
    pub fn set_value(&mut self, value: ServiceFormValue) {
        self.patch(|v| *v = value);
    }

    /// 编辑取值；任何编辑都会清除表单级错误
    pub fn patch(&mut self, edit: impl FnOnce(&mut ServiceFormValue)) {
        edit(&mut self.value);
        self.form_errors.clear();
        self.state = FormState::Editing;
    }

    /// 当前的字段校验错误
    pub fn errors(&self) -> ValidationErrors {
        validate_all(&self.rules, &self.value)
    }

    pub fn validate(&self) -> Result<()> {
        let errors = self.errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(FormError::Invalid(errors))
        }
    }

    pub fn is_valid(&self) -> bool {
        self.form_errors.is_empty() && self.errors().is_empty()
    }

    pub fn set_errors(&mut self, flag: FormErrorFlag) {
        self.form_errors.insert(flag);
    }

    pub fn has_error(&self, flag: FormErrorFlag) -> bool {
        self.form_errors.contains(&flag)
    }

    /// 拉取主机标签与主机列表
    pub async fn init<B>(&mut self, backend: &B) -> Result<()>
    where
        B: ServiceBackend + ?Sized,
    {
        let labels = backend
            .host_labels()
            .await
            .map_err(|e| FormError::Backend(e.to_string()))?;
        debug!("已加载 {} 个主机标签", labels.len());
        self.set_labels(labels);

        let hosts = backend
            .hosts()
            .await
            .map_err(|e| FormError::Backend(e.to_string()))?;
        self.hosts = hosts
            .into_iter()
            .map(|h| HostOption {
                name: h.hostname,
                enabled: true,
            })
            .collect();

        Ok(())
    }

    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = LabelSearch::new(labels);
    }

    pub fn labels(&self) -> &LabelSearch {
        &self.labels
    }

    pub fn host_options(&self) -> &[HostOption] {
        &self.hosts
    }

    /// 标签联想
    pub fn search_labels<S>(&self, queries: S) -> impl Stream<Item = Vec<String>> + Send
    where
        S: Stream<Item = String> + Send + 'static,
    {
        self.labels.search(queries)
    }

    /// 校验并组装服务规格
    pub fn build_spec(&self) -> Result<ServiceSpec> {
        self.validate()?;

        let values = &self.value;
        let Some(service_type) = values.service_type else {
            return Err(FormError::Invalid(self.errors()));
        };

        let mut spec = ServiceSpec::new(service_type);

        match values.placement {
            PlacementMode::Hosts => {
                if !values.hosts.is_empty() {
                    spec.placement.hosts = Some(values.hosts.clone());
                }
            }
            PlacementMode::Label => {
                spec.placement.label = values.label.clone();
            }
        }

        if let Some(count) = values.count.filter(|c| *c > 0) {
            // 上限已由校验保证
            spec.placement.count = u32::try_from(count).ok();
        }

        if spec.placement.is_empty() {
            debug!("未指定放置规则，由编排器决定");
        }

        if let Some(id) = values.service_id.as_deref().filter(|id| !id.is_empty()) {
            spec.service_id = Some(id.to_string());
        }

        // TODO: 将 pool/namespace、rgw_realm/rgw_zone/ssl、trusted_ip_list/api_* 写入规格
        if matches!(
            service_type,
            ServiceType::Nfs | ServiceType::Rgw | ServiceType::Iscsi
        ) {
            debug!("{} 的类型专属字段未写入规格", service_type);
        }

        Ok(spec)
    }

    /// 提交表单
    ///
    /// 校验失败时不会调用管理面。提交失败时设置 `SubmitButton` 错误并留在
    /// 当前页面；成功时跳转到服务列表，返回服务显示名称。
    pub async fn submit<B, N>(
        &mut self,
        backend: &B,
        tasks: &TaskWrapper,
        navigator: &N,
    ) -> Result<String>
    where
        B: ServiceBackend + ?Sized,
        N: Navigator + ?Sized,
    {
        let spec = self.build_spec()?;
        let service_name = spec.service_name();
        let task = FinishedTask::new(
            CREATE_TASK,
            serde_json::json!({ "service_name": service_name }),
        );

        info!("提交服务: {}", service_name);
        self.state = FormState::Submitting;

        match tasks
            .wrap_task_around_call(&task, backend.create_service(&spec))
            .await
        {
            Ok(_) => {
                self.state = FormState::Succeeded;
                navigator.navigate(SERVICE_LIST_ROUTE);
                Ok(service_name)
            }
            Err(e) => {
                warn!("提交服务 {} 失败: {}", service_name, e);
                self.set_errors(FormErrorFlag::SubmitButton);
                self.state = FormState::Failed;
                Err(FormError::Submit(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::ValidationError;

    fn form_with(edit: impl FnOnce(&mut ServiceFormValue)) -> ServiceForm {
        let mut form = ServiceForm::new();
        form.patch(|v| v.service_type = Some(ServiceType::Rgw));
        form.patch(edit);
        form
    }

    #[test]
    fn test_service_type_required() {
        let form = ServiceForm::new();
        let errors = form.errors();
        assert_eq!(errors.get(Field::ServiceType), &[ValidationError::Required]);
        assert!(!form.is_valid());
    }

    #[test]
    fn test_ssl_requires_realm_and_zone() {
        let form = form_with(|v| v.ssl = Some(true));
        let errors = form.errors();
        assert_eq!(errors.get(Field::RgwRealm), &[ValidationError::Required]);
        assert_eq!(errors.get(Field::RgwZone), &[ValidationError::Required]);

        let form = form_with(|v| {
            v.ssl = Some(true);
            v.rgw_realm = Some("r1".to_string());
            v.rgw_zone = Some("z1".to_string());
        });
        assert!(form.is_valid());

        let form = form_with(|v| v.ssl = Some(false));
        assert!(form.is_valid());
    }

    #[test]
    fn test_realm_and_zone_require_each_other() {
        let form = form_with(|v| v.rgw_zone = Some("z1".to_string()));
        let errors = form.errors();
        assert_eq!(errors.get(Field::RgwRealm), &[ValidationError::Required]);
        assert!(errors.get(Field::RgwZone).is_empty());

        let form = form_with(|v| v.rgw_realm = Some("r1".to_string()));
        let errors = form.errors();
        assert_eq!(errors.get(Field::RgwZone), &[ValidationError::Required]);
        assert!(errors.get(Field::RgwRealm).is_empty());

        let form = form_with(|v| v.rgw_zone = Some(String::new()));
        assert!(form.is_valid());
    }

    #[test]
    fn test_count_min() {
        assert!(form_with(|v| v.count = None).is_valid());
        assert!(form_with(|v| v.count = Some(1)).is_valid());

        let form = form_with(|v| v.count = Some(0));
        assert_eq!(
            form.errors().get(Field::Count),
            &[ValidationError::Min { min: 1, actual: 0 }]
        );
        assert!(!form_with(|v| v.count = Some(-3)).is_valid());
    }

    #[test]
    fn test_count_above_u32_is_rejected() {
        let form = form_with(|v| v.count = Some(5_000_000_000));
        assert_eq!(
            form.errors().get(Field::Count),
            &[ValidationError::Max {
                max: i64::from(u32::MAX),
                actual: 5_000_000_000
            }]
        );
        assert!(matches!(form.build_spec(), Err(FormError::Invalid(_))));

        let form = form_with(|v| v.count = Some(i64::from(u32::MAX)));
        assert_eq!(form.build_spec().unwrap().placement.count, Some(u32::MAX));
    }

    #[test]
    fn test_label_required_in_label_mode() {
        let form = form_with(|v| v.placement = PlacementMode::Label);
        assert_eq!(form.errors().get(Field::Label), &[ValidationError::Required]);

        let form = form_with(|v| {
            v.placement = PlacementMode::Label;
            v.label = Some("rgw".to_string());
        });
        assert!(form.is_valid());
    }

    #[test]
    fn test_nfs_requires_pool() {
        let form = form_with(|v| v.service_type = Some(ServiceType::Nfs));
        assert_eq!(form.errors().get(Field::Pool), &[ValidationError::Required]);
        assert!(form.build_spec().is_err());
    }

    #[test]
    fn test_spec_shaping() {
        let form = form_with(|v| {
            v.service_type = Some(ServiceType::Mds);
            v.service_id = Some(String::new());
            v.hosts = vec![];
            v.count = Some(3);
        });
        let spec = form.build_spec().unwrap();
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            serde_json::json!({ "service_type": "mds", "placement": { "count": 3 } })
        );
        assert_eq!(spec.service_name(), "mds");
    }

    #[test]
    fn test_label_mode_ignores_hosts() {
        let form = form_with(|v| {
            v.placement = PlacementMode::Label;
            v.label = Some("gateway".to_string());
            v.hosts = vec!["node1".to_string()];
            v.service_id = Some("main".to_string());
        });
        let spec = form.build_spec().unwrap();
        assert_eq!(spec.placement.hosts, None);
        assert_eq!(spec.placement.label.as_deref(), Some("gateway"));
        assert_eq!(spec.service_name(), "rgw.main");
    }

    #[test]
    fn test_edit_clears_submit_flag() {
        let mut form = form_with(|_| {});
        form.set_errors(FormErrorFlag::SubmitButton);
        assert!(!form.is_valid());

        form.patch(|v| v.count = Some(2));
        assert!(!form.has_error(FormErrorFlag::SubmitButton));
        assert!(form.is_valid());
    }

    #[test]
    fn test_form_value_from_json() {
        let value: ServiceFormValue = serde_json::from_value(serde_json::json!({
            "service_type": "rgw",
            "service_id": "zone1",
            "placement": "label",
            "label": "gateway",
            "ssl": true
        }))
        .unwrap();

        assert_eq!(value.service_type, Some(ServiceType::Rgw));
        assert_eq!(value.placement, PlacementMode::Label);
        assert!(value.hosts.is_empty());
        assert_eq!(value.get(Field::Ssl), FieldValue::Bool(true));
    }
}
