//! 表单字段与校验器
//!
//! 校验规则以 `(Field, Validator)` 列表的形式声明，校验时统一对整张表单求值，
//! 因此兄弟字段变化引起的条件必填无需额外订阅。

use std::collections::BTreeMap;
use std::fmt;

/// 表单字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    // 通用
    ServiceType,
    ServiceId,
    Placement,
    Label,
    Hosts,
    Count,
    // NFS
    Pool,
    Namespace,
    // RGW
    RgwRealm,
    RgwZone,
    Subcluster,
    RgwFrontendPort,
    Ssl,
    // iSCSI
    TrustedIpList,
    ApiPort,
    ApiUser,
    ApiPassword,
    ApiSecure,
    SslCert,
    SslKey,
}

impl Field {
    pub const ALL: [Field; 20] = [
        Field::ServiceType,
        Field::ServiceId,
        Field::Placement,
        Field::Label,
        Field::Hosts,
        Field::Count,
        Field::Pool,
        Field::Namespace,
        Field::RgwRealm,
        Field::RgwZone,
        Field::Subcluster,
        Field::RgwFrontendPort,
        Field::Ssl,
        Field::TrustedIpList,
        Field::ApiPort,
        Field::ApiUser,
        Field::ApiPassword,
        Field::ApiSecure,
        Field::SslCert,
        Field::SslKey,
    ];

    /// 字段名（与提交载荷及配置文件中的键一致）
    pub fn name(&self) -> &'static str {
        match self {
            Field::ServiceType => "service_type",
            Field::ServiceId => "service_id",
            Field::Placement => "placement",
            Field::Label => "label",
            Field::Hosts => "hosts",
            Field::Count => "count",
            Field::Pool => "pool",
            Field::Namespace => "namespace",
            Field::RgwRealm => "rgw_realm",
            Field::RgwZone => "rgw_zone",
            Field::Subcluster => "subcluster",
            Field::RgwFrontendPort => "rgw_frontend_port",
            Field::Ssl => "ssl",
            Field::TrustedIpList => "trusted_ip_list",
            Field::ApiPort => "api_port",
            Field::ApiUser => "api_user",
            Field::ApiPassword => "api_password",
            Field::ApiSecure => "api_secure",
            Field::SslCert => "ssl_cert",
            Field::SslKey => "ssl_key",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 字段值视图
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(i64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// 空值：未填写、空字符串或空列表
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(l) => l.is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// 可按字段读取值的表单
pub trait FormValues {
    fn get(&self, field: Field) -> FieldValue;
}

/// 条件运算
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// 字段值等于给定值
    Equals(FieldValue),
    /// 字段值非空
    NotEmpty,
}

/// 条件必填的触发条件
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: Field,
    pub op: Op,
}

impl Condition {
    pub fn equals(field: Field, value: impl Into<FieldValue>) -> Self {
        Self {
            field,
            op: Op::Equals(value.into()),
        }
    }

    pub fn not_empty(field: Field) -> Self {
        Self {
            field,
            op: Op::NotEmpty,
        }
    }

    fn holds(&self, form: &dyn FormValues) -> bool {
        let value = form.get(self.field);
        match &self.op {
            Op::Equals(expected) => value == *expected,
            Op::NotEmpty => !value.is_empty(),
        }
    }
}

/// 字段校验器
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// 必填
    Required,
    /// 数值下限，空值通过
    Min(i64),
    /// 数值上限，空值通过
    Max(i64),
    /// 所有条件同时成立时必填
    RequiredIf(Vec<Condition>),
}

impl Validator {
    /// 对单个字段求值，通过时返回 `None`
    pub fn check(&self, value: &FieldValue, form: &dyn FormValues) -> Option<ValidationError> {
        match self {
            Validator::Required => value.is_empty().then_some(ValidationError::Required),
            Validator::Min(min) => match value {
                FieldValue::Number(n) if n < min => Some(ValidationError::Min {
                    min: *min,
                    actual: *n,
                }),
                _ => None,
            },
            Validator::Max(max) => match value {
                FieldValue::Number(n) if n > max => Some(ValidationError::Max {
                    max: *max,
                    actual: *n,
                }),
                _ => None,
            },
            Validator::RequiredIf(conditions) => {
                let triggered = conditions.iter().all(|c| c.holds(form));
                (triggered && value.is_empty()).then_some(ValidationError::Required)
            }
        }
    }
}

/// 单项校验错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Required,
    Min { min: i64, actual: i64 },
    Max { max: i64, actual: i64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required => write!(f, "必填"),
            ValidationError::Min { min, actual } => {
                write!(f, "不能小于 {} (当前 {})", min, actual)
            }
            ValidationError::Max { max, actual } => {
                write!(f, "不能大于 {} (当前 {})", max, actual)
            }
        }
    }
}

/// 按字段汇总的校验错误
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, Vec<ValidationError>>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: Field) -> &[ValidationError] {
        self.errors.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 出错的字段
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }

    fn push(&mut self, field: Field, error: ValidationError) {
        let entry = self.errors.entry(field).or_default();
        if !entry.contains(&error) {
            entry.push(error);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, errs)| {
                let msgs: Vec<String> = errs.iter().map(ToString::to_string).collect();
                format!("{}: {}", field, msgs.join(", "))
            })
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// 对整张表单执行全部规则
pub fn validate_all(rules: &[(Field, Validator)], form: &dyn FormValues) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    for (field, validator) in rules {
        let value = form.get(*field);
        if let Some(error) = validator.check(&value, form) {
            errors.push(*field, error);
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapForm(HashMap<Field, FieldValue>);

    impl FormValues for MapForm {
        fn get(&self, field: Field) -> FieldValue {
            self.0.get(&field).cloned().unwrap_or(FieldValue::Null)
        }
    }

    #[test]
    fn test_field_names_unique() {
        let mut names: Vec<&str> = Field::ALL.iter().map(Field::name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Field::ALL.len());
    }

    #[test]
    fn test_emptiness() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::Text(String::new()).is_empty());
        assert!(FieldValue::List(vec![]).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
        assert!(!FieldValue::Number(0).is_empty());
    }

    #[test]
    fn test_min_allows_null() {
        let form = MapForm(HashMap::new());
        assert_eq!(Validator::Min(1).check(&FieldValue::Null, &form), None);
        assert_eq!(Validator::Min(1).check(&FieldValue::Number(1), &form), None);
        assert_eq!(
            Validator::Min(1).check(&FieldValue::Number(0), &form),
            Some(ValidationError::Min { min: 1, actual: 0 })
        );
    }

    #[test]
    fn test_max_allows_null() {
        let form = MapForm(HashMap::new());
        assert_eq!(Validator::Max(5).check(&FieldValue::Null, &form), None);
        assert_eq!(Validator::Max(5).check(&FieldValue::Number(5), &form), None);
        assert_eq!(
            Validator::Max(5).check(&FieldValue::Number(6), &form),
            Some(ValidationError::Max { max: 5, actual: 6 })
        );
    }

    #[test]
    fn test_required_if_needs_all_conditions() {
        let rule = Validator::RequiredIf(vec![
            Condition::equals(Field::ServiceType, "rgw"),
            Condition::equals(Field::Ssl, true),
        ]);

        let mut values = HashMap::new();
        values.insert(Field::ServiceType, FieldValue::from("rgw"));
        let form = MapForm(values.clone());
        assert_eq!(rule.check(&FieldValue::Null, &form), None);

        values.insert(Field::Ssl, FieldValue::Bool(true));
        let form = MapForm(values);
        assert_eq!(rule.check(&FieldValue::Null, &form), Some(ValidationError::Required));
        assert_eq!(rule.check(&FieldValue::from("x"), &form), None);
    }

    #[test]
    fn test_errors_display() {
        let rules = vec![
            (Field::ServiceType, Validator::Required),
            (Field::Count, Validator::Min(1)),
        ];
        let mut values = HashMap::new();
        values.insert(Field::Count, FieldValue::Number(-2));
        let errors = validate_all(&rules, &MapForm(values));

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::ServiceType, Field::Count]);
        assert_eq!(errors.to_string(), "service_type: 必填; count: 不能小于 1 (当前 -2)");
    }
}
