//! 服务管理命令

use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use cephsvc_dashboard::{DashboardClient, ServiceType};
use cephsvc_form::{
    FormError, Navigator, PlacementMode, ServiceForm, ServiceFormValue, TaskWrapper,
    TracingNotifier, SERVICE_LIST_ROUTE,
};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::warn;

use crate::commands::common::connect;
use crate::commands::output::{output_formatted, render, TableRow};
use crate::{CreateArgs, ServiceAction};

/// 服务列表行
#[derive(Debug, Serialize)]
struct ServiceRow {
    service_name: String,
    service_type: String,
    running: String,
}

impl ServiceRow {
    fn from_json(service: &serde_json::Value) -> Self {
        let running = service["status"]["running"].as_i64().unwrap_or(0);
        let size = service["status"]["size"].as_i64().unwrap_or(0);
        Self {
            service_name: service["service_name"].as_str().unwrap_or("").to_string(),
            service_type: service["service_type"].as_str().unwrap_or("").to_string(),
            running: format!("{}/{}", running, size),
        }
    }
}

impl TableRow for ServiceRow {
    fn headers() -> Vec<&'static str> {
        vec!["服务", "类型", "运行/期望"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.service_name.clone(),
            self.service_type.clone(),
            self.running.clone(),
        ]
    }
}

/// 记录表单请求的跳转目标
#[derive(Default)]
struct ListViewNavigator {
    target: Mutex<Option<String>>,
}

impl Navigator for ListViewNavigator {
    fn navigate(&self, route: &str) {
        if let Ok(mut target) = self.target.lock() {
            *target = Some(route.to_string());
        }
    }
}

impl ListViewNavigator {
    fn target(&self) -> Option<String> {
        self.target.lock().ok().and_then(|t| t.clone())
    }
}

impl CreateArgs {
    /// 把命令行参数写入表单，未给出的参数保留原值
    fn apply_to(self, v: &mut ServiceFormValue) {
        if self.service_type.is_some() {
            v.service_type = self.service_type;
        }
        if self.service_id.is_some() {
            v.service_id = self.service_id;
        }
        if let Some(placement) = self.placement {
            v.placement = placement;
        }
        if self.label.is_some() {
            v.label = self.label;
        }
        if !self.hosts.is_empty() {
            v.hosts = self.hosts;
        }
        if self.count.is_some() {
            v.count = self.count;
        }
        if self.pool.is_some() {
            v.pool = self.pool;
        }
        if self.namespace.is_some() {
            v.namespace = self.namespace;
        }
        if self.rgw_realm.is_some() {
            v.rgw_realm = self.rgw_realm;
        }
        if self.rgw_zone.is_some() {
            v.rgw_zone = self.rgw_zone;
        }
        if self.subcluster.is_some() {
            v.subcluster = self.subcluster;
        }
        if self.rgw_frontend_port.is_some() {
            v.rgw_frontend_port = self.rgw_frontend_port;
        }
        if self.ssl.is_some() {
            v.ssl = self.ssl;
        }
        if self.trusted_ip_list.is_some() {
            v.trusted_ip_list = self.trusted_ip_list;
        }
        if self.api_port.is_some() {
            v.api_port = self.api_port;
        }
        if self.api_user.is_some() {
            v.api_user = self.api_user;
        }
        if self.api_password.is_some() {
            v.api_password = self.api_password;
        }
        if self.api_secure.is_some() {
            v.api_secure = self.api_secure;
        }
        if self.ssl_cert.is_some() {
            v.ssl_cert = self.ssl_cert;
        }
        if self.ssl_key.is_some() {
            v.ssl_key = self.ssl_key;
        }
    }
}

pub async fn handle(action: ServiceAction, config_path: Option<&str>) -> Result<()> {
    match action {
        ServiceAction::Create(args) => create_service(args, config_path).await,
        ServiceAction::List { format } => {
            let (_, client) = connect(config_path).await?;
            list_services(&client, &format).await
        }
        ServiceAction::Types => {
            for service_type in ServiceType::ALL {
                println!("{}", service_type);
            }
            Ok(())
        }
    }
}

/// 从 JSON/TOML 文件加载表单取值
fn load_form_file(path: &str) -> Result<ServiceFormValue> {
    let path = shellexpand::tilde(path).to_string();
    let content =
        fs::read_to_string(&path).with_context(|| format!("读取表单文件失败: {}", path))?;

    if path.ends_with(".toml") {
        toml::from_str(&content).with_context(|| format!("解析表单文件失败: {}", path))
    } else {
        serde_json::from_str(&content).with_context(|| format!("解析表单文件失败: {}", path))
    }
}

fn print_invalid(error: &FormError) {
    if let FormError::Invalid(errors) = error {
        println!("{} 表单校验未通过:", "✗".red().bold());
        for field in errors.fields() {
            let messages: Vec<String> = errors.get(field).iter().map(ToString::to_string).collect();
            println!("  {}: {}", field.to_string().yellow(), messages.join(", "));
        }
    }
}

/// 放置目标在集群中不存在时给出提示
fn check_placement(form: &ServiceForm) {
    let value = form.value();
    match value.placement {
        PlacementMode::Label => {
            if let Some(label) = &value.label {
                if !form.labels().labels().contains(label) {
                    warn!("标签 {} 当前未分配给任何主机", label);
                }
            }
        }
        PlacementMode::Hosts => {
            for host in &value.hosts {
                if !form.host_options().iter().any(|o| &o.name == host) {
                    warn!("主机 {} 不在集群主机列表中", host);
                }
            }
        }
    }
}

async fn create_service(args: CreateArgs, config_path: Option<&str>) -> Result<()> {
    let dry_run = args.dry_run;
    let format = args.format.clone();

    let mut form = ServiceForm::new();
    if let Some(file) = &args.file {
        form.set_value(load_form_file(file)?);
    }
    form.patch(|v| args.apply_to(v));

    if dry_run {
        let spec = form.build_spec().map_err(|e| {
            print_invalid(&e);
            e
        })?;
        println!("{} {}", "服务名称:".bold(), spec.service_name().cyan());
        println!("{}", render(&spec, &format)?);
        return Ok(());
    }

    // 校验失败时不连接管理面
    form.validate().map_err(|e| {
        print_invalid(&e);
        e
    })?;

    let (config, client) = connect(config_path).await?;
    let client = Arc::new(client);

    form.init(client.as_ref()).await?;
    check_placement(&form);

    let tasks = TaskWrapper::new(Arc::new(TracingNotifier))
        .with_tracker(client.clone())
        .with_polling(config.task.poll_interval(), config.task.wait_timeout());
    let navigator = ListViewNavigator::default();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("进度条模板无效")?,
    );
    spinner.set_message("提交服务...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = form.submit(client.as_ref(), &tasks, &navigator).await;
    spinner.finish_and_clear();

    let service_name = match result {
        Ok(name) => name,
        Err(e) => {
            println!("{} 服务创建失败，请修改后重新提交", "✗".red().bold());
            return Err(e.into());
        }
    };

    println!("{} 服务 {} 已提交", "✓".green().bold(), service_name.cyan().bold());

    if navigator.target().as_deref() == Some(SERVICE_LIST_ROUTE) {
        println!();
        list_services(&client, "table").await?;
    }

    Ok(())
}

async fn list_services(client: &DashboardClient, format: &str) -> Result<()> {
    let services = client.service().list().await?;
    let rows: Vec<ServiceRow> = services.iter().map(ServiceRow::from_json).collect();

    if rows.is_empty() && format == "table" {
        println!("{}", "集群中没有任何服务".yellow());
        return Ok(());
    }

    output_formatted(&rows, format)
}
