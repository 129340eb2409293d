//! cephsvc CLI 应用

use anyhow::Result;
use cephsvc_dashboard::ServiceType;
use cephsvc_form::PlacementMode;
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "cephsvc")]
#[command(about = "cephsvc - 集群服务创建工具", long_about = None)]
#[command(version)]
struct Cli {
    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// 配置文件路径（默认 ~/.config/cephsvc/config.toml）
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 服务管理
    Service {
        #[command(subcommand)]
        action: ServiceAction,
    },

    /// 主机标签
    Label {
        #[command(subcommand)]
        action: LabelAction,
    },

    /// 主机管理
    Host {
        #[command(subcommand)]
        action: HostAction,
    },

    /// 配置管理
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ServiceAction {
    /// 创建服务
    Create(CreateArgs),

    /// 列出服务
    List {
        /// 输出格式 (table/json/yaml)
        #[arg(short = 'f', long, default_value = "table")]
        format: String,
    },

    /// 列出支持的服务类型
    Types,
}

/// 服务创建表单参数
#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// 从 JSON/TOML 文件加载表单，命令行参数覆盖文件中的值
    #[arg(long)]
    pub file: Option<String>,

    /// 服务类型
    #[arg(long = "type")]
    pub service_type: Option<ServiceType>,

    /// 服务 ID
    #[arg(long = "id")]
    pub service_id: Option<String>,

    /// 放置方式 (hosts/label)
    #[arg(long)]
    pub placement: Option<PlacementMode>,

    /// 主机标签（label 放置方式）
    #[arg(long)]
    pub label: Option<String>,

    /// 主机列表（逗号分隔，hosts 放置方式）
    #[arg(long, value_delimiter = ',')]
    pub hosts: Vec<String>,

    /// 实例数量
    #[arg(long)]
    pub count: Option<i64>,

    /// NFS: 存储池
    #[arg(long)]
    pub pool: Option<String>,

    /// NFS: 命名空间
    #[arg(long)]
    pub namespace: Option<String>,

    /// RGW: realm
    #[arg(long)]
    pub rgw_realm: Option<String>,

    /// RGW: zone
    #[arg(long)]
    pub rgw_zone: Option<String>,

    /// RGW: 子集群
    #[arg(long)]
    pub subcluster: Option<String>,

    /// RGW: 前端端口
    #[arg(long)]
    pub rgw_frontend_port: Option<u16>,

    /// RGW: 启用 SSL（可写 --ssl=false 覆盖文件中的值）
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub ssl: Option<bool>,

    /// iSCSI: 受信任 IP 列表
    #[arg(long)]
    pub trusted_ip_list: Option<String>,

    /// iSCSI: API 端口
    #[arg(long)]
    pub api_port: Option<u16>,

    /// iSCSI: API 用户
    #[arg(long)]
    pub api_user: Option<String>,

    /// iSCSI: API 密码
    #[arg(long)]
    pub api_password: Option<String>,

    /// iSCSI: API 使用 HTTPS（可写 --api-secure=false 覆盖文件中的值）
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub api_secure: Option<bool>,

    /// SSL 证书
    #[arg(long)]
    pub ssl_cert: Option<String>,

    /// SSL 私钥
    #[arg(long)]
    pub ssl_key: Option<String>,

    /// 只校验并打印服务规格，不提交
    #[arg(long)]
    pub dry_run: bool,

    /// 预览输出格式 (json/yaml)
    #[arg(short = 'f', long, default_value = "json")]
    pub format: String,
}

#[derive(Subcommand)]
pub enum LabelAction {
    /// 联想搜索主机标签；未给出查询词时逐行读取标准输入
    Search {
        /// 查询词
        queries: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum HostAction {
    /// 列出主机
    List {
        /// 输出格式 (table/json/yaml)
        #[arg(short = 'f', long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// 显示当前配置
    Show,

    /// 生成默认配置文件
    Init {
        /// 覆盖已存在的配置文件
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("cephsvc CLI 启动");

    let config_path = cli.config.as_deref();

    // 处理命令
    match cli.command {
        Commands::Service { action } => commands::service::handle(action, config_path).await?,
        Commands::Label { action } => commands::label::handle(action, config_path).await?,
        Commands::Host { action } => commands::host::handle(action, config_path).await?,
        Commands::Config { action } => commands::config::handle(action, config_path)?,
    }

    Ok(())
}
