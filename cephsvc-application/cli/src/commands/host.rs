//! 主机管理命令

use anyhow::Result;
use cephsvc_dashboard::Host;
use serde::Serialize;

use crate::commands::common::connect;
use crate::commands::output::{output_formatted, TableRow};
use crate::HostAction;

/// 主机列表行
#[derive(Debug, Serialize)]
struct HostRow {
    hostname: String,
    addr: String,
    labels: Vec<String>,
}

impl From<Host> for HostRow {
    fn from(host: Host) -> Self {
        Self {
            addr: host.addr.unwrap_or_default(),
            hostname: host.hostname,
            labels: host.labels,
        }
    }
}

impl TableRow for HostRow {
    fn headers() -> Vec<&'static str> {
        vec!["主机", "地址", "标签"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.hostname.clone(),
            self.addr.clone(),
            self.labels.join(","),
        ]
    }
}

pub async fn handle(action: HostAction, config_path: Option<&str>) -> Result<()> {
    match action {
        HostAction::List { format } => list_hosts(config_path, &format).await,
    }
}

async fn list_hosts(config_path: Option<&str>, format: &str) -> Result<()> {
    let (_, client) = connect(config_path).await?;

    let rows: Vec<HostRow> = client
        .host()
        .list()
        .await?
        .into_iter()
        .map(HostRow::from)
        .collect();

    output_formatted(&rows, format)
}
