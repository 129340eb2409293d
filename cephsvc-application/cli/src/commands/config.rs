//! 配置管理命令

use anyhow::Result;
use colored::Colorize;

use crate::config::CliConfig;
use crate::ConfigAction;

pub fn handle(action: ConfigAction, config_path: Option<&str>) -> Result<()> {
    match action {
        ConfigAction::Show => show(config_path),
        ConfigAction::Init { force } => init(config_path, force),
    }
}

fn show(config_path: Option<&str>) -> Result<()> {
    let path = CliConfig::resolve_path(config_path)?;
    let config = CliConfig::load(config_path)?;

    if path.exists() {
        println!("{} {}\n", "配置文件:".bold(), path.display().to_string().cyan());
    } else {
        println!("{} {}\n", "配置文件不存在，使用默认配置:".yellow(), path.display());
    }

    println!("{}", toml::to_string_pretty(&config.redacted())?);
    Ok(())
}

fn init(config_path: Option<&str>, force: bool) -> Result<()> {
    let path = CliConfig::resolve_path(config_path)?;

    if path.exists() && !force {
        anyhow::bail!("配置文件 {:?} 已存在，使用 --force 覆盖", path);
    }

    CliConfig::default().save(&path)?;
    println!("{} 已生成配置文件 {}", "✓".green().bold(), path.display().to_string().cyan());
    Ok(())
}
