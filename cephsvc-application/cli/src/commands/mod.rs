//! CLI 命令处理模块

pub mod common; // 公共工具函数
pub mod config;
pub mod host;
pub mod label;
pub mod output;
pub mod service;
