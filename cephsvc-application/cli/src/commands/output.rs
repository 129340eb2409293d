//! CLI 通用输出格式化模块
//!
//! 提供 table/json/yaml 三种输出格式的通用实现

use anyhow::Result;
use serde::Serialize;

/// 可输出为表格行的数据 trait
pub trait TableRow {
    /// 返回表格列标题
    fn headers() -> Vec<&'static str>;

    /// 返回该项的表格行数据
    fn row(&self) -> Vec<String>;
}

fn format_line(cells: &[String]) -> String {
    cells
        .iter()
        .map(|c| format!("{:<20}", c))
        .collect::<Vec<_>>()
        .join(" ")
}

/// 表格格式输出
pub fn print_table<T: TableRow>(items: &[T]) {
    let headers: Vec<String> = T::headers().iter().map(|h| h.to_string()).collect();

    // 打印表头
    let header_line = format_line(&headers);
    println!("{}", header_line);
    println!("{}", "-".repeat(header_line.len()));

    // 打印数据行
    for item in items {
        println!("{}", format_line(&item.row()));
    }
}

/// 序列化为 json/yaml 文本
pub fn render<T: Serialize + ?Sized>(value: &T, format: &str) -> Result<String> {
    match format {
        "yaml" => Ok(serde_yaml::to_string(value)?),
        _ => Ok(serde_json::to_string_pretty(value)?),
    }
}

/// 根据格式参数选择输出方式
pub fn output_formatted<T: TableRow + Serialize>(items: &[T], format: &str) -> Result<()> {
    match format {
        "json" | "yaml" => println!("{}", render(items, format)?),
        _ => print_table(items),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        name: String,
    }

    #[test]
    fn test_render_formats() {
        let rows = vec![Row {
            name: "nfs.x".to_string(),
        }];

        let json = render(&rows, "json").unwrap();
        assert!(json.contains("\"name\": \"nfs.x\""));

        let yaml = render(&rows, "yaml").unwrap();
        assert!(yaml.contains("name: nfs.x"));
    }
}
