//! 主机标签联想命令

use anyhow::Result;
use cephsvc_form::ServiceForm;
use colored::Colorize;
use futures_util::stream::{self, Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::commands::common::connect;
use crate::LabelAction;

pub async fn handle(action: LabelAction, config_path: Option<&str>) -> Result<()> {
    match action {
        LabelAction::Search { queries } => search(queries, config_path).await,
    }
}

fn print_matches(matches: &[String]) {
    if matches.is_empty() {
        println!("  {}", "(无匹配)".bright_black());
    } else {
        println!("  {}", matches.join(", ").green());
    }
}

/// 逐行读取查询词；读取出错时记录日志并结束
fn query_lines<R>(reader: R) -> impl Stream<Item = String> + Send + 'static
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    stream::unfold(reader.lines(), |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line.trim().to_string(), lines)),
            Ok(None) => None,
            Err(e) => {
                warn!("读取标准输入失败，停止联想: {}", e);
                None
            }
        }
    })
}

async fn search(queries: Vec<String>, config_path: Option<&str>) -> Result<()> {
    let (_, client) = connect(config_path).await?;

    let mut form = ServiceForm::new();
    form.init(&client).await?;

    if !queries.is_empty() {
        for query in &queries {
            println!("{}", query.cyan().bold());
            print_matches(&form.labels().filter(query));
        }
        return Ok(());
    }

    println!("{}", "输入查询词，每行一个（Ctrl-D 结束）:".bold());

    let input = query_lines(BufReader::new(tokio::io::stdin()));

    let mut results = Box::pin(form.search_labels(input));
    while let Some(matches) = results.next().await {
        print_matches(&matches);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_query_lines_trims_input() {
        let queries: Vec<String> = query_lines(&b"  alp \nbe\n"[..]).collect().await;
        assert_eq!(queries, vec!["alp", "be"]);
    }

    #[tokio::test]
    async fn test_query_lines_stops_on_invalid_utf8() {
        let queries: Vec<String> = query_lines(&b"alp\n\xff\xfe\nbe\n"[..]).collect().await;
        assert_eq!(queries, vec!["alp"]);
    }
}
