//! 主机标签联想搜索
//!
//! 标签列表在表单初始化时一次性拉取，之后每次按键只在本地过滤。

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, Stream, StreamExt};

/// 单次联想最多返回的标签数
pub const MAX_RESULTS: usize = 10;

/// 默认防抖间隔
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// 标签联想
#[derive(Debug, Clone)]
pub struct LabelSearch {
    labels: Arc<[String]>,
    debounce: Duration,
}

impl Default for LabelSearch {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl LabelSearch {
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels: labels.into(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// 调整防抖间隔
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// 不区分大小写的子串匹配，保持原始顺序，最多 `MAX_RESULTS` 条
    pub fn filter(&self, query: &str) -> Vec<String> {
        let needle = query.to_lowercase();
        self.labels
            .iter()
            .filter(|label| label.to_lowercase().contains(&needle))
            .take(MAX_RESULTS)
            .cloned()
            .collect()
    }

    /// 把查询流转换为匹配结果流
    ///
    /// 查询在防抖间隔内没有更新才会被处理；输入结束时立即处理最后一个
    /// 待定查询；与上一次处理过的查询相同的查询被丢弃。
    pub fn search<S>(&self, queries: S) -> impl Stream<Item = Vec<String>> + Send
    where
        S: Stream<Item = String> + Send + 'static,
    {
        let state = SearchState {
            queries: Box::pin(queries),
            pending: None,
            last: None,
            done: false,
            search: self.clone(),
        };

        stream::unfold(state, |mut st| async move {
            loop {
                if st.pending.is_none() {
                    if st.done {
                        return None;
                    }
                    match st.queries.next().await {
                        Some(query) => st.pending = Some(query),
                        None => return None,
                    }
                    continue;
                }

                if !st.done {
                    let next = tokio::select! {
                        next = st.queries.next() => Some(next),
                        _ = tokio::time::sleep(st.search.debounce) => None,
                    };

                    match next {
                        Some(Some(query)) => {
                            st.pending = Some(query);
                            continue;
                        }
                        Some(None) => st.done = true,
                        None => {}
                    }
                }

                let query = st.pending.take()?;
                if st.last.as_deref() == Some(query.as_str()) {
                    continue;
                }

                let matches = st.search.filter(&query);
                st.last = Some(query);
                return Some((matches, st));
            }
        })
    }
}

struct SearchState {
    queries: Pin<Box<dyn Stream<Item = String> + Send>>,
    pending: Option<String>,
    last: Option<String>,
    done: bool,
    search: LabelSearch,
}
