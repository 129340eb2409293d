//! 任务包装
//!
//! 把一次异步调用与一个具名任务关联：调用结束后发出成功/失败通知，
//! 调用被受理为后台任务 (202) 时可选地轮询任务列表直到任务结束。

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use cephsvc_dashboard::{CreateStatus, DashboardError, FinishedTask, Result};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::backend::TaskTracker;

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    Info,
    Error,
}

/// 一条用户通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationType,
    pub title: String,
    pub message: Option<String>,
}

/// 通知接收方
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// 把通知写入日志
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let message = notification.message.unwrap_or_default();
        match notification.kind {
            NotificationType::Success => info!("✅ {} {}", notification.title, message),
            NotificationType::Info => info!("⏳ {} {}", notification.title, message),
            NotificationType::Error => error!("❌ {} {}", notification.title, message),
        }
    }
}

/// 任务的通知文案
struct TaskMessage {
    operation: &'static str,
    subject: String,
}

impl TaskMessage {
    fn for_task(task: &FinishedTask) -> Self {
        let operation = match task.name.split('/').nth(1) {
            Some("create") => "创建",
            Some("delete") => "删除",
            Some("edit") => "修改",
            _ => "执行",
        };

        let subject = match task.metadata["service_name"].as_str() {
            Some(name) => format!("服务 '{}'", name),
            None => task.name.clone(),
        };

        Self { operation, subject }
    }

    fn running(&self) -> String {
        format!("正在{}{}", self.operation, self.subject)
    }

    fn success(&self) -> String {
        format!("{}{} 成功", self.operation, self.subject)
    }

    fn failure(&self) -> String {
        format!("{}{} 失败", self.operation, self.subject)
    }
}

/// 任务包装器
pub struct TaskWrapper {
    notifier: Arc<dyn Notifier>,
    tracker: Option<Arc<dyn TaskTracker>>,
    poll_interval: Duration,
    wait_timeout: Duration,
}

impl TaskWrapper {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            tracker: None,
            poll_interval: Duration::from_secs(2),
            wait_timeout: Duration::from_secs(120),
        }
    }

    /// 启用后台任务轮询
    pub fn with_tracker(mut self, tracker: Arc<dyn TaskTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// 设置轮询间隔与最长等待时间
    pub fn with_polling(mut self, poll_interval: Duration, wait_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.wait_timeout = wait_timeout;
        self
    }

    /// 执行调用并按结果发出通知
    ///
    /// 调用失败时错误原样返回给调用方。
    pub async fn wrap_task_around_call<F>(&self, task: &FinishedTask, call: F) -> Result<CreateStatus>
    where
        F: Future<Output = Result<CreateStatus>>,
    {
        let message = TaskMessage::for_task(task);
        info!("任务开始: {} {}", task.name, task.metadata);

        match call.await {
            Ok(CreateStatus::Created) => {
                self.notify(NotificationType::Success, message.success(), None);
                Ok(CreateStatus::Created)
            }
            Ok(CreateStatus::Accepted) => {
                self.notify(NotificationType::Info, message.running(), None);
                match &self.tracker {
                    Some(tracker) => self.wait_finished(tracker.as_ref(), task, &message).await,
                    None => Ok(CreateStatus::Accepted),
                }
            }
            Err(e) => {
                self.notify(NotificationType::Error, message.failure(), Some(e.to_string()));
                Err(e)
            }
        }
    }

    async fn wait_finished(
        &self,
        tracker: &dyn TaskTracker,
        task: &FinishedTask,
        message: &TaskMessage,
    ) -> Result<CreateStatus> {
        let deadline = Instant::now() + self.wait_timeout;

        loop {
            // 服务已被受理，查询失败不代表创建失败
            let finished = match tracker.find_finished(task).await {
                Ok(finished) => finished,
                Err(e) => {
                    warn!("查询任务 {} 状态失败: {}", task.name, e);
                    None
                }
            };

            if let Some(finished) = finished {
                if finished.success == Some(true) {
                    self.notify(NotificationType::Success, message.success(), None);
                    return Ok(CreateStatus::Created);
                }

                let detail = finished.error_detail();
                self.notify(NotificationType::Error, message.failure(), Some(detail.clone()));
                return Err(DashboardError::TaskFailed(detail));
            }

            if Instant::now() >= deadline {
                warn!("等待任务 {} 超时，任务仍在后台执行", task.name);
                self.notify(
                    NotificationType::Info,
                    message.running(),
                    Some("任务仍在后台执行".to_string()),
                );
                return Ok(CreateStatus::Accepted);
            }

            debug!("任务 {} 执行中，{:?} 后重试", task.name, self.poll_interval);
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn notify(&self, kind: NotificationType, title: String, message: Option<String>) {
        self.notifier.notify(Notification {
            kind,
            title,
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cephsvc_dashboard::Task;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        seen: Mutex<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.seen.lock().unwrap().push(notification);
        }
    }

    impl RecordingNotifier {
        fn kinds(&self) -> Vec<NotificationType> {
            self.seen.lock().unwrap().iter().map(|n| n.kind).collect()
        }
    }

    /// 前 `pending` 次查询返回执行中，之后返回给定结果
    struct CountdownTracker {
        pending: usize,
        polls: AtomicUsize,
        success: bool,
    }

    #[async_trait]
    impl TaskTracker for CountdownTracker {
        async fn find_finished(&self, task: &FinishedTask) -> Result<Option<Task>> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            if n < self.pending {
                return Ok(None);
            }
            Ok(Some(Task {
                name: task.name.clone(),
                metadata: task.metadata.clone(),
                begin_time: None,
                end_time: None,
                progress: Some(100),
                success: Some(self.success),
                exception: (!self.success).then(|| json!({ "detail": "no such realm" })),
            }))
        }
    }

    fn task() -> FinishedTask {
        FinishedTask::new("service/create", json!({ "service_name": "rgw.a" }))
    }

    #[tokio::test]
    async fn test_created_notifies_success() {
        let notifier = Arc::new(RecordingNotifier::default());
        let wrapper = TaskWrapper::new(notifier.clone());

        let status = wrapper
            .wrap_task_around_call(&task(), async { Ok(CreateStatus::Created) })
            .await
            .unwrap();

        assert_eq!(status, CreateStatus::Created);
        let seen = notifier.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, NotificationType::Success);
        assert_eq!(seen[0].title, "创建服务 'rgw.a' 成功");
    }

    #[tokio::test]
    async fn test_error_is_propagated() {
        let notifier = Arc::new(RecordingNotifier::default());
        let wrapper = TaskWrapper::new(notifier.clone());

        let result = wrapper
            .wrap_task_around_call(&task(), async {
                Err(DashboardError::ApiError(400, "bad spec".to_string()))
            })
            .await;

        assert!(matches!(result, Err(DashboardError::ApiError(400, _))));
        let seen = notifier.seen.lock().unwrap().clone();
        assert_eq!(seen[0].kind, NotificationType::Error);
        assert_eq!(seen[0].title, "创建服务 'rgw.a' 失败");
        assert!(seen[0].message.as_deref().unwrap_or("").contains("bad spec"));
    }

    #[tokio::test]
    async fn test_accepted_without_tracker() {
        let notifier = Arc::new(RecordingNotifier::default());
        let wrapper = TaskWrapper::new(notifier.clone());

        let status = wrapper
            .wrap_task_around_call(&task(), async { Ok(CreateStatus::Accepted) })
            .await
            .unwrap();

        assert_eq!(status, CreateStatus::Accepted);
        assert_eq!(notifier.kinds(), vec![NotificationType::Info]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_accepted_polls_until_finished() {
        let notifier = Arc::new(RecordingNotifier::default());
        let tracker = Arc::new(CountdownTracker {
            pending: 3,
            polls: AtomicUsize::new(0),
            success: true,
        });
        let wrapper = TaskWrapper::new(notifier.clone())
            .with_tracker(tracker.clone())
            .with_polling(Duration::from_secs(1), Duration::from_secs(60));

        let status = wrapper
            .wrap_task_around_call(&task(), async { Ok(CreateStatus::Accepted) })
            .await
            .unwrap();

        assert_eq!(status, CreateStatus::Created);
        assert_eq!(tracker.polls.load(Ordering::SeqCst), 4);
        assert_eq!(
            notifier.kinds(),
            vec![NotificationType::Info, NotificationType::Success]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_background_task() {
        let notifier = Arc::new(RecordingNotifier::default());
        let tracker = Arc::new(CountdownTracker {
            pending: 0,
            polls: AtomicUsize::new(0),
            success: false,
        });
        let wrapper = TaskWrapper::new(notifier.clone()).with_tracker(tracker);

        let result = wrapper
            .wrap_task_around_call(&task(), async { Ok(CreateStatus::Accepted) })
            .await;

        match result {
            Err(DashboardError::TaskFailed(detail)) => assert_eq!(detail, "no such realm"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    /// 前 `failures` 次查询报错，之后任务成功
    struct FlakyTracker {
        failures: usize,
        polls: AtomicUsize,
    }

    #[async_trait]
    impl TaskTracker for FlakyTracker {
        async fn find_finished(&self, task: &FinishedTask) -> Result<Option<Task>> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(DashboardError::Timeout("poll timed out".to_string()));
            }
            CountdownTracker {
                pending: 0,
                polls: AtomicUsize::new(0),
                success: true,
            }
            .find_finished(task)
            .await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_error_keeps_polling() {
        let notifier = Arc::new(RecordingNotifier::default());
        let tracker = Arc::new(FlakyTracker {
            failures: 2,
            polls: AtomicUsize::new(0),
        });
        let wrapper = TaskWrapper::new(notifier.clone())
            .with_tracker(tracker.clone())
            .with_polling(Duration::from_secs(1), Duration::from_secs(60));

        let status = wrapper
            .wrap_task_around_call(&task(), async { Ok(CreateStatus::Accepted) })
            .await
            .unwrap();

        assert_eq!(status, CreateStatus::Created);
        assert_eq!(tracker.polls.load(Ordering::SeqCst), 3);
        assert_eq!(
            notifier.kinds(),
            vec![NotificationType::Info, NotificationType::Success]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_errors_until_timeout_report_running() {
        let notifier = Arc::new(RecordingNotifier::default());
        let tracker = Arc::new(FlakyTracker {
            failures: usize::MAX,
            polls: AtomicUsize::new(0),
        });
        let wrapper = TaskWrapper::new(notifier.clone())
            .with_tracker(tracker)
            .with_polling(Duration::from_secs(1), Duration::from_secs(3));

        let status = wrapper
            .wrap_task_around_call(&task(), async { Ok(CreateStatus::Accepted) })
            .await
            .unwrap();

        assert_eq!(status, CreateStatus::Accepted);
        let seen = notifier.seen.lock().unwrap().clone();
        assert!(seen.iter().all(|n| n.kind == NotificationType::Info));
        assert_eq!(seen.last().and_then(|n| n.message.as_deref()), Some("任务仍在后台执行"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_timeout_keeps_task_running() {
        let notifier = Arc::new(RecordingNotifier::default());
        let tracker = Arc::new(CountdownTracker {
            pending: usize::MAX,
            polls: AtomicUsize::new(0),
            success: true,
        });
        let wrapper = TaskWrapper::new(notifier.clone())
            .with_tracker(tracker)
            .with_polling(Duration::from_secs(1), Duration::from_secs(5));

        let status = wrapper
            .wrap_task_around_call(&task(), async { Ok(CreateStatus::Accepted) })
            .await
            .unwrap();

        assert_eq!(status, CreateStatus::Accepted);
        assert_eq!(
            notifier.kinds(),
            vec![NotificationType::Info, NotificationType::Info]
        );
    }
}
