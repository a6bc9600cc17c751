//! 任务处理器 - 编排层
//!
//! ## 职责
//!
//! 按输入顺序逐个处理任务，每个任务：
//! 1. 记录开始时间
//! 2. 委托 `TaskHandler` 完成调用和写入
//! 3. 无论成功失败都记录耗时
//!
//! 单个任务失败只记录到该任务的结果里，不会中断整个批次，也不重试。

use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info};

use crate::error::TaskError;
use crate::models::TaskTiming;
use crate::services::TimingReport;
use crate::utils::logging::{log_task_complete, log_task_start};
use crate::workflow::{BatchItem, TaskHandler};

/// 单个任务的处理结果
#[derive(Debug)]
pub struct TaskOutcome {
    pub timing: TaskTiming,
    pub result: Result<PathBuf, TaskError>,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// 按顺序处理所有任务
///
/// 返回的结果数量和顺序与输入一致。`timeout` 为每个任务的时间上限。
pub async fn process_tasks<H: TaskHandler>(
    handler: &H,
    tasks: Vec<H::Item>,
    timeout: Option<Duration>,
) -> Vec<TaskOutcome> {
    let total = tasks.len();
    let mut outcomes = Vec::with_capacity(total);

    for (index, task) in tasks.into_iter().enumerate() {
        let task_id = task.item_id().to_string();
        log_task_start(index + 1, total, &task_id);

        let start = Instant::now();
        let result = match timeout {
            Some(limit) => match tokio::time::timeout(limit, handler.handle(task)).await {
                Ok(result) => result,
                Err(_) => Err(TaskError::Timeout {
                    task_id: task_id.clone(),
                    seconds: limit.as_secs(),
                }),
            },
            None => handler.handle(task).await,
        };
        let timing = TaskTiming::new(&task_id, start.elapsed());

        if let Err(e) = &result {
            error!("[任务 {}] ❌ 处理失败: {}", task_id, e);
        }
        log_task_complete(&task_id, timing.duration_secs);

        outcomes.push(TaskOutcome { timing, result });
    }

    outcomes
}

/// 批次汇总
#[derive(Debug)]
pub struct BatchSummary {
    pub outcomes: Vec<TaskOutcome>,
    pub report: TimingReport,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: Vec<TaskOutcome>) -> Self {
        let timings: Vec<TaskTiming> = outcomes.iter().map(|o| o.timing.clone()).collect();
        Self {
            report: TimingReport::from_timings(&timings),
            outcomes,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn timings(&self) -> Vec<&TaskTiming> {
        self.outcomes.iter().map(|o| &o.timing).collect()
    }

    /// 输出耗时报告和成功/失败统计
    pub fn log(&self) {
        self.report.log();
        info!("✅ 成功: {}/{}", self.succeeded(), self.outcomes.len());
        info!("❌ 失败: {}", self.failed());
    }
}
