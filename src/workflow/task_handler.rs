//! 任务处理能力抽象

use crate::error::TaskError;
use crate::models::{SpeechItem, Task};
use std::future::Future;
use std::path::PathBuf;

/// 可批量处理的条目，只要求能给出ID
pub trait BatchItem {
    fn item_id(&self) -> &str;
}

impl BatchItem for Task {
    fn item_id(&self) -> &str {
        &self.task_id
    }
}

impl BatchItem for SpeechItem {
    fn item_id(&self) -> &str {
        &self.id
    }
}

/// 单个任务的完整处理流程：调用引擎 → 写入结果
///
/// 成功时返回输出文件路径
pub trait TaskHandler {
    type Item: BatchItem;

    fn handle(&self, item: Self::Item) -> impl Future<Output = Result<PathBuf, TaskError>>;
}
