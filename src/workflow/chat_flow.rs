//! 对话任务处理流程 - 流程层
//!
//! 流程顺序：
//! 1. 把完整对话交给引擎
//! 2. 回复追加为 assistant 消息
//! 3. 写入对话记录

use std::path::PathBuf;
use tracing::debug;

use crate::error::TaskError;
use crate::infrastructure::ChatEngine;
use crate::models::Task;
use crate::services::TranscriptSink;
use crate::utils::logging::truncate_text;
use crate::workflow::task_handler::TaskHandler;

/// 对话任务流程
///
/// - 不持有资源，只借用已初始化的引擎
/// - 任务处理完即丢弃
pub struct ChatFlow<'a, E> {
    engine: &'a E,
    sink: &'a TranscriptSink,
}

impl<'a, E: ChatEngine> ChatFlow<'a, E> {
    pub fn new(engine: &'a E, sink: &'a TranscriptSink) -> Self {
        Self { engine, sink }
    }
}

impl<E: ChatEngine> TaskHandler for ChatFlow<'_, E> {
    type Item = Task;

    async fn handle(&self, mut task: Task) -> Result<PathBuf, TaskError> {
        if let Some(last) = task.messages.last() {
            debug!(
                "[任务 {}] 最后一条消息 ({}): {}",
                task.task_id,
                last.role,
                truncate_text(&last.content, 80)
            );
        }

        let reply = self
            .engine
            .complete(&task.messages)
            .await
            .map_err(|e| TaskError::invoke(&task.task_id, e))?;

        // 回复原样保存，只有全空白时才算空回复
        if reply.trim().is_empty() {
            return Err(TaskError::EmptyResponse {
                task_id: task.task_id,
            });
        }

        debug!("[任务 {}] 回复: {}", task.task_id, truncate_text(&reply, 80));
        task.push_reply(reply);

        self.sink.save_result(&task).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Message, Role};

    struct FixedEngine(&'static str);

    impl ChatEngine for FixedEngine {
        async fn complete(&self, _messages: &[Message]) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn task() -> Task {
        Task {
            task_id: "t1".to_string(),
            messages: vec![Message::new(Role::User, "hi")],
        }
    }

    #[tokio::test]
    async fn test_reply_is_stored_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let sink = TranscriptSink::new(dir.path());
        let engine = FixedEngine("\n  Dobar dan!\n");

        let path = ChatFlow::new(&engine, &sink).handle(task()).await.unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let (_, json) = content.split_once("=== JSON FORMAT ===\n").unwrap();
        let messages: Vec<Message> = serde_json::from_str(json).unwrap();
        assert_eq!(messages[1], Message::assistant("\n  Dobar dan!\n"));
    }

    #[tokio::test]
    async fn test_blank_reply_is_empty_response() {
        let dir = tempfile::tempdir().unwrap();
        let sink = TranscriptSink::new(dir.path());
        let engine = FixedEngine(" \n\t");

        let err = ChatFlow::new(&engine, &sink).handle(task()).await.unwrap_err();

        assert!(matches!(err, TaskError::EmptyResponse { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
