use serde::{Deserialize, Serialize};
use std::fmt;

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 对话消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// 对话任务
///
/// 解析后保证 `task_id` 非空、`messages` 至少一条
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub messages: Vec<Message>,
}

impl Task {
    /// 追加模型生成的回复
    pub fn push_reply(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }
}

/// 单个任务耗时记录
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTiming {
    pub task_id: String,
    /// 耗时（秒）
    pub duration_secs: f64,
}

impl TaskTiming {
    pub fn new(task_id: impl Into<String>, duration: std::time::Duration) -> Self {
        Self {
            task_id: task_id.into(),
            duration_secs: duration.as_secs_f64(),
        }
    }
}
