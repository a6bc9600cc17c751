use crate::error::LoadError;
use crate::models::task::Task;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;

/// 读取输入文件内容，不是普通文件时视为不存在
pub(super) async fn read_input(path: &Path) -> Result<String, LoadError> {
    let display = path.display().to_string();

    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(LoadError::NotFound { path: display }),
    }

    fs::read_to_string(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound { path: display }
        } else {
            LoadError::Read {
                path: display,
                source,
            }
        }
    })
}

/// 从 JSON 文件加载对话任务列表
///
/// 文件顶层必须是数组，每个元素至少包含 `task_id` 和 `messages`。
/// 返回的任务顺序与文件中一致。
pub async fn load_tasks(path: &Path) -> Result<Vec<Task>, LoadError> {
    let content = read_input(path).await?;
    parse_tasks(&content, &path.display().to_string())
}

/// 解析任务列表，`source_name` 只用于错误信息
pub fn parse_tasks(content: &str, source_name: &str) -> Result<Vec<Task>, LoadError> {
    let value: Value = serde_json::from_str(content).map_err(|source| LoadError::Parse {
        path: source_name.to_string(),
        source,
    })?;

    let malformed = |reason: String| LoadError::Malformed {
        path: source_name.to_string(),
        reason,
    };

    let Value::Array(elements) = value else {
        return Err(malformed("顶层必须是任务数组".to_string()));
    };

    let mut tasks = Vec::with_capacity(elements.len());
    let mut seen = HashSet::new();

    for (index, element) in elements.into_iter().enumerate() {
        if element.get("task_id").is_none() || element.get("messages").is_none() {
            return Err(malformed(format!(
                "第 {} 个任务缺少 'task_id' 或 'messages' 字段",
                index
            )));
        }

        let task: Task = serde_json::from_value(element)
            .map_err(|e| malformed(format!("第 {} 个任务字段无效: {}", index, e)))?;

        if task.task_id.trim().is_empty() {
            return Err(malformed(format!("第 {} 个任务的 'task_id' 为空", index)));
        }
        if task.messages.is_empty() {
            return Err(malformed(format!(
                "任务 {} 的 'messages' 不能为空",
                task.task_id
            )));
        }

        if !seen.insert(task.task_id.clone()) {
            tracing::warn!("⚠️ 任务ID重复: {}，同一秒内完成时输出文件会被覆盖", task.task_id);
        }

        tasks.push(task);
    }

    Ok(tasks)
}
