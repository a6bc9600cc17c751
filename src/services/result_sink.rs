//! 结果写入服务 - 业务能力层
//!
//! 只负责"把一个已完成的任务写到磁盘"，不关心流程

use crate::error::TaskError;
use crate::models::speech::SpeechItem;
use crate::models::task::Task;
use crate::services::audio;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// 当前本地时间戳（秒级）
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// 生成对话记录文本：可读部分 + JSON 部分
pub fn render_transcript(task: &Task) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for msg in &task.messages {
        out.push_str(&format!("== {} ==\n", msg.role.as_str().to_uppercase()));
        out.push_str(&format!("{}\n\n", msg.content));
    }
    out.push_str("\n=== JSON FORMAT ===\n");
    out.push_str(&serde_json::to_string_pretty(&task.messages)?);
    Ok(out)
}

/// 把任务ID转成可以安全放进文件名的形式
///
/// 路径分隔符、控制字符和文件系统保留字符都替换为 `_`，结果只会落在输出目录本身
pub fn file_name_component(id: &str) -> String {
    id.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// 先写临时文件再重命名，目标文件要么是旧内容要么是完整的新内容
async fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).await?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e);
    }
    Ok(())
}

/// 对话记录写入服务
///
/// 文件名：`<output_dir>/<时间戳>_task_<task_id>.txt`
pub struct TranscriptSink {
    output_dir: PathBuf,
}

impl TranscriptSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 按给定时间戳计算输出路径
    pub fn path_for(&self, timestamp: &str, task_id: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_task_{}.txt", timestamp, file_name_component(task_id)))
    }

    /// 写入任务结果
    pub async fn save_result(&self, task: &Task) -> Result<PathBuf, TaskError> {
        self.save_result_at(task, &timestamp_now()).await
    }

    /// 写入任务结果（指定时间戳）
    ///
    /// 相同时间戳和任务ID的文件会被整体替换
    pub async fn save_result_at(&self, task: &Task, timestamp: &str) -> Result<PathBuf, TaskError> {
        let path = self.path_for(timestamp, &task.task_id);
        let transcript = render_transcript(task).map_err(|e| {
            TaskError::persist(
                &task.task_id,
                path.display().to_string(),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;

        debug!("写入对话记录: {}", path.display());
        write_atomic(&path, transcript.as_bytes())
            .await
            .map_err(|e| TaskError::persist(&task.task_id, path.display().to_string(), e))?;

        info!("[任务 {}] 💾 结果已保存: {}", task.task_id, path.display());
        Ok(path)
    }
}

/// 音频写入服务
///
/// 文件名：`<output_dir>/<id>_<时间戳>.wav`
pub struct AudioSink {
    output_dir: PathBuf,
}

impl AudioSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn path_for(&self, id: &str, timestamp: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.wav", file_name_component(id), timestamp))
    }

    /// 归一化后写入音频
    pub async fn save_audio(&self, item: &SpeechItem, wav_bytes: &[u8]) -> Result<PathBuf, TaskError> {
        let path = self.path_for(&item.id, &timestamp_now());

        let normalized = audio::normalize_wav(wav_bytes).map_err(|e| TaskError::invoke(&item.id, e))?;

        write_atomic(&path, &normalized)
            .await
            .map_err(|e| TaskError::persist(&item.id, path.display().to_string(), e))?;

        info!("[任务 {}] 🔊 音频已保存: {}", item.id, path.display());
        Ok(path)
    }
}
