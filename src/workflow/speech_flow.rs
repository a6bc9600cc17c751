//! 语音合成流程 - 流程层
//!
//! 文本 → 引擎合成 → 峰值归一化 → 写入 WAV

use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::error::TaskError;
use crate::infrastructure::SpeechEngine;
use crate::models::SpeechItem;
use crate::services::AudioSink;
use crate::workflow::task_handler::TaskHandler;

pub struct SpeechFlow<'a, E> {
    engine: &'a E,
    sink: &'a AudioSink,
}

impl<'a, E: SpeechEngine> SpeechFlow<'a, E> {
    pub fn new(engine: &'a E, sink: &'a AudioSink) -> Self {
        Self { engine, sink }
    }
}

impl<E: SpeechEngine> TaskHandler for SpeechFlow<'_, E> {
    type Item = SpeechItem;

    async fn handle(&self, item: SpeechItem) -> Result<PathBuf, TaskError> {
        info!("[任务 {}] 🎙️ 正在生成语音...", item.id);

        let start = Instant::now();
        let wav = self
            .engine
            .synthesize(&item.text)
            .await
            .map_err(|e| TaskError::invoke(&item.id, e))?;
        info!(
            "[任务 {}] 生成耗时: {:.2} 秒",
            item.id,
            start.elapsed().as_secs_f64()
        );

        self.sink.save_audio(&item, &wav).await
    }
}
