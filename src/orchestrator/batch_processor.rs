//! 批量任务处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一个批次从头到尾的生命周期。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：准备输出目录
//! 2. **批量加载**：读取任务文件（失败即终止，不处理任何任务）
//! 3. **资源管理**：创建 `ResourceContext`，第一个任务需要时才初始化引擎
//! 4. **逐个处理**：委托 `task_processor` 按顺序处理，单个失败不影响其他任务
//! 5. **资源释放**：无论成功还是致命错误都会执行
//! 6. **全局统计**：输出耗时报告
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有 `ResourceContext` 的模块
//! - **向下委托**：单个任务的细节交给 workflow

use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{
    ChatEngine, ChatEngineFactory, ResourceContext, ResourceFactory, SpeechEngine,
    SpeechEngineFactory,
};
use crate::models::{load_speech_items, load_tasks, SpeechItem, Task};
use crate::orchestrator::task_processor::{process_tasks, BatchSummary, TaskOutcome};
use crate::services::{diagnose, AudioSink, DiagnosticReport, TranscriptSink};
use crate::utils::logging::{log_startup, log_tasks_loaded};
use crate::workflow::{ChatFlow, SpeechFlow};

/// 批处理模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// 对话生成
    Chat,
    /// 语音合成
    Speech,
}

impl BatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchMode::Chat => "对话生成",
            BatchMode::Speech => "语音合成",
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用
    ///
    /// 输出目录创建失败只记录警告，之后每个任务的写入会单独失败
    pub async fn initialize(config: Config) -> Self {
        if let Err(e) = fs::create_dir_all(&config.output_dir).await {
            warn!("⚠️ 无法创建输出目录 {}: {}", config.output_dir, e);
        }
        Self { config }
    }

    /// 运行指定模式的批处理
    pub async fn run(&self, mode: BatchMode) -> AppResult<BatchSummary> {
        log_startup(mode.as_str(), &self.config.output_dir);
        match mode {
            BatchMode::Chat => self.run_chat_with(ChatEngineFactory::new(&self.config)).await,
            BatchMode::Speech => {
                self.run_speech_with(SpeechEngineFactory::new(&self.config))
                    .await
            }
        }
    }

    /// 诊断推理后端
    pub async fn diagnose(&self) -> DiagnosticReport {
        let report = diagnose(&self.config).await;
        report.log();
        report
    }

    /// 使用指定的引擎工厂运行对话批处理
    pub async fn run_chat_with<F>(&self, factory: F) -> AppResult<BatchSummary>
    where
        F: ResourceFactory,
        F::Resource: ChatEngine,
    {
        let tasks = self.load_chat_tasks().await?;

        let mut ctx = ResourceContext::new(factory);
        let result = if tasks.is_empty() {
            warn!("⚠️ 没有待处理的任务，跳过引擎初始化");
            Ok(Vec::new())
        } else {
            self.process_chat(&ctx, tasks).await
        };
        ctx.release();

        Ok(finish(result?))
    }

    /// 使用指定的引擎工厂运行语音合成批处理
    pub async fn run_speech_with<F>(&self, factory: F) -> AppResult<BatchSummary>
    where
        F: ResourceFactory,
        F::Resource: SpeechEngine,
    {
        let items = self.load_speech_items().await?;

        let mut ctx = ResourceContext::new(factory);
        let result = if items.is_empty() {
            warn!("⚠️ 没有待处理的文本，跳过引擎初始化");
            Ok(Vec::new())
        } else {
            self.process_speech(&ctx, items).await
        };
        ctx.release();

        Ok(finish(result?))
    }

    async fn load_chat_tasks(&self) -> AppResult<Vec<Task>> {
        info!("\n📁 正在加载任务...");
        let tasks = load_tasks(Path::new(&self.config.input_file)).await?;
        log_tasks_loaded(tasks.len(), &self.config.input_file);
        Ok(tasks)
    }

    async fn load_speech_items(&self) -> AppResult<Vec<SpeechItem>> {
        info!("\n📁 正在读取文本列表...");
        let items = load_speech_items(
            Path::new(&self.config.speech_input_file),
            &self.config.speech_id_column,
            &self.config.speech_text_column,
        )
        .await?;
        log_tasks_loaded(items.len(), &self.config.speech_input_file);
        Ok(items)
    }

    async fn process_chat<F>(
        &self,
        ctx: &ResourceContext<F>,
        tasks: Vec<Task>,
    ) -> AppResult<Vec<TaskOutcome>>
    where
        F: ResourceFactory,
        F::Resource: ChatEngine,
    {
        let engine = ctx.get().await?;
        let sink = TranscriptSink::new(&self.config.output_dir);
        let flow = ChatFlow::new(engine, &sink);
        Ok(process_tasks(&flow, tasks, self.config.task_timeout()).await)
    }

    async fn process_speech<F>(
        &self,
        ctx: &ResourceContext<F>,
        items: Vec<SpeechItem>,
    ) -> AppResult<Vec<TaskOutcome>>
    where
        F: ResourceFactory,
        F::Resource: SpeechEngine,
    {
        let engine = ctx.get().await?;
        let sink = AudioSink::new(&self.config.output_dir);
        let flow = SpeechFlow::new(engine, &sink);
        Ok(process_tasks(&flow, items, self.config.task_timeout()).await)
    }
}

fn finish(outcomes: Vec<TaskOutcome>) -> BatchSummary {
    let summary = BatchSummary::from_outcomes(outcomes);
    summary.log();
    summary
}
