//! # Batch Task Runner
//!
//! 调用推理后端批量处理任务的 Rust 应用程序：
//! - 对话生成：JSON 任务列表 → LLM → 对话记录文件
//! - 语音合成：CSV 文本列表 → TTS → 归一化的 WAV 文件
//! - 后端诊断：检查后端可达性和已部署模型
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（推理引擎），只暴露能力
//! - `ResourceContext` - 延迟初始化、只初始化一次的资源上下文
//! - `OpenAiChatEngine` / `HttpSpeechEngine` - 推理引擎
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个任务
//! - `TranscriptSink` / `AudioSink` - 写入结果能力
//! - `TimingReport` - 耗时统计能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个任务"的完整处理流程
//! - `ChatFlow` - 调用引擎 → 追加回复 → 写入
//! - `SpeechFlow` - 合成 → 归一化 → 写入
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批次生命周期和资源管理
//! - `orchestrator/task_processor` - 顺序处理、失败隔离、计时
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{ResourceContext, ResourceFactory};
pub use models::{Message, Role, SpeechItem, Task, TaskTiming};
pub use orchestrator::{process_tasks, App, BatchMode, BatchSummary, TaskOutcome};
pub use services::{report, TimingReport};
pub use workflow::{BatchItem, TaskHandler};
