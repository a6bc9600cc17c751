//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批次生命周期
//! - 加载任务（致命错误直接返回）
//! - 持有并释放 `ResourceContext`
//! - 输出全局统计信息
//!
//! ### `task_processor` - 任务循环
//! - 按顺序遍历任务
//! - 隔离单个任务的失败，记录耗时
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (Vec<Task> + 资源生命周期)
//!     ↓
//! task_processor (逐个 Task，计时 + 失败隔离)
//!     ↓
//! workflow::ChatFlow / SpeechFlow (单个 Task)
//!     ↓
//! services (能力层：写入 / 归一化 / 统计)
//!     ↓
//! infrastructure (基础设施：推理引擎)
//! ```

pub mod batch_processor;
pub mod task_processor;

// 重新导出主要类型
pub use batch_processor::{App, BatchMode};
pub use task_processor::{process_tasks, BatchSummary, TaskOutcome};
