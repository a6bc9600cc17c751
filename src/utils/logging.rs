/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info 级别。
/// 重复调用不会报错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `mode`: 运行模式名称
/// - `output_dir`: 输出目录
pub fn log_startup(mode: &str, output_dir: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {} 批处理模式", mode);
    info!(
        "🕒 启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📁 输出目录: {}", output_dir);
    info!("{}", "=".repeat(60));
}

/// 记录任务加载信息
pub fn log_tasks_loaded(total: usize, input_file: &str) {
    info!("✓ 从 {} 加载了 {} 个任务", input_file, total);
}

/// 记录单个任务开始
///
/// # 参数
/// - `position`: 当前任务序号（从1开始）
/// - `total`: 任务总数
/// - `task_id`: 任务ID
pub fn log_task_start(position: usize, total: usize, task_id: &str) {
    info!("\n{}", "─".repeat(60));
    info!("▶ 开始任务 {} ({}/{})", task_id, position, total);
}

/// 记录单个任务结束（无论成功失败）
pub fn log_task_complete(task_id: &str, duration_secs: f64) {
    info!("⏱ 任务 {} 结束，耗时 {:.2} 秒", task_id, duration_secs);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
