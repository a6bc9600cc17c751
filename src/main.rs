use batch_task_runner::utils::logging;
use batch_task_runner::{App, BatchMode, Config};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// 批量推理任务运行器
#[derive(Parser)]
#[command(name = "batch_task_runner")]
#[command(about = "批量调用推理后端处理任务", long_about = None)]
struct Cli {
    /// TOML 配置文件
    #[arg(long, global = true, env = "RUNNER_CONFIG")]
    config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 对话生成：JSON 任务列表 → 对话记录
    Chat {
        /// 任务文件（JSON）
        #[arg(long, value_name = "FILE")]
        input: Option<String>,
        /// 输出目录
        #[arg(long, value_name = "DIR")]
        output_dir: Option<String>,
    },
    /// 语音合成：CSV 文本列表 → WAV
    Speech {
        /// 文本列表（`;` 分隔的 CSV）
        #[arg(long, value_name = "FILE")]
        input: Option<String>,
        /// 输出目录
        #[arg(long, value_name = "DIR")]
        output_dir: Option<String>,
    },
    /// 诊断推理后端
    Diagnose,
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let base = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };
    let mut config = base.with_env_overrides();
    config.verbose_logging |= cli.verbose;

    match &cli.command {
        Commands::Chat { input, output_dir } => {
            if let Some(input) = input {
                config.input_file = input.clone();
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir.clone();
            }
        }
        Commands::Speech { input, output_dir } => {
            if let Some(input) = input {
                config.speech_input_file = input.clone();
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir.clone();
            }
        }
        Commands::Diagnose => {}
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 加载配置
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            logging::init(cli.verbose);
            error!("❌ 启动失败: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    let mode = match cli.command {
        Commands::Chat { .. } => BatchMode::Chat,
        Commands::Speech { .. } => BatchMode::Speech,
        Commands::Diagnose => {
            let report = App::initialize(config).await.diagnose().await;
            return if report.reachable() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };

    // 初始化并运行应用，单个任务失败不影响退出码
    match App::initialize(config).await.run(mode).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ 批处理终止: {}", e);
            ExitCode::FAILURE
        }
    }
}
