use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
///
/// 加载顺序：默认值 → TOML 配置文件（可选）→ 环境变量 → 命令行参数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 对话任务输入文件（JSON）
    pub input_file: String,
    /// 语音合成输入文件（`;` 分隔的 CSV）
    pub speech_input_file: String,
    /// CSV 中ID列的列名
    pub speech_id_column: String,
    /// CSV 中文本列的列名
    pub speech_text_column: String,
    /// 输出目录
    pub output_dir: String,
    /// 单个任务超时（秒），0 表示不限制
    pub task_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 初始化时是否校验模型已部署
    pub verify_models: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub max_new_tokens: u32,
    // --- TTS 配置 ---
    pub tts_model_name: String,
    pub tts_voice: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: "input.json".to_string(),
            speech_input_file: "sinteza-govora-popis.csv".to_string(),
            speech_id_column: "id".to_string(),
            speech_text_column: "tekst".to_string(),
            output_dir: "outputs".to_string(),
            task_timeout_secs: 600,
            verbose_logging: false,
            verify_models: true,
            llm_api_key: String::new(),
            llm_api_base_url: "http://127.0.0.1:8000/v1".to_string(),
            llm_model_name: "deepseek-ai/DeepSeek-R1-Distill-Qwen-32B".to_string(),
            max_new_tokens: 1024,
            tts_model_name: "microsoft/speecht5_tts".to_string(),
            tts_voice: "default".to_string(),
        }
    }
}

impl Config {
    /// 从默认值加环境变量构建配置
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，未出现的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> Self {
        Self {
            input_file: std::env::var("INPUT_FILE").unwrap_or(self.input_file),
            speech_input_file: std::env::var("SPEECH_INPUT_FILE").unwrap_or(self.speech_input_file),
            speech_id_column: std::env::var("SPEECH_ID_COLUMN").unwrap_or(self.speech_id_column),
            speech_text_column: std::env::var("SPEECH_TEXT_COLUMN").unwrap_or(self.speech_text_column),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(self.output_dir),
            task_timeout_secs: std::env::var("TASK_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.task_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            verify_models: std::env::var("VERIFY_MODELS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verify_models),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            max_new_tokens: std::env::var("MAX_NEW_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_new_tokens),
            tts_model_name: std::env::var("TTS_MODEL_NAME").unwrap_or(self.tts_model_name),
            tts_voice: std::env::var("TTS_VOICE").unwrap_or(self.tts_voice),
        }
    }

    /// 单个任务超时时间，`None` 表示不限制
    pub fn task_timeout(&self) -> Option<std::time::Duration> {
        (self.task_timeout_secs > 0).then(|| std::time::Duration::from_secs(self.task_timeout_secs))
    }
}
