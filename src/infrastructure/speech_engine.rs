//! 语音合成引擎 - 基础设施层

use anyhow::Result;
use std::future::Future;
use tracing::debug;

use crate::config::Config;
use crate::error::ResourceInitError;
use crate::infrastructure::backend_client::BackendClient;
use crate::infrastructure::lazy_resource::ResourceFactory;

const WARMUP_TEXT: &str = "dummy text for initialization";

/// 语音合成能力：文本进，WAV 字节出
pub trait SpeechEngine {
    fn synthesize(&self, text: &str) -> impl Future<Output = Result<Vec<u8>>>;
}

/// 基于 OpenAI 兼容 `/audio/speech` 接口的语音合成引擎
///
/// 模型和音色在初始化后固定不变
pub struct HttpSpeechEngine {
    backend: BackendClient,
    model_name: String,
    voice: String,
}

impl SpeechEngine for HttpSpeechEngine {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        self.backend
            .synthesize(&self.model_name, &self.voice, text)
            .await
    }
}

/// 语音合成引擎工厂
///
/// 初始化步骤：
/// 1. `http_client` - 创建后端客户端
/// 2. `tts_model` - 确认模型已部署
/// 3. `voice` - 用固定文本预热一次，确认音色可用，结果丢弃
pub struct SpeechEngineFactory {
    config: Config,
}

impl SpeechEngineFactory {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl ResourceFactory for SpeechEngineFactory {
    type Resource = HttpSpeechEngine;

    fn name(&self) -> &str {
        "speech-engine"
    }

    async fn build(&self) -> Result<HttpSpeechEngine, ResourceInitError> {
        let backend = BackendClient::new(&self.config.llm_api_base_url, &self.config.llm_api_key)
            .map_err(|e| ResourceInitError::new("http_client", e))?;

        if self.config.verify_models {
            backend
                .ensure_model(&self.config.tts_model_name)
                .await
                .map_err(|e| ResourceInitError::new("tts_model", e))?;
        }

        let engine = HttpSpeechEngine {
            backend,
            model_name: self.config.tts_model_name.clone(),
            voice: self.config.tts_voice.clone(),
        };

        debug!("预热语音模型，音色: {}", engine.voice);
        engine
            .synthesize(WARMUP_TEXT)
            .await
            .map_err(|e| ResourceInitError::new("voice", e))?;

        Ok(engine)
    }
}
