//! 后端诊断 - 业务能力层
//!
//! 检查推理后端是否可达、部署了哪些模型、配置的模型是否在其中

use crate::config::Config;
use crate::infrastructure::{BackendClient, ModelInfo};
use tracing::{error, info, warn};

/// 诊断结果
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    pub api_base_url: String,
    /// 后端不可达时为 `Err(原因)`
    pub models: Result<Vec<ModelInfo>, String>,
    pub chat_model: String,
    pub tts_model: String,
}

impl DiagnosticReport {
    pub fn reachable(&self) -> bool {
        self.models.is_ok()
    }

    pub fn serves(&self, model: &str) -> bool {
        self.models
            .as_ref()
            .map(|models| models.iter().any(|m| m.id == model))
            .unwrap_or(false)
    }

    /// 输出诊断信息
    pub fn log(&self) {
        info!("{}", "=".repeat(60));
        info!("🩺 推理后端诊断");
        info!("后端地址: {}", self.api_base_url);
        match &self.models {
            Ok(models) => {
                info!("后端可达: 是");
                info!("已部署模型数: {}", models.len());
                for (i, model) in models.iter().enumerate() {
                    info!(
                        "模型 {}: {} (owner: {})",
                        i,
                        model.id,
                        model.owned_by.as_deref().unwrap_or("-")
                    );
                }
                self.log_model_status("对话模型", &self.chat_model);
                self.log_model_status("语音模型", &self.tts_model);
            }
            Err(reason) => {
                error!("后端可达: 否 ({})", reason);
                error!("请检查推理服务是否已启动，以及 LLM_API_BASE_URL 是否正确");
            }
        }
        info!("{}", "=".repeat(60));
    }

    fn log_model_status(&self, label: &str, model: &str) {
        if self.serves(model) {
            info!("✓ {} {} 已部署", label, model);
        } else {
            warn!("⚠️ {} {} 未部署", label, model);
        }
    }
}

/// 执行后端诊断
pub async fn diagnose(config: &Config) -> DiagnosticReport {
    let models = match BackendClient::new(&config.llm_api_base_url, &config.llm_api_key) {
        Ok(client) => client.list_models().await.map_err(|e| format!("{:#}", e)),
        Err(e) => Err(format!("{:#}", e)),
    };

    DiagnosticReport {
        api_base_url: config.llm_api_base_url.clone(),
        models,
        chat_model: config.llm_model_name.clone(),
        tts_model: config.tts_model_name.clone(),
    }
}
