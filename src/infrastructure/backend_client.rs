//! 推理后端 HTTP 客户端 - 基础设施层
//!
//! 封装 `async-openai` 不覆盖的两个接口：模型列表和语音合成

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// 后端返回的模型信息
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub owned_by: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

/// 推理后端客户端
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    api_base_url: String,
    api_key: String,
}

impl BackendClient {
    /// 创建新的后端客户端
    pub fn new(api_base_url: &str, api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("无法创建 HTTP 客户端")?;

        Ok(Self {
            http,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.api_base_url, path);
        let builder = self.http.request(method, url);
        if self.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.api_key)
        }
    }

    /// 列出后端已部署的模型
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        debug!("请求模型列表: {}/models", self.api_base_url);

        let response = self
            .request(reqwest::Method::GET, "/models")
            .send()
            .await
            .with_context(|| format!("无法连接推理后端: {}", self.api_base_url))?
            .error_for_status()
            .context("模型列表请求返回错误状态")?;

        let list: ModelList = response.json().await.context("无法解析模型列表")?;
        Ok(list.data)
    }

    /// 检查模型是否已部署
    pub async fn ensure_model(&self, model: &str) -> Result<()> {
        let models = self.list_models().await?;
        if models.iter().any(|m| m.id == model) {
            Ok(())
        } else {
            anyhow::bail!("后端未部署模型 '{}' (共 {} 个可用模型)", model, models.len())
        }
    }

    /// 合成语音，返回 WAV 字节
    pub async fn synthesize(&self, model: &str, voice: &str, text: &str) -> Result<Vec<u8>> {
        debug!("请求语音合成，模型: {}，文本长度: {} 字符", model, text.chars().count());

        let body = SpeechRequest {
            model,
            input: text,
            voice,
            response_format: "wav",
        };

        let response = self
            .request(reqwest::Method::POST, "/audio/speech")
            .json(&body)
            .send()
            .await
            .context("语音合成请求失败")?
            .error_for_status()
            .context("语音合成返回错误状态")?;

        let bytes = response.bytes().await.context("无法读取语音数据")?;
        if bytes.is_empty() {
            anyhow::bail!("语音合成返回空数据");
        }
        Ok(bytes.to_vec())
    }
}
