//! 对话推理引擎 - 基础设施层
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 调用 chat completions
//! - 兼容 OpenAI API 的推理服务（vLLM、TGI、Ollama 等）

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::future::Future;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ResourceInitError;
use crate::infrastructure::backend_client::BackendClient;
use crate::infrastructure::lazy_resource::ResourceFactory;
use crate::models::task::{Message, Role};

/// 对话引擎能力
///
/// 输入完整对话，返回助手的回复内容
pub trait ChatEngine {
    fn complete(&self, messages: &[Message]) -> impl Future<Output = Result<String>>;
}

/// 基于 OpenAI 兼容接口的对话引擎
pub struct OpenAiChatEngine {
    client: Client<OpenAIConfig>,
    model_name: String,
    max_new_tokens: u32,
}

impl OpenAiChatEngine {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            max_new_tokens: config.max_new_tokens,
        }
    }
}

impl ChatEngine for OpenAiChatEngine {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        debug!(
            "调用 LLM API，模型: {}，消息数: {}",
            self.model_name,
            messages.len()
        );

        let request_messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(request_messages)
            .max_tokens(self.max_new_tokens)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("LLM 返回内容为空"))?;

        Ok(content)
    }
}

fn to_request_message(message: &Message) -> Result<ChatCompletionRequestMessage> {
    let content = message.content.as_str();
    let request_message = match message.role {
        Role::System => ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(content)
                .build()?,
        ),
        Role::User => ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()?,
        ),
        Role::Assistant => ChatCompletionRequestMessage::Assistant(
            ChatCompletionRequestAssistantMessageArgs::default()
                .content(content)
                .build()?,
        ),
    };
    Ok(request_message)
}

/// 对话引擎工厂
///
/// 初始化步骤：
/// 1. `http_client` - 创建后端客户端
/// 2. `chat_model` - 确认模型已在后端部署（可通过 `verify_models` 关闭）
pub struct ChatEngineFactory {
    config: Config,
}

impl ChatEngineFactory {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl ResourceFactory for ChatEngineFactory {
    type Resource = OpenAiChatEngine;

    fn name(&self) -> &str {
        "chat-engine"
    }

    async fn build(&self) -> Result<OpenAiChatEngine, ResourceInitError> {
        let backend = BackendClient::new(&self.config.llm_api_base_url, &self.config.llm_api_key)
            .map_err(|e| ResourceInitError::new("http_client", e))?;

        if self.config.verify_models {
            debug!("校验模型: {}", self.config.llm_model_name);
            backend
                .ensure_model(&self.config.llm_model_name)
                .await
                .map_err(|e| ResourceInitError::new("chat_model", e))?;
        }

        Ok(OpenAiChatEngine::new(&self.config))
    }
}
