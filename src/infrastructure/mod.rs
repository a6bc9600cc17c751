pub mod backend_client;
pub mod chat_engine;
pub mod lazy_resource;
pub mod speech_engine;

pub use backend_client::{BackendClient, ModelInfo};
pub use chat_engine::{ChatEngine, ChatEngineFactory, OpenAiChatEngine};
pub use lazy_resource::{ResourceContext, ResourceFactory};
pub use speech_engine::{HttpSpeechEngine, SpeechEngine, SpeechEngineFactory};
