pub mod chat_flow;
pub mod speech_flow;
pub mod task_handler;

pub use chat_flow::ChatFlow;
pub use speech_flow::SpeechFlow;
pub use task_handler::{BatchItem, TaskHandler};
