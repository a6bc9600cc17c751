pub mod loaders;
pub mod speech;
pub mod task;

pub use loaders::{load_speech_items, load_tasks};
pub use speech::SpeechItem;
pub use task::{Message, Role, Task, TaskTiming};
