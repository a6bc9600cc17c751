pub mod csv_loader;
pub mod json_loader;

pub use csv_loader::load_speech_items;
pub use json_loader::load_tasks;
