pub mod audio;
pub mod diagnostics;
pub mod result_sink;
pub mod stats_reporter;

pub use diagnostics::{diagnose, DiagnosticReport};
pub use result_sink::{AudioSink, TranscriptSink};
pub use stats_reporter::{report, TimingReport};
