pub mod fixtures;
pub mod pipeline;
pub mod tracing;

pub use fixtures::{LogDir, access_line, lines};
pub use pipeline::{POLL, TestPipeline, eventually, eventually_async};
pub use tracing::{CapturedEvent, captured_events, init_test_tracing};
