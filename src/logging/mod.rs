//! Logging infrastructure: entries, sinks, the capture buffer, the logger
//! and the current-logger context.

mod buffer;
pub mod context;
mod entry;
mod logger;
mod sink;
mod subscriber;
pub mod value;

pub use buffer::CaptureBuffer;
pub use context::{LoggerGuard, current_buffer, current_logger, set_default, with_logger};
pub use entry::{Attributes, LogEntry, Severity};
pub use logger::Logger;
pub use sink::{Sink, TracingSink};
pub use subscriber::{CaptureLayer, init_subscriber};
pub(crate) use subscriber::INTERNAL_TARGET;
