//! Recording domain types

mod duration;
mod entry;

pub use duration::{Duration, DEFAULT_MAX_DURATION_SECS};
pub use entry::{default_filename, Recording, RecordingDescriptor};
