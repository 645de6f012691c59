//! On-disk layout of the local mirror.

mod error;
mod layout;

pub use error::PathError;
pub use layout::{CHECKPOINT_FILE, FAILURE_LOG_FILE, MirrorLayout, QUEUE_FILE};
