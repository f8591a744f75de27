//! Utility functions for common operations.
//!
//! - **Time**: relative "5m ago" style timestamps for feeds and comments
//! - **Text**: Unicode-aware string width calculation and truncation

mod text;
mod time;

pub use text::{display_width, truncate_to_width};
pub use time::{relative_time, time_since};
