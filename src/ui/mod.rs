//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch
//! - `helpers` - Background task spawning and panic capture
//! - `menu` - Navigation column
//! - `feeds` - Home feed list widget
//! - `inbox` - Notifications widget
//! - `mypage` - My-page tabs widget
//! - `comments` - Comment thread and composer widget
//! - `status` - Status bar widget

mod comments;
mod events;
mod feeds;
mod helpers;
mod inbox;
mod input;
mod loop_runner;
mod menu;
mod mypage;
mod render;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};
