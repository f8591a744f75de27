//! Terminal client for an influencer platform's home feed.
//!
//! The library holds everything that does not need a terminal: the feed
//! pager and its backend, the session, likes, comments, payments and the
//! navigation model. The `homefeed` binary wires these into a ratatui UI.

pub mod api;
pub mod app;
pub mod comments;
pub mod config;
pub mod feed;
pub mod nav;
pub mod notifications;
pub mod payment;
pub mod session;
pub mod ui;
pub mod util;
