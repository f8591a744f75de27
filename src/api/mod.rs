//! REST plumbing shared by the feed, comment and payment modules.
//!
//! Every backend call goes through [`ApiClient`], which owns the base URL,
//! the redirect policy and the response size cap.

mod client;

pub use client::{ApiClient, ApiError};
