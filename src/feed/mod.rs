//! Home feed: queue-backed pagination, materialization and likes.
//!
//! - [`types`] - feed records and the feed-type selector
//! - [`source`] - the backend endpoints the pager talks to
//! - [`processor`] - enrichment of raw batches into display-ready items
//! - [`likes`] - the per-user like overlay and its reconciliation fold
//! - [`pager`] - the pagination state machine

mod likes;
mod pager;
mod processor;
mod source;
mod types;

pub use likes::{reconcile_likes, LikeOverlay, LikeToggle};
pub use pager::{
    initialize, load_batch, Batch, BatchRequest, FeedPager, PagingState, QueueRequest, BATCH_LIMIT,
};
pub use processor::{DefaultProcessor, FeedProcessor};
pub use source::{FeedSource, HttpFeedSource};
pub use types::{FeedId, FeedItem, FeedType, Queue, RawFeed};

#[cfg(test)]
pub(crate) use source::MockFeedSource;
