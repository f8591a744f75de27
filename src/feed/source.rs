use async_trait::async_trait;
use serde::Serialize;

use super::pager::{BatchRequest, QueueRequest};
use super::types::{FeedId, FeedType, Queue, RawFeed};
use crate::api::{ApiClient, ApiError};

/// Backend endpoints behind the home feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Ask the backend for a fresh ranking of feed identifiers.
    async fn fetch_queue(&self, request: &QueueRequest) -> Result<Queue, ApiError>;

    /// Materialize the front of `request.queue` into raw feed payloads.
    async fn fetch_batch(&self, request: &BatchRequest) -> Result<Vec<RawFeed>, ApiError>;

    /// Persist a like/unlike by `user_id`.
    async fn set_like(&self, feed_id: FeedId, user_id: &str, liked: bool) -> Result<(), ApiError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueueBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_follow_list: Option<&'a [String]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchBody<'a> {
    queue: &'a [FeedId],
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LikeBody<'a> {
    feed_id: FeedId,
    user_id: &'a str,
    liked: bool,
}

/// [`FeedSource`] over the platform's `/homefeed` REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    api: ApiClient,
}

impl HttpFeedSource {
    const QUEUE_PATH: &'static str = "homefeed/getFeedsQueue";
    const LIKE_PATH: &'static str = "homefeed/like";

    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn batch_path(feed_type: FeedType) -> &'static str {
        match feed_type {
            FeedType::All => "homefeed/getfeeds",
            FeedType::Following => "homefeed/getfollowingfeeds",
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_queue(&self, request: &QueueRequest) -> Result<Queue, ApiError> {
        let body = QueueBody {
            user_id: request.user_id.as_deref(),
            user_follow_list: request.follow_list.as_deref(),
        };
        self.api.post_json(Self::QUEUE_PATH, &body).await
    }

    async fn fetch_batch(&self, request: &BatchRequest) -> Result<Vec<RawFeed>, ApiError> {
        let body = BatchBody {
            queue: &request.queue,
            limit: request.limit,
            user_id: request.user_id.as_deref(),
        };
        self.api
            .post_json(Self::batch_path(request.feed_type), &body)
            .await
    }

    async fn set_like(&self, feed_id: FeedId, user_id: &str, liked: bool) -> Result<(), ApiError> {
        let body = LikeBody {
            feed_id,
            user_id,
            liked,
        };
        self.api.post_unit(Self::LIKE_PATH, &body).await
    }
}
