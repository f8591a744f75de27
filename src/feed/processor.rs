use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::types::{FeedItem, RawFeed};
use crate::session::CurrentUser;

/// Turns a raw batch into display-ready feed items.
///
/// Called exactly once per batch, with the batch in server order.
#[async_trait]
pub trait FeedProcessor: Send + Sync {
    async fn process(&self, raw: Vec<RawFeed>, user: Option<&CurrentUser>) -> Vec<FeedItem>;
}

/// Maps the common payload fields (`content`, author name, `created_at`)
/// onto [`FeedItem`] and keeps the rest as opaque payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultProcessor;

const AUTHOR_KEYS: &[&str] = &["username", "user_name", "author", "user_id"];
const CREATED_KEYS: &[&str] = &["created_at", "createdAt"];

fn first_string(extra: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match extra.get(*k) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl DefaultProcessor {
    fn materialize(raw: RawFeed) -> FeedItem {
        let RawFeed { id, likes, extra } = raw;

        let author = first_string(&extra, AUTHOR_KEYS).or_else(|| {
            // nested `User: { username }` as the backend's ORM emits it
            extra
                .get("User")
                .or_else(|| extra.get("user"))
                .and_then(|u| u.get("username"))
                .and_then(Value::as_str)
                .map(str::to_owned)
        });
        let content = extra
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let created_at = first_string(&extra, CREATED_KEYS)
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let mut seen = Vec::with_capacity(likes.len());
        for like in likes {
            if !seen.contains(&like) {
                seen.push(like);
            }
        }

        FeedItem {
            id,
            likes: seen,
            author,
            content,
            created_at,
            payload: extra,
        }
    }
}

#[async_trait]
impl FeedProcessor for DefaultProcessor {
    async fn process(&self, raw: Vec<RawFeed>, _user: Option<&CurrentUser>) -> Vec<FeedItem> {
        raw.into_iter().map(Self::materialize).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawFeed {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_materializes_common_fields() {
        let items = DefaultProcessor
            .process(
                vec![raw(
                    r#"{"id":1,"likes":["a","a","b"],"content":"hello","created_at":"2026-01-02T03:04:05Z","User":{"username":"mina"}}"#,
                )],
                None,
            )
            .await;

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.id, 1);
        assert_eq!(item.likes, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(item.content, "hello");
        assert_eq!(item.author.as_deref(), Some("mina"));
        assert!(item.created_at.is_some());
        assert!(item.payload.contains_key("User"));
    }

    #[tokio::test]
    async fn test_keeps_batch_order() {
        let items = DefaultProcessor
            .process(
                vec![raw(r#"{"id":9}"#), raw(r#"{"id":3}"#), raw(r#"{"id":7}"#)],
                None,
            )
            .await;
        let ids: Vec<_> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![9, 3, 7]);
    }

    #[tokio::test]
    async fn test_bad_timestamp_is_dropped() {
        let items = DefaultProcessor
            .process(vec![raw(r#"{"id":1,"createdAt":"yesterday"}"#)], None)
            .await;
        assert!(items[0].created_at.is_none());
        assert_eq!(items[0].content, "");
    }
}
