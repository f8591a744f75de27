use std::collections::HashMap;

use super::types::{FeedId, FeedItem};

/// One optimistic like click, kept so it can be rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    pub feed_id: FeedId,
    /// State after the click.
    pub liked: bool,
}

/// Per-feed like state of the current user, maintained beside the feed list
/// and folded into it with [`reconcile_likes`].
#[derive(Debug, Default, Clone)]
pub struct LikeOverlay {
    status: HashMap<FeedId, bool>,
}

impl LikeOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, feed_id: FeedId) -> Option<bool> {
        self.status.get(&feed_id).copied()
    }

    pub fn len(&self) -> usize {
        self.status.len()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }

    pub fn set(&mut self, feed_id: FeedId, liked: bool) {
        self.status.insert(feed_id, liked);
    }

    /// Effective like state: the overlay wins, otherwise membership in `likes`.
    pub fn is_liked(&self, feed: &FeedItem, user_id: &str) -> bool {
        self.get(feed.id)
            .unwrap_or_else(|| feed.is_liked_by(user_id))
    }

    /// Flip the like state of `feed` for `user_id` and record it.
    pub fn handle_like_click(&mut self, feed: &FeedItem, user_id: &str) -> LikeToggle {
        let liked = !self.is_liked(feed, user_id);
        self.status.insert(feed.id, liked);
        tracing::debug!(feed_id = feed.id, liked, "Like toggled");
        LikeToggle {
            feed_id: feed.id,
            liked,
        }
    }

    /// Undo a toggle whose backend call failed.
    pub fn rollback(&mut self, toggle: LikeToggle) {
        self.status.insert(toggle.feed_id, !toggle.liked);
        tracing::debug!(feed_id = toggle.feed_id, "Like toggle rolled back");
    }

    pub fn clear(&mut self) {
        self.status.clear();
    }
}

/// Fold `overlay` into `feeds` for `user_id`.
///
/// Feeds present in the overlay get `user_id` added to (liked) or removed
/// from (not liked) their `likes`; other feeds are returned as they are.
/// Re-applying the same overlay yields the same list.
pub fn reconcile_likes(feeds: &[FeedItem], overlay: &LikeOverlay, user_id: &str) -> Vec<FeedItem> {
    feeds
        .iter()
        .map(|feed| match overlay.get(feed.id) {
            Some(true) if !feed.is_liked_by(user_id) => {
                let mut likes = feed.likes.clone();
                likes.push(user_id.to_owned());
                FeedItem {
                    likes,
                    ..feed.clone()
                }
            }
            Some(false) if feed.is_liked_by(user_id) => FeedItem {
                likes: feed
                    .likes
                    .iter()
                    .filter(|l| *l != user_id)
                    .cloned()
                    .collect(),
                ..feed.clone()
            },
            _ => feed.clone(),
        })
        .collect()
}
