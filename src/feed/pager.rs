//! Queue-backed pagination of the home feed.
//!
//! The backend ranks feeds once and hands back an ordered queue of ids. The
//! pager then materializes that queue from the front, [`BATCH_LIMIT`] ids at a
//! time. Network work is split into `begin_*` / `complete_*` pairs so the UI
//! can run requests as background tasks: every request carries the generation
//! it was issued under, and completions from an older generation (a feed-type
//! switch or a reset happened meanwhile) are dropped.

use std::collections::HashSet;

use super::likes::{reconcile_likes, LikeOverlay};
use super::processor::FeedProcessor;
use super::source::FeedSource;
use super::types::{FeedItem, FeedType, Queue};
use crate::session::CurrentUser;

/// Number of queue positions consumed per batch.
pub const BATCH_LIMIT: usize = 4;

/// Aggregate paging state exposed to the view layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PagingState {
    pub queue: Queue,
    pub feeds: Vec<FeedItem>,
    pub has_more: bool,
    pub is_loading: bool,
    pub feed_type: FeedType,
}

/// Request for a fresh queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRequest {
    pub generation: u64,
    pub feed_type: FeedType,
    pub user_id: Option<String>,
    pub follow_list: Option<Vec<String>>,
}

/// Request to materialize the front of the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub generation: u64,
    pub feed_type: FeedType,
    /// Snapshot of the whole queue; the server picks the front `limit` ids.
    pub queue: Queue,
    pub limit: usize,
    pub user_id: Option<String>,
    /// First batch after a (re)initialize replaces the feed list.
    pub replace: bool,
}

/// Outcome of one batch load.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub items: Vec<FeedItem>,
    pub has_more: bool,
    /// Queue positions to advance: `limit` on success, 0 otherwise.
    pub consumed: usize,
}

impl Batch {
    /// Empty batch that ends pagination.
    pub fn exhausted() -> Self {
        Self {
            items: Vec::new(),
            has_more: false,
            consumed: 0,
        }
    }
}

/// Fetch a fresh queue. Failures are logged and yield an empty queue.
pub async fn initialize<S>(source: &S, request: &QueueRequest) -> Queue
where
    S: FeedSource + ?Sized,
{
    match source.fetch_queue(request).await {
        Ok(queue) => {
            tracing::info!(
                feed_type = request.feed_type.name(),
                generation = request.generation,
                len = queue.len(),
                "Initial queue loaded"
            );
            queue
        }
        Err(e) => {
            tracing::error!(
                feed_type = request.feed_type.name(),
                error = %e,
                "Failed to initialize feed queue"
            );
            Vec::new()
        }
    }
}

/// Load and materialize one batch from the front of `request.queue`.
///
/// An empty queue short-circuits without touching the network. A short page
/// (fewer than `limit` items) ends pagination. Failures are logged and end
/// pagination without advancing the queue.
pub async fn load_batch<S, P>(
    source: &S,
    processor: &P,
    request: &BatchRequest,
    user: Option<&CurrentUser>,
) -> Batch
where
    S: FeedSource + ?Sized,
    P: FeedProcessor + ?Sized,
{
    if request.queue.is_empty() {
        tracing::debug!("Queue is empty, nothing to fetch");
        return Batch::exhausted();
    }

    tracing::debug!(
        feed_type = request.feed_type.name(),
        remaining = request.queue.len(),
        limit = request.limit,
        "Fetching feed batch"
    );

    match source.fetch_batch(request).await {
        Ok(raw) => {
            let items = processor.process(raw, user).await;
            let has_more = items.len() >= request.limit;
            Batch {
                items,
                has_more,
                consumed: request.limit,
            }
        }
        Err(e) => {
            tracing::error!(
                feed_type = request.feed_type.name(),
                error = %e,
                "Failed to fetch feed batch"
            );
            Batch::exhausted()
        }
    }
}

/// Home feed pagination state machine.
#[derive(Debug)]
pub struct FeedPager {
    state: PagingState,
    generation: u64,
}

impl FeedPager {
    pub fn new(feed_type: FeedType) -> Self {
        Self {
            state: PagingState {
                queue: Vec::new(),
                feeds: Vec::new(),
                has_more: true,
                is_loading: false,
                feed_type,
            },
            generation: 0,
        }
    }

    pub fn state(&self) -> &PagingState {
        &self.state
    }

    pub fn feeds(&self) -> &[FeedItem] {
        &self.state.feeds
    }

    pub fn queue(&self) -> &[i64] {
        &self.state.queue
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn feed_type(&self) -> FeedType {
        self.state.feed_type
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a fresh load: clears feeds and queue, bumps the generation so
    /// anything still in flight is ignored when it lands.
    pub fn begin_initialize(&mut self, user: Option<&CurrentUser>) -> QueueRequest {
        self.generation = self.generation.wrapping_add(1);
        self.state.feeds.clear();
        self.state.queue.clear();
        self.state.has_more = true;
        self.state.is_loading = true;

        QueueRequest {
            generation: self.generation,
            feed_type: self.state.feed_type,
            user_id: user.map(|u| u.user_id.clone()),
            follow_list: user.map(|u| u.follow.clone()),
        }
    }

    /// Install the queue returned for `generation`.
    ///
    /// Returns the request for the first batch, or `None` if the response is
    /// stale or the queue is empty (which ends pagination).
    pub fn complete_initialize(
        &mut self,
        generation: u64,
        queue: Queue,
        user: Option<&CurrentUser>,
    ) -> Option<BatchRequest> {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "Discarding stale queue"
            );
            return None;
        }

        self.state.queue = queue;
        if self.state.queue.is_empty() {
            // the next append settles `has_more` without a network call
            self.state.is_loading = false;
            return None;
        }

        Some(self.batch_request(user, true))
    }

    /// Start loading the next batch, unless a load is running, pagination has
    /// ended or the queue is drained.
    pub fn begin_append(&mut self, user: Option<&CurrentUser>) -> Option<BatchRequest> {
        if self.state.is_loading || !self.state.has_more {
            return None;
        }
        if self.state.queue.is_empty() {
            // same answer a batch load would give for an empty queue
            self.state.has_more = false;
            return None;
        }

        self.state.is_loading = true;
        Some(self.batch_request(user, false))
    }

    /// Apply a finished batch. Returns `false` if it was stale and ignored.
    pub fn complete_batch(&mut self, request: &BatchRequest, batch: Batch) -> bool {
        if request.generation != self.generation {
            tracing::debug!(
                stale = request.generation,
                current = self.generation,
                items = batch.items.len(),
                "Discarding stale batch"
            );
            return false;
        }

        self.state.is_loading = false;

        let advance = batch.consumed.min(self.state.queue.len());
        self.state.queue.drain(..advance);

        if request.replace {
            self.state.feeds.clear();
        }
        self.append_unique(batch.items);
        self.state.has_more = batch.has_more;
        true
    }

    /// Switch ranking source. Returns the queue request to run, or `None`
    /// when `feed_type` is already current.
    pub fn switch_feed_type(
        &mut self,
        feed_type: FeedType,
        user: Option<&CurrentUser>,
    ) -> Option<QueueRequest> {
        if feed_type == self.state.feed_type {
            return None;
        }
        tracing::info!(
            from = self.state.feed_type.name(),
            to = feed_type.name(),
            "Switching feed type"
        );
        self.state.feed_type = feed_type;
        Some(self.begin_initialize(user))
    }

    /// Fold the like overlay into the feed list for the current user.
    pub fn reconcile_likes(&mut self, overlay: &LikeOverlay, user_id: Option<&str>) {
        let Some(user_id) = user_id else {
            return;
        };
        self.state.feeds = reconcile_likes(&self.state.feeds, overlay, user_id);
    }

    /// Run initialize and the first batch to completion.
    pub async fn refresh<S, P>(&mut self, source: &S, processor: &P, user: Option<&CurrentUser>)
    where
        S: FeedSource + ?Sized,
        P: FeedProcessor + ?Sized,
    {
        let request = self.begin_initialize(user);
        let queue = initialize(source, &request).await;
        if let Some(batch_request) = self.complete_initialize(request.generation, queue, user) {
            let batch = load_batch(source, processor, &batch_request, user).await;
            self.complete_batch(&batch_request, batch);
        }
    }

    /// Run one append to completion. Returns `false` if it was a no-op.
    pub async fn append_batch<S, P>(
        &mut self,
        source: &S,
        processor: &P,
        user: Option<&CurrentUser>,
    ) -> bool
    where
        S: FeedSource + ?Sized,
        P: FeedProcessor + ?Sized,
    {
        let Some(request) = self.begin_append(user) else {
            return false;
        };
        let batch = load_batch(source, processor, &request, user).await;
        self.complete_batch(&request, batch)
    }

    /// Switch feed type and load its first batch. No-op for the current type.
    pub async fn change_feed_type<S, P>(
        &mut self,
        feed_type: FeedType,
        source: &S,
        processor: &P,
        user: Option<&CurrentUser>,
    ) where
        S: FeedSource + ?Sized,
        P: FeedProcessor + ?Sized,
    {
        if feed_type == self.state.feed_type {
            return;
        }
        self.state.feed_type = feed_type;
        self.refresh(source, processor, user).await;
    }

    fn batch_request(&self, user: Option<&CurrentUser>, replace: bool) -> BatchRequest {
        BatchRequest {
            generation: self.generation,
            feed_type: self.state.feed_type,
            queue: self.state.queue.clone(),
            limit: BATCH_LIMIT,
            user_id: user.map(|u| u.user_id.clone()),
            replace,
        }
    }

    fn append_unique(&mut self, items: Vec<FeedItem>) {
        let mut seen: HashSet<i64> = self.state.feeds.iter().map(|f| f.id).collect();
        let offered = items.len();
        let before = self.state.feeds.len();
        self.state
            .feeds
            .extend(items.into_iter().filter(|item| seen.insert(item.id)));
        let skipped = offered - (self.state.feeds.len() - before);
        if skipped > 0 {
            tracing::debug!(skipped, "Skipped already materialized feeds");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::feed::processor::DefaultProcessor;
    use crate::feed::source::MockFeedSource;
    use crate::feed::types::RawFeed;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    fn raw(id: i64) -> RawFeed {
        RawFeed {
            id,
            likes: Vec::new(),
            extra: Default::default(),
        }
    }

    fn ids(pager: &FeedPager) -> Vec<i64> {
        pager.feeds().iter().map(|f| f.id).collect()
    }

    /// Source that hands out `queue` and serves the front `limit` ids of
    /// whatever queue it is asked for.
    fn serving_source(queue: Queue) -> MockFeedSource {
        let mut source = MockFeedSource::new();
        source
            .expect_fetch_queue()
            .returning(move |_| Ok(queue.clone()));
        source.expect_fetch_batch().returning(|req| {
            Ok(req.queue.iter().take(req.limit).map(|id| raw(*id)).collect())
        });
        source
    }

    #[derive(Default)]
    struct RecordingProcessor {
        calls: Mutex<Vec<Vec<i64>>>,
    }

    #[async_trait]
    impl FeedProcessor for RecordingProcessor {
        async fn process(&self, raw: Vec<RawFeed>, user: Option<&CurrentUser>) -> Vec<FeedItem> {
            self.calls
                .lock()
                .unwrap()
                .push(raw.iter().map(|r| r.id).collect());
            DefaultProcessor.process(raw, user).await
        }
    }

    #[tokio::test]
    async fn test_refresh_loads_first_batch() {
        let source = serving_source((1..=10).collect());
        let mut pager = FeedPager::new(FeedType::All);

        pager.refresh(&source, &DefaultProcessor, None).await;

        assert_eq!(ids(&pager), vec![1, 2, 3, 4]);
        assert_eq!(pager.queue(), &[5, 6, 7, 8, 9, 10]);
        assert!(pager.has_more());
        assert!(!pager.is_loading());
    }

    #[tokio::test]
    async fn test_append_stops_after_short_page() {
        let mut source = MockFeedSource::new();
        source
            .expect_fetch_queue()
            .times(1)
            .returning(|_| Ok((1..=10).collect()));
        source.expect_fetch_batch().times(3).returning(|req| {
            Ok(req.queue.iter().take(req.limit).map(|id| raw(*id)).collect())
        });
        let mut pager = FeedPager::new(FeedType::All);

        pager.refresh(&source, &DefaultProcessor, None).await;
        assert!(pager.append_batch(&source, &DefaultProcessor, None).await);
        assert_eq!(ids(&pager), (1..=8).collect::<Vec<_>>());
        assert!(pager.has_more());

        assert!(pager.append_batch(&source, &DefaultProcessor, None).await);
        assert_eq!(ids(&pager), (1..=10).collect::<Vec<_>>());
        assert!(!pager.has_more());

        // no further network call
        assert!(!pager.append_batch(&source, &DefaultProcessor, None).await);
    }

    #[tokio::test]
    async fn test_empty_queue_never_fetches() {
        let mut source = MockFeedSource::new();
        source.expect_fetch_queue().returning(|_| Ok(Vec::new()));
        source.expect_fetch_batch().times(0);
        let mut pager = FeedPager::new(FeedType::All);

        pager.refresh(&source, &DefaultProcessor, None).await;
        assert!(pager.has_more());
        assert!(!pager.append_batch(&source, &DefaultProcessor, None).await);

        assert!(pager.feeds().is_empty());
        assert!(!pager.has_more());
        assert!(!pager.is_loading());
    }

    #[tokio::test]
    async fn test_failed_initialize_degrades_to_empty() {
        let mut source = MockFeedSource::new();
        source
            .expect_fetch_queue()
            .returning(|_| Err(ApiError::HttpStatus(502)));
        source.expect_fetch_batch().times(0);
        let mut pager = FeedPager::new(FeedType::All);

        pager.refresh(&source, &DefaultProcessor, None).await;

        assert!(pager.feeds().is_empty());
        assert!(!pager.is_loading());
        assert!(pager.has_more());

        // first append resolves pagination locally
        assert!(!pager.append_batch(&source, &DefaultProcessor, None).await);
        assert!(!pager.has_more());
    }

    #[test]
    fn test_empty_queue_keeps_has_more_until_append() {
        let mut pager = FeedPager::new(FeedType::All);
        let request = pager.begin_initialize(None);

        assert!(pager.complete_initialize(request.generation, Vec::new(), None).is_none());
        assert!(pager.has_more());
        assert!(!pager.is_loading());

        assert!(pager.begin_append(None).is_none());
        assert!(!pager.has_more());
    }

    #[tokio::test]
    async fn test_short_page_abandons_leftover_queue() {
        let mut source = MockFeedSource::new();
        source
            .expect_fetch_queue()
            .returning(|_| Ok((1..=10).collect()));
        // server filters the batch down to two items
        source
            .expect_fetch_batch()
            .times(1)
            .returning(|_| Ok(vec![raw(1), raw(3)]));
        let mut pager = FeedPager::new(FeedType::All);

        pager.refresh(&source, &DefaultProcessor, None).await;

        assert_eq!(ids(&pager), vec![1, 3]);
        assert!(!pager.has_more());
        // fixed-offset advance, not response length
        assert_eq!(pager.queue(), &[5, 6, 7, 8, 9, 10]);
        assert!(!pager.append_batch(&source, &DefaultProcessor, None).await);
    }

    #[tokio::test]
    async fn test_two_item_queue_ends_pagination() {
        let source = serving_source(vec![21, 22]);
        let mut pager = FeedPager::new(FeedType::All);

        pager.refresh(&source, &DefaultProcessor, None).await;

        assert_eq!(ids(&pager), vec![21, 22]);
        assert!(!pager.has_more());
    }

    #[tokio::test]
    async fn test_batch_failure_ends_pagination_without_advancing() {
        let mut source = MockFeedSource::new();
        source
            .expect_fetch_queue()
            .returning(|_| Ok((1..=12).collect()));
        let mut calls = 0;
        source.expect_fetch_batch().times(2).returning(move |req| {
            calls += 1;
            if calls == 1 {
                Ok(req.queue.iter().take(req.limit).map(|id| raw(*id)).collect())
            } else {
                Err(ApiError::HttpStatus(500))
            }
        });
        let mut pager = FeedPager::new(FeedType::All);

        pager.refresh(&source, &DefaultProcessor, None).await;
        assert!(pager.append_batch(&source, &DefaultProcessor, None).await);

        assert_eq!(ids(&pager), vec![1, 2, 3, 4]);
        assert_eq!(pager.queue(), &[5, 6, 7, 8, 9, 10, 11, 12]);
        assert!(!pager.has_more());
        assert!(!pager.is_loading());
        // no retry
        assert!(!pager.append_batch(&source, &DefaultProcessor, None).await);
    }

    #[tokio::test]
    async fn test_processor_called_once_per_batch_in_order() {
        let source = serving_source((1..=9).collect());
        let processor = RecordingProcessor::default();
        let mut pager = FeedPager::new(FeedType::All);

        pager.refresh(&source, &processor, None).await;
        while pager.append_batch(&source, &processor, None).await {}

        assert_eq!(
            *processor.calls.lock().unwrap(),
            vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9]]
        );
    }

    #[tokio::test]
    async fn test_duplicate_ids_materialized_once() {
        let mut source = MockFeedSource::new();
        source
            .expect_fetch_queue()
            .returning(|_| Ok((1..=12).collect()));
        let mut calls = 0;
        source.expect_fetch_batch().returning(move |_| {
            calls += 1;
            Ok(match calls {
                1 => vec![raw(1), raw(2), raw(3), raw(4)],
                _ => vec![raw(4), raw(5), raw(6), raw(7)],
            })
        });
        let mut pager = FeedPager::new(FeedType::All);

        pager.refresh(&source, &DefaultProcessor, None).await;
        pager.append_batch(&source, &DefaultProcessor, None).await;

        assert_eq!(ids(&pager), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_append_refused_while_loading() {
        let mut pager = FeedPager::new(FeedType::All);
        let init = pager.begin_initialize(None);
        let first = pager
            .complete_initialize(init.generation, (1..=10).collect(), None)
            .unwrap();
        pager.complete_batch(
            &first,
            Batch {
                items: (1..=4).map(FeedItem::new).collect(),
                has_more: true,
                consumed: BATCH_LIMIT,
            },
        );

        assert!(pager.begin_append(None).is_some());
        assert!(pager.is_loading());
        assert!(pager.begin_append(None).is_none());
    }

    #[tokio::test]
    async fn test_same_feed_type_is_noop() {
        let mut source = MockFeedSource::new();
        source.expect_fetch_queue().times(0);
        source.expect_fetch_batch().times(0);
        let mut pager = FeedPager::new(FeedType::Following);
        let generation = pager.generation();

        assert!(pager.switch_feed_type(FeedType::Following, None).is_none());
        pager
            .change_feed_type(FeedType::Following, &source, &DefaultProcessor, None)
            .await;

        assert_eq!(pager.generation(), generation);
        assert!(!pager.is_loading());
    }

    #[tokio::test]
    async fn test_switch_clears_state_before_new_data() {
        let source = serving_source((1..=10).collect());
        let mut pager = FeedPager::new(FeedType::All);
        pager.refresh(&source, &DefaultProcessor, None).await;
        assert_eq!(pager.feeds().len(), 4);

        let request = pager.switch_feed_type(FeedType::Following, None).unwrap();

        assert_eq!(request.feed_type, FeedType::Following);
        assert!(pager.feeds().is_empty());
        assert!(pager.queue().is_empty());
        assert!(pager.has_more());
        assert!(pager.is_loading());
    }

    #[test]
    fn test_stale_queue_discarded() {
        let mut pager = FeedPager::new(FeedType::All);
        let old = pager.begin_initialize(None);
        let new = pager.switch_feed_type(FeedType::Following, None).unwrap();

        assert!(pager
            .complete_initialize(old.generation, vec![1, 2, 3], None)
            .is_none());
        assert!(pager.queue().is_empty());
        assert!(pager.is_loading());

        let first = pager
            .complete_initialize(new.generation, vec![10, 11], None)
            .unwrap();
        assert_eq!(first.feed_type, FeedType::Following);
        assert_eq!(first.queue, vec![10, 11]);
        assert!(first.replace);
    }

    #[test]
    fn test_late_batch_from_old_feed_type_not_appended() {
        let mut pager = FeedPager::new(FeedType::All);
        let init = pager.begin_initialize(None);
        let old_batch = pager
            .complete_initialize(init.generation, (1..=8).collect(), None)
            .unwrap();

        let new_init = pager.switch_feed_type(FeedType::Following, None).unwrap();
        let applied = pager.complete_batch(
            &old_batch,
            Batch {
                items: (1..=4).map(FeedItem::new).collect(),
                has_more: true,
                consumed: BATCH_LIMIT,
            },
        );

        assert!(!applied);
        assert!(pager.feeds().is_empty());
        assert!(pager.is_loading());

        let new_batch = pager
            .complete_initialize(new_init.generation, vec![50, 51], None)
            .unwrap();
        assert!(pager.complete_batch(
            &new_batch,
            Batch {
                items: vec![FeedItem::new(50), FeedItem::new(51)],
                has_more: false,
                consumed: BATCH_LIMIT,
            },
        ));
        assert_eq!(ids(&pager), vec![50, 51]);
    }

    #[test]
    fn test_requests_carry_user_and_follow_list() {
        let mut user = CurrentUser::new("u1");
        user.follow = vec!["u2".into()];
        let mut pager = FeedPager::new(FeedType::All);

        let request = pager
            .switch_feed_type(FeedType::Following, Some(&user))
            .unwrap();
        assert_eq!(request.user_id.as_deref(), Some("u1"));
        assert_eq!(request.follow_list, Some(vec!["u2".to_string()]));

        let batch = pager
            .complete_initialize(request.generation, vec![1], Some(&user))
            .unwrap();
        assert_eq!(batch.user_id.as_deref(), Some("u1"));
        assert_eq!(batch.limit, BATCH_LIMIT);
    }

    #[tokio::test]
    async fn test_reconcile_likes_leaves_queue_alone() {
        let source = serving_source((1..=6).collect());
        let mut pager = FeedPager::new(FeedType::All);
        pager.refresh(&source, &DefaultProcessor, None).await;
        let queue_before = pager.queue().to_vec();

        let mut overlay = LikeOverlay::new();
        overlay.set(1, true);
        pager.reconcile_likes(&overlay, Some("u1"));
        pager.reconcile_likes(&overlay, Some("u1"));

        assert_eq!(pager.feeds()[0].likes, vec!["u1".to_string()]);
        assert!(pager.feeds()[1].likes.is_empty());
        assert_eq!(pager.queue(), queue_before.as_slice());

        // logged out: nothing to merge
        overlay.set(2, true);
        pager.reconcile_likes(&overlay, None);
        assert!(pager.feeds()[1].likes.is_empty());
    }

    proptest! {
        #[test]
        fn prop_queue_consumed_in_disjoint_chunks(len in 0usize..40) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let queue: Queue = (1..=len as i64).collect();
            let fronts = Arc::new(Mutex::new(Vec::new()));

            let mut source = MockFeedSource::new();
            let initial = queue.clone();
            source.expect_fetch_queue().returning(move |_| Ok(initial.clone()));
            let recorded = Arc::clone(&fronts);
            source.expect_fetch_batch().returning(move |req| {
                let front: Vec<i64> = req.queue.iter().take(req.limit).copied().collect();
                recorded.lock().unwrap().push(front.clone());
                Ok(front.into_iter().map(raw).collect())
            });

            let mut pager = FeedPager::new(FeedType::All);
            runtime.block_on(async {
                pager.refresh(&source, &DefaultProcessor, None).await;
                while pager.append_batch(&source, &DefaultProcessor, None).await {}
            });

            let fronts = fronts.lock().unwrap();
            let expected: Vec<Vec<i64>> = queue.chunks(BATCH_LIMIT).map(|c| c.to_vec()).collect();
            prop_assert_eq!(fronts.len(), len.div_ceil(BATCH_LIMIT));
            prop_assert_eq!(&*fronts, &expected);
            prop_assert_eq!(ids(&pager), queue);
            prop_assert!(!pager.has_more());
        }
    }
}
