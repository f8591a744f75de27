use crate::comments::{
    comments_from_payload, Comment, CommentAction, CommentBackend, CommentError, CommentThread,
};
use crate::config::Config;
use crate::feed::{
    Batch, BatchRequest, DefaultProcessor, FeedId, FeedItem, FeedPager, FeedProcessor,
    FeedSource, FeedType, LikeOverlay, LikeToggle, Queue, QueueRequest,
};
use crate::nav::{self, MenuItem, MyPageTab, NOTIFICATIONS_PATH};
use crate::notifications::{Inbox, Notification, Severity, Toast};
use crate::session::{CurrentUser, Session, SessionError};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// View and Events
// ============================================================================

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,          // Paginated feed list
    Notifications, // Notification inbox
    MyPage,        // Personal tabs, opened on the web app
    Comments,      // Comment thread of one feed
}

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// Queue fetched for the pager generation it was requested under.
    QueueLoaded { generation: u64, queue: Queue },
    /// A batch finished; the request carries its generation.
    BatchLoaded { request: BatchRequest, batch: Batch },
    LikeSaved { feed_id: FeedId },
    LikeFailed { toggle: LikeToggle, error: String },
    NotificationReceived(Notification),
    /// A comment change finished; `thread` is the thread after it settled.
    CommentsSettled {
        feed_id: FeedId,
        thread: CommentThread,
        error: Option<String>,
    },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked (e.g., "queue_load", "like_save")
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

/// Rows from the end of the list at which the next batch is requested.
pub const LOAD_MORE_THRESHOLD: usize = 1;

/// What the comment composer will do with its draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compose {
    Comment,
    Reply { parent: i64 },
    Edit { id: i64 },
}

/// Comment thread of the feed the user opened, plus its composer.
#[derive(Debug)]
pub struct CommentPane {
    pub feed_id: FeedId,
    pub thread: CommentThread,
    pub selected: usize,
    pub compose: Option<Compose>,
    pub draft: String,
    /// A backend call is running on a copy of `thread`.
    pub busy: bool,
}

impl CommentPane {
    fn new(feed_id: FeedId, thread: CommentThread) -> Self {
        Self {
            feed_id,
            thread,
            selected: 0,
            compose: None,
            draft: String::new(),
            busy: false,
        }
    }

    pub fn selected_comment(&self) -> Option<&Comment> {
        self.thread.rows().get(self.selected).copied()
    }

    fn clamp_selection(&mut self) {
        let max = self.thread.rows().len().saturating_sub(1);
        self.selected = self.selected.min(max);
    }
}

/// A comment change to run off the UI thread.
pub struct CommentJob {
    pub feed_id: FeedId,
    pub thread: CommentThread,
    pub action: CommentAction,
    pub user_id: String,
    pub backend: Arc<dyn CommentBackend>,
}

impl CommentJob {
    pub async fn run(self) -> AppEvent {
        let CommentJob {
            feed_id,
            mut thread,
            action,
            user_id,
            backend,
        } = self;
        let error = thread
            .apply(backend.as_ref(), &user_id, action)
            .await
            .err()
            .map(|e| e.to_string());
        AppEvent::CommentsSettled {
            feed_id,
            thread,
            error,
        }
    }
}

pub struct App {
    pub config: Config,
    pub session: Session,

    // Feed
    pub pager: FeedPager,
    pub likes: LikeOverlay,
    pub source: Arc<dyn FeedSource>,
    pub processor: Arc<dyn FeedProcessor>,

    // Comments
    pub comment_backend: Option<Arc<dyn CommentBackend>>,
    pub comments: Option<CommentPane>,

    // Notifications
    pub inbox: Inbox,
    pub toast: Option<Toast>,

    // UI State
    pub view: View,
    pub selected_feed: usize,
    pub selected_notification: usize,
    pub selected_tab: usize,

    /// Only render when state has changed
    pub needs_redraw: bool,

    /// Session revision the pager was last loaded for.
    seen_session_revision: u64,
}

impl App {
    pub fn new(config: Config, session: Session, source: Arc<dyn FeedSource>) -> Self {
        Self::with_processor(config, session, source, Arc::new(DefaultProcessor))
    }

    pub fn with_comment_backend(mut self, backend: Arc<dyn CommentBackend>) -> Self {
        self.comment_backend = Some(backend);
        self
    }

    pub fn with_processor(
        config: Config,
        session: Session,
        source: Arc<dyn FeedSource>,
        processor: Arc<dyn FeedProcessor>,
    ) -> Self {
        let mut feed_type = config.default_feed_type;
        if feed_type == FeedType::Following && !session.is_logged_in() {
            feed_type = FeedType::All;
        }
        let seen_session_revision = session.revision();
        Self {
            config,
            session,
            pager: FeedPager::new(feed_type),
            likes: LikeOverlay::new(),
            source,
            processor,
            comment_backend: None,
            comments: None,
            inbox: Inbox::new(),
            toast: None,
            view: View::Home,
            selected_feed: 0,
            selected_notification: 0,
            selected_tab: 0,
            needs_redraw: true,
            seen_session_revision,
        }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.session.user()
    }

    pub fn selected_item(&self) -> Option<&FeedItem> {
        self.pager.feeds().get(self.selected_feed)
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    /// Show a transient message in the status bar.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.toast = Some(Toast::new(msg, Severity::Custom));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.toast = Some(Toast::new(msg, Severity::Error));
    }

    /// Clear the status message once it has been shown long enough.
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        let ttl = Duration::from_secs(self.config.notification_display_secs);
        if self.toast.as_ref().is_some_and(|t| t.is_expired(ttl)) {
            self.toast = None;
            return true;
        }
        false
    }

    // ------------------------------------------------------------------------
    // Feed paging
    // ------------------------------------------------------------------------

    /// Start a full reload of the current feed type.
    pub fn request_refresh(&mut self) -> QueueRequest {
        self.selected_feed = 0;
        let user = self.session.user();
        self.pager.begin_initialize(user)
    }

    /// Start loading the next batch if the pager allows it.
    pub fn request_append(&mut self) -> Option<BatchRequest> {
        let user = self.session.user();
        self.pager.begin_append(user)
    }

    /// Whether the selection is close enough to the end to fetch more.
    pub fn wants_more(&self) -> bool {
        let len = self.pager.feeds().len();
        len == 0 || self.selected_feed + LOAD_MORE_THRESHOLD >= len.saturating_sub(1)
    }

    /// Install a queue; returns the first batch to load if it is current.
    pub fn apply_queue(&mut self, generation: u64, queue: Queue) -> Option<BatchRequest> {
        let user = self.session.user();
        self.pager.complete_initialize(generation, queue, user)
    }

    /// Install a batch and fold the like overlay back in.
    pub fn apply_batch(&mut self, request: &BatchRequest, batch: Batch) -> bool {
        if !self.pager.complete_batch(request, batch) {
            return false;
        }
        self.pager
            .reconcile_likes(&self.likes, self.session.user_id());
        self.clamp_selection();
        true
    }

    /// Flip between all feeds and following. Following needs a login.
    pub fn toggle_feed_type(&mut self) -> Option<QueueRequest> {
        let target = self.pager.feed_type().toggled();
        if target == FeedType::Following && !self.session.is_logged_in() {
            self.set_status("Log in to see posts from people you follow");
            return None;
        }
        self.selected_feed = 0;
        let user = self.session.user();
        let request = self.pager.switch_feed_type(target, user)?;
        self.set_status(format!("Showing: {}", target.label()));
        Some(request)
    }

    /// Reload the pager if the session changed since the last load.
    ///
    /// Logging out while on the following feed falls back to all feeds.
    pub fn sync_session(&mut self) -> Option<QueueRequest> {
        let revision = self.session.revision();
        if revision == self.seen_session_revision {
            return None;
        }
        self.seen_session_revision = revision;
        self.likes.clear();
        tracing::info!(
            revision,
            logged_in = self.session.is_logged_in(),
            "Session changed, reloading feed"
        );

        if !self.session.is_logged_in() && self.pager.feed_type() == FeedType::Following {
            self.selected_feed = 0;
            let user = self.session.user();
            return self.pager.switch_feed_type(FeedType::All, user);
        }
        Some(self.request_refresh())
    }

    /// Clear the session and reload the feed as a guest.
    pub fn logout(&mut self) -> Result<Option<QueueRequest>, SessionError> {
        self.session.set_user(None)?;
        self.show_view(View::Home);
        self.selected_tab = 0;
        self.set_status("Logged out");
        Ok(self.sync_session())
    }

    // ------------------------------------------------------------------------
    // Likes
    // ------------------------------------------------------------------------

    /// Optimistically toggle the like on the selected feed.
    ///
    /// Returns the toggle and the user id to persist it with.
    pub fn like_selected(&mut self) -> Option<(LikeToggle, String)> {
        let Some(user_id) = self.session.user_id().map(str::to_owned) else {
            self.set_status("Log in to like posts");
            return None;
        };
        let feed = self.pager.feeds().get(self.selected_feed)?;
        let toggle = self.likes.handle_like_click(feed, &user_id);
        self.pager.reconcile_likes(&self.likes, Some(&user_id));
        Some((toggle, user_id))
    }

    /// Undo an optimistic like after the backend refused it.
    pub fn like_failed(&mut self, toggle: LikeToggle, error: &str) {
        tracing::warn!(feed_id = toggle.feed_id, error, "Like failed, rolling back");
        self.likes.rollback(toggle);
        let user_id = self.session.user_id().map(str::to_owned);
        self.pager.reconcile_likes(&self.likes, user_id.as_deref());
        self.set_error("Failed to save like - reverted");
    }

    // ------------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------------

    /// Open the comment thread of the selected feed.
    pub fn open_comments(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let feed_id = item.id;
        let thread = CommentThread::new(
            Some(feed_id.to_string()),
            comments_from_payload(&item.payload),
        );
        self.comments = Some(CommentPane::new(feed_id, thread));
        self.show_view(View::Comments);
    }

    pub fn compose_comment(&mut self) {
        self.begin_compose(Compose::Comment, String::new());
    }

    /// Reply to the selected row; replies to a reply go to its parent.
    pub fn compose_reply(&mut self) {
        let Some(parent) = self
            .comments
            .as_ref()
            .and_then(CommentPane::selected_comment)
            .map(|c| c.parent_comment_id.unwrap_or(c.id))
        else {
            return;
        };
        self.begin_compose(Compose::Reply { parent }, String::new());
    }

    /// Edit the selected row, starting from its current text.
    pub fn compose_edit(&mut self) {
        let Some((id, text)) = self.owned_selected_comment() else {
            return;
        };
        self.begin_compose(Compose::Edit { id }, text);
    }

    pub fn compose_push(&mut self, c: char) {
        if let Some(pane) = self.comments.as_mut().filter(|p| p.compose.is_some()) {
            pane.draft.push(c);
        }
    }

    pub fn compose_pop(&mut self) {
        if let Some(pane) = self.comments.as_mut() {
            pane.draft.pop();
        }
    }

    pub fn cancel_compose(&mut self) {
        if let Some(pane) = self.comments.as_mut() {
            pane.compose = None;
            pane.draft.clear();
        }
    }

    /// Turn the draft into a backend job. Blank drafts stay open.
    pub fn submit_compose(&mut self) -> Option<CommentJob> {
        let pane = self.comments.as_ref()?;
        let compose = pane.compose?;
        let text = pane.draft.trim().to_string();
        if text.is_empty() {
            self.set_status(CommentError::EmptyContent.to_string());
            return None;
        }
        let action = match compose {
            Compose::Comment => CommentAction::Submit { text },
            Compose::Reply { parent } => CommentAction::Reply { parent, text },
            Compose::Edit { id } => CommentAction::Edit { id, text },
        };
        let job = self.comment_job(action)?;
        self.cancel_compose();
        Some(job)
    }

    pub fn delete_selected_comment(&mut self) -> Option<CommentJob> {
        let (id, _) = self.owned_selected_comment()?;
        self.comment_job(CommentAction::Delete { id })
    }

    /// Install the thread a comment job settled with.
    pub fn comments_settled(
        &mut self,
        feed_id: FeedId,
        thread: CommentThread,
        error: Option<String>,
    ) {
        let Some(pane) = self.comments.as_mut().filter(|p| p.feed_id == feed_id) else {
            tracing::debug!(feed_id, "Comment pane closed, dropping settled thread");
            return;
        };
        pane.thread = thread;
        pane.busy = false;
        pane.clamp_selection();
        match error {
            Some(error) => self.set_error(error),
            None => self.set_status("Comment saved"),
        }
    }

    /// A comment job died without answering; keep the last known thread.
    pub fn comment_task_lost(&mut self) {
        if let Some(pane) = self.comments.as_mut() {
            pane.busy = false;
        }
    }

    fn begin_compose(&mut self, compose: Compose, draft: String) {
        if !self.session.is_logged_in() {
            self.set_status("Log in to comment");
            return;
        }
        if let Some(pane) = self.comments.as_mut() {
            pane.compose = Some(compose);
            pane.draft = draft;
        }
    }

    /// Id and text of the selected row, if the current user wrote it.
    fn owned_selected_comment(&mut self) -> Option<(i64, String)> {
        let Some(user_id) = self.session.user_id().map(str::to_owned) else {
            self.set_status("Log in to comment");
            return None;
        };
        let comment = self.comments.as_ref()?.selected_comment()?;
        if comment.user_id.as_deref() != Some(user_id.as_str()) {
            self.set_status(CommentError::NotAuthor.to_string());
            return None;
        }
        Some((comment.id, comment.content.clone()))
    }

    fn comment_job(&mut self, action: CommentAction) -> Option<CommentJob> {
        let Some(backend) = self.comment_backend.clone() else {
            self.set_error("Comments are unavailable");
            return None;
        };
        let user_id = self.session.user_id()?.to_owned();
        let pane = self.comments.as_mut()?;
        if pane.busy {
            self.set_status("Still saving the last change");
            return None;
        }
        pane.busy = true;
        Some(CommentJob {
            feed_id: pane.feed_id,
            thread: pane.thread.clone(),
            action,
            user_id,
            backend,
        })
    }

    // ------------------------------------------------------------------------
    // Notifications and navigation
    // ------------------------------------------------------------------------

    pub fn notification_received(&mut self, notification: Notification) {
        let message = notification.message.clone();
        self.inbox.push(notification);
        if self.view == View::Notifications {
            self.inbox.mark_all_read();
        }
        self.toast = Some(Toast::new(message, Severity::Success));
    }

    pub fn show_view(&mut self, view: View) {
        self.view = view;
        if view != View::Comments {
            self.comments = None;
        }
        match view {
            View::Notifications => {
                self.inbox.mark_all_read();
                self.selected_notification = 0;
            }
            View::MyPage => {
                self.selected_tab = self.resolved_tab_index();
            }
            View::Home | View::Comments => {}
        }
    }

    /// Path of the current screen on the web app.
    pub fn current_path(&self) -> String {
        match self.view {
            View::Home | View::Comments => "/".to_string(),
            View::Notifications => NOTIFICATIONS_PATH.to_string(),
            View::MyPage => self
                .mypage_tabs()
                .get(self.selected_tab)
                .map(|t| t.path.clone())
                .unwrap_or_else(|| "/mypage".to_string()),
        }
    }

    pub fn menu(&self) -> Vec<MenuItem> {
        nav::menu_items(
            self.session.is_logged_in(),
            self.inbox.unread_count(),
            &self.current_path(),
        )
    }

    pub fn mypage_tabs(&self) -> Vec<MyPageTab> {
        match self.session.user() {
            Some(user) => nav::mypage_tabs(&user.user_id, Some(user)),
            None => Vec::new(),
        }
    }

    fn resolved_tab_index(&self) -> usize {
        let tabs = self.mypage_tabs();
        let current = tabs
            .get(self.selected_tab)
            .map(|t| t.path.as_str())
            .unwrap_or_default();
        nav::resolve_mypage_path(self.session.user_id(), &tabs, current)
            .and_then(|path| tabs.iter().position(|t| t.path == path))
            .unwrap_or(0)
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    pub fn nav_up(&mut self) {
        match self.view {
            View::Comments => {
                if let Some(pane) = self.comments.as_mut() {
                    pane.selected = pane.selected.saturating_sub(1);
                }
            }
            View::Home => self.selected_feed = self.selected_feed.saturating_sub(1),
            View::Notifications => {
                self.selected_notification = self.selected_notification.saturating_sub(1)
            }
            View::MyPage => self.selected_tab = self.selected_tab.saturating_sub(1),
        }
    }

    pub fn nav_down(&mut self) {
        let len = match self.view {
            View::Home => self.pager.feeds().len(),
            View::Notifications => self.inbox.items().len(),
            View::MyPage => self.mypage_tabs().len(),
            View::Comments => self
                .comments
                .as_ref()
                .map_or(0, |p| p.thread.rows().len()),
        };
        let max = len.saturating_sub(1);
        let selected = match self.view {
            View::Home => &mut self.selected_feed,
            View::Notifications => &mut self.selected_notification,
            View::MyPage => &mut self.selected_tab,
            View::Comments => match self.comments.as_mut() {
                Some(pane) => &mut pane.selected,
                None => return,
            },
        };
        *selected = selected.saturating_add(1).min(max);
    }

    fn clamp_selection(&mut self) {
        let max = self.pager.feeds().len().saturating_sub(1);
        self.selected_feed = self.selected_feed.min(max);
    }
}
