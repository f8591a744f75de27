//! Background task event handling.
//!
//! Completions carry the pager generation they were issued for; the App
//! drops the ones that no longer match, so a late answer for a previous feed
//! type never lands in the current list.

use super::helpers::{start_batch_load, COMMENT_TASK};
use crate::app::{App, AppEvent};
use tokio::sync::mpsc;

pub(super) fn handle_app_event(app: &mut App, event: AppEvent, event_tx: &mpsc::Sender<AppEvent>) {
    match event {
        AppEvent::QueueLoaded { generation, queue } => {
            if let Some(request) = app.apply_queue(generation, queue) {
                start_batch_load(app, request, event_tx);
            }
        }
        AppEvent::BatchLoaded { request, batch } => {
            let count = batch.items.len();
            if app.apply_batch(&request, batch) {
                tracing::debug!(
                    generation = request.generation,
                    count,
                    has_more = app.pager.has_more(),
                    "Batch applied"
                );
            }
        }
        AppEvent::LikeSaved { feed_id } => {
            tracing::debug!(feed_id, "Like saved");
        }
        AppEvent::LikeFailed { toggle, error } => {
            app.like_failed(toggle, &error);
        }
        AppEvent::NotificationReceived(notification) => {
            tracing::info!(kind = ?notification.kind, "Notification received");
            app.notification_received(notification);
        }
        AppEvent::CommentsSettled {
            feed_id,
            thread,
            error,
        } => {
            tracing::debug!(feed_id, failed = error.is_some(), "Comment change settled");
            app.comments_settled(feed_id, thread, error);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            if task == COMMENT_TASK {
                app.comment_task_lost();
            }
            app.set_error(format!("Internal error in {} task (press r to reload)", task));
        }
    }
    app.needs_redraw = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::{Comment, CommentThread, MockCommentBackend};
    use crate::config::Config;
    use crate::feed::{Batch, FeedItem, MockFeedSource, BATCH_LIMIT};
    use crate::notifications::Notification;
    use crate::session::{CurrentUser, Session};
    use std::sync::Arc;

    fn test_app() -> App {
        App::new(
            Config::default(),
            Session::ephemeral(Some(CurrentUser::new("u1"))),
            Arc::new(MockFeedSource::new()),
        )
    }

    #[tokio::test]
    async fn test_stale_queue_spawns_nothing() {
        let mut app = test_app();
        let (tx, mut rx) = mpsc::channel(4);
        let old = app.request_refresh();
        let _current = app.request_refresh();

        handle_app_event(
            &mut app,
            AppEvent::QueueLoaded {
                generation: old.generation,
                queue: vec![1, 2],
            },
            &tx,
        );

        assert!(app.pager.queue().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_empty_queue_ends_loading() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(4);
        let request = app.request_refresh();

        handle_app_event(
            &mut app,
            AppEvent::QueueLoaded {
                generation: request.generation,
                queue: Vec::new(),
            },
            &tx,
        );

        assert!(!app.pager.is_loading());
        assert!(app.pager.has_more());
        assert!(app.request_append().is_none());
        assert!(!app.pager.has_more());
    }

    #[tokio::test]
    async fn test_batch_loaded_fills_feed() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(4);
        let request = app.request_refresh();
        let batch_request = app.apply_queue(request.generation, vec![1, 2]).unwrap();

        handle_app_event(
            &mut app,
            AppEvent::BatchLoaded {
                request: batch_request,
                batch: Batch {
                    items: vec![FeedItem::new(1), FeedItem::new(2)],
                    has_more: false,
                    consumed: BATCH_LIMIT,
                },
            },
            &tx,
        );

        assert_eq!(app.pager.feeds().len(), 2);
        assert!(app.pager.queue().is_empty());
        assert!(!app.pager.is_loading());
    }

    #[tokio::test]
    async fn test_notification_event_reaches_inbox() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(4);
        handle_app_event(
            &mut app,
            AppEvent::NotificationReceived(Notification {
                id: None,
                kind: None,
                message: "new follower".into(),
                created_at: None,
            }),
            &tx,
        );
        assert_eq!(app.inbox.unread_count(), 1);
        assert_eq!(app.toast.as_ref().map(|t| t.message.as_str()), Some("new follower"));
    }

    fn app_in_comments() -> App {
        let mut app = test_app().with_comment_backend(Arc::new(MockCommentBackend::new()));
        let request = app.request_refresh();
        let batch = app.apply_queue(request.generation, vec![5]).unwrap();
        app.apply_batch(
            &batch,
            Batch {
                items: vec![FeedItem::new(5)],
                has_more: false,
                consumed: BATCH_LIMIT,
            },
        );
        app.open_comments();
        app
    }

    #[tokio::test]
    async fn test_comment_task_panic_unblocks_pane() {
        let mut app = app_in_comments();
        let (tx, _rx) = mpsc::channel(4);
        app.compose_comment();
        app.compose_push('x');
        app.submit_compose().unwrap();

        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: COMMENT_TASK,
                error: "boom".into(),
            },
            &tx,
        );

        assert!(!app.comments.as_ref().unwrap().busy);
        assert!(app.toast.as_ref().unwrap().message.contains("comment"));
    }

    #[tokio::test]
    async fn test_settled_comments_replace_thread() {
        let mut app = app_in_comments();
        let (tx, _rx) = mpsc::channel(4);
        let thread = CommentThread::new(
            Some("5".into()),
            vec![Comment {
                id: 11,
                user_id: Some("u1".into()),
                content: "saved".into(),
                parent_comment_id: None,
                author: None,
            }],
        );

        handle_app_event(
            &mut app,
            AppEvent::CommentsSettled {
                feed_id: 5,
                thread,
                error: None,
            },
            &tx,
        );

        let pane = app.comments.as_ref().unwrap();
        assert_eq!(pane.thread.rows()[0].content, "saved");
        assert!(app.needs_redraw);
    }
}
