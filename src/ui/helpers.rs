//! Background task spawning for the UI layer.
//!
//! Every network call runs in a spawned task that reports back through the
//! `AppEvent` channel; panics are caught and reported as `TaskPanicked`.

use crate::app::{App, AppEvent, CommentJob};
use crate::feed::{self, BatchRequest, FeedProcessor, FeedSource, LikeToggle, QueueRequest};
use crate::session::CurrentUser;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of the task silently disappearing (caught by Tokio's runtime but
/// not handled), panics are converted to `Err(String)` containing the panic
/// message.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else if let Some(e) = panic.downcast_ref::<Box<dyn std::error::Error + Send>>() {
                e.to_string()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Run `work` in the background and send the event it produces.
fn spawn_reporting<F>(
    task: &'static str,
    tx: mpsc::Sender<AppEvent>,
    work: F,
) -> tokio::task::JoinHandle<()>
where
    F: Future<Output = AppEvent> + Send + 'static,
{
    tokio::spawn(async move {
        let event = match catch_task_panic(work).await {
            Ok(event) => event,
            Err(panic_msg) => {
                tracing::error!(task, error = %panic_msg, "Background task panicked");
                AppEvent::TaskPanicked {
                    task,
                    error: panic_msg,
                }
            }
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(task, error = %e, "Channel send failed (receiver dropped)");
        }
    })
}

pub(super) fn spawn_queue_load(
    source: Arc<dyn FeedSource>,
    request: QueueRequest,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tracing::debug!(
        generation = request.generation,
        feed_type = request.feed_type.name(),
        "Spawning queue load"
    );
    spawn_reporting("queue_load", tx, async move {
        let queue = feed::initialize(source.as_ref(), &request).await;
        AppEvent::QueueLoaded {
            generation: request.generation,
            queue,
        }
    })
}

pub(super) fn spawn_batch_load(
    source: Arc<dyn FeedSource>,
    processor: Arc<dyn FeedProcessor>,
    request: BatchRequest,
    user: Option<CurrentUser>,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tracing::debug!(
        generation = request.generation,
        remaining = request.queue.len(),
        "Spawning batch load"
    );
    spawn_reporting("batch_load", tx, async move {
        let batch =
            feed::load_batch(source.as_ref(), processor.as_ref(), &request, user.as_ref()).await;
        AppEvent::BatchLoaded { request, batch }
    })
}

pub(super) fn spawn_like_save(
    source: Arc<dyn FeedSource>,
    toggle: LikeToggle,
    user_id: String,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    spawn_reporting("like_save", tx, async move {
        match source.set_like(toggle.feed_id, &user_id, toggle.liked).await {
            Ok(()) => AppEvent::LikeSaved {
                feed_id: toggle.feed_id,
            },
            Err(e) => AppEvent::LikeFailed {
                toggle,
                error: e.to_string(),
            },
        }
    })
}

/// Task name reported when a comment job panics.
pub(super) const COMMENT_TASK: &str = "comment";

pub(super) fn spawn_comment_job(job: CommentJob, tx: mpsc::Sender<AppEvent>) {
    tracing::debug!(feed_id = job.feed_id, "Spawning comment job");
    spawn_reporting(COMMENT_TASK, tx, job.run());
}

/// Spawn the queue load for `request` against the app's source.
pub(super) fn start_queue_load(app: &App, request: QueueRequest, tx: &mpsc::Sender<AppEvent>) {
    spawn_queue_load(app.source.clone(), request, tx.clone());
}

/// Spawn the batch load for `request` against the app's source.
pub(super) fn start_batch_load(app: &App, request: BatchRequest, tx: &mpsc::Sender<AppEvent>) {
    spawn_batch_load(
        app.source.clone(),
        app.processor.clone(),
        request,
        app.user().cloned(),
        tx.clone(),
    );
}
