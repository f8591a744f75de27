//! Notification inbox and transient toasts.
//!
//! Notifications arrive over the platform's socket connection; the transport
//! itself lives outside this crate and is consumed as a plain `Stream`.
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// One `new_notification` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub message: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Received notifications plus the unread badge count.
#[derive(Debug, Default)]
pub struct Inbox {
    items: Vec<Notification>,
    unread: usize,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        tracing::debug!(message = %notification.message, "Notification received");
        self.items.push(notification);
        self.unread += 1;
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.unread
    }

    pub fn mark_all_read(&mut self) {
        self.unread = 0;
    }
}

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Custom,
}

/// Short-lived message shown in the corner of the screen.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    shown_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.is_expired_at(Instant::now(), ttl)
    }

    fn is_expired_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.shown_at) >= ttl
    }
}

/// Notifications written one JSON object per line, as a socket bridge or a
/// named pipe would produce them. Undecodable lines are logged and skipped.
pub fn json_lines<R>(reader: R) -> impl Stream<Item = Notification> + Send
where
    R: AsyncBufRead + Unpin + Send,
{
    futures::stream::unfold(reader.lines(), |mut lines| async move {
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match serde_json::from_str::<Notification>(&line) {
                    Ok(notification) => return Some((notification, lines)),
                    Err(e) => tracing::warn!(error = %e, "Skipping malformed notification"),
                },
                Ok(None) => return None,
                Err(e) => {
                    tracing::warn!(error = %e, "Notification feed read failed");
                    return None;
                }
            }
        }
    })
}

/// Forward every notification from `stream` into `tx` until either side
/// closes.
pub fn forward_notifications<S, T, F>(
    stream: S,
    tx: mpsc::Sender<T>,
    wrap: F,
) -> tokio::task::JoinHandle<()>
where
    S: Stream<Item = Notification> + Send + 'static,
    T: Send + 'static,
    F: Fn(Notification) -> T + Send + 'static,
{
    tokio::spawn(async move {
        let mut stream = std::pin::pin!(stream);
        while let Some(notification) = stream.next().await {
            if tx.send(wrap(notification)).await.is_err() {
                tracing::debug!("Notification receiver dropped, stopping forwarder");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(message: &str) -> Notification {
        Notification {
            id: None,
            kind: None,
            message: message.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_push_counts_unread() {
        let mut inbox = Inbox::new();
        inbox.push(note("a"));
        inbox.push(note("b"));
        assert_eq!(inbox.unread_count(), 2);
        assert_eq!(inbox.items().len(), 2);

        inbox.mark_all_read();
        assert_eq!(inbox.unread_count(), 0);
        assert_eq!(inbox.items().len(), 2);
    }

    #[test]
    fn test_toast_expiry() {
        let toast = Toast::new("saved", Severity::Success);
        let ttl = Duration::from_secs(3);
        assert!(!toast.is_expired_at(toast.shown_at, ttl));
        assert!(toast.is_expired_at(toast.shown_at + ttl, ttl));
    }

    #[test]
    fn test_wire_format() {
        let n: Notification = serde_json::from_str(
            r#"{"id":1,"type":"like","message":"mina liked your post"}"#,
        )
        .unwrap();
        assert_eq!(n.kind.as_deref(), Some("like"));
        assert_eq!(n.message, "mina liked your post");
    }

    #[tokio::test]
    async fn test_forwarder_drains_stream() {
        let (tx, mut rx) = mpsc::channel(8);
        let stream = futures::stream::iter(vec![note("one"), note("two")]);

        forward_notifications(stream, tx, |n| n.message).await.unwrap();

        assert_eq!(rx.recv().await.as_deref(), Some("one"));
        assert_eq!(rx.recv().await.as_deref(), Some("two"));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_json_lines_skip_blank_and_malformed() {
        let feed: &'static [u8] = concat!(
            r#"{"message":"first"}"#,
            "\n\nnot json\n",
            r#"{"type":"follow","message":"second"}"#,
            "\n",
        )
        .as_bytes();
        let (tx, mut rx) = mpsc::channel(8);

        forward_notifications(json_lines(feed), tx, |n| n).await.unwrap();

        assert_eq!(rx.recv().await.map(|n| n.message).as_deref(), Some("first"));
        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind.as_deref(), Some("follow"));
        assert_eq!(second.message, "second");
        assert!(rx.recv().await.is_none());
    }
}
