//! Comment threads under a post: top-level comments with one level of replies.
//!
//! Every change is applied locally first and then sent to the backend; when
//! the backend call fails the local change is rolled back, so the thread
//! never shows state the server rejected.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Enter some text before saving")]
    EmptyContent,

    #[error("Only the author can change this comment")]
    NotAuthor,

    #[error("Comment {0} not found")]
    NotFound(i64),

    #[error("Failed to save reply. Please try again.")]
    SaveFailed(#[source] ApiError),

    #[error("Failed to update comment: {0}")]
    UpdateFailed(#[source] ApiError),

    #[error("Failed to delete comment: {0}")]
    DeleteFailed(#[source] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub username: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, alias = "text")]
    pub content: String,
    #[serde(default)]
    pub parent_comment_id: Option<i64>,
    #[serde(default, rename = "User", alias = "user")]
    pub author: Option<CommentAuthor>,
}

impl Comment {
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map(|a| a.username.as_str())
            .unwrap_or("Anonymous")
    }

    fn is_authored_by(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }
}

/// Body of `POST /comment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComment {
    pub user_id: String,
    pub post_id: String,
    pub parent_comment_id: Option<i64>,
    pub content: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentBackend: Send + Sync {
    async fn create(&self, comment: &NewComment) -> Result<Comment, ApiError>;
    async fn update(&self, id: i64, content: &str) -> Result<(), ApiError>;
    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    content: &'a str,
}

/// [`CommentBackend`] over `/comment`.
#[derive(Debug, Clone)]
pub struct HttpCommentBackend {
    api: ApiClient,
}

impl HttpCommentBackend {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CommentBackend for HttpCommentBackend {
    async fn create(&self, comment: &NewComment) -> Result<Comment, ApiError> {
        self.api.post_json("comment", comment).await
    }

    async fn update(&self, id: i64, content: &str) -> Result<(), ApiError> {
        self.api
            .put_json(&format!("comment/{}", id), &UpdateBody { content })
            .await
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("comment/{}", id)).await
    }
}

/// One change requested from the comment pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentAction {
    Submit { text: String },
    Reply { parent: i64, text: String },
    Edit { id: i64, text: String },
    Delete { id: i64 },
}

/// Comments embedded in a feed payload under `Comments` or `comments`.
///
/// A payload without the field, or with one that does not decode, gives an
/// empty list.
pub fn comments_from_payload(payload: &Map<String, Value>) -> Vec<Comment> {
    let Some(value) = payload.get("Comments").or_else(|| payload.get("comments")) else {
        return Vec::new();
    };
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring malformed comments in feed payload");
        Vec::new()
    })
}

/// Where a comment lives in the thread.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Top(usize),
    Reply { parent: i64, index: usize },
}

/// Comments of one post.
#[derive(Debug, Clone, Default)]
pub struct CommentThread {
    post_id: Option<String>,
    comments: Vec<Comment>,
    replies: HashMap<i64, Vec<Comment>>,
    next_temp_id: i64,
}

impl CommentThread {
    /// Build a thread from a flat list; comments with a parent become replies.
    pub fn new(post_id: Option<String>, all: Vec<Comment>) -> Self {
        let mut comments = Vec::new();
        let mut replies: HashMap<i64, Vec<Comment>> = HashMap::new();
        for comment in all {
            match comment.parent_comment_id {
                Some(parent) => replies.entry(parent).or_default().push(comment),
                None => comments.push(comment),
            }
        }
        Self {
            post_id,
            comments,
            replies,
            next_temp_id: -1,
        }
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn replies(&self, parent: i64) -> &[Comment] {
        self.replies.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Display order: each top-level comment followed by its replies.
    pub fn rows(&self) -> Vec<&Comment> {
        self.comments
            .iter()
            .flat_map(|c| std::iter::once(c).chain(self.replies(c.id)))
            .collect()
    }

    /// Run one pane action against `backend`.
    pub async fn apply<B>(
        &mut self,
        backend: &B,
        user_id: &str,
        action: CommentAction,
    ) -> Result<(), CommentError>
    where
        B: CommentBackend + ?Sized,
    {
        match action {
            CommentAction::Submit { text } => {
                self.submit_comment(backend, user_id, &text).await?;
            }
            CommentAction::Reply { parent, text } => {
                self.submit_reply(backend, parent, user_id, &text).await?;
            }
            CommentAction::Edit { id, text } => {
                self.edit_comment(backend, id, user_id, &text).await?;
            }
            CommentAction::Delete { id } => {
                self.delete_comment(backend, id, user_id).await?;
            }
        }
        Ok(())
    }

    /// Post a top-level comment. Blank text or a missing post is a no-op.
    pub async fn submit_comment<B>(
        &mut self,
        backend: &B,
        user_id: &str,
        text: &str,
    ) -> Result<Option<Comment>, CommentError>
    where
        B: CommentBackend + ?Sized,
    {
        self.post(backend, None, user_id, text).await
    }

    /// Reply to `parent`. Blank text or a missing post is a no-op.
    pub async fn submit_reply<B>(
        &mut self,
        backend: &B,
        parent: i64,
        user_id: &str,
        text: &str,
    ) -> Result<Option<Comment>, CommentError>
    where
        B: CommentBackend + ?Sized,
    {
        self.post(backend, Some(parent), user_id, text).await
    }

    /// Change the text of a comment or reply written by `user_id`.
    pub async fn edit_comment<B>(
        &mut self,
        backend: &B,
        id: i64,
        user_id: &str,
        text: &str,
    ) -> Result<(), CommentError>
    where
        B: CommentBackend + ?Sized,
    {
        let text = text.trim();
        if text.is_empty() {
            return Err(CommentError::EmptyContent);
        }
        let slot = self.owned_slot(id, user_id)?;

        let previous = std::mem::replace(&mut self.slot_mut(slot).content, text.to_owned());
        if let Err(e) = backend.update(id, text).await {
            tracing::warn!(comment_id = id, error = %e, "Comment update failed, rolling back");
            self.slot_mut(slot).content = previous;
            return Err(CommentError::UpdateFailed(e));
        }
        Ok(())
    }

    /// Remove a comment or reply written by `user_id`.
    pub async fn delete_comment<B>(
        &mut self,
        backend: &B,
        id: i64,
        user_id: &str,
    ) -> Result<(), CommentError>
    where
        B: CommentBackend + ?Sized,
    {
        let slot = self.owned_slot(id, user_id)?;

        let removed = match slot {
            Slot::Top(index) => self.comments.remove(index),
            Slot::Reply { parent, index } => self
                .replies
                .get_mut(&parent)
                .map(|list| list.remove(index))
                .ok_or(CommentError::NotFound(id))?,
        };

        if let Err(e) = backend.delete(id).await {
            tracing::warn!(comment_id = id, error = %e, "Comment delete failed, restoring");
            match slot {
                Slot::Top(index) => self.comments.insert(index, removed),
                Slot::Reply { parent, index } => self
                    .replies
                    .entry(parent)
                    .or_default()
                    .insert(index, removed),
            }
            return Err(CommentError::DeleteFailed(e));
        }
        Ok(())
    }

    async fn post<B>(
        &mut self,
        backend: &B,
        parent: Option<i64>,
        user_id: &str,
        text: &str,
    ) -> Result<Option<Comment>, CommentError>
    where
        B: CommentBackend + ?Sized,
    {
        let text = text.trim();
        let Some(post_id) = self.post_id.clone() else {
            return Ok(None);
        };
        if text.is_empty() {
            return Ok(None);
        }

        let temp_id = self.next_temp_id;
        self.next_temp_id -= 1;
        let placeholder = Comment {
            id: temp_id,
            user_id: Some(user_id.to_owned()),
            content: text.to_owned(),
            parent_comment_id: parent,
            author: None,
        };
        let list = self.list_mut(parent);
        list.push(placeholder);

        let request = NewComment {
            user_id: user_id.to_owned(),
            post_id,
            parent_comment_id: parent,
            content: text.to_owned(),
        };
        let result = backend.create(&request).await;

        let list = self.list_mut(parent);
        let position = list.iter().position(|c| c.id == temp_id);
        match result {
            Ok(saved) => {
                match position {
                    Some(i) => list[i] = saved.clone(),
                    None => list.push(saved.clone()),
                }
                Ok(Some(saved))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Comment save failed, removing placeholder");
                if let Some(i) = position {
                    list.remove(i);
                }
                Err(CommentError::SaveFailed(e))
            }
        }
    }

    fn list_mut(&mut self, parent: Option<i64>) -> &mut Vec<Comment> {
        match parent {
            Some(parent) => self.replies.entry(parent).or_default(),
            None => &mut self.comments,
        }
    }

    fn locate(&self, id: i64) -> Option<Slot> {
        if let Some(index) = self.comments.iter().position(|c| c.id == id) {
            return Some(Slot::Top(index));
        }
        self.replies.iter().find_map(|(parent, list)| {
            list.iter().position(|c| c.id == id).map(|index| Slot::Reply {
                parent: *parent,
                index,
            })
        })
    }

    fn owned_slot(&self, id: i64, user_id: &str) -> Result<Slot, CommentError> {
        let slot = self.locate(id).ok_or(CommentError::NotFound(id))?;
        let comment = match slot {
            Slot::Top(index) => &self.comments[index],
            Slot::Reply { parent, index } => &self.replies[&parent][index],
        };
        if !comment.is_authored_by(user_id) {
            return Err(CommentError::NotAuthor);
        }
        Ok(slot)
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Comment {
        match slot {
            Slot::Top(index) => &mut self.comments[index],
            Slot::Reply { parent, index } => &mut self.list_mut(Some(parent))[index],
        }
    }
}
