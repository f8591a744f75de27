//! Logged-in user context persisted to `session.json`.
//!
//! The session is an explicit object owned by the app and passed to whatever
//! needs the current user. It is hydrated once at startup and every change is
//! written through to disk before it becomes visible in memory.
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to write session file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Influencer profile attached to creator accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "banner_picture")]
    pub banner_picture: Option<String>,
}

/// The user currently logged in on this machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    /// Identifiers of the accounts this user follows.
    #[serde(default)]
    pub follow: Vec<String>,
    #[serde(default)]
    pub influencer: Option<InfluencerProfile>,
}

impl CurrentUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: None,
            follow: Vec::new(),
            influencer: None,
        }
    }

    /// Name to show in the UI: username when known, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.user_id)
    }

    /// Creator accounts with a banner picture get the membership tabs.
    pub fn is_influencer(&self) -> bool {
        self.influencer
            .as_ref()
            .and_then(|i| i.banner_picture.as_deref())
            .is_some_and(|b| !b.is_empty())
    }
}

/// Current-user context with write-through persistence.
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    user: Option<CurrentUser>,
    revision: u64,
}

impl Session {
    /// Load the persisted user from `path`.
    ///
    /// A missing file means logged out. An unreadable or corrupt file is
    /// logged and also treated as logged out, so a bad session never blocks
    /// startup.
    pub fn hydrate(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let user = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Option<CurrentUser>>(&content) {
                Ok(user) => user,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Corrupt session file, starting logged out"
                    );
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No session file, starting logged out");
                None
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read session file");
                None
            }
        };

        if let Some(ref u) = user {
            tracing::info!(user_id = %u.user_id, "Restored session");
        }

        Self {
            path,
            user,
            revision: 0,
        }
    }

    /// An in-memory session that is never persisted. Used by tests and
    /// one-shot commands.
    pub fn ephemeral(user: Option<CurrentUser>) -> Self {
        Self {
            path: PathBuf::new(),
            user,
            revision: 0,
        }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.user_id.as_str())
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Increments on every login-state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the current user (or log out with `None`).
    ///
    /// The file is written first; memory is only updated once the write
    /// succeeded.
    pub fn set_user(&mut self, user: Option<CurrentUser>) -> Result<(), SessionError> {
        if !self.path.as_os_str().is_empty() {
            let encoded = serde_json::to_vec_pretty(&user)?;
            atomic_write(&self.path, &encoded)?;
        }
        tracing::info!(
            user_id = user.as_ref().map(|u| u.user_id.as_str()).unwrap_or("-"),
            "Session updated"
        );
        self.user = user;
        self.revision = self.revision.wrapping_add(1);
        Ok(())
    }
}

/// Write `content` to `dst` via a temp file and rename, so a crash never
/// leaves a half-written session behind.
fn atomic_write(dst: &Path, content: &[u8]) -> Result<(), SessionError> {
    use std::time::{SystemTime, UNIX_EPOCH};
    let io_err = |source| SessionError::Io {
        path: dst.to_path_buf(),
        source,
    };

    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", random_suffix));

    let mut temp_file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(io_err)?;

    let written = temp_file
        .write_all(content)
        .and_then(|_| temp_file.sync_all());
    drop(temp_file);
    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(io_err(e));
    }

    #[cfg(windows)]
    if dst.exists() {
        if let Err(e) = std::fs::remove_file(dst) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(io_err(e));
        }
    }

    std::fs::rename(&temp_path, dst).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        io_err(e)
    })
}
