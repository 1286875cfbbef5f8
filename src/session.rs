//! Session storage for Cinedex
//!
//! The gateway and auth client read and write the session through the
//! `SessionStore` trait rather than touching storage directly, so hosts can
//! inject an in-memory double in tests and a durable file store in the CLI.
//!
//! Stored keys are `access_token` and `user_id`, both plain strings.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::models::Session;

/// Session file name in the config directory
const SESSION_FILE: &str = "session.json";

/// Durable key-value store for the authentication pair.
///
/// Operations are synchronous and infallible at this boundary; persistent
/// implementations log and swallow I/O failures. No token-format validation
/// happens at this layer.
pub trait SessionStore: Send + Sync {
    /// The stored access token, if any.
    fn token(&self) -> Option<String>;

    /// Store the access token.
    fn set_token(&self, token: &str);

    /// The stored user id, if any.
    fn user_id(&self) -> Option<String>;

    /// Store the user id.
    fn set_user_id(&self, id: &str);

    /// Remove both values together. Returns true if a token was present,
    /// which lets the gateway fire its invalidation hook at most once per
    /// session under concurrent failing requests.
    fn clear(&self) -> bool;

    /// True iff a token is present and non-empty.
    fn is_authenticated(&self) -> bool {
        self.token().map(|t| !t.is_empty()).unwrap_or(false)
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Process-local session store, used as the test double.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.inner.lock().unwrap().access_token.clone()
    }

    fn set_token(&self, token: &str) {
        self.inner.lock().unwrap().access_token = Some(token.to_string());
    }

    fn user_id(&self) -> Option<String> {
        self.inner.lock().unwrap().user_id.clone()
    }

    fn set_user_id(&self, id: &str) {
        self.inner.lock().unwrap().user_id = Some(id.to_string());
    }

    fn clear(&self) -> bool {
        let mut session = self.inner.lock().unwrap();
        let had_token = session.access_token.is_some();
        *session = Session::default();
        had_token
    }
}

// =============================================================================
// File-Backed Store
// =============================================================================

/// Session store persisted as a JSON file, surviving process restarts.
///
/// The file is read once at open; every mutation rewrites it best-effort.
/// `clear` removes the file so a fresh process starts anonymous.
pub struct FileSessionStore {
    path: PathBuf,
    inner: Mutex<Session>,
}

impl FileSessionStore {
    /// Default session path (~/.config/cinedex/session.json)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cinedex").join(SESSION_FILE))
    }

    /// Open a store at the given path, loading any existing session.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = Self::load(&path);
        Self {
            path,
            inner: Mutex::new(session),
        }
    }

    fn load(path: &Path) -> Session {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
                Session::default()
            }),
            Err(_) => Session::default(),
        }
    }

    fn save(&self, session: &Session) {
        if session.is_empty() {
            if self.path.exists() {
                if let Err(e) = std::fs::remove_file(&self.path) {
                    warn!(path = %self.path.display(), error = %e, "Failed to remove session file");
                }
            }
            return;
        }

        let result = serde_json::to_string_pretty(session)
            .map_err(anyhow::Error::from)
            .and_then(|contents| {
                if let Some(parent) = self.path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&self.path, contents)?;
                Ok(())
            });
        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "Failed to write session file");
        }
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        self.inner.lock().unwrap().access_token.clone()
    }

    fn set_token(&self, token: &str) {
        let mut session = self.inner.lock().unwrap();
        session.access_token = Some(token.to_string());
        self.save(&session);
    }

    fn user_id(&self) -> Option<String> {
        self.inner.lock().unwrap().user_id.clone()
    }

    fn set_user_id(&self, id: &str) {
        let mut session = self.inner.lock().unwrap();
        session.user_id = Some(id.to_string());
        self.save(&session);
    }

    fn clear(&self) -> bool {
        let mut session = self.inner.lock().unwrap();
        let had_token = session.access_token.is_some();
        *session = Session::default();
        self.save(&session);
        had_token
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
