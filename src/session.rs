//! File-backed session persistence.
//!
//! Holds the bearer token and user record across process restarts, the
//! way the browser client kept them in cookies and local storage. The
//! serialized field names are the original storage keys so a session file
//! is self-describing.

use crate::config;
use crate::error::Result;
use crate::models::User;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An authenticated session: the bearer credential plus the identity it
/// proves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "agakayi_token")]
    pub token: String,
    #[serde(rename = "agakayi_email")]
    pub email: String,
    #[serde(rename = "agakayi_id")]
    pub user_id: String,
    #[serde(rename = "agakayi_user")]
    pub user: User,
}

impl Session {
    /// Build a session from an auth response's token and user record.
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            email: user.email.clone(),
            user_id: user.id.clone(),
            user,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// Persists the session as `session.json` inside a dedicated directory.
///
/// Lifecycle is explicit: [`load`](Self::load) on startup,
/// [`save`](Self::save) after login/register, [`clear`](Self::clear) on
/// logout. No ambient global state.
pub struct SessionStore {
    /// Directory holding the session file.
    pub session_dir: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at `session_dir`, or the platform default
    /// config directory if `None`. Creates the directory if missing.
    pub fn new(session_dir: Option<PathBuf>) -> Result<Self> {
        let dir = session_dir.unwrap_or_else(config::default_session_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { session_dir: dir })
    }

    fn session_file(&self) -> PathBuf {
        self.session_dir.join(config::SESSION_FILE)
    }

    /// Load the persisted session, if any.
    ///
    /// A corrupt session file (torn write, stray edit) is deleted and
    /// treated as logged-out rather than surfaced as an error.
    pub fn load(&self) -> Result<Option<Session>> {
        let path = self.session_file();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        match serde_json::from_str(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                eprintln!("Corrupt session file {}: {} -- removing", path.display(), e);
                let _ = fs::remove_file(&path);
                Ok(None)
            }
        }
    }

    /// Persist a session.
    ///
    /// Writes to a temp file first and renames on success, so an
    /// interrupted save never leaves a torn session behind.
    pub fn save(&self, session: &Session) -> Result<()> {
        let path = self.session_file();
        let tmp = path.with_extension("json.tmp");

        let result = (|| -> Result<()> {
            fs::write(&tmp, serde_json::to_vec_pretty(session)?)?;
            fs::rename(&tmp, &path)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    /// Remove the persisted session. A no-op when already logged out.
    pub fn clear(&self) -> Result<()> {
        let path = self.session_file();
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
