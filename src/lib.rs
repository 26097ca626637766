//! Agakayi SDK for Rust.
//!
//! Provides a typed client for the Agakayi personal expense/income
//! tracker. Persistence, authentication and identifier assignment live
//! behind the remote REST API; this crate supplies the session store, the
//! transaction repository, the pure filter/sort/aggregate pipeline and
//! CSV export on top of it.
//!
//! # Quick start
//!
//! ```no_run
//! use agakayi_sdk::{AgakayiSdk, Ledger};
//! use agakayi_sdk::pipeline::{Filter, SortKey, SortOrder};
//!
//! let sdk = AgakayiSdk::builder().build().unwrap();
//! sdk.auth().login("me@example.com", "hunter2").unwrap();
//!
//! let ledger = Ledger::load(&sdk.transactions()).unwrap();
//! let summary = ledger.summary();
//! println!("balance: {:.2}", summary.balance);
//!
//! let view = ledger.view(&Filter::default(), SortKey::Date, SortOrder::Desc);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod pipeline;
pub mod queries;
pub mod session;

#[cfg(feature = "async")]
pub use async_client::AsyncAgakayiSdk;
pub use client::ApiClient;
pub use error::{AgakayiError, Result};
pub use ledger::Ledger;
pub use session::{Session, SessionStore};

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use models::User;

// ---------------------------------------------------------------------------
// AgakayiSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AgakayiSdk`] instance.
///
/// Use [`AgakayiSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](AgakayiSdkBuilder::build) to create the SDK.
pub struct AgakayiSdkBuilder {
    api_url: Option<String>,
    session_dir: Option<PathBuf>,
    timeout: Duration,
}

impl Default for AgakayiSdkBuilder {
    fn default() -> Self {
        Self {
            api_url: None,
            session_dir: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl AgakayiSdkBuilder {
    /// Set the API base URL.
    ///
    /// If not set, the `AGAKAYI_API_URL` environment variable is consulted,
    /// falling back to the hosted default.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Set a custom session directory.
    ///
    /// If not set, the platform-appropriate default config directory is used
    /// (e.g. `~/.config/agakayi-sdk` on Linux, `~/Library/Application
    /// Support/agakayi-sdk` on macOS, `%APPDATA%\agakayi-sdk` on Windows).
    pub fn session_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.session_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the HTTP request timeout.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the SDK, initializing the session store and loading any
    /// persisted session.
    ///
    /// Purely local: no request is sent until the first query runs.
    pub fn build(self) -> Result<AgakayiSdk> {
        let api_url = self.api_url.unwrap_or_else(config::default_api_url);
        let client = ApiClient::new(api_url, self.timeout);
        let store = SessionStore::new(self.session_dir)?;
        let session = store.load()?;
        Ok(AgakayiSdk {
            client,
            store,
            session: RefCell::new(session),
        })
    }
}

// ---------------------------------------------------------------------------
// AgakayiSdk
// ---------------------------------------------------------------------------

/// The main entry point for the Agakayi SDK.
///
/// Owns the HTTP client and the session (explicit init on
/// [`build`](AgakayiSdkBuilder::build), explicit teardown on
/// [`logout`](queries::auth::AuthQuery::logout)) and exposes
/// domain-specific query interfaces as lightweight borrowing wrappers.
///
/// Created via [`AgakayiSdk::builder()`].
pub struct AgakayiSdk {
    client: ApiClient,
    store: SessionStore,
    session: RefCell<Option<Session>>,
}

impl AgakayiSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> AgakayiSdkBuilder {
        AgakayiSdkBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the auth interface.
    ///
    /// Returns a lightweight wrapper that borrows from the SDK and provides
    /// login, registration and session lifecycle methods.
    pub fn auth(&self) -> queries::auth::AuthQuery<'_> {
        queries::auth::AuthQuery::new(self)
    }

    /// Access the transaction repository interface.
    pub fn transactions(&self) -> queries::transactions::TransactionQuery<'_> {
        queries::transactions::TransactionQuery::new(self)
    }

    // -- Session and utility methods ---------------------------------------

    /// The current session, if logged in.
    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    /// The authenticated user record, or `None` when logged out.
    pub fn current_identity(&self) -> Option<User> {
        self.session.borrow().as_ref().map(|s| s.user.clone())
    }

    /// Whether a session is held.
    pub fn is_logged_in(&self) -> bool {
        self.session.borrow().is_some()
    }

    /// Consume the SDK and release all resources.
    ///
    /// Drops the HTTP client. This happens automatically when the SDK is
    /// dropped, but can be invoked explicitly for deterministic cleanup.
    pub fn close(self) {
        self.client.close();
        drop(self);
    }

    /// Return a reference to the underlying [`ApiClient`] for advanced usage.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // -- Crate internals ---------------------------------------------------

    /// The bearer token, or an `Auth` error when logged out. Repository
    /// operations abort here before any network traffic.
    pub(crate) fn token(&self) -> Result<String> {
        self.session
            .borrow()
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or_else(|| AgakayiError::Auth("not logged in".to_string()))
    }

    /// Persist a session and make it current.
    pub(crate) fn set_session(&self, session: Session) -> Result<()> {
        self.store.save(&session)?;
        eprintln!("Session persisted for {}", session.email);
        *self.session.borrow_mut() = Some(session);
        Ok(())
    }

    /// Clear the persisted session and the in-memory copy.
    pub(crate) fn clear_session(&self) -> Result<()> {
        self.store.clear()?;
        *self.session.borrow_mut() = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for AgakayiSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let identity = self
            .current_identity()
            .map(|u| u.email)
            .unwrap_or_else(|| "logged out".to_string());
        write!(
            f,
            "AgakayiSdk(api_url={}, session_dir={}, identity={})",
            self.client.base_url(),
            self.store.session_dir.display(),
            identity
        )
    }
}
