//! Async wrapper around [`AgakayiSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//! Operations serialize through one mutex, preserving the one-at-a-time
//! ordering of the blocking client.
//!
//! # Example
//!
//! ```no_run
//! use agakayi_sdk::AsyncAgakayiSdk;
//!
//! async fn example() -> agakayi_sdk::Result<()> {
//!     let sdk = AsyncAgakayiSdk::builder().build().await?;
//!
//!     sdk.login("me@example.com", "hunter2").await?;
//!
//!     // Run any sync SDK method via closure
//!     let rows = sdk.run(|s| s.transactions().list()).await?;
//!     println!("{} transactions", rows.len());
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{AgakayiError, Result};
use crate::models::{Transaction, TransactionDraft, User};
use crate::AgakayiSdk;

fn internal(msg: String) -> AgakayiError {
    AgakayiError::Io(std::io::Error::other(msg))
}

// ---------------------------------------------------------------------------
// AsyncAgakayiSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncAgakayiSdk`] instance.
pub struct AsyncAgakayiSdkBuilder {
    api_url: Option<String>,
    session_dir: Option<PathBuf>,
    timeout: Duration,
}

impl Default for AsyncAgakayiSdkBuilder {
    fn default() -> Self {
        Self {
            api_url: None,
            session_dir: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl AsyncAgakayiSdkBuilder {
    /// Set the API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Set a custom session directory.
    pub fn session_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.session_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the async SDK, initializing the session store and loading any
    /// persisted session.
    ///
    /// Initialization runs on the blocking thread pool so it won't block
    /// the async event loop.
    pub async fn build(self) -> Result<AsyncAgakayiSdk> {
        tokio::task::spawn_blocking(move || {
            let mut builder = AgakayiSdk::builder();
            if let Some(url) = self.api_url {
                builder = builder.api_url(url);
            }
            if let Some(dir) = self.session_dir {
                builder = builder.session_dir(dir);
            }
            builder = builder.timeout(self.timeout);
            let sdk = builder.build()?;
            Ok(AsyncAgakayiSdk {
                inner: Arc::new(Mutex::new(sdk)),
            })
        })
        .await
        .map_err(|e| internal(format!("task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncAgakayiSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`AgakayiSdk`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The underlying [`AgakayiSdk`] is
/// protected by a [`Mutex`] since it uses `RefCell` internally.
pub struct AsyncAgakayiSdk {
    inner: Arc<Mutex<AgakayiSdk>>,
}

impl AsyncAgakayiSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncAgakayiSdkBuilder {
        AsyncAgakayiSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// The closure receives an `&AgakayiSdk` reference and should return
    /// a `Result<T>`. The operation runs on a dedicated blocking thread,
    /// keeping the async event loop free.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&AgakayiSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = sdk
                .lock()
                .map_err(|_| internal("SDK lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| internal(format!("task join error: {e}")))?
    }

    /// Log in asynchronously. Convenience wrapper around [`run()`](Self::run).
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = email.to_string();
        let password = password.to_string();
        self.run(move |s| s.auth().login(&email, &password)).await
    }

    /// Register a new account asynchronously.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let username = username.to_string();
        let email = email.to_string();
        let password = password.to_string();
        self.run(move |s| s.auth().register(&username, &email, &password))
            .await
    }

    /// Clear the persisted session asynchronously.
    pub async fn logout(&self) -> Result<()> {
        self.run(|s| s.auth().logout()).await
    }

    /// The authenticated user record, or `None` when logged out.
    pub async fn current_identity(&self) -> Result<Option<User>> {
        self.run(|s| Ok(s.current_identity())).await
    }

    /// Fetch all transactions asynchronously.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.run(|s| s.transactions().list()).await
    }

    /// Create a transaction asynchronously.
    pub async fn create_transaction(&self, draft: TransactionDraft) -> Result<Transaction> {
        self.run(move |s| s.transactions().create(&draft)).await
    }

    /// Delete a transaction asynchronously.
    pub async fn delete_transaction(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.run(move |s| s.transactions().delete(&id)).await
    }

    /// Close the SDK, releasing all resources.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            let sdk = self
                .inner
                .lock()
                .map_err(|_| internal("SDK lock poisoned".to_string()))?;
            // Dropping the MutexGuard drops the SDK
            drop(sdk);
            Ok(())
        })
        .await
        .map_err(|e| internal(format!("task join error: {e}")))?
    }
}
