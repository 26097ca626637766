//! Login, registration and session lifecycle against the auth endpoints.
//!
//! Authentication itself is the backend's job; this wrapper exchanges
//! credentials for a `{token, user}` pair and manages the persisted
//! session around it.

use serde_json::json;

use crate::config;
use crate::error::Result;
use crate::models::{AuthResponse, User};
use crate::session::Session;

// ---------------------------------------------------------------------------
// AuthQuery
// ---------------------------------------------------------------------------

/// Auth interface bound to an SDK instance.
pub struct AuthQuery<'a> {
    sdk: &'a crate::AgakayiSdk,
}

impl<'a> AuthQuery<'a> {
    /// Create a new `AuthQuery` bound to the given SDK.
    pub fn new(sdk: &'a crate::AgakayiSdk) -> Self {
        Self { sdk }
    }

    // -- Login / register --------------------------------------------------

    /// Exchange credentials for a session via `POST /auth/login`.
    ///
    /// On success the session is persisted and the authenticated user
    /// returned. Rejected credentials surface as
    /// [`AgakayiError::Auth`](crate::AgakayiError::Auth).
    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        let resp: AuthResponse = self.sdk.client().post_json(
            config::LOGIN_PATH,
            None,
            &json!({ "email": email, "password": password }),
        )?;
        self.sdk
            .set_session(Session::new(resp.token, resp.user.clone()))?;
        Ok(resp.user)
    }

    /// Create an account via `POST /auth/register` and log straight in.
    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let resp: AuthResponse = self.sdk.client().post_json(
            config::REGISTER_PATH,
            None,
            &json!({ "username": username, "email": email, "password": password }),
        )?;
        self.sdk
            .set_session(Session::new(resp.token, resp.user.clone()))?;
        Ok(resp.user)
    }

    // -- Session -----------------------------------------------------------

    /// The persisted session's user, or `None` when logged out.
    pub fn current_identity(&self) -> Option<User> {
        self.sdk.current_identity()
    }

    /// Clear the persisted session. Idempotent; purely local -- the token
    /// is simply forgotten, there is no server-side invalidation call.
    pub fn logout(&self) -> Result<()> {
        self.sdk.clear_session()
    }
}
