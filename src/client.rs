//! Blocking HTTP plumbing for the Agakayi REST API.
//!
//! One lazily-constructed `reqwest` client serves every call. Responses
//! with non-success statuses are mapped into the crate error taxonomy,
//! pulling the server's `message` field out of the body when one exists.

use crate::error::{AgakayiError, Result};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::time::Duration;

/// HTTP transport for the Agakayi API.
///
/// All endpoint knowledge lives in the query layer; this type only knows
/// how to send authenticated JSON requests against a base URL.
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
    client: RefCell<Option<Client>>,
}

impl ApiClient {
    /// Create a client for the given base URL. Trailing slashes are trimmed
    /// so paths can always be appended verbatim.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            client: RefCell::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lazy HTTP client, created on first use.
    fn client(&self) -> Client {
        if self.client.borrow().is_none() {
            *self.client.borrow_mut() = Some(
                Client::builder()
                    .timeout(self.timeout)
                    .redirect(reqwest::redirect::Policy::limited(10))
                    .build()
                    .expect("failed to build HTTP client"),
            );
        }
        self.client.borrow().as_ref().unwrap().clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET` a JSON resource with the bearer token.
    pub fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T> {
        let resp = self.client().get(self.url(path)).bearer_auth(token).send()?;
        decode(resp)
    }

    /// `POST` a JSON body, optionally authenticated, and decode the JSON
    /// response. The auth endpoints are the only unauthenticated calls.
    pub fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T> {
        let mut req = self.client().post(self.url(path)).json(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        decode(req.send()?)
    }

    /// `DELETE` a resource with the bearer token, discarding any body.
    pub fn delete(&self, path: &str, token: &str) -> Result<()> {
        let resp = self
            .client()
            .delete(self.url(path))
            .bearer_auth(token)
            .send()?;
        check_status(resp)?;
        Ok(())
    }

    /// Drop the HTTP client, if built. The next request recreates it.
    pub fn close(&self) {
        *self.client.borrow_mut() = None;
    }
}

/// Map a non-success status into the error taxonomy.
///
/// 401/403 become [`AgakayiError::Auth`], 404 becomes
/// [`AgakayiError::NotFound`], everything else non-success becomes
/// [`AgakayiError::Api`] carrying the server's message when the body has
/// one.
fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_string))
        .or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AgakayiError::Auth(message)),
        StatusCode::NOT_FOUND => Err(AgakayiError::NotFound(message)),
        _ => Err(AgakayiError::Api {
            status: status.as_u16(),
            message,
        }),
    }
}

fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let resp = check_status(resp)?;
    Ok(resp.json()?)
}
