//! Shared test fixtures for the Agakayi SDK integration tests.
//!
//! Provides `spawn_agakayi_stub()`, a stateful stub of the Agakayi REST
//! API bound to an ephemeral localhost port, plus helpers that build SDK
//! instances against it with throwaway session directories.
//!
//! The stub speaks just enough HTTP/1.1 for the blocking client: one
//! request per connection, `Content-Length` bodies, `Connection: close`.
//! Its canned rows exercise every wire shape the real backend emits --
//! plain numbers, `{"$numberDecimal": ...}` wrappers, numeric strings,
//! MongoDB `_id` keys and unsigned expense magnitudes.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use agakayi_sdk::AgakayiSdk;
use serde_json::json;

pub const TEST_EMAIL: &str = "maya@example.com";
pub const TEST_PASSWORD: &str = "hunter2";
pub const TEST_TOKEN: &str = "tok-fixture-001";
pub const TEST_USER_ID: &str = "user-001";
pub const TEST_USERNAME: &str = "maya";

// ---------------------------------------------------------------------------
// Minimal HTTP plumbing
// ---------------------------------------------------------------------------

/// A parsed incoming request, as much of it as the stub cares about.
pub struct Request {
    pub method: String,
    pub path: String,
    pub bearer: Option<String>,
    pub body: serde_json::Value,
}

/// A canned JSON response.
pub struct Response {
    pub status: u16,
    pub body: serde_json::Value,
}

impl Response {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }
}

/// A stub API server. The accept loop runs on a background thread for the
/// lifetime of the test process; each connection is handled on its own
/// thread so the blocking client never deadlocks against the stub.
pub struct StubApi {
    pub url: String,
}

impl StubApi {
    pub fn spawn<H>(handler: H) -> StubApi
    where
        H: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");
        let handler = Arc::new(handler);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let handler = handler.clone();
                thread::spawn(move || handle_connection(stream, handler));
            }
        });

        StubApi {
            url: format!("http://{addr}"),
        }
    }
}

fn handle_connection<H>(mut stream: TcpStream, handler: Arc<H>)
where
    H: Fn(&Request) -> Response,
{
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let path = parts.next().unwrap_or("").to_string();

    let mut bearer = None;
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            match name.trim().to_ascii_lowercase().as_str() {
                "authorization" => bearer = value.strip_prefix("Bearer ").map(str::to_string),
                "content-length" => content_length = value.parse().unwrap_or(0),
                _ => {}
            }
        }
    }

    let mut body_bytes = vec![0u8; content_length];
    if content_length > 0 && reader.read_exact(&mut body_bytes).is_err() {
        return;
    }
    let body = serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);

    let request = Request {
        method,
        path,
        bearer,
        body,
    };
    let response = handler(&request);

    let payload = response.body.to_string();
    let reason = match response.status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        _ => "Error",
    };
    let _ = write!(
        stream,
        "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        response.status,
        reason,
        payload.len(),
        payload
    );
    let _ = stream.flush();
}

// ---------------------------------------------------------------------------
// Canned Agakayi API
// ---------------------------------------------------------------------------

/// Wire rows matching the worked summary example: 1000 Salary income,
/// 200 Food expense, 50 Transport expense. Each row uses a different
/// amount encoding on purpose.
pub fn sample_wire_rows() -> Vec<serde_json::Value> {
    vec![
        json!({
            "_id": "tx-001",
            "title": "Monthly salary",
            "amount": 1000.0,
            "date": "2024-03-01",
            "category": "Salary",
            "type": "income",
            "userId": TEST_USER_ID
        }),
        json!({
            "_id": "tx-002",
            "title": "Groceries",
            "amount": {"$numberDecimal": "200"},
            "date": "2024-03-05",
            "category": "Food",
            "type": "expense",
            "userId": TEST_USER_ID,
            "note": "weekly run"
        }),
        json!({
            "_id": "tx-003",
            "title": "Bus pass",
            "amount": "50",
            "date": "2024-03-07",
            "category": "Transport",
            "type": "expense",
            "userId": TEST_USER_ID
        }),
    ]
}

fn user_record() -> serde_json::Value {
    json!({ "id": TEST_USER_ID, "username": TEST_USERNAME, "email": TEST_EMAIL })
}

fn unauthorized() -> Response {
    Response::json(401, json!({ "message": "missing or invalid token" }))
}

/// Spawn the stateful stub: login/register, list, create, delete over an
/// in-memory row set seeded with [`sample_wire_rows`].
pub fn spawn_agakayi_stub() -> StubApi {
    let rows = Mutex::new(sample_wire_rows());
    let next_id = AtomicUsize::new(4);

    StubApi::spawn(move |req| match (req.method.as_str(), req.path.as_str()) {
        ("POST", "/auth/login") => {
            if req.body["email"] == TEST_EMAIL && req.body["password"] == TEST_PASSWORD {
                Response::json(200, json!({ "token": TEST_TOKEN, "user": user_record() }))
            } else {
                Response::json(401, json!({ "message": "invalid credentials" }))
            }
        }
        ("POST", "/auth/register") => Response::json(
            201,
            json!({
                "token": TEST_TOKEN,
                "user": {
                    "id": "user-002",
                    "username": req.body["username"],
                    "email": req.body["email"]
                }
            }),
        ),
        ("GET", "/transactions") => {
            if req.bearer.as_deref() != Some(TEST_TOKEN) {
                return unauthorized();
            }
            let rows = rows.lock().unwrap();
            Response::json(200, serde_json::Value::Array(rows.clone()))
        }
        ("POST", "/transactions") => {
            if req.bearer.as_deref() != Some(TEST_TOKEN) {
                return unauthorized();
            }
            let id = next_id.fetch_add(1, Ordering::SeqCst);
            let mut created = req.body.clone();
            created["_id"] = json!(format!("tx-{id:03}"));
            created["userId"] = json!(TEST_USER_ID);
            rows.lock().unwrap().push(created.clone());
            Response::json(201, created)
        }
        (method, path) if method == "DELETE" && path.starts_with("/transactions/") => {
            if req.bearer.as_deref() != Some(TEST_TOKEN) {
                return unauthorized();
            }
            let id = path.trim_start_matches("/transactions/");
            let mut rows = rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r["_id"] != id);
            if rows.len() < before {
                Response::json(200, json!({}))
            } else {
                Response::json(404, json!({ "message": "transaction not found" }))
            }
        }
        _ => Response::json(404, json!({ "message": "no such route" })),
    })
}

// ---------------------------------------------------------------------------
// SDK construction helpers
// ---------------------------------------------------------------------------

/// Build an SDK against the stub with a throwaway session directory.
///
/// The caller must keep the `TempDir` alive for the duration of the test
/// so the session directory is not deleted prematurely.
pub fn sdk_for(stub: &StubApi) -> (AgakayiSdk, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let sdk = AgakayiSdk::builder()
        .api_url(stub.url.as_str())
        .session_dir(tmp.path())
        .build()
        .unwrap();
    (sdk, tmp)
}

/// Build an SDK against the stub and log the fixture user in.
pub fn logged_in_sdk(stub: &StubApi) -> (AgakayiSdk, tempfile::TempDir) {
    let (sdk, tmp) = sdk_for(stub);
    sdk.auth().login(TEST_EMAIL, TEST_PASSWORD).unwrap();
    (sdk, tmp)
}
