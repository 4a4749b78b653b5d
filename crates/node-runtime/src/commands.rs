//! # Request Commands
//!
//! The JSON-lines request protocol. One request object per line:
//!
//! ```text
//! {"command":"request_challenge","address":"0x9f…c2"}
//! {"command":"submit_star","address":"0x9f…c2","message":"0x9f…c2:1700000000:starRegistry","signature":"0x…","star":{"dec":"…"}}
//! ```
//!
//! and one response object per line:
//!
//! ```text
//! {"ok":true,"result":"0x9f…c2:1700000000:starRegistry"}
//! {"ok":false,"error":"Challenge expired: …"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sr_star_ledger::{LedgerError, StarRegistryApi};

/// A request, tagged by its `command` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Cached height counter (number of blocks).
    Height,
    /// Issue an ownership challenge for `address`.
    RequestChallenge { address: String },
    /// Register `star` for `address`, proven by `signature` over `message`.
    SubmitStar {
        address: String,
        message: String,
        signature: String,
        star: Value,
    },
    BlockByHash { hash: String },
    BlockByHeight { height: u64 },
    StarsByAddress { address: String },
    Validate,
}

impl Command {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Height => "height",
            Command::RequestChallenge { .. } => "request_challenge",
            Command::SubmitStar { .. } => "submit_star",
            Command::BlockByHash { .. } => "block_by_hash",
            Command::BlockByHeight { .. } => "block_by_height",
            Command::StarsByAddress { .. } => "stars_by_address",
            Command::Validate => "validate",
        }
    }
}

/// A response line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Success { ok: bool, result: Value },
    Failure { ok: bool, error: String },
}

impl Response {
    pub fn success(result: Value) -> Self {
        Response::Success { ok: true, result }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Response::Failure {
            ok: false,
            error: error.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Success { .. })
    }
}

impl From<LedgerError> for Response {
    fn from(err: LedgerError) -> Self {
        Response::failure(err.to_string())
    }
}

/// Execute one raw request line as read from the wire.
///
/// A line that is not UTF-8 gets a failure response like any other
/// malformed request.
pub fn handle_raw_line<A>(api: &A, line: &[u8]) -> Response
where
    A: StarRegistryApi + ?Sized,
{
    match std::str::from_utf8(line) {
        Ok(text) => handle_line(api, text),
        Err(e) => {
            tracing::debug!(error = %e, "[sr-node] request line is not UTF-8");
            Response::failure(format!("malformed request: {}", e))
        }
    }
}

/// Parse and execute one request line.
pub fn handle_line<A>(api: &A, line: &str) -> Response
where
    A: StarRegistryApi + ?Sized,
{
    match serde_json::from_str::<Command>(line) {
        Ok(command) => dispatch(api, command),
        Err(e) => {
            tracing::debug!(error = %e, "[sr-node] malformed request line");
            Response::failure(format!("malformed request: {}", e))
        }
    }
}

/// Execute `command` against the ledger.
pub fn dispatch<A>(api: &A, command: Command) -> Response
where
    A: StarRegistryApi + ?Sized,
{
    tracing::debug!(command = command.name(), "[sr-node] dispatching");

    match command {
        Command::Height => Response::success(Value::from(api.get_height())),
        Command::RequestChallenge { address } => {
            Response::success(Value::String(api.request_ownership_challenge(&address)))
        }
        Command::SubmitStar {
            address,
            message,
            signature,
            star,
        } => to_response(api.submit_entry(&address, &message, &signature, star)),
        Command::BlockByHash { hash } => to_response(api.find_by_hash(&hash)),
        Command::BlockByHeight { height } => encode(&api.find_by_height(height)),
        Command::StarsByAddress { address } => encode(&api.list_entries_by_identity(&address)),
        Command::Validate => to_response(api.validate()),
    }
}

fn to_response<T: Serialize>(result: Result<T, LedgerError>) -> Response {
    match result {
        Ok(value) => encode(&value),
        Err(e) => e.into(),
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Response {
    match serde_json::to_value(value) {
        Ok(value) => Response::success(value),
        Err(e) => Response::failure(format!("failed to encode result: {}", e)),
    }
}
