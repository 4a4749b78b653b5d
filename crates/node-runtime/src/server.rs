//! # Request Loop
//!
//! Reads request lines as raw bytes and writes one response line for each.
//! A bad line (not UTF-8, not JSON, unknown command) is answered with a
//! failure response; only I/O errors end the loop early.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::commands::handle_raw_line;
use sr_star_ledger::StarRegistryApi;

/// Answer requests from `input` on `output` until `input` reaches EOF.
pub async fn serve<A, R, W>(api: Arc<A>, input: R, mut output: W) -> Result<()>
where
    A: StarRegistryApi + 'static,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(input);

    loop {
        let mut line = Vec::new();
        let read = reader
            .read_until(b'\n', &mut line)
            .await
            .context("failed to read request")?;
        if read == 0 {
            tracing::info!("[sr-node] end of input");
            return Ok(());
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        // Submissions hold the chain's write lock; keep them off the reactor.
        let api = Arc::clone(&api);
        let response = tokio::task::spawn_blocking(move || handle_raw_line(api.as_ref(), &line))
            .await
            .context("request task failed")?;

        let mut encoded = serde_json::to_vec(&response).context("failed to encode response")?;
        encoded.push(b'\n');
        output
            .write_all(&encoded)
            .await
            .context("failed to write response")?;
        output.flush().await.context("failed to flush response")?;
    }
}
