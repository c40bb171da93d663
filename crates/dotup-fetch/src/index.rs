//! Fetching and decoding the release catalog.

use dotup_feed::ReleaseIndex;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::error::{FetchError, Result};
use crate::http::HttpClient;

/// GET the release catalog and decode it.
///
/// The body is drained chunk by chunk so cancellation is observed mid
/// transfer, then decoded in one step.
pub async fn fetch_release_index<C: HttpClient>(
    client: &C,
    url: &str,
    cancel: &CancellationToken,
) -> Result<ReleaseIndex> {
    let mut stream = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(FetchError::cancelled(url)),
        opened = client.stream(url) => opened.map_err(|e| FetchError::network(url, e))?,
    };

    let mut body = Vec::new();
    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::cancelled(url)),
            next = stream.next() => match next {
                Some(chunk) => chunk.map_err(|e| FetchError::network(url, e))?,
                None => break,
            },
        };
        body.extend_from_slice(&chunk);
    }

    Ok(serde_json::from_slice(&body)?)
}
