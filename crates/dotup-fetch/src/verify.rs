//! Streaming dual-digest verification of one artifact.

use dotup_feed::TaggedArtifact;
use dotup_verify::{Sha256Hasher, Sha512Hasher, TeeHasher};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::error::{FetchError, Result};
use crate::http::HttpClient;
use crate::retry::{MAX_ATTEMPTS, RETRY_BASE, retry_delay};

/// An artifact that passed integrity verification, carrying the digest the
/// build rules embed. The only input manifest generation accepts, so an
/// unverified artifact cannot reach the generated rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedArtifact {
    pub artifact: TaggedArtifact,
    /// SHA-256 of the verified content, hex.
    pub build_digest: String,
}

/// Download an artifact once, verify it against the feed's SHA-512, and
/// produce the SHA-256 the build rules embed.
///
/// Every attempt streams the body exactly once, feeding each chunk to both
/// digest states together and draining to exhaustion before finalizing. Any
/// failure (network, truncated stream, digest mismatch) retries from scratch
/// with exponential backoff, up to [`MAX_ATTEMPTS`] total attempts; the last
/// error is propagated once the attempts are exhausted. Cancellation is
/// observed between attempts and at every chunk read.
pub async fn verify_artifact<C: HttpClient>(
    client: &C,
    artifact: &TaggedArtifact,
    cancel: &CancellationToken,
) -> Result<VerifiedArtifact> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match verify_once(client, artifact, cancel).await {
            Ok(verified) => {
                tracing::info!(
                    url = %artifact.url,
                    component = %artifact.component,
                    arch = %artifact.arch,
                    "artifact verified"
                );
                return Ok(verified);
            }
            Err(error @ FetchError::Cancelled { .. }) => return Err(error),
            Err(error) => {
                tracing::warn!(url = %artifact.url, attempt, %error, "verification attempt failed");
                if attempt >= MAX_ATTEMPTS {
                    return Err(error);
                }
            }
        }

        let delay = retry_delay(attempt - 1, RETRY_BASE);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::cancelled(artifact.url.as_str())),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

/// One verification attempt: a single pass over the body stream.
async fn verify_once<C: HttpClient>(
    client: &C,
    artifact: &TaggedArtifact,
    cancel: &CancellationToken,
) -> Result<VerifiedArtifact> {
    let url = artifact.url.as_str();

    let mut stream = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(FetchError::cancelled(url)),
        opened = client.stream(url) => opened.map_err(|e| FetchError::network(url, e))?,
    };

    // Each consumed chunk updates both digest states once; the stream is
    // never read twice and never buffered whole.
    let mut digests = TeeHasher::new(Sha512Hasher::new(), Sha256Hasher::new());
    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::cancelled(url)),
            next = stream.next() => match next {
                Some(chunk) => chunk.map_err(|e| FetchError::network(url, e))?,
                None => break,
            },
        };
        digests.update(&chunk);
    }

    let (verify_digest, build_digest) = digests.finalize();
    let actual = hex::encode(verify_digest);
    if !actual.eq_ignore_ascii_case(&artifact.reference_digest) {
        return Err(FetchError::DigestMismatch {
            url: url.to_string(),
            expected: artifact.reference_digest.clone(),
            actual,
        });
    }

    Ok(VerifiedArtifact {
        artifact: artifact.clone(),
        build_digest: hex::encode(build_digest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::BoxStream;

    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use bytes::Bytes;
    use dotup_feed::{Arch, ComponentKind};
    use futures_util::stream;
    use url::Url;

    const PAYLOAD: &[u8] = b"dotnet sdk archive payload";

    #[derive(Clone)]
    enum Body {
        Payload(Vec<u8>),
        FailMidStream,
        Hang,
    }

    #[derive(Clone)]
    struct MockClient {
        body: Body,
        opens: Arc<AtomicUsize>,
    }

    impl MockClient {
        fn new(body: Body) -> Self {
            Self {
                body,
                opens: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn opens(&self) -> usize {
            self.opens.load(Ordering::SeqCst)
        }
    }

    impl HttpClient for MockClient {
        type Error = io::Error;

        async fn stream(
            &self,
            _url: &str,
        ) -> std::result::Result<BoxStream<'static, std::result::Result<Bytes, Self::Error>>, Self::Error>
        {
            self.opens.fetch_add(1, Ordering::SeqCst);
            match &self.body {
                Body::Payload(data) => {
                    // Two chunks, so incremental hashing is exercised.
                    let mid = data.len() / 2;
                    let chunks = vec![
                        Ok(Bytes::copy_from_slice(&data[..mid])),
                        Ok(Bytes::copy_from_slice(&data[mid..])),
                    ];
                    Ok(Box::pin(stream::iter(chunks)))
                }
                Body::FailMidStream => {
                    let chunks = vec![
                        Ok(Bytes::from_static(b"partial")),
                        Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
                    ];
                    Ok(Box::pin(stream::iter(chunks)))
                }
                Body::Hang => Ok(Box::pin(stream::pending::<
                    std::result::Result<Bytes, Self::Error>,
                >())),
            }
        }
    }

    fn artifact(reference_digest: &str) -> TaggedArtifact {
        TaggedArtifact {
            component: ComponentKind::Sdk,
            arch: Arch::Amd64,
            url: Url::parse("https://builds.example.com/sdk/linux-x64.tar.gz").unwrap(),
            reference_digest: reference_digest.to_string(),
        }
    }

    fn sha512_hex(data: &[u8]) -> String {
        hex::encode(Sha512Hasher::digest(data))
    }

    fn sha256_hex(data: &[u8]) -> String {
        hex::encode(Sha256Hasher::digest(data))
    }

    #[tokio::test]
    async fn verifies_in_a_single_pass() {
        let client = MockClient::new(Body::Payload(PAYLOAD.to_vec()));
        let cancel = CancellationToken::new();

        let verified = verify_artifact(&client, &artifact(&sha512_hex(PAYLOAD)), &cancel)
            .await
            .unwrap();

        assert_eq!(verified.build_digest, sha256_hex(PAYLOAD));
        assert_eq!(client.opens(), 1);
    }

    #[tokio::test]
    async fn reference_digest_compare_ignores_case() {
        let client = MockClient::new(Body::Payload(PAYLOAD.to_vec()));
        let cancel = CancellationToken::new();
        let reference = sha512_hex(PAYLOAD).to_uppercase();

        let verified = verify_artifact(&client, &artifact(&reference), &cancel).await;
        assert!(verified.is_ok());
    }

    #[tokio::test]
    async fn mismatch_exhausts_retries_and_propagates() {
        let client = MockClient::new(Body::Payload(PAYLOAD.to_vec()));
        let cancel = CancellationToken::new();
        let wrong = sha512_hex(b"something else entirely");

        let result = verify_artifact(&client, &artifact(&wrong), &cancel).await;

        match result {
            Err(FetchError::DigestMismatch {
                expected, actual, ..
            }) => {
                assert_eq!(expected, wrong);
                assert_eq!(actual, sha512_hex(PAYLOAD));
            }
            other => panic!("expected digest mismatch, got {other:?}"),
        }
        assert_eq!(client.opens(), MAX_ATTEMPTS as usize);
    }

    #[tokio::test]
    async fn stream_failure_is_attempted_at_most_three_times() {
        let client = MockClient::new(Body::FailMidStream);
        let cancel = CancellationToken::new();

        let result = verify_artifact(&client, &artifact(&sha512_hex(PAYLOAD)), &cancel).await;

        assert!(matches!(result, Err(FetchError::Network { .. })));
        assert_eq!(client.opens(), MAX_ATTEMPTS as usize);
    }

    #[tokio::test]
    async fn cancelled_before_start_never_opens_the_stream() {
        let client = MockClient::new(Body::Payload(PAYLOAD.to_vec()));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = verify_artifact(&client, &artifact(&sha512_hex(PAYLOAD)), &cancel).await;

        assert!(matches!(result, Err(FetchError::Cancelled { .. })));
        assert_eq!(client.opens(), 0);
    }

    #[tokio::test]
    async fn cancellation_aborts_an_in_flight_read() {
        let client = MockClient::new(Body::Hang);
        let cancel = CancellationToken::new();

        let task = {
            let client = client.clone();
            let cancel = cancel.clone();
            let artifact = artifact(&sha512_hex(PAYLOAD));
            tokio::spawn(async move { verify_artifact(&client, &artifact, &cancel).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let result = tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .expect("cancellation should unwind promptly")
            .unwrap();
        assert!(matches!(result, Err(FetchError::Cancelled { .. })));
        assert_eq!(client.opens(), 1);
    }
}
