//! Concurrent verification of a whole release.

use dotup_feed::TaggedArtifact;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::{FetchError, Result};
use crate::http::HttpClient;
use crate::verify::{VerifiedArtifact, verify_artifact};

/// Verify every artifact of a release concurrently and wait for all of them.
///
/// Each artifact gets its own client from `client_for`, so concurrent
/// downloads never contend on shared connection state. Sibling verifications
/// complete in any order; the join point drains every task before returning,
/// and the first failure wins. On success the results come back in input
/// order regardless of completion order.
pub async fn verify_release<C, F>(
    artifacts: Vec<TaggedArtifact>,
    cancel: &CancellationToken,
    mut client_for: F,
) -> Result<Vec<VerifiedArtifact>>
where
    C: HttpClient + 'static,
    F: FnMut() -> C,
{
    let count = artifacts.len();
    let mut tasks = JoinSet::new();
    for (index, artifact) in artifacts.into_iter().enumerate() {
        let client = client_for();
        let cancel = cancel.clone();
        tasks.spawn(async move {
            verify_artifact(&client, &artifact, &cancel)
                .await
                .map(|verified| (index, verified))
        });
    }

    let mut verified: Vec<Option<VerifiedArtifact>> = (0..count).map(|_| None).collect();
    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok((index, artifact))) => {
                verified[index] = Some(artifact);
            }
            Ok(Err(error)) => {
                first_error.get_or_insert(error);
            }
            Err(join_error) => {
                first_error.get_or_insert(FetchError::TaskJoin(join_error.to_string()));
            }
        }
    }

    match first_error {
        Some(error) => Err(error),
        // Every task either filled its slot or set first_error above.
        None => Ok(verified.into_iter().flatten().collect()),
    }
}
