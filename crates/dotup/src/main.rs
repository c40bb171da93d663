//! dotup: refresh dotnet build metadata.
//!
//! Resolves the latest release from the upstream metadata feed, verifies
//! every Linux artifact by streaming it through SHA-512 and SHA-256 in a
//! single pass, then regenerates the Bazel archive manifest and patches the
//! container-structure-test fixtures.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dotup_feed::{resolve_latest, select_artifacts};
use dotup_fetch::{ReqwestClient, fetch_release_index, verify_release};
use tokio_util::sync::CancellationToken;

use crate::cli::Cli;

mod cli;
mod logging;
mod manifest;
mod patch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Cli::parse();

    // One deadline spans the whole run; everything downstream observes the
    // token at its suspension points.
    let cancel = CancellationToken::new();
    let deadline = tokio::spawn({
        let cancel = cancel.clone();
        let timeout = Duration::from_secs(args.timeout);
        async move {
            tokio::time::sleep(timeout).await;
            tracing::warn!("run deadline expired, cancelling");
            cancel.cancel();
        }
    });

    let result = run(&args, &cancel).await;
    deadline.abort();
    result
}

async fn run(args: &Cli, cancel: &CancellationToken) -> anyhow::Result<()> {
    // The feed client lives only for this run; per-artifact clients are
    // constructed inside the verification tasks.
    let client = ReqwestClient::new();
    let feed_url = args.feed_url();
    let index = fetch_release_index(&client, &feed_url, cancel)
        .await
        .with_context(|| format!("fetching release catalog from {feed_url}"))?;

    let release = resolve_latest(&index).context("resolving the latest release")?;
    tracing::info!(
        version = %release.release_version,
        sdk = %release.sdk.version,
        date = %release.release_date,
        security = release.security,
        "resolved latest release"
    );

    let artifacts = select_artifacts(release).context("selecting Linux artifacts")?;
    let verified = verify_release(artifacts, cancel, ReqwestClient::new)
        .await
        .context("verifying release artifacts")?;

    manifest::write_archives(&args.archives, &args.channel, &verified)
        .await
        .with_context(|| format!("writing archive manifest {}", args.archives.display()))?;
    tracing::info!(
        path = %args.archives.display(),
        rules = verified.len(),
        "archive manifest regenerated"
    );

    let patched = patch::patch_fixtures(
        &args.testdata,
        &release.sdk.version,
        &release.release_version,
        cancel,
    )
    .await
    .with_context(|| format!("patching fixtures under {}", args.testdata.display()))?;
    tracing::info!(dir = %args.testdata.display(), files = patched, "fixtures patched");

    Ok(())
}
