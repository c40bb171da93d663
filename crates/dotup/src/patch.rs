//! In-place version patching of container-structure-test fixtures.

use std::path::{Path, PathBuf};

use dotup_version::ReleaseVersion;
use globset::{Glob, GlobMatcher};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Fixture files to patch; the directory is not searched recursively.
const FIXTURE_GLOB: &str = "*.yaml";

static FIXTURE_MATCHER: Lazy<GlobMatcher> =
    Lazy::new(|| Glob::new(FIXTURE_GLOB).unwrap().compile_matcher());

/// SDK versions in the fixtures look like `8.0.101 \`, release versions like
/// `8.0.1 \`; the trailing backslash is the fixture's line continuation and
/// is consumed by the substitution.
static SDK_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d\.\d\.\d{3}\s*\\+").unwrap());
static RELEASE_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d\.\d\.\d\s*\\+").unwrap());

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("no fixture files matching {glob} under {dir}")]
    NoFixtureFiles { dir: PathBuf, glob: &'static str },

    #[error("patching {path} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture patching cancelled")]
    Cancelled,

    #[error("patch task failed: {0}")]
    TaskJoin(String),
}

/// Substitute the fresh SDK and release versions into every fixture file.
///
/// Files are patched concurrently and rewritten whole (plain UTF-8, no
/// byte-order marker). Re-running with the same versions leaves the files
/// unchanged. Returns the number of files patched.
pub async fn patch_fixtures(
    dir: &Path,
    sdk_version: &ReleaseVersion,
    release_version: &ReleaseVersion,
    cancel: &CancellationToken,
) -> Result<usize, PatchError> {
    let files = fixture_files(dir).await?;
    if files.is_empty() {
        return Err(PatchError::NoFixtureFiles {
            dir: dir.to_path_buf(),
            glob: FIXTURE_GLOB,
        });
    }

    let count = files.len();
    let sdk = sdk_version.to_string();
    let release = release_version.to_string();
    let mut tasks = JoinSet::new();
    for path in files {
        let sdk = sdk.clone();
        let release = release.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move { patch_one(&path, &sdk, &release, &cancel).await });
    }

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                first_error.get_or_insert(error);
            }
            Err(join_error) => {
                first_error.get_or_insert(PatchError::TaskJoin(join_error.to_string()));
            }
        }
    }

    match first_error {
        Some(error) => Err(error),
        None => Ok(count),
    }
}

/// Top-level fixture files matching the glob, in directory order.
async fn fixture_files(dir: &Path) -> Result<Vec<PathBuf>, PatchError> {
    let io_err = |source| PatchError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        if !entry.file_type().await.map_err(io_err)?.is_file() {
            continue;
        }
        if FIXTURE_MATCHER.is_match(Path::new(&entry.file_name())) {
            files.push(entry.path());
        }
    }
    Ok(files)
}

async fn patch_one(
    path: &Path,
    sdk: &str,
    release: &str,
    cancel: &CancellationToken,
) -> Result<(), PatchError> {
    let io_err = |source| PatchError::Io {
        path: path.to_path_buf(),
        source,
    };

    if cancel.is_cancelled() {
        return Err(PatchError::Cancelled);
    }
    let contents = tokio::fs::read_to_string(path).await.map_err(io_err)?;

    // SDK pattern first: its three-digit patch component would otherwise be
    // partially matched by the release pattern.
    let patched = SDK_VERSION.replace_all(&contents, NoExpand(sdk));
    let patched = RELEASE_VERSION.replace_all(&patched, NoExpand(release));

    if cancel.is_cancelled() {
        return Err(PatchError::Cancelled);
    }
    tokio::fs::write(path, patched.as_bytes()).await.map_err(io_err)
}
