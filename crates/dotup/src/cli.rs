//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Refresh dotnet build metadata: verify the latest release's Linux artifacts
/// and regenerate the Bazel archive manifest and test fixtures.
#[derive(Debug, Parser)]
#[command(name = "dotup", version, about)]
pub struct Cli {
    /// Release channel of the metadata feed.
    #[arg(long, default_value = "8.0")]
    pub channel: String,

    /// Path of the Bazel archive manifest to regenerate.
    #[arg(long, default_value = "experimental/dotnet/dotnet_archives.bzl")]
    pub archives: PathBuf,

    /// Directory of container-structure-test fixtures to patch.
    #[arg(long, default_value = "experimental/dotnet/testdata")]
    pub testdata: PathBuf,

    /// Overall run deadline in seconds; in-flight work is abandoned once it
    /// expires.
    #[arg(long, default_value_t = 120)]
    pub timeout: u64,
}

impl Cli {
    /// The versioned catalog endpoint for the selected channel.
    pub fn feed_url(&self) -> String {
        format!(
            "https://dotnetcli.blob.core.windows.net/dotnet/release-metadata/{}/releases.json",
            self.channel
        )
    }
}
