//! Bazel archive manifest generation.
//!
//! Emits one `http_archive` rule per verified artifact. Only
//! [`VerifiedArtifact`]s are accepted, so a rule can never be generated for a
//! download that did not pass integrity verification.

use std::fmt::Write as _;
use std::path::Path;

use dotup_fetch::VerifiedArtifact;

/// Build-file label every generated rule points at.
const BUILD_FILE: &str = "//experimental/dotnet:BUILD.dotnet";

/// Render the complete manifest: a load header plus one rule block per
/// artifact, named `dotnet-<major>-<minor>_<component>_<arch>`.
pub fn render_archives(channel: &str, artifacts: &[VerifiedArtifact]) -> String {
    let prefix = format!("dotnet-{}", channel.replace('.', "-"));

    let mut out = String::from(
        "load(\"@bazel_tools//tools/build_defs/repo:http.bzl\", \"http_archive\")\n\
         \n\
         # autogenerated by dotup; do not edit by hand\n\
         def repositories():\n",
    );
    for verified in artifacts {
        let artifact = &verified.artifact;
        // String formatting cannot fail here.
        let _ = write!(
            out,
            "\n    \
             http_archive(\n        \
             name = \"{prefix}_{component}_{arch}\",\n        \
             build_file = \"{BUILD_FILE}\",\n        \
             sha256 = \"{sha256}\",\n        \
             type = \"tar.gz\",\n        \
             urls = [\"{url}\"],\n    \
             )\n",
            component = artifact.component,
            arch = artifact.arch,
            sha256 = verified.build_digest,
            url = artifact.url,
        );
    }
    out
}

/// Replace the manifest wholesale; plain UTF-8, no byte-order marker.
pub async fn write_archives(
    path: &Path,
    channel: &str,
    artifacts: &[VerifiedArtifact],
) -> std::io::Result<()> {
    tokio::fs::write(path, render_archives(channel, artifacts)).await
}
