//! Serde model of the upstream release catalog.

use std::fmt;

use chrono::NaiveDate;
use dotup_version::ReleaseVersion;
use serde::Deserialize;
use url::Url;

use crate::date;

/// The full upstream catalog: every known release plus the four pointer
/// fields declaring which one is current.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseIndex {
    pub releases: Vec<Release>,
    #[serde(rename = "latest-release")]
    pub latest_release: ReleaseVersion,
    #[serde(rename = "latest-runtime")]
    pub latest_runtime: ReleaseVersion,
    #[serde(rename = "latest-sdk")]
    pub latest_sdk: ReleaseVersion,
    #[serde(rename = "latest-release-date", deserialize_with = "date::deserialize")]
    pub latest_release_date: NaiveDate,
}

/// One published release: date, version, and the three component groups.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    #[serde(rename = "release-date", deserialize_with = "date::deserialize")]
    pub release_date: NaiveDate,
    #[serde(rename = "release-version")]
    pub release_version: ReleaseVersion,
    #[serde(default)]
    pub security: bool,
    #[serde(rename = "release-notes", default)]
    pub release_notes: Option<Url>,
    pub runtime: ReleaseComponent,
    pub sdk: ReleaseComponent,
    #[serde(rename = "aspnetcore-runtime")]
    pub aspnetcore_runtime: ReleaseComponent,
}

/// A named distributable part of a release (sdk, runtime, ...) with its own
/// version and per-platform artifact records.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseComponent {
    pub version: ReleaseVersion,
    pub files: Vec<ArtifactRecord>,
}

/// One downloadable binary as published by the feed. Immutable after parse.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactRecord {
    #[serde(default)]
    pub name: String,
    /// Upstream's OS+architecture key, e.g. `linux-x64`. Absent on a few
    /// historical entries.
    #[serde(default)]
    pub rid: Option<String>,
    pub url: Url,
    /// Upstream-declared SHA-512 digest, hex.
    pub hash: String,
}

/// The component groups the build rules care about, with their stable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Sdk,
    Aspnetcore,
    Runtime,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Sdk => "sdk",
            ComponentKind::Aspnetcore => "aspnetcore",
            ComponentKind::Runtime => "runtime",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved target architectures for the generated build rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Arch {
    /// The tag embedded in generated rule names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }

    /// The upstream platform identifier this architecture is sourced from.
    pub fn rid(&self) -> &'static str {
        match self {
            Arch::Amd64 => "linux-x64",
            Arch::Arm64 => "linux-arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A download descriptor selected for verification: the component group and
/// architecture it will be published under, plus the upstream source.
///
/// Built fresh from an [`ArtifactRecord`] during selection; the parsed
/// catalog itself is never tagged in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedArtifact {
    pub component: ComponentKind,
    pub arch: Arch,
    pub url: Url,
    /// Upstream-declared SHA-512 digest, hex.
    pub reference_digest: String,
}

impl TaggedArtifact {
    pub(crate) fn from_record(
        component: ComponentKind,
        arch: Arch,
        record: &ArtifactRecord,
    ) -> Self {
        Self {
            component,
            arch,
            url: record.url.clone(),
            reference_digest: record.hash.clone(),
        }
    }
}
