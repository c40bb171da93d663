//! Release version type and sentinel-based parsing.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

static VERSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?<major>[0-9]+)\.(?<minor>[0-9]+)\.(?<patch>[0-9]+)(?:\.(?<revision>[0-9]+)|(?<suffix>-[-_.0-9a-zA-Z]+))?$",
    )
    .unwrap()
});

/// A release version from the metadata feed.
///
/// Either `major.minor.patch`, `major.minor.patch.revision`, or
/// `major.minor.patch-suffix`. A revision and a suffix never occur together.
/// Equality is structural over the numeric tuple and the suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ReleaseVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub revision: u64,
    pub suffix: String,
}

impl ReleaseVersion {
    /// The sentinel returned for unparseable input.
    pub const UNDEFINED: ReleaseVersion = ReleaseVersion {
        major: 0,
        minor: 0,
        patch: 0,
        revision: 0,
        suffix: String::new(),
    };

    /// Create a plain three-component version.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            revision: 0,
            suffix: String::new(),
        }
    }

    /// Parse a version string.
    ///
    /// Never fails: anything that is not a recognized version form maps to
    /// [`ReleaseVersion::UNDEFINED`].
    pub fn parse(s: &str) -> Self {
        let Some(caps) = VERSION_REGEX.captures(s) else {
            return Self::UNDEFINED;
        };

        let component = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u64>().ok());

        let parsed = component("major").and_then(|major| {
            let minor = component("minor")?;
            let patch = component("patch")?;
            let revision = match caps.name("revision") {
                Some(m) => m.as_str().parse::<u64>().ok()?,
                None => 0,
            };
            Some(ReleaseVersion {
                major,
                minor,
                patch,
                revision,
                suffix: caps
                    .name("suffix")
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            })
        });

        parsed.unwrap_or(Self::UNDEFINED)
    }

    /// True for the all-zero, empty-suffix sentinel.
    pub fn is_undefined(&self) -> bool {
        *self == Self::UNDEFINED
    }
}

impl fmt::Display for ReleaseVersion {
    /// Renders `major.minor.patch` plus the suffix verbatim.
    ///
    /// The revision component is deliberately not rendered; a parse-format
    /// round trip is lossy on revision.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}{}", self.major, self.minor, self.patch, self.suffix)
    }
}

impl std::str::FromStr for ReleaseVersion {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ReleaseVersion::parse(s))
    }
}

impl<'de> Deserialize<'de> for ReleaseVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ReleaseVersion::parse(&s))
    }
}

impl Serialize for ReleaseVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
