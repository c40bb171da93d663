//! Release version parsing and formatting for the dotnet metadata feed.
//!
//! The feed encodes versions as `major.minor.patch`, optionally followed by a
//! fourth revision component or a pre-release suffix (`8.0.101`, `6.0.0.1`,
//! `8.0.100-rc.2`). Parsing never fails: unrecognized input yields the
//! all-zero [`ReleaseVersion::UNDEFINED`] sentinel, and callers that treat an
//! undefined version as an error check [`ReleaseVersion::is_undefined`].

pub use self::version::ReleaseVersion;

mod version;
