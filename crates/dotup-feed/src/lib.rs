//! Release-metadata feed model and latest-release resolution.
//!
//! Mirrors the shape of the upstream `releases.json` catalog: a list of
//! releases plus four `latest-*` pointer fields. Resolution selects the
//! single release matching all four pointers, and artifact selection turns a
//! release's components into tagged download descriptors for the 64-bit Linux
//! architectures the build rules consume.
//!
//! Parsed records are never mutated; selection builds fresh
//! [`TaggedArtifact`] values instead of tagging the catalog in place.

pub use self::error::FeedError;
pub use self::model::{
    Arch, ArtifactRecord, ComponentKind, Release, ReleaseComponent, ReleaseIndex, TaggedArtifact,
};
pub use self::resolve::{resolve_latest, select_artifacts};

pub mod date;
mod error;
mod model;
mod resolve;
