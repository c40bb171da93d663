//! Streaming artifact verification for the update pipeline.
//!
//! The hard part of refreshing build metadata is proving that every binary
//! the new rules will point at is the binary the feed declared. This crate
//! downloads each artifact once, feeds the byte stream through the SHA-512
//! verification digest and the SHA-256 build digest in a single pass, retries
//! transient failures a bounded number of times, and fans the work out across
//! all artifacts of a release behind one join point.
//!
//! HTTP access sits behind the [`HttpClient`] trait so the pipeline runs
//! against mock transports in tests; [`ReqwestClient`] is the production
//! implementation.

pub use self::error::{FetchError, Result};
pub use self::http::{BoxStream, HttpClient, ReqwestClient};
pub use self::index::fetch_release_index;
pub use self::release::verify_release;
pub use self::retry::{MAX_ATTEMPTS, retry_delay};
pub use self::verify::{VerifiedArtifact, verify_artifact};

mod error;
mod http;
mod index;
mod release;
mod retry;
mod verify;
