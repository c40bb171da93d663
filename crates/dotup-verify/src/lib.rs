//! Incremental digest primitives for streamed artifact verification.
//!
//! Provides a minimal [`Hasher`] trait over the digest algorithms the update
//! pipeline needs, plus [`TeeHasher`], which feeds every consumed block to two
//! digest states at once so a download can be verified against its upstream
//! hash and re-hashed for the build system in a single pass over the stream.

pub use self::hasher::{Hasher, Sha256Hasher, Sha512Hasher};
pub use self::tee::TeeHasher;

mod hasher;
mod tee;
