use crate::Hasher;

/// Feeds every block to two digest states in a single traversal.
///
/// The update pipeline verifies a download against the feed's SHA-512 while
/// also producing the SHA-256 the build rules embed; chaining both states
/// behind one `update` call guarantees the stream is read exactly once.
pub struct TeeHasher<A, B> {
    first: A,
    second: B,
}

impl<A: Hasher, B: Hasher> TeeHasher<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.first.update(data);
        self.second.update(data);
    }

    /// Finalize both digests, in constructor order.
    pub fn finalize(self) -> (Vec<u8>, Vec<u8>) {
        (self.first.finalize(), self.second.finalize())
    }
}
