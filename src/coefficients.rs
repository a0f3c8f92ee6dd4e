//! Deterministic coefficient generator
//!
//! Polynomial coefficients are drawn from a SHA-256 counter stream keyed by a
//! hash of the secret. Splitting the same secret twice therefore produces
//! byte-identical shares, and anyone comparing two share sets learns whether
//! the underlying secrets were equal.

use rand_core::{RngCore, impls};
use sha2::{Digest, Sha256};

/// Size of one SHA-256 output block
pub const BLOCK_SIZE: usize = 32;

/// SHA-256 counter-mode byte stream
///
/// Block `n` is `SHA-256(key || n)` with `n` as a big-endian `u64` starting at
/// zero. Bytes are served in order; a new block is hashed when the current one
/// is exhausted.
///
/// # Example
/// ```
/// use rand_core::RngCore;
/// use shamir_vault::CoefficientStream;
///
/// let mut a = CoefficientStream::new([7u8; 32]);
/// let mut b = CoefficientStream::new([7u8; 32]);
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone)]
pub struct CoefficientStream {
    key: [u8; BLOCK_SIZE],
    counter: u64,
    block: [u8; BLOCK_SIZE],
    position: usize,
}

impl CoefficientStream {
    /// Creates a stream from a fixed 32-byte key
    pub fn new(key: [u8; BLOCK_SIZE]) -> Self {
        Self {
            key,
            counter: 0,
            block: [0u8; BLOCK_SIZE],
            position: BLOCK_SIZE,
        }
    }

    /// Creates a stream keyed by `SHA-256(secret)`
    pub fn from_secret(secret: &[u8]) -> Self {
        Self::new(Sha256::digest(secret).into())
    }

    /// Returns the next byte of the stream
    #[inline]
    pub fn next_byte(&mut self) -> u8 {
        if self.position == BLOCK_SIZE {
            self.refill();
        }
        let byte = self.block[self.position];
        self.position += 1;
        byte
    }

    fn refill(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(self.key);
        hasher.update(self.counter.to_be_bytes());
        self.block = hasher.finalize().into();
        self.counter += 1;
        self.position = 0;
    }
}

impl std::fmt::Debug for CoefficientStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoefficientStream")
            .field("counter", &self.counter)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl RngCore for CoefficientStream {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut filled = 0;
        while filled < dest.len() {
            if self.position == BLOCK_SIZE {
                self.refill();
            }
            let take = (BLOCK_SIZE - self.position).min(dest.len() - filled);
            dest[filled..filled + take]
                .copy_from_slice(&self.block[self.position..self.position + take]);
            self.position += take;
            filled += take;
        }
    }
}
