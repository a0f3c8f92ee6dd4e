//! Deterministic, self-authenticating Shamir's Secret Sharing
//!
//! This library splits a secret into shares so that any `threshold` of them
//! reconstruct it exactly, while fewer reveal nothing about it. Every share is
//! wrapped in an HMAC-SHA256 envelope keyed by a value derived from the
//! secret itself, so tampered shares and shares mixed from different secrets
//! are rejected instead of silently producing a wrong secret.
//!
//! Splitting is deterministic: the same secret always produces the same
//! shares. Two share sets can therefore be compared to learn whether they
//! protect the same secret.
//!
//! # Quick Start
//!
//! ```
//! use shamir_vault::{FileShareStore, ShareStore, recover, share};
//!
//! // Split a secret into 5 shares with threshold 3
//! let secret = b"my secret data";
//! let shares = share(secret, 3, 5).unwrap();
//!
//! // Store shares
//! let temp_dir = tempfile::tempdir().unwrap();
//! let mut store = FileShareStore::new(temp_dir.path()).unwrap();
//! store.store_all(&shares).unwrap();
//!
//! // Reconstruct from 3 shares
//! let loaded_shares = vec![
//!     store.load_share(1).unwrap(),
//!     store.load_share(2).unwrap(),
//!     store.load_share(3).unwrap(),
//! ];
//! let reconstructed = recover(&loaded_shares).unwrap();
//! assert_eq!(reconstructed, secret);
//! ```

mod coefficients;
mod config;
mod encoding;
mod envelope;
mod error;
mod finite_field;
mod shamir;
mod storage;
mod vault;

pub use coefficients::CoefficientStream;
pub use config::{Config, DEFAULT_KDF_ITERATIONS, SplitMode};
pub use encoding::{decode_share, encode_share};
pub use envelope::{AuthKey, ENVELOPE_VERSION, Envelope, HEADER_LEN, MAX_PAYLOAD_LEN, TAG_LEN};
pub use error::{ErrorKind, Result, ShamirError};
pub use finite_field::{FiniteField, eval_polynomial, lagrange_basis};
pub use shamir::{MAX_SECRET_LEN, MAX_SHARES, MIN_THRESHOLD, Share, reconstruct, split};
pub use storage::{FileShareStore, ShareStore};
pub use vault::{
    AUTH_KEY_LABEL, PASSPHRASE_KEY_LEN, PASSPHRASE_SALT_LABEL, ShamirShare, ShamirShareBuilder,
    ShareInfo, derive_auth_key, derive_passphrase_key, inspect, passphrase, recover, share,
};

// Re-export common types for convenience
pub mod prelude {
    pub use super::{
        Config, ErrorKind, FileShareStore, Result, ShamirError, ShamirShare, ShareStore,
        SplitMode, recover, share,
    };
}
