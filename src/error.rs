use std::io;
use thiserror::Error;

/// Broad classification of a [`ShamirError`]
///
/// Lets callers tell "need more shares" apart from "data is corrupt" without
/// matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Parameters out of bounds, rejected before any work is done
    Validation,
    /// Share text or envelope structure is unusable, or shares disagree
    Malformed,
    /// Fewer shares than the recorded threshold
    InsufficientShares,
    /// Authentication failed after reconstruction
    Tampering,
    /// Share store I/O failure
    Storage,
}

/// Error type for secret sharing operations
#[derive(Error, Debug)]
pub enum ShamirError {
    /// Invalid threshold value (must be 2 <= threshold <= 255)
    #[error("Invalid threshold value {0}, expected 2..=255")]
    InvalidThreshold(usize),

    /// Share count outside 2..=255
    #[error("Invalid share count {0}, expected 2..=255")]
    InvalidShareCount(usize),

    /// Threshold exceeds total shares
    #[error("Threshold {threshold} exceeds total shares {total_shares}")]
    ThresholdTooLarge { threshold: usize, total_shares: usize },

    /// Secret (or passphrase) is empty or longer than 65535 bytes
    #[error("Invalid secret length {0}, expected 1..=65535 bytes")]
    InvalidSecretLength(usize),

    /// Envelope payload longer than the 16-bit length field allows
    #[error("Payload length {0} exceeds 65535 bytes")]
    PayloadTooLarge(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Share text is not valid base64
    #[error("Invalid share encoding: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// Envelope bytes do not follow the binary layout
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(&'static str),

    /// Supplied shares record different thresholds
    #[error("Inconsistent share thresholds")]
    InconsistentThreshold,

    /// Inconsistent share lengths
    #[error("Inconsistent share lengths")]
    InconsistentShareLength,

    /// The same share index was supplied twice
    #[error("Duplicate share index {0}")]
    DuplicateShareIndex(u8),

    /// Invalid share index requested
    #[error("Invalid share index {0}")]
    InvalidShareIndex(u8),

    /// Insufficient shares for reconstruction
    #[error("Need at least {needed} shares, got {got}")]
    InsufficientShares { needed: usize, got: usize },

    /// A share failed authentication against the recovered secret
    #[error("Share authentication failed: shares are corrupted or belong to different secrets")]
    Tampered,

    /// General I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl ShamirError {
    /// Returns the broad category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidThreshold(_)
            | Self::InvalidShareCount(_)
            | Self::ThresholdTooLarge { .. }
            | Self::InvalidSecretLength(_)
            | Self::PayloadTooLarge(_)
            | Self::InvalidConfig(_) => ErrorKind::Validation,
            Self::InvalidEncoding(_)
            | Self::MalformedEnvelope(_)
            | Self::InconsistentThreshold
            | Self::InconsistentShareLength
            | Self::DuplicateShareIndex(_)
            | Self::InvalidShareIndex(_) => ErrorKind::Malformed,
            Self::InsufficientShares { .. } => ErrorKind::InsufficientShares,
            Self::Tampered => ErrorKind::Tampering,
            Self::IoError(_) => ErrorKind::Storage,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShamirError>;
