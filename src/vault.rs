use std::collections::BTreeMap;

use hmac::Mac;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::coefficients::CoefficientStream;
use crate::config::Config;
use crate::encoding::{decode_share, encode_share};
use crate::envelope::{AuthKey, Envelope, HmacSha256};
use crate::error::{Result, ShamirError};
use crate::shamir::{
    MAX_SHARES, MIN_THRESHOLD, Share, reconstruct, split, validate_share_parameters,
};

/// Domain-separation label for the envelope authentication key
pub const AUTH_KEY_LABEL: &[u8] = b"shamir_vault/envelope-auth/v1";
/// Label hashed into the (public) PBKDF2 salt for passphrase splitting
pub const PASSPHRASE_SALT_LABEL: &[u8] = b"shamir_vault/passphrase-salt/v1";
/// Length of the key derived from a passphrase
pub const PASSPHRASE_KEY_LEN: usize = 32;

/// Derives the envelope authentication key for a secret
///
/// `HMAC-SHA256(key = AUTH_KEY_LABEL, message = secret)`. Shares only
/// authenticate against each other when they decode to the same secret.
pub fn derive_auth_key(secret: &[u8]) -> AuthKey {
    let mut mac =
        HmacSha256::new_from_slice(AUTH_KEY_LABEL).expect("HMAC accepts keys of any length");
    mac.update(secret);
    AuthKey::from_bytes(mac.finalize().into_bytes().into())
}

/// Derives a 32-byte key from a passphrase with PBKDF2-HMAC-SHA256
///
/// The salt is `SHA-256(PASSPHRASE_SALT_LABEL)`: fixed and public, so the same
/// passphrase always yields the same key and the same shares.
pub fn derive_passphrase_key(text: &str, iterations: u32) -> [u8; PASSPHRASE_KEY_LEN] {
    let salt = Sha256::digest(PASSPHRASE_SALT_LABEL);
    let mut key = [0u8; PASSPHRASE_KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(text.as_bytes(), &salt, iterations, &mut key);
    key
}

/// Unauthenticated description of an encoded share
///
/// Nothing here is trustworthy until the share has been used in a successful
/// [`recover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareInfo {
    pub version: u8,
    pub index: u8,
    pub threshold: u8,
    /// Equal to the length of the secret for genuine shares
    pub payload_len: usize,
}

/// Decodes a share and reports its header fields without authenticating it
///
/// # Example
/// ```
/// use shamir_vault::{inspect, share};
///
/// let shares = share(b"hello world", 3, 5).unwrap();
/// let info = inspect(&shares[&2]).unwrap();
/// assert_eq!((info.index, info.threshold, info.payload_len), (2, 3, 11));
/// ```
pub fn inspect(encoded: &str) -> Result<ShareInfo> {
    let envelope = Envelope::parse(&decode_share(encoded)?)?;
    Ok(ShareInfo {
        version: envelope.version,
        index: envelope.index,
        threshold: envelope.threshold,
        payload_len: envelope.payload_len(),
    })
}

/// Authenticated Shamir's Secret Sharing scheme
///
/// Splits secrets into base64-encoded, self-authenticating shares. Any
/// `threshold` of them recover the secret; tampered shares, or shares of
/// different secrets, are rejected with [`ShamirError::Tampered`].
///
/// Splitting is deterministic: the same secret always produces the same
/// shares.
///
/// # Example
/// ```
/// use shamir_vault::ShamirShare;
///
/// // Create a scheme with 5 total shares and threshold of 3
/// let scheme = ShamirShare::builder(5, 3).build().unwrap();
///
/// let shares = scheme.share(b"my secret data").unwrap();
/// assert_eq!(shares.len(), 5);
///
/// // Reconstruct with 3 shares
/// let subset = [&shares[&1], &shares[&4], &shares[&5]];
/// let secret = ShamirShare::recover(subset).unwrap();
/// assert_eq!(secret, b"my secret data");
/// ```
#[derive(Debug, Clone)]
pub struct ShamirShare {
    /// Total number of shares to generate
    total_shares: usize,
    /// Minimum number of shares needed for reconstruction
    threshold: usize,
    /// Configuration options for the sharing scheme
    config: Config,
}

/// Builder for creating ShamirShare instances with custom configuration
///
/// # Example
/// ```
/// use shamir_vault::{ShamirShare, Config, SplitMode};
///
/// let config = Config::new().with_mode(SplitMode::Parallel);
///
/// let shamir = ShamirShare::builder(5, 3)
///     .with_config(config)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct ShamirShareBuilder {
    total_shares: usize,
    threshold: usize,
    config: Config,
}

impl ShamirShareBuilder {
    /// Creates a new builder with the specified parameters and default configuration
    ///
    /// # Arguments
    /// * `total_shares` - Total number of shares to create (threshold..=255)
    /// * `threshold` - Minimum shares required for reconstruction (2..=255)
    pub fn new(total_shares: usize, threshold: usize) -> Self {
        Self {
            total_shares,
            threshold,
            config: Config::default(),
        }
    }

    /// Sets a custom configuration for the ShamirShare instance
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Builds the ShamirShare instance with validation
    ///
    /// # Errors
    /// Returns `ShamirError` if:
    /// - `threshold` is outside 2..=255
    /// - `total_shares` exceeds 255
    /// - `threshold` > `total_shares`
    /// - Configuration validation fails
    pub fn build(self) -> Result<ShamirShare> {
        validate_share_parameters(self.threshold, self.total_shares)?;
        self.config.validate()?;

        Ok(ShamirShare {
            total_shares: self.total_shares,
            threshold: self.threshold,
            config: self.config,
        })
    }
}

impl ShamirShare {
    /// Creates a builder for configuring a ShamirShare instance
    pub fn builder(total_shares: usize, threshold: usize) -> ShamirShareBuilder {
        ShamirShareBuilder::new(total_shares, threshold)
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn total_shares(&self) -> usize {
        self.total_shares
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Splits a secret into encoded, authenticated shares keyed by share index
    ///
    /// The authentication key is derived from the secret under
    /// [`AUTH_KEY_LABEL`] and the polynomial coefficients are drawn from a
    /// [`CoefficientStream`] keyed by `SHA-256(secret)`.
    ///
    /// # Errors
    /// Returns [`ShamirError::InvalidSecretLength`] unless the secret is
    /// 1..=65535 bytes long.
    pub fn share(&self, secret: &[u8]) -> Result<BTreeMap<u8, String>> {
        debug!(
            threshold = self.threshold,
            total_shares = self.total_shares,
            secret_len = secret.len(),
            "splitting secret"
        );

        let mut rng = CoefficientStream::from_secret(secret);
        let shares = split(
            secret,
            self.threshold,
            self.total_shares,
            &mut rng,
            self.config.mode,
        )?;

        let auth_key = derive_auth_key(secret);
        shares
            .into_iter()
            .map(|share| -> Result<(u8, String)> {
                let envelope =
                    Envelope::create(share.index, self.threshold as u8, &share.data, &auth_key)?;
                Ok((share.index, encode_share(&envelope)))
            })
            .collect()
    }

    /// Derives a 32-byte key from a passphrase and splits it
    ///
    /// Recovering the returned shares yields the derived key, never the
    /// passphrase itself.
    pub fn passphrase(&self, text: &str) -> Result<BTreeMap<u8, String>> {
        if text.is_empty() {
            return Err(ShamirError::InvalidSecretLength(0));
        }
        debug!(iterations = self.config.kdf_iterations, "deriving passphrase key");
        let key = derive_passphrase_key(text, self.config.kdf_iterations);
        self.share(&key)
    }

    /// Recovers and authenticates a secret from encoded shares
    ///
    /// Accepts any iterable of share strings, e.g. `shares.values()` of the
    /// map returned by [`ShamirShare::share`].
    pub fn recover<I, S>(shares: I) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::recover_with_config(shares, &Config::default())
    }

    /// Recovers a secret using the processing mode from `config`
    ///
    /// Shares are decoded and parsed without authentication, checked for
    /// consistency, and interpolated. The authentication key is then derived
    /// from the recovered candidate and every share is verified against it;
    /// the candidate is returned only if all of them pass.
    ///
    /// # Errors
    /// Returns `ShamirError` if:
    /// - fewer than 2 or more than 255 shares are supplied ([`ShamirError::InvalidShareCount`])
    /// - a share is not valid base64 or not a well-formed envelope
    /// - shares disagree on threshold or payload length
    /// - fewer shares than the recorded threshold are supplied
    /// - an index is repeated
    /// - any share fails authentication ([`ShamirError::Tampered`])
    pub fn recover_with_config<I, S>(shares: I, config: &Config) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let encoded: Vec<S> = shares.into_iter().collect();
        if !(MIN_THRESHOLD..=MAX_SHARES).contains(&encoded.len()) {
            return Err(ShamirError::InvalidShareCount(encoded.len()));
        }

        let raw = encoded
            .iter()
            .map(|share| decode_share(share.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let envelopes = raw
            .iter()
            .map(|bytes| Envelope::parse(bytes))
            .collect::<Result<Vec<_>>>()
            .inspect_err(|err| warn!(%err, "rejecting unparseable share"))?;

        let threshold = envelopes[0].threshold;
        if envelopes.iter().any(|e| e.threshold != threshold) {
            return Err(ShamirError::InconsistentThreshold);
        }
        let payload_len = envelopes[0].payload_len();
        if envelopes.iter().any(|e| e.payload_len() != payload_len) {
            return Err(ShamirError::InconsistentShareLength);
        }
        if payload_len == 0 {
            return Err(ShamirError::MalformedEnvelope("empty payload"));
        }

        // Interpolating below the threshold yields garbage; refuse before trying
        if envelopes.len() < threshold as usize {
            return Err(ShamirError::InsufficientShares {
                needed: threshold as usize,
                got: envelopes.len(),
            });
        }

        debug!(
            shares = envelopes.len(),
            threshold,
            payload_len,
            "recovering secret"
        );

        let points: Vec<Share> = envelopes
            .iter()
            .map(|e| Share {
                index: e.index,
                data: e.payload.to_vec(),
            })
            .collect();
        let candidate = reconstruct(&points, config.mode)?;

        let auth_key = derive_auth_key(&candidate);
        for (bytes, envelope) in raw.iter().zip(&envelopes) {
            if let Err(err) = Envelope::verify(bytes, &auth_key) {
                warn!(index = envelope.index, "share failed authentication");
                return Err(err);
            }
        }

        Ok(candidate)
    }
}

/// Splits `secret` into `total_shares` encoded shares, any `threshold` of which recover it
///
/// # Example
/// ```
/// use shamir_vault::{recover, share};
///
/// let shares = share(b"hello world", 3, 5).unwrap();
/// let secret = recover([&shares[&1], &shares[&3], &shares[&5]]).unwrap();
/// assert_eq!(secret, b"hello world");
/// ```
pub fn share(secret: &[u8], threshold: usize, total_shares: usize) -> Result<BTreeMap<u8, String>> {
    ShamirShare::builder(total_shares, threshold)
        .build()?
        .share(secret)
}

/// Recovers a secret from encoded shares; see [`ShamirShare::recover_with_config`]
pub fn recover<I, S>(shares: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ShamirShare::recover(shares)
}

/// Splits a 32-byte key derived from `text` with the default KDF settings
pub fn passphrase(text: &str, threshold: usize, total_shares: usize) -> Result<BTreeMap<u8, String>> {
    ShamirShare::builder(total_shares, threshold)
        .build()?
        .passphrase(text)
}
