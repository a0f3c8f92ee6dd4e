//! Authenticated share envelope
//!
//! Binary layout, integers big-endian:
//!
//! ```text
//! [1-byte version][1-byte share index][1-byte threshold][2-byte payload length][payload][32-byte HMAC-SHA256 tag]
//! ```
//!
//! The tag covers everything before it.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Result, ShamirError};

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// The only envelope format version this crate reads or writes
pub const ENVELOPE_VERSION: u8 = 1;
/// Version, index, threshold and payload length
pub const HEADER_LEN: usize = 5;
/// HMAC-SHA256 output size
pub const TAG_LEN: usize = 32;
/// Largest payload the 16-bit length field can describe
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Key used to authenticate envelopes
///
/// Derived from a secret value and never stored or transmitted.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthKey([u8; 32]);

impl AuthKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.0).expect("HMAC accepts keys of any length")
    }
}

impl std::fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthKey(..)")
    }
}

/// A parsed share envelope
///
/// Produced by [`Envelope::parse`] (structure only) or [`Envelope::verify`]
/// (structure and tag).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Format version, always [`ENVELOPE_VERSION`] once parsed
    pub version: u8,
    /// Share index (x-coordinate)
    pub index: u8,
    /// Threshold recorded when the secret was split
    pub threshold: u8,
    /// Raw share bytes
    pub payload: Bytes,
    /// Authentication tag as stored
    pub tag: [u8; TAG_LEN],
}

impl Envelope {
    /// Builds an authenticated envelope
    ///
    /// # Errors
    /// Returns [`ShamirError::PayloadTooLarge`] if the payload exceeds 65535 bytes.
    ///
    /// # Example
    /// ```
    /// use shamir_vault::{AuthKey, Envelope, HEADER_LEN, TAG_LEN};
    ///
    /// let key = AuthKey::from_bytes([1u8; 32]);
    /// let bytes = Envelope::create(1, 2, b"payload", &key).unwrap();
    /// assert_eq!(bytes.len(), HEADER_LEN + 7 + TAG_LEN);
    /// assert!(Envelope::verify(&bytes, &key).is_ok());
    /// ```
    pub fn create(index: u8, threshold: u8, payload: &[u8], auth_key: &AuthKey) -> Result<Bytes> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(ShamirError::PayloadTooLarge(payload.len()));
        }

        let mut buf = BytesMut::with_capacity(HEADER_LEN + payload.len() + TAG_LEN);
        buf.put_u8(ENVELOPE_VERSION);
        buf.put_u8(index);
        buf.put_u8(threshold);
        buf.put_u16(payload.len() as u16);
        buf.put_slice(payload);

        let mut mac = auth_key.mac();
        mac.update(&buf);
        buf.put_slice(&mac.finalize().into_bytes());

        Ok(buf.freeze())
    }

    /// Decodes the envelope layout without checking the tag
    ///
    /// Used when no key is available yet, i.e. before the secret has been
    /// reconstructed.
    ///
    /// # Errors
    /// Returns [`ShamirError::MalformedEnvelope`] if the input is shorter than
    /// header plus tag, carries an unknown version, or declares a payload
    /// length that disagrees with the actual length.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN + TAG_LEN {
            return Err(ShamirError::MalformedEnvelope("envelope too short"));
        }

        let mut header = &bytes[..HEADER_LEN];
        let version = header.get_u8();
        if version != ENVELOPE_VERSION {
            return Err(ShamirError::MalformedEnvelope("unsupported version"));
        }
        let index = header.get_u8();
        let threshold = header.get_u8();
        let payload_len = header.get_u16() as usize;

        if bytes.len() != HEADER_LEN + payload_len + TAG_LEN {
            return Err(ShamirError::MalformedEnvelope(
                "declared payload length does not match envelope size",
            ));
        }

        let (body, tag) = bytes.split_at(HEADER_LEN + payload_len);
        let mut stored_tag = [0u8; TAG_LEN];
        stored_tag.copy_from_slice(tag);

        Ok(Self {
            version,
            index,
            threshold,
            payload: Bytes::copy_from_slice(&body[HEADER_LEN..]),
            tag: stored_tag,
        })
    }

    /// Parses the envelope and checks its tag against `auth_key`
    ///
    /// The comparison is constant-time.
    ///
    /// # Errors
    /// Structural problems are reported as by [`Envelope::parse`]; a tag
    /// mismatch is reported as [`ShamirError::Tampered`].
    pub fn verify(bytes: &[u8], auth_key: &AuthKey) -> Result<Self> {
        let envelope = Self::parse(bytes)?;
        let (body, tag) = bytes.split_at(bytes.len() - TAG_LEN);

        let mut mac = auth_key.mac();
        mac.update(body);
        mac.verify_slice(tag).map_err(|_| ShamirError::Tampered)?;

        Ok(envelope)
    }

    /// Length of the payload in bytes
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}
