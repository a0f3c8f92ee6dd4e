use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::Result;

/// Encodes envelope bytes as portable text (standard base64, padded)
pub fn encode_share(envelope: &[u8]) -> String {
    STANDARD.encode(envelope)
}

/// Decodes a share produced by [`encode_share`]
///
/// Leading and trailing whitespace is ignored, so shares read back from text
/// files with a trailing newline decode unchanged.
pub fn decode_share(encoded: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(encoded.trim())?)
}
