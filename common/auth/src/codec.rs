//! Compact serialization: `base64url(header).base64url(payload).base64url(signature)`.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// MAC algorithm identifier carried in the header.
pub const ALGORITHM: &str = "HS256";
/// Token type carried in the header.
pub const TOKEN_TYPE: &str = "JWT";

const SEGMENT_COUNT: usize = 3;

// Unpadded on encode; trailing `=` tolerated on decode.
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
        }
    }
}

pub fn encode_segment(bytes: impl AsRef<[u8]>) -> String {
    SEGMENT_ENGINE.encode(bytes)
}

pub fn decode_segment(segment: &str) -> AuthResult<Vec<u8>> {
    SEGMENT_ENGINE
        .decode(segment)
        .map_err(|err| AuthError::malformed(format!("segment is not base64url: {err}")))
}

pub fn join(header: &str, payload: &str, signature: &str) -> String {
    format!("{header}.{payload}.{signature}")
}

/// The three segments of a token, exactly as received.
///
/// Nothing in here is decoded or trusted until the signature has been checked.
#[derive(Debug, Clone, Copy)]
pub struct CompactParts<'a> {
    pub header_b64: &'a str,
    pub payload_b64: &'a str,
    pub signature_b64: &'a str,
}

impl CompactParts<'_> {
    /// The bytes covered by the MAC, exactly as received.
    pub fn signing_input(&self) -> String {
        signing_input(self.header_b64, self.payload_b64)
    }

    pub fn header(&self) -> AuthResult<Vec<u8>> {
        decode_segment(self.header_b64)
    }

    pub fn payload(&self) -> AuthResult<Vec<u8>> {
        decode_segment(self.payload_b64)
    }

    pub fn signature(&self) -> AuthResult<Vec<u8>> {
        decode_segment(self.signature_b64)
    }
}

pub fn signing_input(header_b64: &str, payload_b64: &str) -> String {
    format!("{header_b64}.{payload_b64}")
}

/// Split into exactly three non-empty segments. No segment is decoded here.
pub fn split(token: &str) -> AuthResult<CompactParts<'_>> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != SEGMENT_COUNT {
        return Err(AuthError::malformed(format!(
            "expected {SEGMENT_COUNT} segments, found {}",
            segments.len()
        )));
    }
    if let Some(index) = segments.iter().position(|segment| segment.is_empty()) {
        return Err(AuthError::malformed(format!("segment {index} is empty")));
    }

    Ok(CompactParts {
        header_b64: segments[0],
        payload_b64: segments[1],
        signature_b64: segments[2],
    })
}
