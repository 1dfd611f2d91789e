use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of an HMAC-SHA256 tag.
pub const TAG_LENGTH: usize = 32;

const GENERATED_SECRET_LENGTH: usize = 32;

/// Errors produced by the common-crypto helpers.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("shared secret must not be empty")]
    EmptySecret,
    #[error("base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
    #[error("invalid HMAC key length")]
    InvalidMacKey,
}

/// Key shared between the token issuer and verifier.
///
/// The bytes are wiped on drop and never printed.
#[derive(Clone)]
pub struct SharedSecret(Zeroizing<Vec<u8>>);

impl SharedSecret {
    /// Construct a secret from raw bytes (for example a UTF-8 passphrase).
    pub fn from_bytes<B>(bytes: B) -> Result<Self, CryptoError>
    where
        B: AsRef<[u8]>,
    {
        let slice = bytes.as_ref();
        if slice.is_empty() {
            return Err(CryptoError::EmptySecret);
        }
        Ok(Self(Zeroizing::new(slice.to_vec())))
    }

    /// Construct a secret from a base64-encoded string.
    pub fn from_base64(value: &str) -> Result<Self, CryptoError> {
        let decoded = Zeroizing::new(BASE64_STANDARD.decode(value.trim())?);
        Self::from_bytes(decoded.as_slice())
    }

    /// Generate a fresh random 32-byte secret.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new(vec![0u8; GENERATED_SECRET_LENGTH]);
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn mac(&self) -> Result<HmacSha256, CryptoError> {
        <HmacSha256 as Mac>::new_from_slice(&self.0).map_err(|_| CryptoError::InvalidMacKey)
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret")
            .field("bytes", &"***redacted***")
            .finish()
    }
}

/// Compute the HMAC-SHA256 tag of `message` under `secret`.
pub fn sign(secret: &SharedSecret, message: &[u8]) -> Result<[u8; TAG_LENGTH], CryptoError> {
    let mut mac = secret.mac()?;
    mac.update(message);
    let digest = mac.finalize().into_bytes();
    let mut out = [0u8; TAG_LENGTH];
    out.copy_from_slice(&digest);
    Ok(out)
}

/// Check `tag` against the HMAC-SHA256 of `message` in constant time.
pub fn verify(secret: &SharedSecret, message: &[u8], tag: &[u8]) -> Result<bool, CryptoError> {
    let mut mac = secret.mac()?;
    mac.update(message);
    Ok(mac.verify_slice(tag).is_ok())
}
