use common_crypto::CryptoError;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("token signature does not match")]
    BadSignature,
    #[error("token expired at {expired_at}")]
    Expired { expired_at: i64 },
    #[error("ttl must be a positive number of seconds, got {0}")]
    InvalidTtl(i64),
    #[error("claim '{0}' is reserved and set by the issuer")]
    ReservedClaim(&'static str),
    #[error("failed to encode token segment: {0}")]
    Encode(String),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Why a presented token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    MalformedToken,
    BadSignature,
    Expired,
}

impl RejectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionKind::MalformedToken => "malformed_token",
            RejectionKind::BadSignature => "bad_signature",
            RejectionKind::Expired => "expired",
        }
    }
}

impl AuthError {
    /// Rejection kind for verification failures; `None` for issuance faults.
    pub fn kind(&self) -> Option<RejectionKind> {
        match self {
            AuthError::MalformedToken(_) => Some(RejectionKind::MalformedToken),
            AuthError::BadSignature => Some(RejectionKind::BadSignature),
            AuthError::Expired { .. } => Some(RejectionKind::Expired),
            AuthError::InvalidTtl(_)
            | AuthError::ReservedClaim(_)
            | AuthError::Encode(_)
            | AuthError::Crypto(_) => None,
        }
    }

    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedToken(detail.into())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value.to_string())
    }
}
