use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::claims::{ClaimSet, EXP_CLAIM};
use crate::clock::{Clock, SystemClock};
use crate::codec::{split, Header, ALGORITHM};
use crate::config::TokenConfig;
use crate::error::{AuthError, AuthResult};

/// Outcome of [`TokenVerifier::verify`]: the decoded claims or the reason
/// the token was refused.
pub type VerificationResult = AuthResult<ClaimSet>;

/// Checks compact HS256 tokens issued under the shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    config: TokenConfig,
    clock: Arc<dyn Clock>,
}

impl TokenVerifier {
    pub fn new(config: TokenConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: TokenConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Verify `token` and return its full payload, `exp` included.
    ///
    /// The signature is checked before any header or payload content is
    /// read, so `exp` is only ever compared on authenticated data. A token
    /// is still valid in the second named by `exp` and expired after it.
    pub fn verify(&self, token: &str) -> VerificationResult {
        let result = self.verify_inner(token);
        match &result {
            Ok(claims) => debug!(exp = claims.expires_at(), "verified token"),
            Err(err) => debug!(
                reason = err.kind().map(|kind| kind.as_str()),
                error = %err,
                "rejected token"
            ),
        }
        result
    }

    fn verify_inner(&self, token: &str) -> VerificationResult {
        let parts = split(token)?;

        // An undecodable tag cannot match any MAC.
        let tag = parts.signature().map_err(|_| AuthError::BadSignature)?;
        let authentic = common_crypto::verify(
            &self.config.secret,
            parts.signing_input().as_bytes(),
            &tag,
        )?;
        if !authentic {
            return Err(AuthError::BadSignature);
        }

        let header: Header = serde_json::from_slice(&parts.header()?)
            .map_err(|err| AuthError::malformed(format!("header is not valid JSON: {err}")))?;
        if header.alg != ALGORITHM {
            return Err(AuthError::malformed(format!(
                "unsupported algorithm '{}'",
                header.alg
            )));
        }

        let payload: Value = serde_json::from_slice(&parts.payload()?)
            .map_err(|err| AuthError::malformed(format!("payload is not valid JSON: {err}")))?;
        let claims = ClaimSet::try_from(payload)?;

        if let Some(raw) = claims.get(EXP_CLAIM) {
            let expires_at = raw.as_i64().ok_or_else(|| {
                AuthError::malformed(format!("claim 'exp' must be an integer, got {raw}"))
            })?;
            if self.clock.now_unix() > expires_at {
                return Err(AuthError::Expired {
                    expired_at: expires_at,
                });
            }
        }

        Ok(claims)
    }
}
