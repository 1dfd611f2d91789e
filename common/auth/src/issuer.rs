use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::claims::{ClaimSet, EXP_CLAIM};
use crate::clock::{Clock, SystemClock};
use crate::codec::{encode_segment, join, signing_input, Header};
use crate::config::TokenConfig;
use crate::error::{AuthError, AuthResult};

/// Signs claim sets into compact HS256 tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    config: TokenConfig,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(config: TokenConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: TokenConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Issue a token whose `exp` is `ttl_seconds` from now.
    ///
    /// The payload carries `exp` first, then the caller's claims in
    /// insertion order. No other registered claims are added.
    pub fn issue(&self, claims: ClaimSet, ttl_seconds: i64) -> AuthResult<String> {
        if ttl_seconds <= 0 {
            return Err(AuthError::InvalidTtl(ttl_seconds));
        }
        if claims.contains(EXP_CLAIM) {
            return Err(AuthError::ReservedClaim(EXP_CLAIM));
        }

        let expires_at = self
            .clock
            .now_unix()
            .checked_add(ttl_seconds)
            .ok_or(AuthError::InvalidTtl(ttl_seconds))?;

        let mut payload = Map::with_capacity(claims.len() + 1);
        payload.insert(EXP_CLAIM.to_string(), Value::from(expires_at));
        payload.extend(claims.into_inner());

        let header_b64 = encode_segment(serde_json::to_vec(&Header::default())?);
        let payload_b64 = encode_segment(serde_json::to_vec(&payload)?);
        let tag = common_crypto::sign(
            &self.config.secret,
            signing_input(&header_b64, &payload_b64).as_bytes(),
        )?;

        debug!(exp = expires_at, ttl_seconds, "issued token");
        Ok(join(&header_b64, &payload_b64, &encode_segment(tag)))
    }

    /// Issue a token with the configured default lifetime.
    pub fn issue_default(&self, claims: ClaimSet) -> AuthResult<String> {
        self.issue(claims, self.config.default_ttl_seconds)
    }
}
