use common_crypto::SharedSecret;

/// Default token lifetime in seconds.
pub const DEFAULT_TTL_SECONDS: i64 = 15;

/// Runtime configuration shared by the issuer and verifier.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Key used to sign and check tokens.
    pub secret: SharedSecret,
    /// Lifetime applied by `TokenIssuer::issue_default`.
    pub default_ttl_seconds: i64,
}

impl TokenConfig {
    /// Construct config with the default 15 second lifetime.
    pub fn new(secret: SharedSecret) -> Self {
        Self {
            secret,
            default_ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }

    /// Adjust the default lifetime.
    pub fn with_default_ttl(mut self, seconds: i64) -> Self {
        self.default_ttl_seconds = seconds;
        self
    }
}
