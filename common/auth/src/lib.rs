pub mod claims;
pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod issuer;
pub mod verifier;

pub use claims::{ClaimSet, EXP_CLAIM};
pub use clock::{Clock, ManualClock, SystemClock};
pub use common_crypto::SharedSecret;
pub use config::{TokenConfig, DEFAULT_TTL_SECONDS};
pub use error::{AuthError, AuthResult, RejectionKind};
pub use issuer::TokenIssuer;
pub use verifier::{TokenVerifier, VerificationResult};
