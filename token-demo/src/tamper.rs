use common_auth::codec::{encode_segment, join, split};
use common_auth::{AuthError, AuthResult, ClaimSet};
use serde_json::Value;

/// Rewrite the claims of `token` without the secret.
///
/// Header and signature segments are carried over untouched, which is all
/// a client holding only the token can do.
pub fn tamper_payload<F>(token: &str, edit: F) -> AuthResult<String>
where
    F: FnOnce(&mut ClaimSet),
{
    let parts = split(token)?;
    let value: Value = serde_json::from_slice(&parts.payload()?)
        .map_err(|err| AuthError::MalformedToken(err.to_string()))?;
    let mut claims = ClaimSet::try_from(value)?;
    edit(&mut claims);

    let payload_b64 = encode_segment(serde_json::to_vec(&claims)?);
    Ok(join(parts.header_b64, &payload_b64, parts.signature_b64))
}
