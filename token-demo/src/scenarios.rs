use std::time::Duration;

use common_auth::{AuthResult, ClaimSet, TokenIssuer, TokenVerifier, VerificationResult};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::DemoConfig;
use crate::tamper::tamper_payload;
use crate::timeline::Timeline;

/// Token plus the outcome of each verification attempt, in order.
#[derive(Debug)]
pub struct ExpiryReport {
    pub token: String,
    pub checks: Vec<VerificationResult>,
}

#[derive(Debug)]
pub struct TamperReport {
    pub token: String,
    pub original: VerificationResult,
    pub tampered_token: String,
    pub tampered: VerificationResult,
}

/// Issuer and verifier wired to one secret and one timeline.
pub struct Demo {
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    timeline: Timeline,
    ttl_seconds: i64,
}

impl Demo {
    pub fn new(config: &DemoConfig, timeline: Timeline) -> Self {
        let clock = timeline.clock();
        let token_config = config.token_config();
        Self {
            issuer: TokenIssuer::with_clock(token_config.clone(), clock.clone()),
            verifier: TokenVerifier::with_clock(token_config, clock),
            timeline,
            ttl_seconds: config.ttl_seconds,
        }
    }

    /// Issue `{hello: "world"}`, then verify after 1s, after half the TTL
    /// more and after the second half. The last check lands past `exp`.
    pub async fn run_expiry(&self) -> AuthResult<ExpiryReport> {
        info!("creating simple token");
        let token = self
            .issuer
            .issue(ClaimSet::new().with("hello", "world"), self.ttl_seconds)?;
        info!(%token, "simple token issued");

        let half = Duration::from_secs(u64::try_from(self.ttl_seconds).unwrap_or(0)) / 2;
        let mut checks = Vec::with_capacity(3);
        for (attempt, pause) in [Duration::from_secs(1), half, half].into_iter().enumerate() {
            self.timeline.wait(pause).await;
            let outcome = self.verifier.verify(&token);
            report(attempt + 1, &outcome);
            checks.push(outcome);
        }

        Ok(ExpiryReport { token, checks })
    }

    /// Issue a token with access claims, trust it, then try to escalate by
    /// editing the payload client-side.
    pub fn run_tamper(&self) -> AuthResult<TamperReport> {
        info!("creating custom claims token");
        let claims = ClaimSet::new()
            .with("vip", false)
            .with("read", json!(["incomes"]))
            .with("write", json!([]))
            .with("userId", 123);
        let token = self.issuer.issue(claims, self.ttl_seconds)?;
        info!(%token, "custom claims token issued");

        let original = self.verifier.verify(&token);
        report(1, &original);
        if let Ok(claims) = &original {
            info!(
                user_id = %display_claim(claims.get("userId")),
                vip = %display_claim(claims.get("vip")),
                read = %join_list(claims.get("read")),
                write = %join_list(claims.get("write")),
                "trusted claims"
            );
        }

        let tampered_token = tamper_payload(&token, |claims| {
            claims.insert("vip", true);
            claims.insert("write", json!(["users", "payments", "ALL"]));
            claims.insert("userId", 1);
        })?;
        info!(token = %tampered_token, "sending modified token");

        let tampered = self.verifier.verify(&tampered_token);
        report(2, &tampered);

        Ok(TamperReport {
            token,
            original,
            tampered_token,
            tampered,
        })
    }
}

fn report(attempt: usize, outcome: &VerificationResult) {
    match outcome {
        Ok(claims) => info!(
            attempt,
            claims = %serde_json::to_string(claims).unwrap_or_default(),
            "token valid"
        ),
        Err(err) => warn!(
            attempt,
            reason = err.kind().map(|kind| kind.as_str()).unwrap_or("error"),
            error = %err,
            "token rejected"
        ),
    }
}

fn display_claim(value: Option<&Value>) -> String {
    value.map(Value::to_string).unwrap_or_else(|| "-".to_string())
}

fn join_list(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).unwrap_or_else(|| item.to_string()))
            .collect::<Vec<_>>()
            .join(","),
        other => display_claim(other),
    }
}
