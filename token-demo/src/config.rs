use anyhow::{anyhow, Context, Result};
use common_auth::{SharedSecret, TokenConfig, DEFAULT_TTL_SECONDS};
use std::env;

const DEFAULT_SECRET: &str = "secret";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Expiry,
    Tamper,
    All,
}

impl Scenario {
    pub fn includes_expiry(&self) -> bool {
        matches!(self, Scenario::Expiry | Scenario::All)
    }

    pub fn includes_tamper(&self) -> bool {
        matches!(self, Scenario::Tamper | Scenario::All)
    }
}

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub secret: SharedSecret,
    pub ttl_seconds: i64,
    pub scenario: Scenario,
    pub real_sleep: bool,
}

impl DemoConfig {
    pub fn token_config(&self) -> TokenConfig {
        TokenConfig::new(self.secret.clone()).with_default_ttl(self.ttl_seconds)
    }
}

pub fn load_demo_config() -> Result<DemoConfig> {
    load_demo_config_from(|key| env::var(key).ok())
}

/// Same as [`load_demo_config`] with an explicit variable lookup.
pub fn load_demo_config_from<F>(lookup: F) -> Result<DemoConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let secret_base64 = bool_from(lookup("TOKEN_SECRET_BASE64")).unwrap_or(false);
    let raw_secret = lookup("TOKEN_SECRET")
        .and_then(|value| normalize_optional(&value))
        .unwrap_or_else(|| DEFAULT_SECRET.to_string());
    let secret = if secret_base64 {
        SharedSecret::from_base64(&raw_secret).context("Failed to parse TOKEN_SECRET as base64")?
    } else {
        SharedSecret::from_bytes(raw_secret.as_bytes()).context("Failed to load TOKEN_SECRET")?
    };

    let ttl_seconds = lookup("TOKEN_TTL_SECONDS")
        .and_then(|value| normalize_optional(&value))
        .map(|value| parse_ttl(&value))
        .transpose()
        .context("Failed to parse TOKEN_TTL_SECONDS")?
        .unwrap_or(DEFAULT_TTL_SECONDS);

    let scenario = lookup("DEMO_SCENARIO")
        .and_then(|value| normalize_optional(&value))
        .map(|value| parse_scenario(&value))
        .transpose()
        .context("Failed to parse DEMO_SCENARIO")?
        .unwrap_or(Scenario::All);

    let real_sleep = bool_from(lookup("DEMO_REAL_SLEEP")).unwrap_or(false);

    Ok(DemoConfig {
        secret,
        ttl_seconds,
        scenario,
        real_sleep,
    })
}

fn bool_from(value: Option<String>) -> Option<bool> {
    value.map(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_ttl(value: &str) -> Result<i64> {
    let seconds: i64 = value
        .parse()
        .map_err(|err| anyhow!("Invalid TTL '{value}': {err}"))?;
    if seconds <= 0 {
        return Err(anyhow!("TTL must be positive, got {seconds}"));
    }
    Ok(seconds)
}

fn parse_scenario(value: &str) -> Result<Scenario> {
    match value.trim().to_ascii_lowercase().as_str() {
        "expiry" => Ok(Scenario::Expiry),
        "tamper" => Ok(Scenario::Tamper),
        "all" => Ok(Scenario::All),
        other => Err(anyhow!(
            "Unsupported scenario '{other}'. Use expiry, tamper, or all."
        )),
    }
}
