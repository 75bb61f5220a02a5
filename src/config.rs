use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        if secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "finance-tracker".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "finance-tracker-users".into()),
            ttl_minutes: parse_ttl(std::env::var("JWT_TTL_MINUTES").ok().as_deref())?,
        };
        Ok(Self { database_url, jwt })
    }
}

pub const DEFAULT_TTL_MINUTES: i64 = 30;
/// One week.
pub const MAX_TTL_MINUTES: i64 = 7 * 24 * 60;

/// Token lifetime in minutes; 30 when unset, otherwise 1..=MAX_TTL_MINUTES.
fn parse_ttl(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TTL_MINUTES);
    };
    let minutes = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("JWT_TTL_MINUTES is not an integer: {raw:?}"))?;
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!("JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {minutes}");
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_defaults_to_thirty_minutes() {
        assert_eq!(parse_ttl(None).unwrap(), 30);
    }

    #[test]
    fn ttl_accepts_values_in_range() {
        assert_eq!(parse_ttl(Some("15")).unwrap(), 15);
        assert_eq!(parse_ttl(Some(" 45 ")).unwrap(), 45);
        assert_eq!(parse_ttl(Some("10080")).unwrap(), MAX_TTL_MINUTES);
    }

    #[test]
    fn ttl_rejects_garbage_and_out_of_range_values() {
        assert!(parse_ttl(Some("abc")).is_err());
        assert!(parse_ttl(Some("0")).is_err());
        assert!(parse_ttl(Some("-5")).is_err());
        assert!(parse_ttl(Some("10081")).is_err());
        let err = parse_ttl(Some("1000000000000")).unwrap_err();
        assert!(err.to_string().contains("between 1 and 10080"));
    }
}
