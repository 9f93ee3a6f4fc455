use std::env;

use anyhow::Context;
use chrono::{FixedOffset, Offset, Utc};

const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub auth_tokens: String,
    pub stats_utc_offset: FixedOffset,
    pub cors_allow_origin: Option<String>,
    pub port: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let gemini_api_key = env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?;
        let auth_tokens = env::var("AUTH_TOKENS").context("AUTH_TOKENS must be set")?;
        let port = env::var("PORT").context("PORT must be set")?;
        let gemini_api_url =
            env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string());
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        let stats_utc_offset = match env::var("STATS_UTC_OFFSET_MINUTES") {
            Ok(raw) => parse_utc_offset(&raw)?,
            Err(_) => Utc.fix(),
        };
        let cors_allow_origin = env::var("CORS_ALLOW_ORIGIN").ok();

        Ok(Self {
            gemini_api_key,
            gemini_api_url,
            gemini_model,
            auth_tokens,
            stats_utc_offset,
            cors_allow_origin,
            port,
        })
    }
}

/// Offset in minutes east of UTC, e.g. `120` or `-300`.
pub fn parse_utc_offset(raw: &str) -> anyhow::Result<FixedOffset> {
    let minutes: i32 = raw
        .trim()
        .parse()
        .with_context(|| format!("STATS_UTC_OFFSET_MINUTES is not a number: {}", raw))?;

    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| anyhow::anyhow!("STATS_UTC_OFFSET_MINUTES out of range: {}", minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("0").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("330").unwrap().local_minus_utc(), 330 * 60);
        assert_eq!(parse_utc_offset(" -300 ").unwrap().local_minus_utc(), -300 * 60);
    }

    #[test]
    fn test_parse_utc_offset_rejects_garbage() {
        assert!(parse_utc_offset("two hours").is_err());
        assert!(parse_utc_offset("1440").is_err());
    }
}
