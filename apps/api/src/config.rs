use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Open new sessions with one blank entry per section.
    pub seed_entries: bool,
    /// Sessions untouched this long are dropped. `None` keeps them until deleted.
    pub session_idle_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            seed_entries: parse_bool(&env_or("FORM_SEED_ENTRIES", "true"))
                .context("FORM_SEED_ENTRIES must be true or false")?,
            session_idle_timeout: idle_timeout(
                env_or("SESSION_IDLE_MINUTES", "60")
                    .parse::<u64>()
                    .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?,
            ),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Zero minutes turns expiry off.
fn idle_timeout(minutes: u64) -> Option<Duration> {
    (minutes > 0).then(|| Duration::from_secs(minutes * 60))
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("'{other}' is not a boolean"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(parse_bool(" yes ").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(!parse_bool("off").unwrap());
    }

    #[test]
    fn test_zero_idle_minutes_disables_expiry() {
        assert_eq!(idle_timeout(0), None);
        assert_eq!(idle_timeout(15), Some(Duration::from_secs(900)));
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        assert!(parse_bool("maybe").is_err());
    }
}
