use std::net::IpAddr;

use chrono::Duration;

use crate::models::user::LOOKUP_FIELDS;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    /// Lookup fields a reset request may use, in preference order.
    pub authorized_fields: Vec<String>,
    pub default_ttl: Duration,
    /// When set, a new reset request deletes the user's previous token.
    pub replace_existing: bool,
    pub default_provider: String,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;

        let host: IpAddr = env_or("PWRESET_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid PWRESET_HOST: {e}"))?;

        let port: u16 = env_or("PWRESET_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid PWRESET_PORT: {e}"))?;

        let base_url = env_or("PWRESET_BASE_URL", &format!("http://{host}:{port}"));

        let authorized_fields: Vec<String> = env_or("PWRESET_AUTHORIZED_FIELDS", "email")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if authorized_fields.is_empty() {
            return Err("PWRESET_AUTHORIZED_FIELDS must name at least one field".to_string());
        }
        // A typo here must fail the boot, not every request.
        for field in &authorized_fields {
            if !LOOKUP_FIELDS.contains(&field.as_str()) {
                return Err(format!(
                    "Unknown lookup field in PWRESET_AUTHORIZED_FIELDS: {field}"
                ));
            }
        }

        let default_ttl = parse_ttl(&env_or("PWRESET_TOKEN_TTL", "1d"))
            .map_err(|e| format!("Invalid PWRESET_TOKEN_TTL: {e}"))?;

        let replace_existing = match env_or("PWRESET_REPLACE_EXISTING", "false").as_str() {
            "true" | "1" => true,
            _ => false,
        };

        let default_provider = env_or("PWRESET_DEFAULT_PROVIDER", "email");

        let log_level = env_or("PWRESET_LOG_LEVEL", "info");

        let smtp = match (
            std::env::var("PWRESET_SMTP_HOST").ok(),
            std::env::var("PWRESET_SMTP_PORT").ok(),
            std::env::var("PWRESET_SMTP_USER").ok(),
            std::env::var("PWRESET_SMTP_PASS").ok(),
            std::env::var("PWRESET_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid PWRESET_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            host,
            port,
            base_url,
            authorized_fields,
            default_ttl,
            replace_existing,
            default_provider,
            log_level,
            smtp,
        })
    }
}

/// Parses durations like `"45s"`, `"30m"`, `"12h"` or `"1d"`. A bare number
/// is taken as seconds.
pub fn parse_ttl(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let (value, unit) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => s.split_at(idx),
        None => (s, "s"),
    };
    let value: i64 = value
        .parse()
        .map_err(|_| format!("not a duration: \"{s}\""))?;
    if value <= 0 {
        return Err(format!("duration must be positive: \"{s}\""));
    }
    match unit {
        "s" => Ok(Duration::seconds(value)),
        "m" => Ok(Duration::minutes(value)),
        "h" => Ok(Duration::hours(value)),
        "d" => Ok(Duration::days(value)),
        _ => Err(format!("unknown duration unit in \"{s}\"")),
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ttl_accepts_suffixed_durations() {
        assert_eq!(parse_ttl("45s").unwrap(), Duration::seconds(45));
        assert_eq!(parse_ttl("30m").unwrap(), Duration::minutes(30));
        assert_eq!(parse_ttl("12h").unwrap(), Duration::hours(12));
        assert_eq!(parse_ttl("1d").unwrap(), Duration::days(1));
        assert_eq!(parse_ttl("600").unwrap(), Duration::seconds(600));
        assert_eq!(parse_ttl(" 1d ").unwrap(), Duration::days(1));
    }

    #[test]
    fn parse_ttl_rejects_garbage() {
        assert!(parse_ttl("").is_err());
        assert!(parse_ttl("soon").is_err());
        assert!(parse_ttl("1w").is_err());
        assert!(parse_ttl("0d").is_err());
        assert!(parse_ttl("-5m").is_err());
    }
}
