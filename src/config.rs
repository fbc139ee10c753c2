use std::env;

/// Page size of phone and accessory listings.
pub const CATALOG_PAGE_SIZE: i64 = 12;
/// Page size of order listings.
pub const ORDER_PAGE_SIZE: i64 = 10;
/// Upper bound for `SESSION_TTL_HOURS`: one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub session_ttl_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let session_ttl_hours = session_ttl_hours(env::var("SESSION_TTL_HOURS").ok().as_deref());
        Ok(Self {
            port,
            database_url,
            jwt_secret,
            host,
            session_ttl_hours,
        })
    }
}

/// Session lifetime in hours; unparsable or out-of-range values fall back to a day.
fn session_ttl_hours(raw: Option<&str>) -> i64 {
    raw.and_then(|h| h.trim().parse::<i64>().ok())
        .filter(|h| (1..=MAX_SESSION_TTL_HOURS).contains(h))
        .unwrap_or(DEFAULT_SESSION_TTL_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ttl_accepts_values_in_range() {
        assert_eq!(session_ttl_hours(Some("48")), 48);
        assert_eq!(session_ttl_hours(Some("8760")), MAX_SESSION_TTL_HOURS);
    }

    #[test]
    fn session_ttl_falls_back_on_bad_values() {
        assert_eq!(session_ttl_hours(None), 24);
        assert_eq!(session_ttl_hours(Some("0")), 24);
        assert_eq!(session_ttl_hours(Some("soon")), 24);
        assert_eq!(session_ttl_hours(Some("9223372036854775807")), 24);
    }
}
