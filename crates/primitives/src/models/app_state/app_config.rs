use crate::models::app_state::jwt_details::JWTInfo;
use eyre::{eyre, Report};
use secrecy::SecretString;
use std::env;
use std::str::FromStr;
use strum::{Display, EnumString};

pub const DEFAULT_SETTLEMENT_WINDOW: &str = "1-3 business days";

/// Longest alert window accepted from the environment: one year.
pub const MAX_PENDING_ALERT_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_details: JWTInfo,

    pub store_backend: StoreBackend,

    pub database_url: Option<SecretString>,

    /// bcrypt cost used for transfer PIN hashes.
    pub pin_hash_cost: u32,

    /// Delay window quoted to users for wire and local transfers.
    pub pending_settlement_window: String,

    pub pending_alert_hours: i64,

    pub rate_limit_enabled: bool,

    pub app_env: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Report> {
        let store_backend = env::var("STORE_BACKEND")
            .ok()
            .map(|raw| StoreBackend::from_str(raw.trim()))
            .transpose()
            .map_err(|e| eyre!("Invalid STORE_BACKEND: {}", e))?
            .unwrap_or(StoreBackend::Postgres);

        let database_url = env::var("DATABASE_URL")
            .ok()
            .map(|url| SecretString::new(url.into()));

        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(eyre!("DATABASE_URL must be set when STORE_BACKEND=postgres"));
        }

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        Ok(Self {
            jwt_details: JWTInfo::new()?,
            store_backend,
            database_url,
            pin_hash_cost: env::var("PIN_HASH_COST")
                .map(|v| v.parse())
                .unwrap_or(Ok(bcrypt::DEFAULT_COST))
                .map_err(|e| eyre!("Invalid PIN_HASH_COST: {}", e))?,
            pending_settlement_window: env::var("PENDING_SETTLEMENT_WINDOW")
                .unwrap_or_else(|_| DEFAULT_SETTLEMENT_WINDOW.into()),
            pending_alert_hours: parse_alert_hours(
                &env::var("PENDING_ALERT_HOURS").unwrap_or_else(|_| "72".into()),
            )?,
            rate_limit_enabled: env::var("RATE_LIMIT_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(app_env != "test"),
            app_env,
        })
    }

    /// Configuration for tests and demos: in-memory store, cheap PIN hashes.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            jwt_details: JWTInfo {
                jwt_secret: SecretString::new(jwt_secret.into()),
                jwt_expiration_hours: 2,
                jwt_issuer: "bankline".into(),
                jwt_audience: "bankline-clients".into(),
            },
            store_backend: StoreBackend::Memory,
            database_url: None,
            pin_hash_cost: 4,
            pending_settlement_window: DEFAULT_SETTLEMENT_WINDOW.into(),
            pending_alert_hours: 72,
            rate_limit_enabled: false,
            app_env: "test".into(),
        }
    }
}

fn parse_alert_hours(raw: &str) -> Result<i64, Report> {
    let hours: i64 = raw
        .trim()
        .parse()
        .map_err(|e| eyre!("Invalid PENDING_ALERT_HOURS: {}", e))?;

    if !(1..=MAX_PENDING_ALERT_HOURS).contains(&hours) {
        return Err(eyre!(
            "PENDING_ALERT_HOURS must be between 1 and {}, got {}",
            MAX_PENDING_ALERT_HOURS,
            hours
        ));
    }
    Ok(hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_hours_must_fit_the_window() {
        assert_eq!(parse_alert_hours("72").unwrap(), 72);
        assert_eq!(parse_alert_hours(" 8760 ").unwrap(), MAX_PENDING_ALERT_HOURS);
        assert!(parse_alert_hours("0").is_err());
        assert!(parse_alert_hours("-5").is_err());
        assert!(parse_alert_hours("8761").is_err());
        assert!(parse_alert_hours("9223372036854775807").is_err());
        assert!(parse_alert_hours("three days").is_err());
    }
}
