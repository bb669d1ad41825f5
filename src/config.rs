//! Environment-backed configuration.

use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub nats_url: Option<String>,
    /// Opaque hosted payment page the storefront opens after checkout.
    pub payment_page_url: String,
    /// How long checkout waits on the notification dispatch before moving on.
    pub notify_timeout: Duration,
    pub mail: MailConfig,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub from: String,
    /// Fallback admin recipient when no admin profile carries an address.
    pub admin_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8083".to_string())
            .parse()
            .context("PORT must be a number")?;
        let notify_timeout = std::env::var("NOTIFY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_NOTIFY_TIMEOUT);

        Ok(Self {
            database_url,
            port,
            nats_url: std::env::var("NATS_URL").ok(),
            payment_page_url: std::env::var("PAYMENT_PAGE_URL")
                .unwrap_or_else(|_| "https://egreve.bog.ge/teklaqvelidze".to_string()),
            notify_timeout,
            mail: MailConfig {
                api_url: std::env::var("RESEND_API_URL")
                    .unwrap_or_else(|_| "https://api.resend.com/emails".to_string()),
                api_key: std::env::var("RESEND_API_KEY").ok(),
                from: std::env::var("NOTIFY_FROM")
                    .unwrap_or_else(|_| "Aurora <orders@aurora.ge>".to_string()),
                admin_email: std::env::var("ADMIN_EMAIL")
                    .unwrap_or_else(|_| "teklaqvelidze@gmail.com".to_string()),
            },
        })
    }
}
