use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use anyhow::{Context, Result};

const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;
const DEFAULT_PORT: u16 = 3001;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    /// Signs and verifies the access tokens handed out by `/auth/session`.
    pub jwt_secret: String,
    /// Shared with the identity-provider bridge that signs sign-in assertions.
    pub identity_provider_secret: String,
    pub token_issuer: String,
    pub token_ttl: time::Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            host: env::var("HOST")
                .unwrap_or_else(|_| Ipv4Addr::LOCALHOST.to_string())
                .parse()
                .context("HOST must be a valid IP address")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            identity_provider_secret: env::var("IDENTITY_PROVIDER_SECRET")
                .context("IDENTITY_PROVIDER_SECRET must be set")?,
            token_issuer: env::var("TOKEN_ISSUER").unwrap_or_else(|_| "prayerwall".to_string()),
            token_ttl: time::Duration::seconds(
                env::var("ACCESS_TOKEN_TTL_SECS")
                    .unwrap_or_else(|_| DEFAULT_TOKEN_TTL_SECS.to_string())
                    .parse()
                    .context("ACCESS_TOKEN_TTL_SECS must be a number of seconds")?,
            ),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
