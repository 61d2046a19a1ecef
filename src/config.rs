use std::str::FromStr;

use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub ssl: bool,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DbConfig,
    pub host: String,
    pub port: u16,
    pub public_dir: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let flag = |key: &str| get(key).map(|v| v == "true").unwrap_or(false);

        let database = DbConfig {
            url: get("DATABASE_URL").filter(|v| !v.is_empty()),
            host: get("DB_HOST").unwrap_or_else(|| "localhost".into()),
            port: get("DB_PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("DB_PORT must be a port number")?
                .unwrap_or(5432),
            user: get("DB_USER"),
            password: get("DB_PASSWORD"),
            name: get("DB_NAME"),
            ssl: flag("DB_SSL") || flag("PG_SSL"),
            max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
        };

        Ok(Self {
            database,
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: get("PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("PORT must be a port number")?
                .unwrap_or(8080),
            public_dir: get("PUBLIC_DIR").unwrap_or_else(|| "public".into()),
        })
    }
}

impl DbConfig {
    /// A full `DATABASE_URL` wins over the individual `DB_*` settings.
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        let mut opts = match &self.url {
            Some(url) => PgConnectOptions::from_str(url).context("parse DATABASE_URL")?,
            None => {
                let mut opts = PgConnectOptions::new().host(&self.host).port(self.port);
                if let Some(user) = &self.user {
                    opts = opts.username(user);
                }
                if let Some(password) = &self.password {
                    opts = opts.password(password);
                }
                if let Some(name) = &self.name {
                    opts = opts.database(name);
                }
                opts
            }
        };
        if self.ssl {
            opts = opts.ssl_mode(PgSslMode::VerifyFull);
        }
        Ok(opts)
    }
}
