//! Configuración de la aplicación a partir de variables de entorno.

use std::time::Duration;

use anyhow::{anyhow, bail, Context};

/// Token de desarrollo, solo se acepta con `APP_ENV=development`.
pub const DEV_ADMIN_TOKEN: &str = "dev-admin-token";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listening port (binds 0.0.0.0).
    pub port: u16,
    /// Shared bearer secret for protected routes.
    pub admin_token: String,
    /// Upper bound for a whole request; must exceed the pool's acquire timeout.
    pub request_timeout: Duration,
    pub database: DatabaseConfig,
}

/// Parámetros del pool de MySQL.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Cifra la conexión pero no valida la cadena del certificado del servidor.
    pub ssl_accept_invalid_certs: bool,
    pub ssl_disabled: bool,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// `ADMIN_TOKEN` is required unless `APP_ENV` is `development` or `dev`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let development = var("APP_ENV")
            .map(|env| matches!(env.trim().to_lowercase().as_str(), "development" | "dev"))
            .unwrap_or(false);

        let admin_token = match var("ADMIN_TOKEN") {
            Some(token) => token.trim().to_string(),
            None if development => {
                tracing::warn!("ADMIN_TOKEN no definido, usando el token de desarrollo");
                DEV_ADMIN_TOKEN.to_string()
            }
            None => bail!("ADMIN_TOKEN environment variable is required outside development"),
        };

        let database = DatabaseConfig {
            host: var("MYSQLHOST").unwrap_or_else(|| "localhost".to_string()),
            user: var("MYSQLUSER").unwrap_or_else(|| "root".to_string()),
            password: lookup("MYSQLPASSWORD").unwrap_or_default(),
            name: var("MYSQLDATABASE").unwrap_or_else(|| "cambio".to_string()),
            port: parse_or(var("MYSQLPORT"), "MYSQLPORT", 3306)?,
            max_connections: parse_or(var("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(parse_or(
                var("DB_ACQUIRE_TIMEOUT_SECS"),
                "DB_ACQUIRE_TIMEOUT_SECS",
                5,
            )?),
            ssl_accept_invalid_certs: parse_bool(
                var("DB_SSL_ACCEPT_INVALID_CERTS"),
                "DB_SSL_ACCEPT_INVALID_CERTS",
                true,
            )?,
            ssl_disabled: parse_bool(var("DB_SSL_DISABLED"), "DB_SSL_DISABLED", false)?,
        };
        if database.max_connections == 0 {
            bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        let request_timeout = Duration::from_secs(parse_or(
            var("REQUEST_TIMEOUT_SECS"),
            "REQUEST_TIMEOUT_SECS",
            10,
        )?);
        // Un pool agotado debe fallar como error de almacén antes de que venza la petición.
        if database.acquire_timeout >= request_timeout {
            bail!(
                "DB_ACQUIRE_TIMEOUT_SECS ({}s) must be lower than REQUEST_TIMEOUT_SECS ({}s)",
                database.acquire_timeout.as_secs(),
                request_timeout.as_secs()
            );
        }

        let config = Self {
            port: parse_or(var("PORT"), "PORT", 5000)?,
            admin_token,
            request_timeout,
            database,
        };

        tracing::info!(
            port = config.port,
            development,
            request_timeout_secs = config.request_timeout.as_secs(),
            db_host = %config.database.host,
            db_port = config.database.port,
            db_name = %config.database.name,
            max_connections = config.database.max_connections,
            "configuración cargada"
        );

        Ok(config)
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

fn parse_bool(value: Option<String>, key: &str, default: bool) -> anyhow::Result<bool> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("invalid boolean for {key}: {raw:?}")),
    }
}
