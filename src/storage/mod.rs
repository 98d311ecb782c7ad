mod rate;
#[cfg(test)]
pub(crate) mod memory;

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlSslMode};

use crate::{
    config::DatabaseConfig,
    models::{ExchangeRate, NewRate},
    Result,
};

pub const RATES_TABLE: &str = "tipos_cambio";
pub const HISTORY_LIMIT: u32 = 20;

#[async_trait::async_trait]
pub trait RateStorage: Send + Sync {
    /// Última cotización registrada, `None` si la tabla está vacía.
    async fn latest(&self) -> Result<Option<ExchangeRate>>;
    /// Inserta una cotización y devuelve el id asignado.
    async fn insert(&self, rate: NewRate) -> Result<i64>;
    /// Las `limit` cotizaciones más recientes, de la más nueva a la más vieja.
    async fn history(&self, limit: u32) -> Result<Vec<ExchangeRate>>;
}

#[derive(Clone)]
pub struct Storage {
    pool: MySqlPool,
}
impl Storage {
    /// Crea el pool y verifica la conexión. Si MySQL no responde el servicio
    /// arranca igual y cada consulta fallará por separado.
    pub async fn new(config: &DatabaseConfig) -> Self {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy_with(connect_options(config));
        let storage = Storage { pool };
        match storage.pool.acquire().await {
            Ok(conn) => {
                tracing::info!("Conexión MySQL exitosa");
                drop(conn);
                if let Err(e) = storage.migrate().await {
                    tracing::error!("No se pudo aplicar la migración de {RATES_TABLE}: {e}");
                }
            }
            Err(e) => tracing::error!("Error MySQL: {e}"),
        }
        storage
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(&self.pool).await?;
        tracing::info!("Esquema de {RATES_TABLE} listo");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Pool de MySQL cerrado");
    }
}

fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name)
        .ssl_mode(ssl_mode(config))
}

fn ssl_mode(config: &DatabaseConfig) -> MySqlSslMode {
    if config.ssl_disabled {
        MySqlSslMode::Disabled
    } else if config.ssl_accept_invalid_certs {
        // TLS sin validar la cadena del certificado
        MySqlSslMode::Required
    } else {
        MySqlSslMode::VerifyIdentity
    }
}
