use crate::models::{ExchangeRate, NewRate};
use crate::Result;

use super::{RateStorage, Storage};

#[async_trait::async_trait]
impl RateStorage for Storage {
    async fn latest(&self) -> Result<Option<ExchangeRate>> {
        let query = "SELECT id, precio_compra, precio_venta, fecha_creacion FROM tipos_cambio \
                     ORDER BY fecha_creacion DESC, id DESC LIMIT 1";
        let result = sqlx::query_as::<_, ExchangeRate>(query)
            .fetch_optional(&self.pool)
            .await?;
        Ok(result)
    }
    async fn insert(&self, rate: NewRate) -> Result<i64> {
        let query = "INSERT INTO tipos_cambio (precio_compra, precio_venta) VALUES (?, ?)";
        let result = sqlx::query(query)
            .bind(rate.buy)
            .bind(rate.sell)
            .execute(&self.pool)
            .await?;
        let id = result.last_insert_id() as i64;
        tracing::info!("Guardé tipo de cambio {id}: compra {}, venta {}", rate.buy, rate.sell);
        Ok(id)
    }
    async fn history(&self, limit: u32) -> Result<Vec<ExchangeRate>> {
        let query = "SELECT id, precio_compra, precio_venta, fecha_creacion FROM tipos_cambio \
                     ORDER BY fecha_creacion DESC, id DESC LIMIT ?";
        let results = sqlx::query_as::<_, ExchangeRate>(query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(results)
    }
}
