//! Almacenes en memoria para las pruebas de los manejadores.

use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;

use crate::models::{ExchangeRate, NewRate};
use crate::{AppError, Result};

use super::RateStorage;

#[derive(Default)]
pub struct MemoryStorage {
    rows: Mutex<Vec<ExchangeRate>>,
}
impl MemoryStorage {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl RateStorage for MemoryStorage {
    async fn latest(&self) -> Result<Option<ExchangeRate>> {
        Ok(self.history(1).await?.into_iter().next())
    }
    async fn insert(&self, rate: NewRate) -> Result<i64> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i64 + 1;
        rows.push(ExchangeRate {
            id,
            buy: rate.buy,
            sell: rate.sell,
            created_at: Utc::now(),
        });
        Ok(id)
    }
    async fn history(&self, limit: u32) -> Result<Vec<ExchangeRate>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

/// Simula un MySQL caído.
pub struct FailingStorage;

#[async_trait::async_trait]
impl RateStorage for FailingStorage {
    async fn latest(&self) -> Result<Option<ExchangeRate>> {
        Err(AppError::DbError("pool timed out while waiting for an open connection".into()))
    }
    async fn insert(&self, _rate: NewRate) -> Result<i64> {
        Err(AppError::DbError("pool timed out while waiting for an open connection".into()))
    }
    async fn history(&self, _limit: u32) -> Result<Vec<ExchangeRate>> {
        Err(AppError::DbError("pool timed out while waiting for an open connection".into()))
    }
}

/// Tarda `delay` en cada consulta y luego falla, como un pool sin conexiones libres.
pub struct SlowStorage {
    delay: Duration,
}
impl SlowStorage {
    pub fn failing_after(delay: Duration) -> Self {
        Self { delay }
    }
    async fn wait(&self) -> AppError {
        tokio::time::sleep(self.delay).await;
        AppError::DbError("pool timed out while waiting for an open connection".into())
    }
}

#[async_trait::async_trait]
impl RateStorage for SlowStorage {
    async fn latest(&self) -> Result<Option<ExchangeRate>> {
        Err(self.wait().await)
    }
    async fn insert(&self, _rate: NewRate) -> Result<i64> {
        Err(self.wait().await)
    }
    async fn history(&self, _limit: u32) -> Result<Vec<ExchangeRate>> {
        Err(self.wait().await)
    }
}
