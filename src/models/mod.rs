mod rate;
pub use rate::*;

use std::sync::Arc;

use crate::storage::RateStorage;

/// Datos compartidos por los manejadores
#[derive(Clone)]
pub struct AppState {
    pub rate_storage: Arc<dyn RateStorage>,
    pub admin_token: Arc<str>,
}
impl AppState {
    /// Crea el estado a partir del almacén y el token de administración
    pub fn new(rate_storage: Arc<dyn RateStorage>, admin_token: impl Into<Arc<str>>) -> Self {
        Self {
            rate_storage,
            admin_token: admin_token.into(),
        }
    }
}
