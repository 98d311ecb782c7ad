//! HTTP API for publishing a single buy/sell exchange quote backed by MySQL.
//!
//! - `GET /api/rates` is public and always answers with some quote.
//! - `POST /api/rates` and `GET /api/rates/history` require the admin bearer token.
mod auth;
pub mod config;
mod error;
pub mod models;
pub mod routes;
pub mod storage;

pub use config::Config;
pub use error::{AppError, Result};
pub use models::AppState;
pub use storage::{RateStorage, Storage};
