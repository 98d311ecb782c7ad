use std::str::FromStr;

use chrono::{DateTime, Locale, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::{AppError, Result};

pub const FALLBACK_BUY: &str = "19.8000";
pub const FALLBACK_SELL: &str = "20.2000";
pub const NO_DATA: &str = "Sin datos";

const INCOMPLETE: &str = "Datos incompletos";
const NOT_NUMERIC: &str = "Los precios deben ser valores numéricos";
const NOT_POSITIVE: &str = "Los precios deben ser mayores a cero";
const SELL_NOT_ABOVE_BUY: &str = "El precio de venta debe ser mayor al de compra";
pub const INVALID_BODY: &str = "Cuerpo de la petición inválido";

/// Registro de la tabla `tipos_cambio`
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ExchangeRate {
    pub id: i64,
    #[sqlx(rename = "precio_compra")]
    pub buy: Decimal,
    #[sqlx(rename = "precio_venta")]
    pub sell: Decimal,
    #[sqlx(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
}

/// Par compra/venta ya validado, listo para insertarse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewRate {
    pub buy: Decimal,
    pub sell: Decimal,
}

/// Cuerpo de `POST /api/rates`. Acepta números o cadenas numéricas.
#[derive(Debug, Clone)]
pub struct RateInput {
    pub buy: Option<Value>,
    pub sell: Option<Value>,
}

impl TryFrom<Value> for RateInput {
    type Error = AppError;

    /// Solo un objeto JSON es un cuerpo válido; arreglos y escalares se rechazan.
    fn try_from(body: Value) -> Result<Self> {
        let Value::Object(mut fields) = body else {
            return Err(AppError::Validation(INVALID_BODY));
        };
        Ok(RateInput {
            buy: fields.remove("buy"),
            sell: fields.remove("sell"),
        })
    }
}

impl TryFrom<RateInput> for NewRate {
    type Error = AppError;

    fn try_from(value: RateInput) -> Result<Self> {
        let (Some(buy), Some(sell)) = (present(value.buy), present(value.sell)) else {
            return Err(AppError::Validation(INCOMPLETE));
        };
        let buy = parse_price(&buy)?;
        let sell = parse_price(&sell)?;
        if buy <= Decimal::ZERO || sell <= Decimal::ZERO {
            return Err(AppError::Validation(NOT_POSITIVE));
        }
        if sell <= buy {
            return Err(AppError::Validation(SELL_NOT_ABOVE_BUY));
        }
        Ok(NewRate { buy, sell })
    }
}

fn present(value: Option<Value>) -> Option<Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    }
}

fn parse_price(value: &Value) -> Result<Decimal> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => normalize_decimal_string(s.trim()),
        _ => return Err(AppError::Validation(NOT_NUMERIC)),
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| AppError::Validation(NOT_NUMERIC))
}

fn normalize_decimal_string(s: &str) -> String {
    s.replace(',', ".")
}

/// Formatea un precio con 4 decimales, redondeando la mitad hacia arriba.
pub fn format_price(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.4}")
}

/// Fecha larga en español de México, p. ej. "19 de octubre de 2026, 14:05".
pub fn format_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    date.format_localized("%-d de %B de %Y, %H:%M", Locale::es_MX)
        .to_string()
}

/// Igual que [`format_date`] pero con segundos.
pub fn format_date_with_seconds<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    date.format_localized("%-d de %B de %Y, %H:%M:%S", Locale::es_MX)
        .to_string()
}

/// Respuesta de `GET /api/rates` y `data` de `POST /api/rates`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateDTO {
    pub buy: String,
    pub sell: String,
    pub last_update: String,
}

impl RateDTO {
    /// Cotización por defecto cuando la tabla está vacía.
    pub fn fallback() -> Self {
        Self {
            buy: FALLBACK_BUY.to_string(),
            sell: FALLBACK_SELL.to_string(),
            last_update: NO_DATA.to_string(),
        }
    }
    pub fn from_record(rate: &ExchangeRate) -> Self {
        Self {
            buy: format_price(rate.buy),
            sell: format_price(rate.sell),
            last_update: format_date(&rate.created_at.with_timezone(&chrono::Local)),
        }
    }
    /// `last_update` es la hora del servidor al responder, no la asignada por MySQL.
    pub fn from_new(rate: &NewRate, now: DateTime<chrono::Local>) -> Self {
        Self {
            buy: format_price(rate.buy),
            sell: format_price(rate.sell),
            last_update: format_date(&now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRateDTO {
    pub success: bool,
    pub data: RateDTO,
}

/// Elemento de `GET /api/rates/history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntryDTO {
    pub id: i64,
    pub buy: String,
    pub sell: String,
    pub date: String,
}

impl From<&ExchangeRate> for HistoryEntryDTO {
    fn from(rate: &ExchangeRate) -> Self {
        Self {
            id: rate.id,
            buy: format_price(rate.buy),
            sell: format_price(rate.sell),
            date: format_date_with_seconds(&rate.created_at.with_timezone(&chrono::Local)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use serde_json::json;

    fn input(body: Value) -> RateInput {
        RateInput::try_from(body).unwrap()
    }

    fn validation_message(body: Value) -> &'static str {
        match NewRate::try_from(input(body)) {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let rate = NewRate::try_from(input(json!({"buy": 18.5, "sell": "18,90"}))).unwrap();
        assert_eq!(rate.buy, Decimal::from_str("18.5").unwrap());
        assert_eq!(rate.sell, Decimal::from_str("18.90").unwrap());
    }

    #[test]
    fn only_objects_are_accepted_as_body() {
        for body in [json!([1, 2]), json!("18.5"), json!(18.5), json!(null)] {
            match RateInput::try_from(body) {
                Err(AppError::Validation(msg)) => assert_eq!(msg, INVALID_BODY),
                other => panic!("expected invalid body, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_or_blank_values_are_incomplete() {
        assert_eq!(validation_message(json!({"buy": 18.5})), INCOMPLETE);
        assert_eq!(validation_message(json!({"sell": 18.9})), INCOMPLETE);
        assert_eq!(validation_message(json!({"buy": null, "sell": 18.9})), INCOMPLETE);
        assert_eq!(validation_message(json!({"buy": "  ", "sell": 18.9})), INCOMPLETE);
        assert_eq!(validation_message(json!({})), INCOMPLETE);
    }

    #[test]
    fn rejects_non_numeric_values() {
        assert_eq!(validation_message(json!({"buy": "abc", "sell": 18.9})), NOT_NUMERIC);
        assert_eq!(validation_message(json!({"buy": true, "sell": 18.9})), NOT_NUMERIC);
        assert_eq!(validation_message(json!({"buy": [1], "sell": 18.9})), NOT_NUMERIC);
    }

    #[test]
    fn rejects_non_positive_values() {
        assert_eq!(validation_message(json!({"buy": 0, "sell": 18.9})), NOT_POSITIVE);
        assert_eq!(validation_message(json!({"buy": -1, "sell": 18.9})), NOT_POSITIVE);
    }

    #[test]
    fn sell_must_exceed_buy() {
        assert_eq!(
            validation_message(json!({"buy": 18.9, "sell": 18.9})),
            SELL_NOT_ABOVE_BUY
        );
        assert_eq!(
            validation_message(json!({"buy": "19", "sell": "18.5"})),
            SELL_NOT_ABOVE_BUY
        );
    }

    #[test]
    fn prices_use_four_decimals() {
        assert_eq!(format_price(Decimal::from_str("18.5").unwrap()), "18.5000");
        assert_eq!(format_price(Decimal::from(20)), "20.0000");
        assert_eq!(format_price(Decimal::from_str("18.12345").unwrap()), "18.1235");
        assert_eq!(format_price(Decimal::from_str("18.123449").unwrap()), "18.1234");
    }

    #[test]
    fn fallback_payload() {
        let value = serde_json::to_value(RateDTO::fallback()).unwrap();
        assert_eq!(
            value,
            json!({"buy": "19.8000", "sell": "20.2000", "lastUpdate": "Sin datos"})
        );
    }

    #[test]
    fn dates_are_localized() {
        let offset = FixedOffset::west_opt(6 * 3600).unwrap();
        let date = offset.with_ymd_and_hms(2026, 10, 9, 14, 5, 7).unwrap();
        assert_eq!(format_date(&date), "9 de octubre de 2026, 14:05");
        assert_eq!(format_date_with_seconds(&date), "9 de octubre de 2026, 14:05:07");
    }
}
