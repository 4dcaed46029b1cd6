//! Explicit input validation.
//!
//! Request bodies and query strings are checked here before any handler
//! logic runs. Every check yields either the typed value or a
//! [`ValidationErrors`] listing each offending field.

use std::collections::HashMap;
use std::fmt;

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::{AlertPayload, NewAlert, NewStrategy};

pub const DEFAULT_SKIP: i64 = 0;
pub const DEFAULT_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for (i, field) in self.fields.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{} {}", sep, field.field, field.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Conversion from an untyped JSON body into a validated input type.
pub trait Validate: Sized {
    fn validate(value: Value) -> Result<Self, ValidationErrors>;
}

fn expect_object(value: Value) -> Result<Map<String, Value>, ValidationErrors> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ValidationErrors::single("body", "must be a JSON object")),
    }
}

fn required_string(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match map.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => {
            errors.push(field, "field required");
            None
        }
        Some(_) => {
            errors.push(field, "must be a string");
            None
        }
    }
}

impl Validate for AlertPayload {
    fn validate(value: Value) -> Result<Self, ValidationErrors> {
        expect_object(value)
    }
}

impl Validate for NewStrategy {
    fn validate(value: Value) -> Result<Self, ValidationErrors> {
        let map = expect_object(value)?;
        let mut errors = ValidationErrors::default();

        let name = required_string(&map, "name", &mut errors);
        let webhook_url = required_string(&map, "webhook_url", &mut errors);
        let notification_token = required_string(&map, "notification_token", &mut errors);

        errors.into_result(|| NewStrategy {
            name: name.unwrap_or_default(),
            webhook_url: webhook_url.unwrap_or_default(),
            notification_token: notification_token.unwrap_or_default(),
        })
    }
}

impl Validate for NewAlert {
    fn validate(value: Value) -> Result<Self, ValidationErrors> {
        let map = expect_object(value)?;
        let mut errors = ValidationErrors::default();
        let data = required_string(&map, "data", &mut errors);
        errors.into_result(|| NewAlert {
            data: data.unwrap_or_default(),
        })
    }
}

/// JSON body extractor that runs [`Validate`] before the handler sees it.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationErrors::single("body", rejection.body_text()))?;
        Ok(Self(T::validate(value)?))
    }
}

/// Offset/window pagination (`skip`, `limit`) for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let skip = non_negative(params, "skip", DEFAULT_SKIP, &mut errors);
        let limit = non_negative(params, "limit", DEFAULT_LIMIT, &mut errors);
        errors.into_result(|| Pagination { skip, limit })
    }

    /// Apply the window to an in-memory slice.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.skip as usize).min(items.len());
        let end = start.saturating_add(self.limit as usize).min(items.len());
        &items[start..end]
    }
}

fn non_negative(
    params: &HashMap<String, String>,
    field: &str,
    default: i64,
    errors: &mut ValidationErrors,
) -> i64 {
    match params.get(field) {
        None => default,
        Some(raw) => match raw.parse::<i64>() {
            Ok(value) if value >= 0 => value,
            Ok(_) => {
                errors.push(field, "must be greater than or equal to 0");
                default
            }
            Err(_) => {
                errors.push(field, "must be an integer");
                default
            }
        },
    }
}

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ValidationErrors::single("query", rejection.body_text()))?;
        Ok(Pagination::from_query(&params)?)
    }
}

/// Numeric `{strategy_id}` path segment. A non-integer id is a field error
/// like any other input, not a bare path rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyId(pub i64);

impl<S> FromRequestParts<S> for StrategyId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ValidationErrors::single("strategy_id", rejection.body_text()))?;
        Ok(Self(id))
    }
}
