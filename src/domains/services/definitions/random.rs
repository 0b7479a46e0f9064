//! Random number and password generator.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::json;
use tracing::instrument;

use crate::core::PortalServer;
use crate::core::config::LimitsConfig;
use crate::domains::services::error::{ServiceError, ServiceResult};

const LETTERS_AND_DIGITS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const PUNCTUATION: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

pub const DEFAULT_MIN: i64 = 0;
pub const DEFAULT_MAX: i64 = 100;
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// Random values within configured limits.
pub struct RandomGenerator {
    limits: LimitsConfig,
}

impl RandomGenerator {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Check a requested number range against the configured limits.
    pub fn validate_range(&self, min: i64, max: i64) -> ServiceResult<()> {
        if min > max {
            return Err(ServiceError::validation(
                "The minimum ('min') cannot be greater than the maximum ('max').",
            ));
        }

        let span = max.abs_diff(min);
        if span > self.limits.max_number_span
            || min.unsigned_abs() > self.limits.max_number_abs
            || max.unsigned_abs() > self.limits.max_number_abs
        {
            return Err(ServiceError::validation(format!(
                "The requested range is too large. Maximum difference between min and max: {}, maximum absolute value of min/max: {}.",
                self.limits.max_number_span, self.limits.max_number_abs
            )));
        }

        Ok(())
    }

    /// A uniformly distributed integer in `[min, max]`.
    pub fn number(&self, min: i64, max: i64) -> ServiceResult<i64> {
        self.validate_range(min, max)?;
        Ok(rand::thread_rng().gen_range(min..=max))
    }

    pub fn validate_password_length(&self, length: usize) -> ServiceResult<()> {
        let (lo, hi) = (
            self.limits.min_password_length,
            self.limits.max_password_length,
        );
        if !(lo..=hi).contains(&length) {
            return Err(ServiceError::validation(format!(
                "Password length ('length') must be between {lo} and {hi} characters."
            )));
        }
        Ok(())
    }

    /// A password of `length` characters drawn independently from letters
    /// and digits, plus ASCII punctuation when `use_symbols` is set.
    pub fn password(&self, length: usize, use_symbols: bool) -> ServiceResult<String> {
        self.validate_password_length(length)?;

        let pool: Vec<u8> = if use_symbols {
            [LETTERS_AND_DIGITS, PUNCTUATION].concat()
        } else {
            LETTERS_AND_DIGITS.to_vec()
        };

        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| pool.choose(&mut rng).copied().map(char::from))
            .collect::<Option<String>>()
            .ok_or_else(|| ServiceError::internal("empty password alphabet"))
    }
}

/// Parse an optional integer query parameter, falling back to `default`.
fn int_param<T: std::str::FromStr>(
    query: &HashMap<String, String>,
    key: &str,
    default: T,
    message: &str,
) -> ServiceResult<T> {
    match query.get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ServiceError::validation(message)),
    }
}

/// Parse the `use_symbols` flag: `true` or `false`, any case.
pub fn parse_use_symbols(raw: Option<&str>) -> ServiceResult<bool> {
    match raw.map(str::to_lowercase).as_deref() {
        None | Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(_) => Err(ServiceError::validation(
            "Parameter 'use_symbols' must be either 'true' or 'false'.",
        )),
    }
}

/// `GET /api/random/number`
#[instrument(skip(server))]
pub async fn random_number(
    State(server): State<PortalServer>,
    Query(query): Query<HashMap<String, String>>,
) -> ServiceResult<impl IntoResponse> {
    let message = "Parameters 'min' and 'max' must be valid integers.";
    let min = int_param(&query, "min", DEFAULT_MIN, message)?;
    let max = int_param(&query, "max", DEFAULT_MAX, message)?;

    let number = server.random().number(min, max)?;

    Ok(Json(json!({
        "message": "Random number generated successfully.",
        "requested_min_bound": min,
        "requested_max_bound": max,
        "random_number": number,
    })))
}

/// `GET /api/random/password`
#[instrument(skip(server))]
pub async fn random_password(
    State(server): State<PortalServer>,
    Query(query): Query<HashMap<String, String>>,
) -> ServiceResult<impl IntoResponse> {
    let length: i64 = int_param(
        &query,
        "length",
        DEFAULT_PASSWORD_LENGTH as i64,
        "Parameter 'length' (password length) must be an integer.",
    )?;
    // Negative lengths fail the range check below.
    let length = usize::try_from(length).unwrap_or(0);
    server.random().validate_password_length(length)?;
    let use_symbols = parse_use_symbols(query.get("use_symbols").map(String::as_str))?;

    let password = server.random().password(length, use_symbols)?;

    Ok(Json(json!({
        "message": "Password generated successfully.",
        "password": password,
        "requested_length": length,
        "special_symbols_included": use_symbols,
    })))
}
