//! Computation handler interface and request parameters.

use std::collections::HashMap;

use thiserror::Error;
use url::form_urlencoded;

/// Computation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("{0}")]
    InvalidArgument(String),
}

pub type ComputationResult<T> = Result<T, ComputationError>;

/// Multi-valued request parameters, in arrival order per name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    values: HashMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (name, value) in pairs {
            params.add(name, value);
        }
        params
    }

    /// Parse a raw `application/x-www-form-urlencoded` query string
    /// (`a=1&b=2`), percent-decoding names and values.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    /// First value given for `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values given for `name`.
    pub fn all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value of `name` as a number.
    pub fn number(&self, name: &str) -> ComputationResult<f64> {
        let raw = self
            .first(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ComputationError::InvalidArgument(format!("Missing parameter: {}", name)))?;
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                ComputationError::InvalidArgument(format!("Invalid number for {}: {}", name, raw))
            })
    }
}

/// Computes one measurement from request parameters.
pub trait ComputationHandler: Send + Sync {
    fn handle_computation(&self, params: &QueryParams) -> ComputationResult<f64>;
}
