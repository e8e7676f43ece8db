//! Dispatch of computed measurement requests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::computation::{ComputationError, ComputationHandler, QueryParams};
use crate::handlers::BmiHandler;

/// Request parameter naming the measurement.
pub const MEASUREMENT_PARAM: &str = "measurement";

/// HTTP 400.
pub const BAD_REQUEST: u16 = 400;

/// Measurement request errors. All are client errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasurementError {
    #[error("Measurement not specified.")]
    NotSpecified,

    #[error("This measurement is not intended to be computed.")]
    NotComputable(String),

    #[error("{0}")]
    InvalidArgument(String),
}

impl MeasurementError {
    pub fn status_code(&self) -> u16 {
        BAD_REQUEST
    }

    /// Error envelope for the transport.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            status: self.status_code(),
            message: self.to_string(),
        }
    }
}

impl From<ComputationError> for MeasurementError {
    fn from(e: ComputationError) -> Self {
        match e {
            ComputationError::InvalidArgument(msg) => MeasurementError::InvalidArgument(msg),
        }
    }
}

/// Successful answer: `{"value": ...}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MeasurementResponse {
    pub value: f64,
}

/// Failed answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

/// Routes measurement requests to their handlers by name.
#[derive(Default)]
pub struct ComputedMeasurementResource {
    handlers: HashMap<String, Box<dyn ComputationHandler>>,
}

impl ComputedMeasurementResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource with the built-in handlers.
    pub fn standard() -> Self {
        Self::new().with_handler(BmiHandler::NAME, BmiHandler)
    }

    /// Register `handler` under `name`, replacing any previous one.
    pub fn with_handler(
        mut self,
        name: impl Into<String>,
        handler: impl ComputationHandler + 'static,
    ) -> Self {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    pub fn is_computable(&self, measurement: &str) -> bool {
        self.handlers.contains_key(measurement)
    }

    /// Compute the measurement named in `params`.
    pub fn get_computed_measurement(
        &self,
        params: &QueryParams,
    ) -> Result<MeasurementResponse, MeasurementError> {
        let measurement = params
            .first(MEASUREMENT_PARAM)
            .ok_or(MeasurementError::NotSpecified)?;

        let handler = self
            .handlers
            .get(measurement)
            .ok_or_else(|| MeasurementError::NotComputable(measurement.to_string()))?;

        let value = handler.handle_computation(params)?;
        if !value.is_finite() {
            return Err(MeasurementError::InvalidArgument(format!(
                "Computed {} is not a finite number",
                measurement
            )));
        }
        debug!(measurement, value, "Computed measurement");
        Ok(MeasurementResponse { value })
    }

    /// Compute and serialise, success or failure, as `(status, json)`.
    pub fn respond(&self, params: &QueryParams) -> (u16, serde_json::Value) {
        match self.get_computed_measurement(params) {
            Ok(response) => (200, serde_json::json!({ "value": response.value })),
            Err(e) => {
                let body = e.to_response();
                (body.status, serde_json::json!({ "status": body.status, "message": body.message }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl ComputationHandler for Fixed {
        fn handle_computation(&self, _params: &QueryParams) -> Result<f64, ComputationError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_dispatch_by_name() {
        let resource = ComputedMeasurementResource::new()
            .with_handler("one", Fixed(1.0))
            .with_handler("two", Fixed(2.0));

        let params = QueryParams::from_pairs([("measurement", "two")]);
        assert_eq!(
            resource.get_computed_measurement(&params),
            Ok(MeasurementResponse { value: 2.0 })
        );
    }

    #[test]
    fn test_missing_measurement() {
        let resource = ComputedMeasurementResource::standard();
        let err = resource
            .get_computed_measurement(&QueryParams::new())
            .unwrap_err();

        assert_eq!(err, MeasurementError::NotSpecified);
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Measurement not specified.");
    }

    #[test]
    fn test_unknown_measurement() {
        let resource = ComputedMeasurementResource::standard();
        let params = QueryParams::from_pairs([("measurement", "weight")]);

        let err = resource.get_computed_measurement(&params).unwrap_err();
        assert_eq!(
            err.to_response(),
            ErrorResponse {
                status: 400,
                message: "This measurement is not intended to be computed.".into(),
            }
        );
    }

    #[test]
    fn test_handler_error_passed_through() {
        let resource = ComputedMeasurementResource::standard();
        let params = QueryParams::from_pairs([("measurement", "bmi"), ("weight", "70")]);

        let err = resource.get_computed_measurement(&params).unwrap_err();
        assert_eq!(
            err,
            MeasurementError::InvalidArgument("Missing parameter: height".into())
        );
    }

    #[test]
    fn test_non_finite_result_rejected() {
        let resource = ComputedMeasurementResource::new().with_handler("ratio", Fixed(f64::INFINITY));
        let params = QueryParams::from_pairs([("measurement", "ratio")]);

        assert_eq!(
            resource.get_computed_measurement(&params),
            Err(MeasurementError::InvalidArgument(
                "Computed ratio is not a finite number".into()
            ))
        );
    }

    #[test]
    fn test_replacing_handler() {
        let resource = ComputedMeasurementResource::new()
            .with_handler("bmi", Fixed(1.0))
            .with_handler("bmi", Fixed(3.0));
        let params = QueryParams::from_pairs([("measurement", "bmi")]);

        assert_eq!(resource.get_computed_measurement(&params).unwrap().value, 3.0);
        assert!(resource.is_computable("bmi"));
        assert!(!resource.is_computable("ofc"));
    }
}
