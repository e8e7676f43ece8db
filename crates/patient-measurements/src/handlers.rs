//! Built-in computation handlers.

use crate::computation::{ComputationError, ComputationHandler, ComputationResult, QueryParams};

/// Body mass index from `weight` (kg) and `height` (cm).
#[derive(Debug, Clone, Copy, Default)]
pub struct BmiHandler;

impl BmiHandler {
    pub const NAME: &'static str = "bmi";
}

impl ComputationHandler for BmiHandler {
    fn handle_computation(&self, params: &QueryParams) -> ComputationResult<f64> {
        let weight = params.number("weight")?;
        let height = params.number("height")?;

        if weight <= 0.0 {
            return Err(ComputationError::InvalidArgument(
                "Weight must be positive".into(),
            ));
        }
        if height <= 0.0 {
            return Err(ComputationError::InvalidArgument(
                "Height must be positive".into(),
            ));
        }

        let meters = height / 100.0;
        Ok(weight / (meters * meters))
    }
}
