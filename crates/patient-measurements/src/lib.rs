//! Computed patient measurements.
//!
//! A request names a measurement (`measurement=bmi`) plus its inputs; the
//! [`ComputedMeasurementResource`] dispatches it to the registered
//! [`ComputationHandler`] and answers `{"value": <number>}`.

pub mod computation;
pub mod handlers;
pub mod resource;

pub use computation::*;
pub use handlers::*;
pub use resource::*;
