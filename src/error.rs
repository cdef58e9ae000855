use thiserror::Error;

/// A row that violates the launch-record invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("launch site is empty")]
    EmptySite,

    #[error("payload mass {0} kg is negative or not a number")]
    InvalidPayload(f64),

    #[error("class {0} is not 0 or 1")]
    InvalidClass(i64),
}

/// A payload range rejected at the UI boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("payload range bound is not a finite number")]
    NotFinite,

    #[error("payload range is inverted: {low} kg is above {high} kg")]
    Inverted { low: f64, high: f64 },

    #[error("payload range {low}-{high} kg lies outside {min}-{max} kg")]
    OutOfDomain { low: f64, high: f64, min: f64, max: f64 },
}

/// Failure of one chart recomputation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("invalid payload range: {0}")]
    Range(#[from] RangeError),
}
