use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Fewer data points than a statistic needs. Engines normally degrade
    /// to a defined default instead of surfacing this; it only escapes when
    /// a caller asked for something unanswerable (e.g. an empty universe).
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    /// A component was used before it was populated. This is a caller
    /// programming error, never a data-quality condition, and is therefore
    /// never converted into a default value.
    #[error("Not ready: {0}")]
    NotReady(String),

    #[error("API error: {0}")]
    ApiError(String),
}
