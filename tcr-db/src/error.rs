use tcr_core::threshold::ThresholdError;
use thiserror::Error;

/// Errors returned at the dashboard query boundary.
///
/// An unknown country or an empty window is not an error; those come back
/// as an empty result.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    OffGrid(#[from] ThresholdError),

    #[error("database query failed: {0}")]
    Storage(#[from] anyhow::Error),
}

impl QueryError {
    pub fn is_off_grid(&self) -> bool {
        matches!(self, QueryError::OffGrid(_))
    }
}
