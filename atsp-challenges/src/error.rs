#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    InvalidMatrix {
        reason: String,
    },
    OutOfRange {
        index: usize,
        size: usize,
    },
    InvalidConfig {
        reason: String,
    },
    InvalidTour {
        reason: String,
    },
}

impl SolverError {
    pub fn invalid_matrix(reason: impl Into<String>) -> Self {
        SolverError::InvalidMatrix {
            reason: reason.into(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        SolverError::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub fn invalid_tour(reason: impl Into<String>) -> Self {
        SolverError::InvalidTour {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::InvalidMatrix { reason } => {
                write!(f, "Cost matrix is invalid: {}", reason)
            }
            SolverError::OutOfRange { index, size } => write!(
                f,
                "Node index '{}' is out of range. Must be less than '{}'",
                index, size
            ),
            SolverError::InvalidConfig { reason } => {
                write!(f, "Solver config is invalid: {}", reason)
            }
            SolverError::InvalidTour { reason } => write!(f, "Tour is invalid: {}", reason),
        }
    }
}

impl std::error::Error for SolverError {}

pub type SolverResult<T> = std::result::Result<T, SolverError>;
