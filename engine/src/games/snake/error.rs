#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// More cells requested than the board can ever offer.
    Infeasible {
        what: &'static str,
        requested: usize,
        available: usize,
    },
    AttemptsExhausted {
        what: &'static str,
        attempts: usize,
    },
}

impl std::fmt::Display for PlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementError::Infeasible { what, requested, available } => write!(
                f,
                "Cannot place {} {}: only {} cells available",
                requested, what, available
            ),
            PlacementError::AttemptsExhausted { what, attempts } => {
                write!(f, "Gave up placing {} after {} attempts", what, attempts)
            }
        }
    }
}

impl std::error::Error for PlacementError {}

/// Why a round could not be set up from a given set of settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    InvalidSettings(String),
    Placement(PlacementError),
}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::InvalidSettings(reason) => write!(f, "Invalid settings: {}", reason),
            SetupError::Placement(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SetupError {}

impl From<PlacementError> for SetupError {
    fn from(e: PlacementError) -> Self {
        SetupError::Placement(e)
    }
}
