use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrreryError {
    #[error("ephemeris request for horizon id {horizon_id} failed")]
    Network {
        horizon_id: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("ephemeris service returned HTTP {status} for horizon id {horizon_id}")]
    Status {
        horizon_id: u32,
        status: reqwest::StatusCode,
    },

    #[error("malformed ephemeris response for horizon id {horizon_id}")]
    Parse {
        horizon_id: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("ephemeris for horizon id {horizon_id} has {len} samples, need at least 2")]
    EmptySeries { horizon_id: u32, len: usize },

    #[error("ephemeris for horizon id {horizon_id} was already requested")]
    AlreadyRequested { horizon_id: u32 },

    #[error("settings error: {0}")]
    Config(#[from] confy::ConfyError),
}

impl OrreryError {
    /// Transport and shape failures of the ephemeris query.
    /// A well-formed but too short series is `EmptySeries` and is not counted here.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            OrreryError::Network { .. } | OrreryError::Status { .. } | OrreryError::Parse { .. }
        )
    }

    /// Any failure that leaves a body without a playable series
    pub fn is_load_failure(&self) -> bool {
        self.is_fetch_failure() || matches!(self, OrreryError::EmptySeries { .. })
    }

    pub fn horizon_id(&self) -> Option<u32> {
        match self {
            OrreryError::Network { horizon_id, .. }
            | OrreryError::Status { horizon_id, .. }
            | OrreryError::Parse { horizon_id, .. }
            | OrreryError::EmptySeries { horizon_id, .. }
            | OrreryError::AlreadyRequested { horizon_id } => Some(*horizon_id),
            OrreryError::Config(_) => None,
        }
    }
}
