use super::config::ConfigError;
use crate::core::models::sse::SseJoinError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssignError {
    #[error("Residue {residue} has no alpha carbon")]
    MissingAlphaCarbon { residue: String },

    #[error("Degenerate geometry at residue {residue}: {reason}")]
    DegenerateGeometry { residue: String, reason: String },

    #[error("Invalid beta-ladder {ladder}: {reason}")]
    InvalidLadder { ladder: String, reason: String },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Failed to join SSEs: {source}")]
    Join {
        #[from]
        source: SseJoinError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
