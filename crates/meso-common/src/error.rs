//! Error types for the discussion mapper.

use thiserror::Error;

/// Result type alias using MesoError.
pub type MesoResult<T> = Result<T, MesoError>;

/// Primary error type for discussion mapping.
///
/// Every variant is terminal for the current run. Messages carry the
/// offending token, line or URL so a failed render can be diagnosed from
/// the log alone.
#[derive(Debug, Error)]
pub enum MesoError {
    // === Discussion Errors ===
    #[error("Malformed discussion: {0}")]
    MalformedDiscussion(String),

    #[error("No validity window found: {0}")]
    NoValidityFound(String),

    #[error("Unparsable issuance date: {0}")]
    UnparsableIssuanceDate(String),

    // === Radar Errors ===
    #[error("Malformed georeference: {0}")]
    MalformedGeoreference(String),

    #[error("Unsupported georeference: {0}")]
    UnsupportedGeoreference(String),

    #[error("Malformed raster: {0}")]
    MalformedRaster(String),

    #[error("Failed to fetch {url}: {reason}")]
    FetchFailure { url: String, reason: String },

    // === Input Errors ===
    #[error("Invalid source selection: {0}")]
    InvalidSourceSelection(String),

    // === Output Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl MesoError {
    /// Short stable identifier for this error, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            MesoError::MalformedDiscussion(_) => "MalformedDiscussion",
            MesoError::NoValidityFound(_) => "NoValidityFound",
            MesoError::UnparsableIssuanceDate(_) => "UnparsableIssuanceDate",
            MesoError::MalformedGeoreference(_) => "MalformedGeoreference",
            MesoError::UnsupportedGeoreference(_) => "UnsupportedGeoreference",
            MesoError::MalformedRaster(_) => "MalformedRaster",
            MesoError::FetchFailure { .. } => "FetchFailure",
            MesoError::InvalidSourceSelection(_) => "InvalidSourceSelection",
            MesoError::RenderError(_) => "RenderError",
            MesoError::Io(_) => "Io",
        }
    }

    /// Process exit code for this error.
    ///
    /// Input problems exit with 2, upstream data problems with 3, fetch
    /// failures with 4 and local failures with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            MesoError::InvalidSourceSelection(_)
            | MesoError::MalformedDiscussion(_)
            | MesoError::NoValidityFound(_)
            | MesoError::UnparsableIssuanceDate(_) => 2,

            MesoError::MalformedGeoreference(_)
            | MesoError::UnsupportedGeoreference(_)
            | MesoError::MalformedRaster(_) => 3,

            MesoError::FetchFailure { .. } => 4,

            MesoError::RenderError(_) | MesoError::Io(_) => 1,
        }
    }

    /// Build a fetch failure for the given URL.
    pub fn fetch(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        MesoError::FetchFailure {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for MesoError {
    fn from(err: std::io::Error) -> Self {
        MesoError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MesoError {
    fn from(err: serde_json::Error) -> Self {
        MesoError::Io(format!("JSON error: {}", err))
    }
}
