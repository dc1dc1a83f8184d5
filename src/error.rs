use std::fmt;
use thiserror::Error;

/// Which detail level a generation call was serving. Carried in generation
/// errors so the UI can show the right failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationContext {
    Report,
    SectorAnalysis,
    ProductAnalysis,
}

impl fmt::Display for GenerationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationContext::Report => write!(f, "trend report"),
            GenerationContext::SectorAnalysis => write!(f, "sector analysis"),
            GenerationContext::ProductAnalysis => write!(f, "product analysis"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// The backend call itself failed (network, auth, quota).
    #[error("{context} generation failed: {message}")]
    GenerationFailed {
        context: GenerationContext,
        message: String,
    },

    /// The call succeeded but the returned text was not valid JSON for the
    /// requested shape.
    #[error("{context} returned a malformed response: {message}")]
    MalformedResponse {
        context: GenerationContext,
        message: String,
    },

    #[error("authentication required")]
    AuthRequired,

    #[error("an account already exists for {0}")]
    DuplicateAccount(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    /// Raw transport/backend failure, before a generation context is attached.
    #[error("backend error: {0}")]
    Backend(String),

    #[error("profile store error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Backend(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
