use crate::diagnostics::Diagnostic;
use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// An upstream phase handed us something outside the documented closed world.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
    #[error("{0}")]
    Diagnostic(Diagnostic),
    #[error("Generic error: {0}")]
    Generic(eyre::Report),
}

impl Error {
    pub fn internal_invariant(message: impl Into<String>) -> Self {
        Error::InternalInvariant(message.into())
    }

    pub fn diagnostic(diagnostic: Diagnostic) -> Self {
        Error::Diagnostic(diagnostic)
    }

    pub fn is_internal_invariant(&self) -> bool {
        matches!(self, Error::InternalInvariant(_))
    }
}

pub type Result<T> = result::Result<T, Error>;

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(eyre::Report::msg(s))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(e.into())
    }
}
