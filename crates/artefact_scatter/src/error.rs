//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Only
//! problems that prevent a run from starting are errors: invalid configuration, missing
//! collaborators, and catalog parse failures. Rejected candidates and under-placement are
//! reported through [`crate::placement::PlacementReport`] instead.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("missing collaborator: {what}")]
    MissingCollaborator { what: &'static str },

    #[error("artefact catalog error: {0}")]
    Catalog(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        assert!(matches!(err, Error::Other(_)));
    }

    #[test]
    fn missing_collaborator_names_the_collaborator() {
        let err = Error::MissingCollaborator {
            what: "terrain oracle",
        };
        assert_eq!(err.to_string(), "missing collaborator: terrain oracle");
    }
}
