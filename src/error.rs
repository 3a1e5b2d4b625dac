use std::io;

use thiserror::Error;

/// Fatal conversion failures.
///
/// Problems with diagram content never end up here; they are reported as
/// [`crate::report::Diagnostic`]s and the offending element is skipped.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse GPML XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("GPML document has no Pathway root element (found '{0}')")]
    MissingPathway(String),

    #[error("Element id '{0}' is used more than once")]
    DuplicateElementId(String),

    #[error("A participant identity for '{0}' is already cached")]
    ParticipantAlreadyCached(String),
}

pub type ConvertResult<T> = Result<T, ConvertError>;
