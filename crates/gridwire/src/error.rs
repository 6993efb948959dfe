use crate::{column::FormatterError, path::MappingError, request::ParseError, source::SourceError};
use thiserror::Error as ThisError;

///
/// Error
///
/// Crate-level error, one variant per failure class. Parse failures only
/// appear once the wire gate identified a data request; mapping failures
/// are configuration bugs; formatter and source failures abort the request
/// unchanged, with no retry and no partial response.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Formatter(#[from] FormatterError),

    #[error(transparent)]
    Source(#[from] SourceError),
}
