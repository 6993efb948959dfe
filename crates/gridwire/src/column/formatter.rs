use crate::{source::Related, value::Value};
use serde_json::Value as Json;
use thiserror::Error as ThisError;

/// What a formatter or content function returns: the rendered cell, or a
/// failure that aborts the whole request.
pub type FormatterResult = Result<Json, FormatterError>;

type PlainFn<R> = Box<dyn Fn(&Value, &R) -> FormatterResult + Send + Sync>;
type RelationFn<R> = Box<dyn for<'a> Fn(&Value, &R, Related<'a, R>) -> FormatterResult + Send + Sync>;

/// Content function of a synthetic column; sees the whole record and
/// nothing else.
pub type ContentFn<R> = Box<dyn Fn(&R) -> FormatterResult + Send + Sync>;

///
/// CellFormatter
///
/// User-supplied cell renderer, tagged by the path shape it serves: a plain
/// formatter sees `(value, record)`, a relation formatter additionally sees
/// the related record or collection. The tag is checked against the
/// column's resolved path during shaping; a mismatch is a mapping error,
/// not a silent arity coincidence.
///

pub enum CellFormatter<R> {
    Plain(PlainFn<R>),
    Relation(RelationFn<R>),
}

impl<R> CellFormatter<R> {
    pub fn plain(f: impl Fn(&Value, &R) -> FormatterResult + Send + Sync + 'static) -> Self {
        Self::Plain(Box::new(f))
    }

    pub fn relation(
        f: impl for<'a> Fn(&Value, &R, Related<'a, R>) -> FormatterResult + Send + Sync + 'static,
    ) -> Self {
        Self::Relation(Box::new(f))
    }
}

///
/// FormatterError
///
/// Raised by user formatter/content code. Fatal for the request; the shaper
/// attaches the failing column before propagating.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("formatter for column '{column}' failed: {message}")]
pub struct FormatterError {
    column: String,
    message: String,
}

impl FormatterError {
    /// Construct from inside a formatter; the column is filled in by the
    /// shaper on the way out.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            column: String::new(),
            message: message.into(),
        }
    }

    #[must_use]
    pub(crate) fn with_column(mut self, column: &str) -> Self {
        if self.column.is_empty() {
            self.column = column.to_string();
        }
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
