//! Module: source
//! Responsibility: the data-source collaborator contract the pipeline consumes.
//! Does not own: path resolution, request parsing, or row shaping.
//! Boundary: concrete sources (SQL bindings, `MemorySource`) implement these
//! traits; the adapter drives them and never looks past them.

mod filter;
mod memory;

use crate::{
    path::{RelationSchema, ResolvedProperty},
    value::Value,
};
use std::fmt;
use thiserror::Error as ThisError;

// re-exports
pub use filter::FilterExpr;
pub use memory::{MemoryRecord, MemorySource};

///
/// SortDirection
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::Desc)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// Related
///
/// A record's view of one relation hop: a single related record or the
/// loaded collection. Borrowed from the owning record; never detached.
///

#[derive(Debug)]
pub enum Related<'a, R> {
    One(&'a R),
    Many(&'a [R]),
}

impl<R: SourceRecord> Related<'_, R> {
    /// Read `field` across the hop: the related record's value, or the list
    /// of values over a collection.
    #[must_use]
    pub fn field_value(&self, field: &str) -> Value {
        match self {
            Self::One(record) => record.field(field).unwrap_or(Value::None),
            Self::Many(records) => Value::List(
                records
                    .iter()
                    .map(|record| record.field(field).unwrap_or(Value::None))
                    .collect(),
            ),
        }
    }
}

///
/// SourceRecord
///
/// Per-record access contract: named scalar fields plus one-hop relation
/// traversal by property path.
///

pub trait SourceRecord {
    /// Value of a scalar field; `None` when the record has no such field.
    fn field(&self, name: &str) -> Option<Value>;

    /// Traverse a relation by its property path.
    fn related(&self, property_path: &str) -> Option<Related<'_, Self>>
    where
        Self: Sized;
}

///
/// QuerySource
///
/// The opaque queryable collaborator. `Clone` is the pristine-copy
/// operation: an independent query carrying the same accumulated predicates,
/// used to count totals before the adapter mutates the working copy.
///
/// `count` respects accumulated predicates but ignores limit/offset;
/// `execute` applies everything.
///

pub trait QuerySource: RelationSchema + Clone {
    type Record: SourceRecord;

    fn count(&self) -> Result<u64, SourceError>;

    fn add_predicate(&mut self, expr: FilterExpr);

    fn add_sort(&mut self, key: ResolvedProperty, direction: SortDirection);

    fn set_limit(&mut self, limit: u64);

    fn set_offset(&mut self, offset: u64);

    fn execute(&self) -> Result<Vec<Self::Record>, SourceError>;
}

///
/// SourceError
///
/// Execution failure inside the data store. Propagated unchanged to the
/// caller; retries are the store's concern, not this pipeline's.
///

#[derive(Debug, ThisError)]
pub enum SourceError {
    #[error("source execution failed: {message}")]
    Execution { message: String },

    #[error("{0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl SourceError {
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }
}
