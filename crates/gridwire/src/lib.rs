//! Server-side query adapter for browser grid widgets.
//!
//! ## Crate layout
//! - `request`: wire request decoding into the typed model.
//! - `column`: the registry of logical columns and their formatters.
//! - `path`: data-path grammar and resolution against a source schema.
//! - `source`: the queryable-collaborator contract plus the in-memory source.
//! - `adapter`: per-request filter/count/order/page/execute pipeline.
//! - `shape`: record-to-row transformation through formatters.
//! - `response`: the wire envelope.
//! - `table`: the configured endpoint tying everything together.
//!
//! The `prelude` mirrors the surface a grid endpoint actually touches.
#![warn(unreachable_pub)]

pub mod adapter;
pub mod column;
pub mod error;
pub mod path;
pub mod request;
pub mod response;
pub mod shape;
pub mod source;
pub mod table;
pub mod value;

pub use error::Error;

///
/// Prelude
///
/// Domain vocabulary only; stage internals stay in their modules.
///

pub mod prelude {
    pub use crate::{
        column::{CellFormatter, ColumnDef, FormatterError, Registry},
        error::Error,
        request::TableRequest,
        response::TableResponse,
        shape::ShapingMode,
        source::{
            FilterExpr, MemoryRecord, MemorySource, QuerySource, Related, SortDirection,
            SourceRecord,
        },
        table::Table,
        value::Value,
    };
}
