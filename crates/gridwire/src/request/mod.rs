//! Module: request
//! Responsibility: decoding the widget's wire request into a typed model.
//! Does not own: source mapping, filtering, or response assembly.
//! Boundary: everything downstream consumes `TableRequest`, never raw keys.

mod column;
mod order;
mod params;
mod search;


use crate::source::SortDirection;
use thiserror::Error as ThisError;

// re-exports
pub use column::RequestColumn;
pub use order::OrderSpec;
pub use params::RawParams;
pub use search::SearchSpec;

/// Cache-busting timestamp key the widget appends to every data request.
/// Its presence (with `draw` and the column group) is what distinguishes a
/// data request from a plain page load.
const TIME_KEY: &str = "_";

///
/// TableRequest
///
/// Typed form of one incoming data request. Constructed once per call by
/// [`TableRequest::from_query`] and immutable afterwards; the draw token is
/// echoed verbatim into the response so the client can discard stale draws.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableRequest {
    pub draw: u64,
    pub start: u64,
    /// Requested page length; `-1` means "all rows".
    pub length: i64,
    pub search: SearchSpec,
    pub order: Vec<OrderSpec>,
    pub columns: Vec<RequestColumn>,
}

impl TableRequest {
    /// Parse a raw query string.
    ///
    /// Returns `Ok(None)` when the gate keys (`draw`, a `columns[...]`
    /// group, the `_` timestamp) are absent — the caller should render the
    /// table shell without fetching data. Once the gate passes, malformed or
    /// missing sub-structure is a fatal [`ParseError`].
    pub fn from_query(query: &str) -> Result<Option<Self>, ParseError> {
        Self::from_params(&RawParams::from_query_str(query))
    }

    /// Parse already-decoded parameters; same contract as [`from_query`].
    ///
    /// [`from_query`]: Self::from_query
    pub fn from_params(params: &RawParams) -> Result<Option<Self>, ParseError> {
        if !params.contains("draw") || !params.has_prefix("columns[") || !params.contains(TIME_KEY)
        {
            return Ok(None);
        }

        let draw = require_u64(params, "draw")?;
        let start = require_u64(params, "start")?;
        let length = require_length(params, "length")?;
        let search = require_search(params, "search")?;
        let columns = parse_columns(params)?;
        let order = parse_order(params, columns.len())?;

        Ok(Some(Self {
            draw,
            start,
            length,
            search,
            order,
            columns,
        }))
    }
}

fn require<'a>(params: &'a RawParams, key: &str) -> Result<&'a str, ParseError> {
    params.get(key).ok_or_else(|| ParseError::MissingField {
        key: key.to_string(),
    })
}

fn require_u64(params: &RawParams, key: &str) -> Result<u64, ParseError> {
    let raw = require(params, key)?;

    raw.parse().map_err(|_| ParseError::InvalidInt {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn require_usize(params: &RawParams, key: &str) -> Result<usize, ParseError> {
    let raw = require(params, key)?;

    raw.parse().map_err(|_| ParseError::InvalidInt {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn require_length(params: &RawParams, key: &str) -> Result<i64, ParseError> {
    let raw = require(params, key)?;
    let length: i64 = raw.parse().map_err(|_| ParseError::InvalidInt {
        key: key.to_string(),
        value: raw.to_string(),
    })?;

    if length < -1 {
        return Err(ParseError::InvalidLength { value: length });
    }

    Ok(length)
}

/// Tolerant boolean: only the literal `"true"` is true, anything else
/// (including a malformed flag) is `false`.
fn require_bool(params: &RawParams, key: &str) -> Result<bool, ParseError> {
    Ok(require(params, key)? == "true")
}

fn require_search(params: &RawParams, group: &str) -> Result<SearchSpec, ParseError> {
    let value = require(params, &format!("{group}[value]"))?.to_string();
    let regex = require_bool(params, &format!("{group}[regex]"))?;

    Ok(SearchSpec::new(value, regex))
}

fn parse_columns(params: &RawParams) -> Result<Vec<RequestColumn>, ParseError> {
    let mut columns = Vec::new();

    for index in 0.. {
        let group = format!("columns[{index}]");
        // probe with the sub-key bracket so index 1 never matches index 10
        if !params.has_prefix(&format!("{group}[")) {
            break;
        }

        columns.push(RequestColumn {
            data: require(params, &format!("{group}[data]"))?.into(),
            name: require(params, &format!("{group}[name]"))?.to_string(),
            searchable: require_bool(params, &format!("{group}[searchable]"))?,
            orderable: require_bool(params, &format!("{group}[orderable]"))?,
            search: require_search(params, &format!("{group}[search]"))?,
        });
    }

    Ok(columns)
}

fn parse_order(params: &RawParams, columns: usize) -> Result<Vec<OrderSpec>, ParseError> {
    let mut order = Vec::new();

    for index in 0.. {
        let group = format!("order[{index}]");
        if !params.has_prefix(&format!("{group}[")) {
            break;
        }

        let column_key = format!("{group}[column]");
        let column = require_usize(params, &column_key)?;
        if column >= columns {
            return Err(ParseError::OrderColumnOutOfRange { column, columns });
        }

        let dir_key = format!("{group}[dir]");
        let dir = match require(params, &dir_key)? {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => {
                return Err(ParseError::InvalidDirection {
                    key: dir_key,
                    value: other.to_string(),
                });
            }
        };

        order.push(OrderSpec::new(column, dir));
    }

    Ok(order)
}

///
/// ParseError
///
/// Structural failures once the gate keys identified a data request.
/// Absent gate keys are not an error; see [`TableRequest::from_params`].
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ParseError {
    #[error("required wire field '{key}' is missing")]
    MissingField { key: String },

    #[error("wire field '{key}' is not an integer: '{value}'")]
    InvalidInt { key: String, value: String },

    #[error("page length must be -1 or non-negative, got {value}")]
    InvalidLength { value: i64 },

    #[error("wire field '{key}' must be 'asc' or 'desc', got '{value}'")]
    InvalidDirection { key: String, value: String },

    #[error("order spec targets column {column} but the request carries {columns} columns")]
    OrderColumnOutOfRange { column: usize, columns: usize },
}
