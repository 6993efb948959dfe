//! Module: response
//! Responsibility: the wire response envelope.
//! Does not own: counting, shaping, or serialization policy beyond field names.
//! Boundary: pure assembly; built once per request after adapter and shaper ran.

use crate::shape::ShapedRow;
use serde::Serialize;
use serde_json::Value as Json;

///
/// TableResponse
///
/// The envelope the widget consumes: the echoed draw token, both counts,
/// and the shaped rows. Field names on the wire are the widget's, not ours.
///

#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub draw: u64,

    #[serde(rename = "recordsTotal")]
    pub records_total: u64,

    #[serde(rename = "recordsFiltered")]
    pub records_filtered: u64,

    pub data: Vec<ShapedRow>,
}

impl TableResponse {
    #[must_use]
    pub const fn new(
        draw: u64,
        records_total: u64,
        records_filtered: u64,
        data: Vec<ShapedRow>,
    ) -> Self {
        Self {
            draw,
            records_total,
            records_filtered,
            data,
        }
    }

    /// Direct structural encode of the envelope.
    pub fn to_json(&self) -> serde_json::Result<Json> {
        serde_json::to_value(self)
    }

    /// The serialized body handed back over HTTP.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
