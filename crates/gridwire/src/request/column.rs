use crate::{path::DataPath, request::SearchSpec};

///
/// RequestColumn
///
/// Wire-side descriptor of one grid column: the data path the client was
/// configured with, its display name, the client's searchable/orderable
/// flags, and a per-column search box.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestColumn {
    pub data: DataPath,
    pub name: String,
    pub searchable: bool,
    pub orderable: bool,
    pub search: SearchSpec,
}
