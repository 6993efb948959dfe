//! Module: column
//! Responsibility: the registry of logical grid columns and their renderers.
//! Does not own: wire parsing, path resolution, or query execution.
//! Boundary: read-only during request handling; shareable across requests.

mod formatter;

use crate::path::DataPath;
use derive_more::{Deref, IntoIterator};
use std::fmt;

// re-exports
pub use formatter::{CellFormatter, ContentFn, FormatterError, FormatterResult};

///
/// ColumnDef
///
/// One logical column. Two kinds, fixed at construction:
///
/// - bound: backed by a data path on the source, with searchable/orderable
///   flags and an optional formatter;
/// - synthetic: produced entirely by a content function (action buttons and
///   the like); never searchable, never orderable, and without a formatter
///   slot to misuse.
///

pub struct ColumnDef<R> {
    kind: ColumnKind<R>,
}

enum ColumnKind<R> {
    Bound {
        path: DataPath,
        searchable: bool,
        orderable: bool,
        formatter: Option<CellFormatter<R>>,
    },
    Synthetic {
        key: String,
        content: ContentFn<R>,
    },
}

impl<R> ColumnDef<R> {
    /// A column backed by the source. Searchable and orderable by default,
    /// matching the widget's own column defaults.
    #[must_use]
    pub fn bound(path: impl Into<DataPath>) -> Self {
        Self {
            kind: ColumnKind::Bound {
                path: path.into(),
                searchable: true,
                orderable: true,
                formatter: None,
            },
        }
    }

    /// A synthetic column rendered by `content` under the flat output `key`.
    pub fn synthetic(
        key: impl Into<String>,
        content: impl Fn(&R) -> FormatterResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: ColumnKind::Synthetic {
                key: key.into(),
                content: Box::new(content),
            },
        }
    }

    #[must_use]
    pub fn searchable(mut self, searchable: bool) -> Self {
        if let ColumnKind::Bound {
            searchable: flag, ..
        } = &mut self.kind
        {
            *flag = searchable;
        }
        self
    }

    #[must_use]
    pub fn orderable(mut self, orderable: bool) -> Self {
        if let ColumnKind::Bound {
            orderable: flag, ..
        } = &mut self.kind
        {
            *flag = orderable;
        }
        self
    }

    #[must_use]
    pub fn formatter(mut self, formatter: CellFormatter<R>) -> Self {
        if let ColumnKind::Bound {
            formatter: slot, ..
        } = &mut self.kind
        {
            *slot = Some(formatter);
        }
        self
    }

    /// Output key: the data path for bound columns, the flat key for
    /// synthetic ones.
    #[must_use]
    pub fn data_key(&self) -> &str {
        match &self.kind {
            ColumnKind::Bound { path, .. } => path.as_str(),
            ColumnKind::Synthetic { key, .. } => key,
        }
    }

    /// Data path for bound columns; `None` marks a synthetic column.
    #[must_use]
    pub const fn path(&self) -> Option<&DataPath> {
        match &self.kind {
            ColumnKind::Bound { path, .. } => Some(path),
            ColumnKind::Synthetic { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_searchable(&self) -> bool {
        match &self.kind {
            ColumnKind::Bound { searchable, .. } => *searchable,
            ColumnKind::Synthetic { .. } => false,
        }
    }

    #[must_use]
    pub const fn is_orderable(&self) -> bool {
        match &self.kind {
            ColumnKind::Bound { orderable, .. } => *orderable,
            ColumnKind::Synthetic { .. } => false,
        }
    }

    pub(crate) const fn cell_formatter(&self) -> Option<&CellFormatter<R>> {
        match &self.kind {
            ColumnKind::Bound { formatter, .. } => formatter.as_ref(),
            ColumnKind::Synthetic { .. } => None,
        }
    }

    pub(crate) const fn content_fn(&self) -> Option<&ContentFn<R>> {
        match &self.kind {
            ColumnKind::Bound { .. } => None,
            ColumnKind::Synthetic { content, .. } => Some(content),
        }
    }
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ColumnKind::Bound {
                path,
                searchable,
                orderable,
                formatter,
            } => f
                .debug_struct("ColumnDef")
                .field("path", path)
                .field("searchable", searchable)
                .field("orderable", orderable)
                .field("formatter", &formatter.is_some())
                .finish(),
            ColumnKind::Synthetic { key, .. } => f
                .debug_struct("ColumnDef")
                .field("synthetic", key)
                .finish(),
        }
    }
}

///
/// Registry
///
/// Ordered list of a table's columns. Indexes line up with the wire
/// request's column list; the adapter checks that invariant at bind time.
///

#[derive(Deref, IntoIterator)]
pub struct Registry<R> {
    #[deref]
    #[into_iterator(owned, ref)]
    columns: Vec<ColumnDef<R>>,
}

impl<R> Registry<R> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    pub fn push(&mut self, column: ColumnDef<R>) {
        self.columns.push(column);
    }

    /// Chainable registration.
    #[must_use]
    pub fn with(mut self, column: ColumnDef<R>) -> Self {
        self.columns.push(column);
        self
    }
}

impl<R> Default for Registry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Registry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.columns).finish()
    }
}
