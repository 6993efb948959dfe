//! Module: adapter
//! Responsibility: binding one wire request plus the column registry to a
//! data source; filtering, counting, ordering, paging, executing.
//! Does not own: wire parsing, shaping, or envelope assembly.
//! Boundary: all per-request query state lives here and dies with the run.


use crate::{
    Error,
    column::Registry,
    path::MappingError,
    request::TableRequest,
    source::{FilterExpr, QuerySource},
};

///
/// AdapterRun
///
/// Everything one execution produced. The filtered count is part of this
/// value, never process-wide state, so concurrent requests cannot race on
/// it.
///

#[derive(Debug)]
pub struct AdapterRun<R> {
    pub records: Vec<R>,
    /// Count ignoring every filter the request added.
    pub records_total: u64,
    /// Count after search filtering, before paging.
    pub records_filtered: u64,
}

///
/// QueryAdapter
///
/// Per-request binding of request + registry + source. The pristine clone
/// is captured at bind time, before any mutation, and only ever answers the
/// unfiltered total.
///

pub struct QueryAdapter<'a, S: QuerySource> {
    request: &'a TableRequest,
    registry: &'a Registry<S::Record>,
    source: S,
    pristine: S,
    debug: bool,
}

impl<'a, S: QuerySource> QueryAdapter<'a, S> {
    /// Bind a request to a source.
    ///
    /// The request's column list must line up index-for-index with the
    /// registry; a mismatch means client and server configuration have
    /// drifted and nothing downstream can be trusted.
    pub fn bind(
        request: &'a TableRequest,
        registry: &'a Registry<S::Record>,
        source: S,
    ) -> Result<Self, MappingError> {
        if request.columns.len() != registry.len() {
            return Err(MappingError::ColumnCountMismatch {
                registry: registry.len(),
                request: request.columns.len(),
            });
        }

        let pristine = source.clone();

        Ok(Self {
            request,
            registry,
            source,
            pristine,
            debug: false,
        })
    }

    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn debug_log(&self, s: impl AsRef<str>) {
        if self.debug {
            println!("[debug] {}", s.as_ref());
        }
    }

    /// Run the pipeline: filter, count, order, page, execute.
    pub fn run(mut self) -> Result<AdapterRun<S::Record>, Error> {
        self.apply_search()?;

        let records_filtered = self.source.count()?;
        let records_total = self.pristine.count()?;
        self.debug_log(format!(
            "counts: filtered={records_filtered} total={records_total}"
        ));

        self.apply_order()?;
        self.apply_paging();

        let records = self.source.execute()?;

        Ok(AdapterRun {
            records,
            records_total,
            records_filtered,
        })
    }

    /// Global search ORs a containment predicate across every column that is
    /// searchable on both sides; per-column search values AND on top.
    fn apply_search(&mut self) -> Result<(), MappingError> {
        let global = &self.request.search;
        let mut global_group = Vec::new();
        let mut column_filters = Vec::new();

        for (request_column, column) in self.request.columns.iter().zip(self.registry.iter()) {
            let Some(path) = column.path() else {
                continue;
            };
            if !(column.is_searchable() && request_column.searchable) {
                continue;
            }

            let wants_global = !global.is_empty();
            let wants_column = !request_column.search.is_empty();
            if !wants_global && !wants_column {
                continue;
            }

            let target = path.resolve(&self.source)?;
            if wants_global {
                global_group.push(FilterExpr::contains_ci(target.clone(), &*global.value));
            }
            if wants_column {
                column_filters.push(FilterExpr::contains_ci(
                    target,
                    &*request_column.search.value,
                ));
            }
        }

        if !global_group.is_empty() {
            self.debug_log(format!(
                "search '{}' over {} columns",
                global.value,
                global_group.len()
            ));
            self.source.add_predicate(FilterExpr::or(global_group));
        }

        for filter in column_filters {
            self.source.add_predicate(filter);
        }

        Ok(())
    }

    /// Request order is sort precedence; every spec must land on an
    /// orderable bound column.
    fn apply_order(&mut self) -> Result<(), MappingError> {
        for spec in &self.request.order {
            let column =
                self.registry
                    .get(spec.column)
                    .ok_or(MappingError::OrderColumnOutOfRange {
                        index: spec.column,
                        columns: self.registry.len(),
                    })?;

            let path = column.path().ok_or_else(|| MappingError::NotOrderable {
                column: column.data_key().to_string(),
            })?;
            if !column.is_orderable() {
                return Err(MappingError::NotOrderable {
                    column: column.data_key().to_string(),
                });
            }

            let target = path.resolve(&self.source)?;
            self.debug_log(format!("order by {path} {}", spec.dir));
            self.source.add_sort(target, spec.dir);
        }

        Ok(())
    }

    fn apply_paging(&mut self) {
        // length -1 means "all rows": offset still applies, limit does not
        if self.request.length >= 0 {
            self.source.set_limit(self.request.length.unsigned_abs());
        }
        self.source.set_offset(self.request.start);
        self.debug_log(format!(
            "page: start={} length={}",
            self.request.start, self.request.length
        ));
    }
}
