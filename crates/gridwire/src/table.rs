//! Module: table
//! Responsibility: wiring registry, source, and shaping mode into one grid
//! endpoint; running the full parse → adapt → shape → assemble pipeline.
//! Does not own: any single pipeline stage; those live in their modules.

use crate::{
    Error,
    adapter::QueryAdapter,
    column::{ColumnDef, Registry},
    request::TableRequest,
    response::TableResponse,
    shape::{RowShaper, ShapedRow, ShapingMode},
    source::QuerySource,
};

///
/// Table
///
/// One configured grid. The registry and mode are fixed at configuration
/// time and shared read-only across requests; every call to [`respond`]
/// binds a fresh adapter, so no request state outlives its call.
///
/// [`respond`]: Self::respond
///

pub struct Table<S: QuerySource> {
    registry: Registry<S::Record>,
    source: S,
    mode: ShapingMode,
    debug: bool,
}

impl<S: QuerySource> Table<S> {
    #[must_use]
    pub const fn new(source: S, mode: ShapingMode) -> Self {
        Self {
            registry: Registry::new(),
            source,
            mode,
            debug: false,
        }
    }

    /// Register the next column; registration order is wire column order.
    #[must_use]
    pub fn column(mut self, column: ColumnDef<S::Record>) -> Self {
        self.registry.push(column);
        self
    }

    /// Echo adapter decisions to stdout; off by default.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry<S::Record> {
        &self.registry
    }

    /// Answer one incoming call.
    ///
    /// `Ok(None)` means the query string was not a data request: render the
    /// table shell and let the widget come back for rows.
    pub fn respond(&self, query: &str) -> Result<Option<TableResponse>, Error> {
        let Some(request) = TableRequest::from_query(query)? else {
            return Ok(None);
        };

        self.respond_to(&request).map(Some)
    }

    /// Answer an already-parsed request.
    pub fn respond_to(&self, request: &TableRequest) -> Result<TableResponse, Error> {
        let run = QueryAdapter::bind(request, &self.registry, self.source.clone())?
            .debug(self.debug)
            .run()?;

        let shaper = RowShaper::new(&self.registry, &self.source, self.mode);
        let data = shaper.shape_all(&run.records)?;

        Ok(TableResponse::new(
            request.draw,
            run.records_total,
            run.records_filtered,
            data,
        ))
    }

    /// Shape the entire unfiltered source, for embedding rows directly in
    /// the page instead of fetching them over the wire.
    pub fn render_rows(&self) -> Result<Vec<ShapedRow>, Error> {
        let records = self.source.execute()?;
        let shaper = RowShaper::new(&self.registry, &self.source, self.mode);

        shaper.shape_all(&records)
    }
}
