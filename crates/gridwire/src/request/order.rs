use crate::source::SortDirection;

///
/// OrderSpec
///
/// One requested sort key: a column index into the request's column list
/// plus a direction. Request order is sort precedence.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OrderSpec {
    pub column: usize,
    pub dir: SortDirection,
}

impl OrderSpec {
    #[must_use]
    pub const fn new(column: usize, dir: SortDirection) -> Self {
        Self { column, dir }
    }
}
