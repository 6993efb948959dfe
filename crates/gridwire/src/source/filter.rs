use crate::path::ResolvedProperty;

///
/// FilterExpr
///
/// Minimal predicate AST the adapter pushes into a source. The pipeline only
/// ever emits case-insensitive containment, grouped with OR across
/// searchable columns and AND against whatever the source already carries.
/// Sources translate this into their native predicate form (`LIKE`, an
/// in-memory scan, and so on).
///

#[derive(Clone, Debug, PartialEq)]
pub enum FilterExpr {
    And(Vec<Self>),
    Or(Vec<Self>),
    ContainsCi {
        target: ResolvedProperty,
        needle: String,
    },
}

impl FilterExpr {
    #[must_use]
    pub const fn and(exprs: Vec<Self>) -> Self {
        Self::And(exprs)
    }

    #[must_use]
    pub const fn or(exprs: Vec<Self>) -> Self {
        Self::Or(exprs)
    }

    /// Case-insensitive containment; the needle is casefolded once here.
    #[must_use]
    pub fn contains_ci(target: ResolvedProperty, needle: impl Into<String>) -> Self {
        Self::ContainsCi {
            target,
            needle: needle.into().to_lowercase(),
        }
    }
}
