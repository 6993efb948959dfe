//! Module: path
//! Responsibility: column data-path grammar and resolution against a source schema.
//! Does not own: predicate construction or record access.
//! Boundary: the adapter and shaper resolve paths here before touching a source.

use derive_more::Deref;
use std::fmt;
use thiserror::Error as ThisError;

///
/// DataPath
///
/// A column's identifier string locating its value either on the base record
/// (`field`) or on a named relation (`relationAlias.field`). The grammar is
/// validated at resolution time, not construction time, because legality
/// depends on the bound source's schema.
///

#[derive(Clone, Debug, Deref, Eq, PartialEq)]
pub struct DataPath(String);

impl DataPath {
    #[must_use]
    pub const fn new(path: String) -> Self {
        Self(path)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve this path against a source's relation schema.
    ///
    /// A single non-empty segment is a field on the base record. Two
    /// segments resolve through the base alias or a declared relation. Any
    /// other shape is a caller configuration error.
    pub fn resolve(&self, schema: &dyn RelationSchema) -> Result<ResolvedProperty, MappingError> {
        let mut segments = self.0.trim().split('.');
        let head = segments.next().unwrap_or_default();
        let tail = segments.next();

        if head.is_empty() || segments.next().is_some() {
            return Err(MappingError::InvalidShape {
                path: self.0.clone(),
            });
        }

        match tail {
            None => Ok(ResolvedProperty::Base {
                field: head.to_string(),
            }),
            Some(field) if field.is_empty() => Err(MappingError::InvalidShape {
                path: self.0.clone(),
            }),
            Some(field) if head == schema.base_alias() => Ok(ResolvedProperty::Base {
                field: field.to_string(),
            }),
            Some(field) => match schema.relation_property_path(head) {
                Some(property_path) => Ok(ResolvedProperty::Relation {
                    alias: head.to_string(),
                    property_path: property_path.to_string(),
                    field: field.to_string(),
                }),
                None => Err(MappingError::UnknownAlias {
                    alias: head.to_string(),
                    path: self.0.clone(),
                }),
            },
        }
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DataPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for DataPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

///
/// RelationSchema
///
/// The slice of a source's schema that path resolution needs: the base
/// entity's alias and the declared one-hop relations.
///

pub trait RelationSchema {
    /// Alias under which the base entity is addressed.
    fn base_alias(&self) -> &str;

    /// Property path for a declared relation alias; `None` when undeclared.
    fn relation_property_path(&self, alias: &str) -> Option<&str>;
}

///
/// ResolvedProperty
///
/// Outcome of mapping a data path onto a source: a scalar field on the base
/// record, or a related field reached through one relation hop.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolvedProperty {
    Base {
        field: String,
    },
    Relation {
        alias: String,
        property_path: String,
        field: String,
    },
}

impl ResolvedProperty {
    #[must_use]
    pub const fn is_relation(&self) -> bool {
        matches!(self, Self::Relation { .. })
    }

    /// Field name this property reads, regardless of where it lives.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Base { field } | Self::Relation { field, .. } => field,
        }
    }
}

///
/// MappingError
///
/// Configuration-class failures: a column's data path does not fit the
/// source schema, or the registry disagrees with the request. Fatal for the
/// whole request; these should surface during development, not per-request.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MappingError {
    #[error("data path '{path}' must be 'field' or 'relationAlias.field'")]
    InvalidShape { path: String },

    #[error("data path '{path}' names '{alias}', which is neither the base alias nor a declared relation")]
    UnknownAlias { alias: String, path: String },

    #[error("request carries {request} columns but the registry declares {registry}")]
    ColumnCountMismatch { registry: usize, request: usize },

    #[error("order spec targets column {index} but only {columns} columns are registered")]
    OrderColumnOutOfRange { index: usize, columns: usize },

    #[error("column '{column}' cannot be ordered")]
    NotOrderable { column: String },

    #[error("column '{path}' resolves to a base field but carries a relation formatter")]
    RelationFormatterOnBaseField { path: String },

    #[error("column '{path}' crosses a relation but carries a plain formatter")]
    PlainFormatterOnRelation { path: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct TestSchema {
        base: &'static str,
        relations: BTreeMap<&'static str, &'static str>,
    }

    impl RelationSchema for TestSchema {
        fn base_alias(&self) -> &str {
            self.base
        }

        fn relation_property_path(&self, alias: &str) -> Option<&str> {
            self.relations.get(alias).copied()
        }
    }

    fn schema() -> TestSchema {
        TestSchema {
            base: "Offices",
            relations: BTreeMap::from([("Employees", "employees")]),
        }
    }

    #[test]
    fn bare_field_resolves_to_base() {
        let resolved = DataPath::from("city").resolve(&schema()).unwrap();

        assert_eq!(
            resolved,
            ResolvedProperty::Base {
                field: "city".to_string()
            }
        );
    }

    #[test]
    fn base_alias_prefix_resolves_to_base() {
        let resolved = DataPath::from("Offices.city").resolve(&schema()).unwrap();

        assert_eq!(
            resolved,
            ResolvedProperty::Base {
                field: "city".to_string()
            }
        );
    }

    #[test]
    fn relation_alias_resolves_through_property_path() {
        let resolved = DataPath::from("Employees.name").resolve(&schema()).unwrap();

        assert_eq!(
            resolved,
            ResolvedProperty::Relation {
                alias: "Employees".to_string(),
                property_path: "employees".to_string(),
                field: "name".to_string(),
            }
        );
    }

    #[test]
    fn undeclared_alias_is_a_mapping_error() {
        let err = DataPath::from("badalias.name")
            .resolve(&schema())
            .unwrap_err();

        assert_eq!(
            err,
            MappingError::UnknownAlias {
                alias: "badalias".to_string(),
                path: "badalias.name".to_string(),
            }
        );
    }

    #[test]
    fn extra_segments_are_invalid_shape() {
        let err = DataPath::from("a.b.c").resolve(&schema()).unwrap_err();

        assert!(matches!(err, MappingError::InvalidShape { .. }));
    }

    #[test]
    fn empty_segments_are_invalid_shape() {
        for path in ["", ".", "Offices.", ".city"] {
            let err = DataPath::from(path).resolve(&schema()).unwrap_err();
            assert!(matches!(err, MappingError::InvalidShape { .. }), "{path}");
        }
    }
}
