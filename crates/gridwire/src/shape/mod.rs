//! Module: shape
//! Responsibility: turning executed records into wire-ready rows through the
//! registry's formatters.
//! Does not own: querying, counting, or envelope assembly.
//! Boundary: a pure per-record transform; never mutates registry or source.

use crate::{
    Error,
    column::{CellFormatter, ColumnDef, Registry},
    path::{MappingError, RelationSchema, ResolvedProperty},
    source::SourceRecord,
    value::Value,
};
use serde_json::{Map, Value as Json};

/// One wire-ready row. Key order follows registry order, which is why the
/// serializer keeps insertion order.
pub type ShapedRow = Map<String, Json>;

///
/// ShapingMode
///
/// Flat keys the whole data path (client-data tables over a single flat
/// source); nested groups fields under their alias (relational server-side
/// sources), with bare-field paths nesting under the base alias.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShapingMode {
    Flat,
    NestedByAlias,
}

///
/// RowShaper
///
/// Borrow of everything shaping needs: the registry for formatters and the
/// schema for path resolution.
///

pub struct RowShaper<'a, R: SourceRecord> {
    registry: &'a Registry<R>,
    schema: &'a dyn RelationSchema,
    mode: ShapingMode,
}

impl<'a, R: SourceRecord> RowShaper<'a, R> {
    #[must_use]
    pub const fn new(
        registry: &'a Registry<R>,
        schema: &'a dyn RelationSchema,
        mode: ShapingMode,
    ) -> Self {
        Self {
            registry,
            schema,
            mode,
        }
    }

    /// Shape every record, preserving record order.
    pub fn shape_all(&self, records: &[R]) -> Result<Vec<ShapedRow>, Error> {
        records.iter().map(|record| self.shape(record)).collect()
    }

    /// Shape one record across all registry columns.
    pub fn shape(&self, record: &R) -> Result<ShapedRow, Error> {
        let mut row = ShapedRow::new();

        for column in self.registry {
            self.shape_cell(&mut row, column, record)?;
        }

        Ok(row)
    }

    fn shape_cell(
        &self,
        row: &mut ShapedRow,
        column: &ColumnDef<R>,
        record: &R,
    ) -> Result<(), Error> {
        // synthetic content goes in verbatim at the flat key in both modes
        if let Some(content) = column.content_fn() {
            let rendered = content(record).map_err(|err| err.with_column(column.data_key()))?;
            row.insert(column.data_key().to_string(), rendered);
            return Ok(());
        }

        let Some(path) = column.path() else {
            return Ok(());
        };
        let resolved = path.resolve(self.schema)?;

        let rendered = match &resolved {
            ResolvedProperty::Base { field } => {
                let value = record.field(field).unwrap_or(Value::None);
                match column.cell_formatter() {
                    Some(CellFormatter::Plain(format)) => format(&value, record)
                        .map_err(|err| err.with_column(column.data_key()))?,
                    Some(CellFormatter::Relation(_)) => {
                        return Err(MappingError::RelationFormatterOnBaseField {
                            path: path.as_str().to_string(),
                        }
                        .into());
                    }
                    None => Json::String(value.to_display_string()),
                }
            }
            ResolvedProperty::Relation {
                property_path,
                field,
                ..
            } => match record.related(property_path) {
                Some(related) => {
                    let value = related.field_value(field);
                    match column.cell_formatter() {
                        Some(CellFormatter::Relation(format)) => format(&value, record, related)
                            .map_err(|err| err.with_column(column.data_key()))?,
                        Some(CellFormatter::Plain(_)) => {
                            return Err(MappingError::PlainFormatterOnRelation {
                                path: path.as_str().to_string(),
                            }
                            .into());
                        }
                        // to-many fallback: List display joins with ", "
                        None => Json::String(value.to_display_string()),
                    }
                }
                // nothing loaded under the relation: render an empty cell
                None => Json::String(String::new()),
            },
        };

        match self.mode {
            ShapingMode::Flat => {
                row.insert(path.as_str().to_string(), rendered);
            }
            ShapingMode::NestedByAlias => {
                let alias = match &resolved {
                    ResolvedProperty::Base { .. } => self.schema.base_alias(),
                    ResolvedProperty::Relation { alias, .. } => alias,
                };
                nested_entry(row, alias).insert(resolved.field().to_string(), rendered);
            }
        }

        Ok(())
    }
}

/// Fetch or create the alias object of a nested row.
fn nested_entry<'a>(row: &'a mut ShapedRow, alias: &str) -> &'a mut Map<String, Json> {
    let entry = row
        .entry(alias.to_string())
        .or_insert_with(|| Json::Object(Map::new()));

    // a synthetic key colliding with an alias gets replaced by the group
    if !entry.is_object() {
        *entry = Json::Object(Map::new());
    }

    match entry {
        Json::Object(map) => map,
        _ => unreachable!("alias entries are normalized to objects"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        column::FormatterError,
        source::{MemoryRecord, MemorySource},
    };
    use serde_json::json;

    fn source() -> MemorySource {
        MemorySource::new("Staff", vec![]).with_relation("Offices", "office")
    }

    fn record() -> MemoryRecord {
        MemoryRecord::new()
            .with("name", "Airi Satou")
            .with("salary", 3120)
            .with_one("office", MemoryRecord::new().with("city", "Tokyo"))
            .with_many(
                "tags",
                vec![
                    MemoryRecord::new().with("label", "accounting"),
                    MemoryRecord::new().with("label", "lead"),
                ],
            )
    }

    #[test]
    fn flat_mode_keys_by_data_path() {
        let registry = Registry::new().with(ColumnDef::bound("name"));
        let shaper = RowShaper::new(&registry, &source(), ShapingMode::Flat);

        let row = shaper.shape(&record()).unwrap();

        assert_eq!(row.get("name"), Some(&json!("Airi Satou")));
    }

    #[test]
    fn nested_mode_groups_bare_fields_under_base_alias() {
        let registry = Registry::new().with(ColumnDef::bound("name"));
        let shaper = RowShaper::new(&registry, &source(), ShapingMode::NestedByAlias);

        let row = shaper.shape(&record()).unwrap();

        assert_eq!(row["Staff"]["name"], json!("Airi Satou"));
    }

    #[test]
    fn nested_mode_groups_relation_fields_under_their_alias() {
        let registry = Registry::new()
            .with(ColumnDef::bound("Staff.name"))
            .with(ColumnDef::bound("Offices.city"));
        let shaper = RowShaper::new(&registry, &source(), ShapingMode::NestedByAlias);

        let row = shaper.shape(&record()).unwrap();

        assert_eq!(row["Staff"]["name"], json!("Airi Satou"));
        assert_eq!(row["Offices"]["city"], json!("Tokyo"));
    }

    #[test]
    fn plain_formatter_receives_value_and_record() {
        let registry = Registry::new().with(
            ColumnDef::bound("salary").formatter(CellFormatter::plain(|value, _record| {
                Ok(json!(format!("${value}")))
            })),
        );
        let shaper = RowShaper::new(&registry, &source(), ShapingMode::Flat);

        let row = shaper.shape(&record()).unwrap();

        assert_eq!(row.get("salary"), Some(&json!("$3120")));
    }

    #[test]
    fn unformatted_cells_stringify() {
        let registry = Registry::new().with(ColumnDef::bound("salary"));
        let shaper = RowShaper::new(&registry, &source(), ShapingMode::Flat);

        let row = shaper.shape(&record()).unwrap();

        assert_eq!(row.get("salary"), Some(&json!("3120")));
    }

    #[test]
    fn to_many_fallback_joins_with_comma_space() {
        let source = MemorySource::new("Staff", vec![]).with_relation("Tags", "tags");
        let registry = Registry::new().with(ColumnDef::bound("Tags.label"));
        let shaper = RowShaper::new(&registry, &source, ShapingMode::NestedByAlias);

        let row = shaper.shape(&record()).unwrap();

        assert_eq!(row["Tags"]["label"], json!("accounting, lead"));
    }

    #[test]
    fn relation_formatter_sees_the_collection() {
        let source = MemorySource::new("Staff", vec![]).with_relation("Tags", "tags");
        let registry = Registry::new().with(ColumnDef::bound("Tags.label").formatter(
            CellFormatter::relation(|value, _record, related| {
                let count = match related {
                    crate::source::Related::Many(records) => records.len(),
                    crate::source::Related::One(_) => 1,
                };
                Ok(json!(format!("{value} ({count})")))
            }),
        ));
        let shaper = RowShaper::new(&registry, &source, ShapingMode::NestedByAlias);

        let row = shaper.shape(&record()).unwrap();

        assert_eq!(row["Tags"]["label"], json!("accounting, lead (2)"));
    }

    #[test]
    fn missing_relation_renders_empty() {
        let source = MemorySource::new("Staff", vec![]).with_relation("Manager", "manager");
        let registry = Registry::new().with(ColumnDef::bound("Manager.name"));
        let shaper = RowShaper::new(&registry, &source, ShapingMode::NestedByAlias);

        let row = shaper.shape(&record()).unwrap();

        assert_eq!(row["Manager"]["name"], json!(""));
    }

    #[test]
    fn synthetic_content_is_verbatim_in_both_modes() {
        for mode in [ShapingMode::Flat, ShapingMode::NestedByAlias] {
            let registry = Registry::new()
                .with(ColumnDef::synthetic("actions", |_record| {
                    Ok(json!("<a href=\"#\">edit</a>"))
                }));
            let shaper = RowShaper::new(&registry, &source(), mode);

            let row = shaper.shape(&record()).unwrap();

            assert_eq!(row.get("actions"), Some(&json!("<a href=\"#\">edit</a>")));
        }
    }

    #[test]
    fn formatter_failure_is_fatal_and_names_the_column() {
        let registry = Registry::new().with(
            ColumnDef::bound("salary")
                .formatter(CellFormatter::plain(|_, _| Err(FormatterError::new("nope")))),
        );
        let shaper = RowShaper::new(&registry, &source(), ShapingMode::Flat);

        let err = shaper.shape(&record()).unwrap_err();

        assert!(err.to_string().contains("salary"));
    }

    #[test]
    fn relation_formatter_on_base_field_is_a_mapping_error() {
        let registry = Registry::new().with(
            ColumnDef::bound("name")
                .formatter(CellFormatter::relation(|_, _, _| Ok(json!("")))),
        );
        let shaper = RowShaper::new(&registry, &source(), ShapingMode::Flat);

        let err = shaper.shape(&record()).unwrap_err();

        assert!(matches!(
            err,
            Error::Mapping(MappingError::RelationFormatterOnBaseField { .. })
        ));
    }

    #[test]
    fn plain_formatter_on_relation_is_a_mapping_error() {
        let registry = Registry::new().with(
            ColumnDef::bound("Offices.city")
                .formatter(CellFormatter::plain(|_, _| Ok(json!("")))),
        );
        let shaper = RowShaper::new(&registry, &source(), ShapingMode::NestedByAlias);

        let err = shaper.shape(&record()).unwrap_err();

        assert!(matches!(
            err,
            Error::Mapping(MappingError::PlainFormatterOnRelation { .. })
        ));
    }
}
