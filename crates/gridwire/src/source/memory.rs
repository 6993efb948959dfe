//! In-memory `QuerySource` over owned rows.
//!
//! Backs client-data tables and the test-suite. Predicate evaluation,
//! multi-key ordering, and offset/limit windowing all happen here, against
//! the same contract a SQL-backed source would satisfy.

use crate::{
    path::{RelationSchema, ResolvedProperty},
    source::{FilterExpr, QuerySource, Related, SortDirection, SourceError, SourceRecord},
    value::{Value, canonical_cmp},
};
use std::{cmp::Ordering, collections::BTreeMap};

///
/// MemoryRecord
///
/// Property-bag row: named scalar fields plus one-hop related rows keyed by
/// property path.
///

#[derive(Clone, Debug, Default)]
pub struct MemoryRecord {
    fields: BTreeMap<String, Value>,
    related: BTreeMap<String, RelatedRows>,
}

#[derive(Clone, Debug)]
enum RelatedRows {
    One(Box<MemoryRecord>),
    Many(Vec<MemoryRecord>),
}

impl MemoryRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scalar field.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Attach a to-one related record under `property_path`.
    #[must_use]
    pub fn with_one(mut self, property_path: impl Into<String>, record: Self) -> Self {
        self.related
            .insert(property_path.into(), RelatedRows::One(Box::new(record)));
        self
    }

    /// Attach a to-many related collection under `property_path`.
    #[must_use]
    pub fn with_many(mut self, property_path: impl Into<String>, records: Vec<Self>) -> Self {
        self.related
            .insert(property_path.into(), RelatedRows::Many(records));
        self
    }
}

impl SourceRecord for MemoryRecord {
    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    fn related(&self, property_path: &str) -> Option<Related<'_, Self>> {
        self.related.get(property_path).map(|rows| match rows {
            RelatedRows::One(record) => Related::One(record.as_ref()),
            RelatedRows::Many(records) => Related::Many(records.as_slice()),
        })
    }
}

///
/// MemorySource
///
/// Rows plus accumulated query state. Cloning yields an independent query
/// with the same predicates, which is exactly the pristine-copy contract.
///

#[derive(Clone, Debug)]
pub struct MemorySource {
    base_alias: String,
    relations: BTreeMap<String, String>,
    rows: Vec<MemoryRecord>,
    predicates: Vec<FilterExpr>,
    sorts: Vec<(ResolvedProperty, SortDirection)>,
    limit: Option<u64>,
    offset: u64,
}

impl MemorySource {
    #[must_use]
    pub fn new(base_alias: impl Into<String>, rows: Vec<MemoryRecord>) -> Self {
        Self {
            base_alias: base_alias.into(),
            relations: BTreeMap::new(),
            rows,
            predicates: Vec::new(),
            sorts: Vec::new(),
            limit: None,
            offset: 0,
        }
    }

    /// Declare a relation alias and the property path it traverses.
    #[must_use]
    pub fn with_relation(
        mut self,
        alias: impl Into<String>,
        property_path: impl Into<String>,
    ) -> Self {
        self.relations.insert(alias.into(), property_path.into());
        self
    }

    fn matches(record: &MemoryRecord, expr: &FilterExpr) -> bool {
        match expr {
            FilterExpr::And(exprs) => exprs.iter().all(|expr| Self::matches(record, expr)),
            FilterExpr::Or(exprs) => exprs.iter().any(|expr| Self::matches(record, expr)),
            FilterExpr::ContainsCi { target, needle } => match target {
                ResolvedProperty::Base { field } => record
                    .field(field)
                    .is_some_and(|value| value.contains_casefolded(needle)),
                ResolvedProperty::Relation {
                    property_path,
                    field,
                    ..
                } => match record.related(property_path) {
                    Some(Related::One(related)) => related
                        .field(field)
                        .is_some_and(|value| value.contains_casefolded(needle)),
                    Some(Related::Many(related)) => related.iter().any(|related| {
                        related
                            .field(field)
                            .is_some_and(|value| value.contains_casefolded(needle))
                    }),
                    None => false,
                },
            },
        }
    }

    /// Sort key for one record under one resolved property. A to-many
    /// relation sorts by its first related record's value.
    fn sort_value(record: &MemoryRecord, key: &ResolvedProperty) -> Value {
        match key {
            ResolvedProperty::Base { field } => record.field(field).unwrap_or(Value::None),
            ResolvedProperty::Relation {
                property_path,
                field,
                ..
            } => match record.related(property_path) {
                Some(Related::One(related)) => related.field(field).unwrap_or(Value::None),
                Some(Related::Many(related)) => related
                    .first()
                    .and_then(|related| related.field(field))
                    .unwrap_or(Value::None),
                None => Value::None,
            },
        }
    }

    fn compare(&self, left: &MemoryRecord, right: &MemoryRecord) -> Ordering {
        for (key, direction) in &self.sorts {
            let a = Self::sort_value(left, key);
            let b = Self::sort_value(right, key);
            let ord = canonical_cmp(&a, &b);
            let ord = if direction.is_descending() {
                ord.reverse()
            } else {
                ord
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }

        Ordering::Equal
    }

    fn filtered(&self) -> impl Iterator<Item = &MemoryRecord> {
        self.rows.iter().filter(|record| {
            self.predicates
                .iter()
                .all(|expr| Self::matches(record, expr))
        })
    }
}

impl RelationSchema for MemorySource {
    fn base_alias(&self) -> &str {
        &self.base_alias
    }

    fn relation_property_path(&self, alias: &str) -> Option<&str> {
        self.relations.get(alias).map(String::as_str)
    }
}

impl QuerySource for MemorySource {
    type Record = MemoryRecord;

    fn count(&self) -> Result<u64, SourceError> {
        Ok(self.filtered().count() as u64)
    }

    fn add_predicate(&mut self, expr: FilterExpr) {
        self.predicates.push(expr);
    }

    fn add_sort(&mut self, key: ResolvedProperty, direction: SortDirection) {
        self.sorts.push((key, direction));
    }

    fn set_limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    fn execute(&self) -> Result<Vec<Self::Record>, SourceError> {
        let mut records: Vec<MemoryRecord> = self.filtered().cloned().collect();

        // sort_by is stable, so equal keys keep source order
        records.sort_by(|a, b| self.compare(a, b));

        let offset = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let records = records.into_iter().skip(offset);

        Ok(match self.limit {
            Some(limit) => records
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect(),
            None => records.collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offices() -> MemorySource {
        MemorySource::new(
            "Offices",
            vec![
                MemoryRecord::new().with("city", "Tokyo").with("size", 12),
                MemoryRecord::new()
                    .with("city", "Edinburgh")
                    .with("size", 4),
                MemoryRecord::new().with("city", "London").with("size", 9),
                MemoryRecord::new()
                    .with("city", "Edinburgh")
                    .with("size", 7),
                MemoryRecord::new()
                    .with("city", "San Francisco")
                    .with("size", 21),
            ],
        )
    }

    fn base(field: &str) -> ResolvedProperty {
        ResolvedProperty::Base {
            field: field.to_string(),
        }
    }

    #[test]
    fn count_respects_predicates_but_not_paging() {
        let mut source = offices();
        source.add_predicate(FilterExpr::contains_ci(base("city"), "edinburgh"));
        source.set_limit(1);
        source.set_offset(10);

        assert_eq!(source.count().unwrap(), 2);
    }

    #[test]
    fn clone_is_an_independent_query() {
        let mut source = offices();
        let pristine = source.clone();
        source.add_predicate(FilterExpr::contains_ci(base("city"), "tokyo"));

        assert_eq!(source.count().unwrap(), 1);
        assert_eq!(pristine.count().unwrap(), 5);
    }

    #[test]
    fn contains_is_case_insensitive() {
        let mut source = offices();
        source.add_predicate(FilterExpr::contains_ci(base("city"), "EDIN"));

        assert_eq!(source.count().unwrap(), 2);
    }

    #[test]
    fn or_group_matches_any_column() {
        let mut source = offices();
        source.add_predicate(FilterExpr::or(vec![
            FilterExpr::contains_ci(base("city"), "london"),
            FilterExpr::contains_ci(base("size"), "21"),
        ]));

        assert_eq!(source.count().unwrap(), 2);
    }

    #[test]
    fn sort_then_window() {
        let mut source = offices();
        source.add_sort(base("size"), SortDirection::Desc);
        source.set_offset(1);
        source.set_limit(2);

        let records = source.execute().unwrap();
        let sizes: Vec<Value> = records
            .iter()
            .map(|record| record.field("size").unwrap())
            .collect();

        assert_eq!(sizes, vec![Value::Int(12), Value::Int(9)]);
    }

    #[test]
    fn stable_sort_preserves_source_order_on_ties() {
        let mut source = offices();
        source.add_sort(base("city"), SortDirection::Asc);

        let records = source.execute().unwrap();

        assert_eq!(records[0].field("size"), Some(Value::Int(4)));
        assert_eq!(records[1].field("size"), Some(Value::Int(7)));
    }

    #[test]
    fn relation_predicate_matches_any_collection_member() {
        let mut source = MemorySource::new(
            "Teams",
            vec![
                MemoryRecord::new().with("name", "core").with_many(
                    "members",
                    vec![
                        MemoryRecord::new().with("name", "Airi"),
                        MemoryRecord::new().with("name", "Cedric"),
                    ],
                ),
                MemoryRecord::new()
                    .with("name", "infra")
                    .with_many("members", vec![MemoryRecord::new().with("name", "Bruno")]),
            ],
        )
        .with_relation("Members", "members");

        source.add_predicate(FilterExpr::contains_ci(
            ResolvedProperty::Relation {
                alias: "Members".to_string(),
                property_path: "members".to_string(),
                field: "name".to_string(),
            },
            "cedric",
        ));

        assert_eq!(source.count().unwrap(), 1);
    }

    #[test]
    fn missing_relation_never_matches() {
        let mut source = MemorySource::new(
            "Teams",
            vec![MemoryRecord::new().with("name", "solo")],
        )
        .with_relation("Members", "members");

        source.add_predicate(FilterExpr::contains_ci(
            ResolvedProperty::Relation {
                alias: "Members".to_string(),
                property_path: "members".to_string(),
                field: "name".to_string(),
            },
            "anyone",
        ));

        assert_eq!(source.count().unwrap(), 0);
    }
}
