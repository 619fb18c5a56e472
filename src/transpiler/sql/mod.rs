//! Per-dialect SQL generators.

pub mod bigquery;
pub mod db2;
pub mod exasol;
pub mod keywords;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod sqlserver;

use crate::dialect::capabilities::{MainCapability, PredicateCapability};

/// Structural capabilities shared by every dialect that can do LIMIT with OFFSET.
pub(crate) const MAIN_FULL: &[MainCapability] = &[
    MainCapability::SelectlistProjection,
    MainCapability::SelectlistExpressions,
    MainCapability::FilterExpressions,
    MainCapability::AggregateSingleGroup,
    MainCapability::AggregateGroupByColumn,
    MainCapability::AggregateGroupByExpression,
    MainCapability::AggregateGroupByTuple,
    MainCapability::AggregateHaving,
    MainCapability::OrderByColumn,
    MainCapability::OrderByExpression,
    MainCapability::Limit,
    MainCapability::LimitWithOffset,
];

/// [`MAIN_FULL`] without `LIMIT_WITH_OFFSET`.
pub(crate) const MAIN_NO_OFFSET: &[MainCapability] = &[
    MainCapability::SelectlistProjection,
    MainCapability::SelectlistExpressions,
    MainCapability::FilterExpressions,
    MainCapability::AggregateSingleGroup,
    MainCapability::AggregateGroupByColumn,
    MainCapability::AggregateGroupByExpression,
    MainCapability::AggregateGroupByTuple,
    MainCapability::AggregateHaving,
    MainCapability::OrderByColumn,
    MainCapability::OrderByExpression,
    MainCapability::Limit,
];

pub(crate) const PREDICATES_FULL: &[PredicateCapability] = &[
    PredicateCapability::And,
    PredicateCapability::Or,
    PredicateCapability::Not,
    PredicateCapability::Equal,
    PredicateCapability::NotEqual,
    PredicateCapability::Less,
    PredicateCapability::LessEqual,
    PredicateCapability::Like,
    PredicateCapability::LikeEscape,
    PredicateCapability::Between,
    PredicateCapability::RegexpLike,
    PredicateCapability::InConstList,
    PredicateCapability::IsNull,
    PredicateCapability::IsNotNull,
];

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::ast::{Select, SelectList, Statement, TableRef};
    use crate::metadata::{Charset, ColumnAdapterNotes, ColumnMetadata, DataType, TableMetadata};
    use crate::transpiler::{RenderContext, SqlGenerator, ToSql};

    /// Column with the given native type and a VARCHAR portable type.
    pub fn column(name: &str, jdbc_type: i32, type_name: &str) -> ColumnMetadata {
        typed_column(name, jdbc_type, type_name, DataType::varchar(100, Charset::Utf8))
    }

    pub fn typed_column(name: &str, jdbc_type: i32, type_name: &str, data_type: DataType) -> ColumnMetadata {
        ColumnMetadata::new(name, data_type, ColumnAdapterNotes::new(jdbc_type, type_name))
    }

    pub fn select(select_list: SelectList, columns: Vec<ColumnMetadata>) -> Select {
        Select::new(select_list, TableRef::new(TableMetadata::new("T", columns)))
    }

    pub fn render(generator: &dyn SqlGenerator, statement: impl Into<Statement>) -> String {
        statement
            .into()
            .to_sql(generator, &RenderContext::new())
            .unwrap()
    }
}
