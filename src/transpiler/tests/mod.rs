//! Rendering tests that span dialects.

mod dialects;

use crate::ast::{Select, SelectList, Statement, TableRef};
use crate::config::AdapterProperties;
use crate::dialect::Dialect;
use crate::error::VsResult;
use crate::metadata::{Charset, ColumnAdapterNotes, ColumnMetadata, DataType, TableMetadata};
use crate::transpiler::{RenderContext, SqlGenerator, ToSql};
use crate::types::jdbc;

fn generator(dialect: Dialect) -> Box<dyn SqlGenerator> {
    dialect.generator(&AdapterProperties::new()).unwrap()
}

fn int_column(name: &str) -> ColumnMetadata {
    ColumnMetadata::new(name, DataType::decimal(18, 0), ColumnAdapterNotes::new(jdbc::INTEGER, "INTEGER"))
}

fn text_column(name: &str) -> ColumnMetadata {
    ColumnMetadata::new(
        name,
        DataType::varchar(50, Charset::Utf8),
        ColumnAdapterNotes::new(jdbc::VARCHAR, "VARCHAR"),
    )
}

fn from(table: &str, columns: Vec<ColumnMetadata>, select_list: SelectList) -> Select {
    Select::new(select_list, TableRef::new(TableMetadata::new(table, columns)))
}

fn try_render(dialect: Dialect, statement: impl Into<Statement>, context: &RenderContext) -> VsResult<String> {
    statement.into().to_sql(generator(dialect).as_ref(), context)
}

fn render(dialect: Dialect, statement: impl Into<Statement>) -> String {
    try_render(dialect, statement, &RenderContext::new()).unwrap()
}
