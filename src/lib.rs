//! # vschema: dialect SQL generation for virtual schemas
//!
//! A host engine hands over a push-down query tree together with the metadata of the
//! virtual tables it reads. vschema renders that tree in the SQL grammar of the foreign
//! database and decides how the result is delivered: directly, wrapped in an `IMPORT`
//! statement, or materialized into a literal `VALUES` table.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use vschema::prelude::*;
//!
//! let properties = AdapterProperties::new().with(keys::CONNECTION_NAME, "MSSQL_CONN");
//! let rewriter = QueryRewriter::new(Dialect::Sqlserver, properties)?;
//! let request = PushdownRequest::from_json(&json)?;
//! let sql = rewriter.push_down_sql(&request.statement, &RenderContext::new())?;
//! // => "SELECT TOP 10 c1, COUNT(c2) FROM ..."
//! ```
//!
//! ## Dialects
//!
//! | Dialect    | Limit                    | NULL placement |
//! |------------|--------------------------|----------------|
//! | EXASOL     | `LIMIT n OFFSET m`       | native         |
//! | POSTGRESQL | `LIMIT n OFFSET m`       | native         |
//! | ORACLE     | ROWNUM subselect         | native         |
//! | SQLSERVER  | `SELECT TOP n`           | emulated       |
//! | MYSQL      | `LIMIT n OFFSET m`       | emulated       |
//! | BIGQUERY   | `LIMIT n OFFSET m`       | native         |
//! | DB2        | `FETCH FIRST n ROWS ONLY`| native         |

#[macro_use]
mod macros;

pub mod ast;
pub mod config;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod identifier;
pub mod metadata;
pub mod request;
pub mod rewriter;
pub mod transpiler;
pub mod types;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::{AdapterProperties, keys};
    pub use crate::dialect::{Dialect, DialectDescriptor, DialectRegistry, NullSorting};
    pub use crate::engine::{ForeignConnection, ForeignResult, ForeignValue, SqlxForeignConnection};
    pub use crate::error::*;
    pub use crate::identifier::IdentifierConverter;
    pub use crate::metadata::*;
    pub use crate::request::PushdownRequest;
    pub use crate::rewriter::{ConnectionInformation, DeliveryStrategy, QueryRewriter};
    pub use crate::transpiler::{RenderContext, SqlGenerator, ToSql};
    pub use crate::types::{TypeMapper, jdbc};
}

/// Render `statement` for the dialect called `dialect` without any adapter properties
/// beyond `properties`.
///
/// # Example
///
/// ```
/// use vschema::prelude::*;
///
/// let table = TableMetadata::new("T", vec![]);
/// let select = Select::new(SelectList::All, TableRef::new(table)).limit(5);
/// let properties = AdapterProperties::new().with(keys::IS_LOCAL, "TRUE");
/// let sql = vschema::render("exasol", &select.into(), &properties).unwrap();
/// assert_eq!(sql, "SELECT * FROM T LIMIT 5");
/// ```
pub fn render(
    dialect: &str,
    statement: &ast::Statement,
    properties: &config::AdapterProperties,
) -> error::VsResult<String> {
    use transpiler::ToSql;

    let generator = dialect::DialectRegistry::builtin().generator(dialect, properties)?;
    let context = transpiler::RenderContext::from_properties(properties);
    statement.to_sql(generator.as_ref(), &context)
}
