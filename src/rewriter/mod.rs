//! Delivery of the rendered push-down query to the host.
//!
//! The strategy depends on the dialect and the adapter properties, never on the query:
//! the rendered SQL is handed over as is, wrapped in an `IMPORT` statement, or executed
//! right away and replaced by a literal `VALUES` table.

pub mod connection;
pub mod import;
pub mod values;

use crate::ast::Statement;
use crate::config::{AdapterProperties, keys};
use crate::dialect::Dialect;
use crate::engine::ForeignConnection;
use crate::error::{VsError, VsResult};
use crate::transpiler::{RenderContext, SqlGenerator, ToSql};
pub use connection::ConnectionInformation;

const BIGQUERY_IMPORT_WARNING: &str = "Attention: IMPORT is activated for the BIGQUERY dialect. Please be aware \
     that using IMPORT with this dialect requires disabling important security features and is therefore not \
     recommended!";

/// How the push-down query reaches the foreign system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStrategy {
    /// The host runs the push-down query itself.
    Direct,
    /// `IMPORT INTO (...) FROM JDBC ...`.
    JdbcImport,
    /// `IMPORT FROM EXA ...`.
    ExaImport,
    /// `IMPORT FROM ORA ...`.
    OraImport,
    /// Run the query here and inline the result as `VALUES`.
    Materialize,
}

impl DeliveryStrategy {
    pub fn select(dialect: Dialect, properties: &AdapterProperties) -> Self {
        match dialect {
            Dialect::Exasol if properties.is_local() => DeliveryStrategy::Direct,
            Dialect::Exasol if properties.is_enabled(keys::IMPORT_FROM_EXA) => DeliveryStrategy::ExaImport,
            Dialect::Oracle if properties.is_enabled(keys::IMPORT_FROM_ORA) => DeliveryStrategy::OraImport,
            Dialect::Bigquery if !properties.is_enabled(keys::BIGQUERY_ENABLE_IMPORT) => DeliveryStrategy::Materialize,
            _ => DeliveryStrategy::JdbcImport,
        }
    }

    /// True if the delivered statement embeds a connection definition.
    pub fn needs_connection_definition(&self) -> bool {
        matches!(
            self,
            DeliveryStrategy::JdbcImport | DeliveryStrategy::ExaImport | DeliveryStrategy::OraImport
        )
    }
}

/// Renders a statement and wraps it for delivery.
pub struct QueryRewriter {
    dialect: Dialect,
    properties: AdapterProperties,
    generator: Box<dyn SqlGenerator>,
    strategy: DeliveryStrategy,
    table_filter: Vec<String>,
}

impl QueryRewriter {
    /// Validate `properties` for `dialect` and build the rewriter.
    pub fn new(dialect: Dialect, properties: AdapterProperties) -> VsResult<Self> {
        properties.validate(&dialect)?;
        let generator = dialect.generator(&properties)?;
        let strategy = DeliveryStrategy::select(dialect, &properties);
        if dialect == Dialect::Bigquery && strategy == DeliveryStrategy::JdbcImport {
            tracing::warn!("{}", BIGQUERY_IMPORT_WARNING);
        }
        Ok(Self {
            dialect,
            table_filter: properties.filtered_tables(),
            properties,
            generator,
            strategy,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn strategy(&self) -> DeliveryStrategy {
        self.strategy
    }

    pub fn generator(&self) -> &dyn SqlGenerator {
        self.generator.as_ref()
    }

    /// The push-down query in the foreign dialect.
    pub fn push_down_sql(&self, statement: &Statement, context: &RenderContext) -> VsResult<String> {
        self.check_table_filter(statement)?;
        let sql = statement.to_sql(self.generator.as_ref(), context)?;
        tracing::debug!(dialect = %self.dialect, sql = %sql, "generated push-down query");
        Ok(sql)
    }

    /// The statement the host executes.
    ///
    /// `named` carries the details of the connection in `CONNECTION_NAME`. It is only needed
    /// when individual properties override parts of it.
    pub async fn rewrite(
        &self,
        statement: &Statement,
        context: &RenderContext,
        connection: &dyn ForeignConnection,
        named: Option<&ConnectionInformation>,
    ) -> VsResult<String> {
        let sql = self.push_down_sql(statement, context)?;
        let delivered = match self.strategy {
            DeliveryStrategy::Direct => sql,
            DeliveryStrategy::JdbcImport => {
                let descriptors = connection.describe(&sql).await?;
                let types: Vec<_> = descriptors
                    .iter()
                    .map(|descriptor| self.generator.type_mapper().map(descriptor))
                    .collect();
                let columns = import::describe_columns(&types);
                tracing::debug!(columns = %columns, "import columns");
                let definition = connection::jdbc_definition(&self.properties, named)?;
                import::from_jdbc(&columns, &definition, &sql)
            }
            DeliveryStrategy::ExaImport => {
                let definition = connection::exa_definition(&self.properties, named)?;
                import::from_exa(&definition, &sql)
            }
            DeliveryStrategy::OraImport => {
                let definition = connection::ora_definition(&self.properties)?;
                import::from_ora(&definition, &sql)
            }
            DeliveryStrategy::Materialize => {
                let result = connection.execute(&sql).await?;
                values::materialize(self.generator.as_ref(), &result)?
            }
        };
        tracing::debug!(strategy = ?self.strategy, sql = %delivered, "rewritten query");
        Ok(delivered)
    }

    /// A non-empty `TABLE_FILTER` lists every table of the virtual schema.
    fn check_table_filter(&self, statement: &Statement) -> VsResult<()> {
        if self.table_filter.is_empty() {
            return Ok(());
        }
        let Statement::Select(select) = statement;
        let name = &select.from.table.name;
        if self.table_filter.iter().any(|table| table == name) {
            return Ok(());
        }
        Err(VsError::Metadata(format!(
            "Table {} is not part of the virtual schema. TABLE_FILTER only includes {}. \
             Please refresh the virtual schema.",
            name,
            self.table_filter.join(", ")
        )))
    }
}
