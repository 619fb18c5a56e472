//! SQL dialects.
//!
//! A dialect is a [`DialectDescriptor`] (plain data: capabilities, null sorting, limit
//! placement, alias tables) plus a [`SqlGenerator`] that supplies the few structural hooks
//! the data cannot express.

pub mod capabilities;
pub mod registry;

use std::collections::{BTreeMap, BTreeSet};

use crate::ast::{AggregateFunction, ScalarFunction};
use crate::config::{AdapterProperties, keys};
use crate::error::VsResult;
use crate::transpiler::SqlGenerator;
use crate::transpiler::function_mapper::FunctionMapper;
use crate::transpiler::sql::{
    bigquery::BigQueryGenerator, db2::Db2Generator, exasol::ExasolGenerator, mysql::MysqlGenerator,
    oracle::OracleGenerator, postgres::PostgresGenerator, sqlserver::SqlServerGenerator,
};
pub use capabilities::Capabilities;
pub use registry::DialectRegistry;

/// Where the foreign database puts NULLs when the query does not say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullSorting {
    /// At the end, whatever the direction.
    AtEnd,
    /// At the start, whatever the direction.
    AtStart,
    /// NULL compares greater than every value.
    High,
    /// NULL compares smaller than every value.
    Low,
}

impl NullSorting {
    /// True if NULLs end up at the end of a result sorted in the given direction.
    pub fn nulls_at_end_by_default(&self, ascending: bool) -> bool {
        match self {
            NullSorting::AtEnd => true,
            NullSorting::AtStart => false,
            NullSorting::High => ascending,
            NullSorting::Low => !ascending,
        }
    }
}

/// Grammatical position of the row limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitStyle {
    /// `... LIMIT n [OFFSET m]`.
    Suffix,
    /// `... [OFFSET m ROWS] FETCH FIRST n ROWS ONLY`.
    FetchFirst,
    /// `SELECT TOP n ...`.
    TopPrefix,
    /// ROWNUM filter around a subselect.
    RowNum,
}

/// How explicit NULL placement in ORDER BY is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    /// `NULLS FIRST` / `NULLS LAST`.
    Native,
    /// A `CASE WHEN x IS NULL` tie-breaker ahead of the sort key.
    Emulated,
}

/// Static rules of one dialect.
#[derive(Debug, Clone)]
pub struct DialectDescriptor {
    pub name: &'static str,
    pub capabilities: Capabilities,
    pub null_sorting: NullSorting,
    pub requires_catalog_qualified_tables: bool,
    pub requires_schema_qualified_tables: bool,
    pub limit_style: LimitStyle,
    pub null_ordering: NullOrdering,
    pub functions: FunctionMapper,
    pub aggregate_aliases: BTreeMap<AggregateFunction, &'static str>,
    /// Functions written without parentheses when called without arguments.
    pub omit_parentheses: BTreeSet<ScalarFunction>,
}

impl DialectDescriptor {
    pub fn new(name: &'static str, capabilities: Capabilities) -> Self {
        Self {
            name,
            capabilities,
            null_sorting: NullSorting::High,
            requires_catalog_qualified_tables: false,
            requires_schema_qualified_tables: true,
            limit_style: LimitStyle::Suffix,
            null_ordering: NullOrdering::Native,
            functions: FunctionMapper::new(),
            aggregate_aliases: BTreeMap::new(),
            omit_parentheses: BTreeSet::new(),
        }
    }

    pub fn null_sorting(mut self, null_sorting: NullSorting) -> Self {
        self.null_sorting = null_sorting;
        self
    }

    pub fn qualification(mut self, catalog: bool, schema: bool) -> Self {
        self.requires_catalog_qualified_tables = catalog;
        self.requires_schema_qualified_tables = schema;
        self
    }

    pub fn limit_style(mut self, limit_style: LimitStyle) -> Self {
        self.limit_style = limit_style;
        self
    }

    pub fn null_ordering(mut self, null_ordering: NullOrdering) -> Self {
        self.null_ordering = null_ordering;
        self
    }

    pub fn functions(mut self, functions: FunctionMapper) -> Self {
        self.functions = functions;
        self
    }

    pub fn aggregate_alias(mut self, function: AggregateFunction, alias: &'static str) -> Self {
        self.aggregate_aliases.insert(function, alias);
        self
    }

    pub fn omit_parentheses(mut self, functions: &[ScalarFunction]) -> Self {
        self.omit_parentheses.extend(functions.iter().copied());
        self
    }

    /// Remove the capabilities named in `EXCLUDED_CAPABILITIES`.
    pub fn excluding(mut self, properties: &AdapterProperties) -> VsResult<Self> {
        let excluded = properties.excluded_capabilities();
        if !excluded.is_empty() {
            self.capabilities = self.capabilities.without(excluded.iter().map(String::as_str))?;
        }
        Ok(self)
    }
}

named_enum! {
    /// The built-in dialects.
    pub enum Dialect {
        Exasol => "EXASOL",
        Postgresql => "POSTGRESQL",
        Oracle => "ORACLE",
        Sqlserver => "SQLSERVER",
        Mysql => "MYSQL",
        Bigquery => "BIGQUERY",
        Db2 => "DB2",
    }
}

impl Dialect {
    /// Dialect-specific properties, on top of [`crate::config::COMMON_PROPERTIES`].
    pub fn supported_properties(&self) -> &'static [&'static str] {
        match self {
            Dialect::Exasol => &[
                keys::SCHEMA_NAME,
                keys::IMPORT_FROM_EXA,
                keys::EXA_CONNECTION_STRING,
                keys::IS_LOCAL,
            ],
            Dialect::Postgresql => &[
                keys::CATALOG_NAME,
                keys::SCHEMA_NAME,
                keys::IGNORE_ERRORS,
                keys::POSTGRESQL_IDENTIFIER_MAPPING,
            ],
            Dialect::Oracle => &[
                keys::SCHEMA_NAME,
                keys::IMPORT_FROM_ORA,
                keys::ORA_CONNECTION_NAME,
                keys::ORACLE_CAST_NUMBER_TO_DECIMAL,
                keys::IS_LOCAL,
            ],
            Dialect::Sqlserver => &[keys::CATALOG_NAME, keys::SCHEMA_NAME],
            Dialect::Mysql => &[keys::CATALOG_NAME],
            Dialect::Bigquery => &[keys::CATALOG_NAME, keys::SCHEMA_NAME, keys::BIGQUERY_ENABLE_IMPORT],
            Dialect::Db2 => &[keys::SCHEMA_NAME],
        }
    }

    /// Build the generator for this dialect. The properties must have been validated.
    pub fn generator(&self, properties: &AdapterProperties) -> VsResult<Box<dyn SqlGenerator>> {
        Ok(match self {
            Dialect::Exasol => Box::new(ExasolGenerator::new(properties)?),
            Dialect::Postgresql => Box::new(PostgresGenerator::new(properties)?),
            Dialect::Oracle => Box::new(OracleGenerator::new(properties)?),
            Dialect::Sqlserver => Box::new(SqlServerGenerator::new(properties)?),
            Dialect::Mysql => Box::new(MysqlGenerator::new(properties)?),
            Dialect::Bigquery => Box::new(BigQueryGenerator::new(properties)?),
            Dialect::Db2 => Box::new(Db2Generator::new(properties)?),
        })
    }
}
