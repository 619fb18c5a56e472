//! Delivery strategies end to end, against an in-memory foreign connection.

use std::sync::Mutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use vschema::prelude::*;

/// Answers `describe` and `execute` from fixed values and records the queries it saw.
#[derive(Default)]
struct FakeConnection {
    columns: Vec<NativeTypeDescriptor>,
    rows: Vec<Vec<ForeignValue>>,
    seen: Mutex<Vec<String>>,
}

impl FakeConnection {
    fn new(columns: Vec<NativeTypeDescriptor>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    fn row(mut self, values: Vec<ForeignValue>) -> Self {
        self.rows.push(values);
        self
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ForeignConnection for FakeConnection {
    async fn execute(&self, sql: &str) -> VsResult<ForeignResult> {
        self.seen.lock().unwrap().push(sql.to_string());
        Ok(ForeignResult {
            columns: self.columns.clone(),
            rows: self.rows.clone(),
        })
    }

    async fn describe(&self, sql: &str) -> VsResult<Vec<NativeTypeDescriptor>> {
        self.seen.lock().unwrap().push(sql.to_string());
        Ok(self.columns.clone())
    }
}

/// Fails every call, for strategies that must not touch the connection.
struct Unreachable;

#[async_trait]
impl ForeignConnection for Unreachable {
    async fn execute(&self, _sql: &str) -> VsResult<ForeignResult> {
        Err(VsError::foreign("connection refused"))
    }

    async fn describe(&self, _sql: &str) -> VsResult<Vec<NativeTypeDescriptor>> {
        Err(VsError::foreign("connection refused"))
    }
}

fn column(name: &str, jdbc_type: i32, type_name: &str) -> ColumnMetadata {
    ColumnMetadata::new(
        name,
        DataType::varchar(100, Charset::Utf8),
        ColumnAdapterNotes::new(jdbc_type, type_name),
    )
}

fn orders() -> Statement {
    let id = column("ID", jdbc::INTEGER, "int4");
    let note = column("NOTE", jdbc::VARCHAR, "varchar");
    Select::new(
        SelectList::Expressions(vec![Expr::column(id.clone()), Expr::column(note.clone())]),
        TableRef::new(TableMetadata::new("ORDERS", vec![id.clone(), note])),
    )
    .filter(Expr::eq(Expr::column(id), Expr::string("it's")))
    .into()
}

#[tokio::test]
async fn test_jdbc_import_describes_columns() {
    let properties = AdapterProperties::new().with(keys::CONNECTION_NAME, "PG_CONN");
    let rewriter = QueryRewriter::new(Dialect::Postgresql, properties).unwrap();
    let connection = FakeConnection::new(vec![
        NativeTypeDescriptor::new(jdbc::INTEGER, "int4").with_precision(10, 0),
        NativeTypeDescriptor::new(jdbc::VARCHAR, "varchar").with_precision(100, 0),
    ]);

    let sql = rewriter
        .rewrite(&orders(), &RenderContext::new(), &connection, None)
        .await
        .unwrap();

    assert_eq!(
        sql,
        "IMPORT INTO (c1 DECIMAL(10, 0), c2 VARCHAR(100) UTF8) FROM JDBC AT PG_CONN \
         STATEMENT 'SELECT id, note FROM orders WHERE id = ''it''''s'''"
    );
    assert_eq!(connection.seen(), vec!["SELECT id, note FROM orders WHERE id = 'it''s'"]);
}

#[tokio::test]
async fn test_jdbc_import_with_overridden_named_connection() {
    let properties = AdapterProperties::new()
        .with(keys::CONNECTION_NAME, "PG_CONN")
        .with(keys::PASSWORD, "override");
    let rewriter = QueryRewriter::new(Dialect::Postgresql, properties).unwrap();
    let connection = FakeConnection::new(vec![NativeTypeDescriptor::new(jdbc::BOOLEAN, "bool")]);
    let named = ConnectionInformation::new("jdbc:postgresql://pg/db", "reader", "secret");

    let sql = rewriter
        .rewrite(&orders(), &RenderContext::new(), &connection, Some(&named))
        .await
        .unwrap();

    assert!(
        sql.starts_with(
            "IMPORT INTO (c1 BOOLEAN) FROM JDBC AT 'jdbc:postgresql://pg/db' USER 'reader' IDENTIFIED BY 'override' STATEMENT "
        ),
        "{}",
        sql
    );
}

#[tokio::test]
async fn test_local_exasol_is_delivered_directly() {
    let properties = AdapterProperties::new()
        .with(keys::IS_LOCAL, "TRUE")
        .with(keys::SCHEMA_NAME, "RETAIL");
    let rewriter = QueryRewriter::new(Dialect::Exasol, properties.clone()).unwrap();
    assert_eq!(rewriter.strategy(), DeliveryStrategy::Direct);

    let sql = rewriter
        .rewrite(&orders(), &RenderContext::from_properties(&properties), &Unreachable, None)
        .await
        .unwrap();

    assert_eq!(sql, "SELECT ID, NOTE FROM RETAIL.ORDERS WHERE ID = 'it''s'");
}

#[tokio::test]
async fn test_import_from_exa() {
    let properties = AdapterProperties::new()
        .with(keys::IMPORT_FROM_EXA, "TRUE")
        .with(keys::EXA_CONNECTION_STRING, "10.0.0.1:8563")
        .with(keys::CONNECTION_NAME, "EXA_CONN");
    let rewriter = QueryRewriter::new(Dialect::Exasol, properties).unwrap();
    let named = ConnectionInformation::new("jdbc:exa:10.0.0.1:8563", "sys", "exasol");

    let sql = rewriter
        .rewrite(&orders(), &RenderContext::new(), &Unreachable, Some(&named))
        .await
        .unwrap();

    assert_eq!(
        sql,
        "IMPORT FROM EXA AT '10.0.0.1:8563' USER 'sys' IDENTIFIED BY 'exasol' \
         STATEMENT 'SELECT ID, NOTE FROM ORDERS WHERE ID = ''it''''s'''"
    );
}

#[tokio::test]
async fn test_import_from_ora() {
    let properties = AdapterProperties::new()
        .with(keys::IMPORT_FROM_ORA, "TRUE")
        .with(keys::ORA_CONNECTION_NAME, "ORA_CONN")
        .with(keys::CONNECTION_NAME, "JDBC_ORA");
    let rewriter = QueryRewriter::new(Dialect::Oracle, properties).unwrap();

    let sql = rewriter
        .rewrite(&orders(), &RenderContext::new(), &Unreachable, None)
        .await
        .unwrap();

    assert_eq!(
        sql,
        "IMPORT FROM ORA AT ORA_CONN STATEMENT 'SELECT ID, NOTE FROM ORDERS WHERE ID = ''it''''s'''"
    );
}

#[tokio::test]
async fn test_bigquery_materializes_rows() {
    let rewriter = QueryRewriter::new(Dialect::Bigquery, AdapterProperties::new()).unwrap();
    let connection = FakeConnection::new(vec![
        NativeTypeDescriptor::new(jdbc::BIGINT, "INT64"),
        NativeTypeDescriptor::new(jdbc::VARCHAR, "STRING"),
        NativeTypeDescriptor::new(jdbc::TIMESTAMP, "DATETIME"),
        NativeTypeDescriptor::new(jdbc::BOOLEAN, "BOOL"),
    ])
    .row(vec![
        ForeignValue::Int(7),
        ForeignValue::String("it's".to_string()),
        ForeignValue::String("1111-1-1 12:10:9.1239".to_string()),
        ForeignValue::Bool(true),
    ])
    .row(vec![
        ForeignValue::Null,
        ForeignValue::Null,
        ForeignValue::Null,
        ForeignValue::Null,
    ]);

    let sql = rewriter
        .rewrite(&orders(), &RenderContext::new(), &connection, None)
        .await
        .unwrap();

    assert_eq!(
        sql,
        "SELECT * FROM VALUES (7, 'it\\'s', '01.01.1111 12:10:09.124', true), \
         (CAST (NULL AS DECIMAL(19,0)), CAST (NULL AS VARCHAR(4)), CAST (NULL AS TIMESTAMP), CAST (NULL AS BOOLEAN))"
    );
    assert_eq!(connection.seen(), vec!["SELECT ID, NOTE FROM ORDERS WHERE ID = 'it\\'s'"]);
}

#[tokio::test]
async fn test_bigquery_empty_result() {
    let rewriter = QueryRewriter::new(Dialect::Bigquery, AdapterProperties::new()).unwrap();
    let connection = FakeConnection::new(vec![
        NativeTypeDescriptor::new(jdbc::BIGINT, "INT64"),
        NativeTypeDescriptor::new(jdbc::VARCHAR, "STRING"),
        NativeTypeDescriptor::new(jdbc::DATE, "DATE"),
    ]);

    let sql = rewriter
        .rewrite(&orders(), &RenderContext::new(), &connection, None)
        .await
        .unwrap();

    assert_eq!(sql, "SELECT * FROM VALUES (1, 1, 1) WHERE false");
}

#[tokio::test]
async fn test_foreign_failure_propagates() {
    let rewriter = QueryRewriter::new(Dialect::Bigquery, AdapterProperties::new()).unwrap();
    let err = rewriter
        .rewrite(&orders(), &RenderContext::new(), &Unreachable, None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Foreign execution error: connection refused");
}

#[tokio::test]
async fn test_bigquery_import_switch() {
    let properties = AdapterProperties::new()
        .with(keys::BIGQUERY_ENABLE_IMPORT, "TRUE")
        .with(keys::CONNECTION_NAME, "BQ_CONN");
    let rewriter = QueryRewriter::new(Dialect::Bigquery, properties).unwrap();
    assert_eq!(rewriter.strategy(), DeliveryStrategy::JdbcImport);

    let connection = FakeConnection::new(vec![NativeTypeDescriptor::new(jdbc::TIME, "TIME")]);
    let sql = rewriter
        .rewrite(&orders(), &RenderContext::new(), &connection, None)
        .await
        .unwrap();
    assert!(sql.starts_with("IMPORT INTO (c1 VARCHAR(30) UTF8) FROM JDBC AT BQ_CONN"), "{}", sql);
}
