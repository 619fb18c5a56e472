//! Push-down requests rendered from their JSON form.

use pretty_assertions::assert_eq;
use vschema::prelude::*;

const REQUEST: &str = r#"{
    "statement": {
        "type": "select",
        "selectList": {"kind": "expressions", "expressions": [
            {"type": "column", "column": {"name": "C1",
                "dataType": {"type": "VARCHAR", "size": 10, "charset": "UTF8"},
                "adapterNotes": "{\"jdbcDataType\":12,\"typeName\":\"varchar\"}"}}
        ]},
        "from": {"table": {"name": "T", "columns": []}},
        "filter": {"type": "predicate", "predicate": {"kind": "compare", "op": "LESS",
            "left": {"type": "column", "column": {"name": "C1",
                "dataType": {"type": "VARCHAR", "size": 10, "charset": "UTF8"},
                "adapterNotes": "{\"jdbcDataType\":12,\"typeName\":\"varchar\"}"}},
            "right": {"type": "literal", "value": {"kind": "exact_numeric", "value": "10"}}}},
        "limit": {"count": 3}
    },
    "schemaName": "VS"
}"#;

fn sqlserver_properties() -> AdapterProperties {
    AdapterProperties::new().with(keys::CONNECTION_NAME, "MSSQL_CONN")
}

#[test]
fn test_render_request() {
    let request = PushdownRequest::from_json(REQUEST).unwrap();
    let sql = vschema::render("sqlserver", &request.statement, &sqlserver_properties()).unwrap();
    assert_eq!(sql, "SELECT TOP 3 C1 FROM T WHERE C1 < 10");
}

#[test]
fn test_render_request_through_rewriter() {
    let properties = sqlserver_properties().with(keys::SCHEMA_NAME, "dbo");
    let request = PushdownRequest::from_json(REQUEST).unwrap();
    let rewriter = QueryRewriter::new(Dialect::Sqlserver, properties.clone()).unwrap();
    let context = request.render_context(&properties).unwrap();
    assert_eq!(
        rewriter.push_down_sql(&request.statement, &context).unwrap(),
        "SELECT TOP 3 C1 FROM dbo.T WHERE C1 < 10"
    );
}

#[test]
fn test_same_request_in_every_dialect() {
    let request = PushdownRequest::from_json(REQUEST).unwrap();
    let expected = [
        ("BIGQUERY", "SELECT C1 FROM T WHERE C1 < 10 LIMIT 3"),
        ("EXASOL", "SELECT C1 FROM T WHERE C1 < 10 LIMIT 3"),
        ("MYSQL", "SELECT C1 FROM T WHERE C1 < 10 LIMIT 3"),
        ("POSTGRESQL", "SELECT c1 FROM t WHERE c1 < 10 LIMIT 3"),
        ("SQLSERVER", "SELECT TOP 3 C1 FROM T WHERE C1 < 10"),
    ];
    for (dialect, sql) in expected {
        let properties = AdapterProperties::new().with(keys::CONNECTION_NAME, "CONN");
        assert_eq!(vschema::render(dialect, &request.statement, &properties).unwrap(), sql, "{}", dialect);
    }
}

#[test]
fn test_missing_column_notes() {
    let request = REQUEST.replace(r#""adapterNotes": "{\"jdbcDataType\":12,\"typeName\":\"varchar\"}""#, r#""adapterNotes": """#);
    let err = PushdownRequest::from_json(&request).unwrap_err();
    assert!(
        err.to_string().contains("The adapternotes field of column C1 are empty or null"),
        "{}",
        err
    );
}

#[test]
fn test_unknown_dialect() {
    let request = PushdownRequest::from_json(REQUEST).unwrap();
    let err = vschema::render("informix", &request.statement, &AdapterProperties::new()).unwrap_err();
    assert_eq!(err.to_string(), "Unknown SQL dialect: 'informix'");
}

#[test]
fn test_properties_are_validated_before_rendering() {
    let request = PushdownRequest::from_json(REQUEST).unwrap();

    let err = vschema::render("mysql", &request.statement, &AdapterProperties::new()).unwrap_err();
    assert!(matches!(err, VsError::Config(_)));
    assert!(err.to_string().contains("CONNECTION_NAME"), "{}", err);

    let foreign_property = sqlserver_properties().with(keys::IMPORT_FROM_ORA, "TRUE");
    let err = vschema::render("sqlserver", &request.statement, &foreign_property).unwrap_err();
    assert!(err.to_string().contains("does not support IMPORT_FROM_ORA"), "{}", err);
}

#[test]
fn test_identifiers_resolve_to_their_spelling() {
    let names = ["UPPER", "mixedCase", "lower", "with space", "SELECT", "quo\"te", "back`tick", "br]acket"];
    for dialect in Dialect::ALL {
        if *dialect == Dialect::Postgresql {
            continue;
        }
        let generator = dialect.generator(&AdapterProperties::new()).unwrap();
        let identifiers = generator.identifiers();
        for name in names {
            assert_eq!(identifiers.unquote(&identifiers.quote(name)), name, "{} {}", dialect, name);
        }
    }
}

#[test]
fn test_postgres_folds_before_quoting() {
    let generator = Dialect::Postgresql.generator(&AdapterProperties::new()).unwrap();
    let identifiers = generator.identifiers();
    assert_eq!(identifiers.quote("ORDERS"), "orders");
    assert_eq!(identifiers.quote("Table"), "\"table\"");
    assert_eq!(identifiers.unquote(&identifiers.quote("MixedCase")), "mixedcase");
}

#[test]
fn test_type_mapping_is_total() {
    let unknown = NativeTypeDescriptor::new(4242, "SOMETHING_NEW");
    for dialect in Dialect::ALL {
        let generator = dialect.generator(&AdapterProperties::new()).unwrap();
        let mapper = generator.type_mapper();
        assert_eq!(mapper.map(&unknown).to_string(), "VARCHAR(2000000) UTF8", "{}", dialect);

        let int = NativeTypeDescriptor::new(jdbc::INTEGER, "INTEGER").with_precision(10, 0);
        assert_eq!(mapper.map(&int), mapper.map(&int.clone()), "{}", dialect);
    }
}

#[test]
fn test_dialect_keywords_are_quoted() {
    let expected = [
        ("BIGQUERY", "qualify", "SELECT `qualify` FROM T"),
        ("DB2", "NULLS", "SELECT \"NULLS\" FROM T"),
        ("EXASOL", "SCRIPT", "SELECT \"SCRIPT\" FROM T"),
        ("MYSQL", "index", "SELECT `index` FROM T"),
        ("ORACLE", "LEVEL", "SELECT \"LEVEL\" FROM T"),
        ("POSTGRESQL", "VERBOSE", "SELECT \"verbose\" FROM t"),
        ("SQLSERVER", "PERCENT", "SELECT [PERCENT] FROM T"),
    ];
    for (dialect, name, sql) in expected {
        let column = ColumnMetadata::new(
            name,
            DataType::varchar(10, Charset::Utf8),
            ColumnAdapterNotes::new(jdbc::VARCHAR, "VARCHAR"),
        );
        let statement: Statement = Select::new(
            SelectList::Expressions(vec![Expr::column(column.clone())]),
            TableRef::new(TableMetadata::new("T", vec![column])),
        )
        .into();
        let properties = AdapterProperties::new().with(keys::CONNECTION_NAME, "CONN");
        assert_eq!(vschema::render(dialect, &statement, &properties).unwrap(), sql, "{}", dialect);

        let generator = Dialect::from_name(dialect).unwrap().generator(&properties).unwrap();
        let identifiers = generator.identifiers();
        let resolved = if dialect == "POSTGRESQL" { name.to_lowercase() } else { name.to_string() };
        assert_eq!(identifiers.unquote(&identifiers.quote(name)), resolved, "{}", dialect);
    }
}
