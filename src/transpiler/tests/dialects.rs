//! The same statement rendered by every dialect.

use super::*;
use crate::ast::{Expr, OrderByItem};
use crate::dialect::DialectRegistry;
use crate::error::VsError;

/// `SELECT c1, COUNT(c2) ... GROUP BY c1 HAVING ... ORDER BY c1 LIMIT 10`.
fn grouped_query(order: OrderByItem) -> Select {
    let c1 = int_column("c1");
    let c2 = text_column("c2");
    from("table", vec![c1.clone(), c2.clone()], SelectList::Expressions(vec![
        Expr::column(c1.clone()),
        Expr::count(Expr::column(c2.clone())),
    ]))
    .filter(Expr::lt(Expr::int(1), Expr::column(c1.clone())))
    .group_by(vec![Expr::column(c1)])
    .having(Expr::lt(Expr::int(1), Expr::count(Expr::column(c2))))
    .order_by(vec![order])
    .limit(10)
}

#[test]
fn test_limit_suffix_dialect() {
    let context = RenderContext::new().schema("schema");
    let query = grouped_query(OrderByItem::asc(int_column("c1")));
    assert_eq!(
        try_render(Dialect::Postgresql, query, &context).unwrap(),
        "SELECT c1, COUNT(c2) FROM \"schema\".\"table\" WHERE 1 < c1 GROUP BY c1 HAVING 1 < COUNT(c2) ORDER BY c1 LIMIT 10"
    );
}

#[test]
fn test_limit_prefix_dialect() {
    let context = RenderContext::new().schema("schema");
    let query = grouped_query(OrderByItem::asc(int_column("c1")).nulls_first());
    assert_eq!(
        try_render(Dialect::Sqlserver, query, &context).unwrap(),
        "SELECT TOP 10 c1, COUNT(c2) FROM [schema].[table] WHERE 1 < c1 GROUP BY c1 HAVING 1 < COUNT(c2) ORDER BY c1"
    );
}

#[test]
fn test_limit_styles() {
    let query = || from("T", vec![int_column("A")], SelectList::AnyColumn).limit(3);
    assert_eq!(render(Dialect::Exasol, query()), "SELECT true FROM T LIMIT 3");
    assert_eq!(render(Dialect::Mysql, query()), "SELECT true FROM T LIMIT 3");
    assert_eq!(render(Dialect::Db2, query()), "SELECT 1 FROM T FETCH FIRST 3 ROWS ONLY");
    assert_eq!(render(Dialect::Sqlserver, query()), "SELECT TOP 3 true FROM T");
    assert_eq!(
        render(Dialect::Oracle, query()),
        "SELECT LIMIT_SUBSELECT.* FROM ( SELECT 1 FROM T ) LIMIT_SUBSELECT WHERE ROWNUM <= 3"
    );
}

#[test]
fn test_zero_offset_is_dropped() {
    let query = from("T", vec![], SelectList::All).limit_offset(3, 0);
    assert_eq!(render(Dialect::Exasol, query.clone()), "SELECT * FROM T LIMIT 3");
    assert_eq!(render(Dialect::Sqlserver, query), "SELECT TOP 3 * FROM T");
}

#[test]
fn test_oracle_any_column_with_offset() {
    let query = from("T", vec![int_column("A")], SelectList::AnyColumn).limit_offset(3, 6);
    assert_eq!(
        render(Dialect::Oracle, query),
        "SELECT c0 FROM ( SELECT LIMIT_SUBSELECT.*, ROWNUM ROWNUM_SUB FROM ( SELECT 1 AS c0 FROM T ) \
         LIMIT_SUBSELECT WHERE ROWNUM <= 9 ) WHERE ROWNUM_SUB > 6"
    );
}

#[test]
fn test_oracle_offset_over_empty_table() {
    let query = from("T", vec![], SelectList::All).limit_offset(3, 6);
    let err = try_render(Dialect::Oracle, query, &RenderContext::new()).unwrap_err();
    assert!(matches!(err, VsError::Unsupported { dialect: "ORACLE", .. }));
}

#[test]
fn test_oracle_offset_beyond_row_numbers() {
    let query = from("T", vec![int_column("A")], SelectList::All).limit_offset(u64::MAX, 1);
    let err = try_render(Dialect::Oracle, query, &RenderContext::new()).unwrap_err();
    assert!(matches!(err, VsError::Generation(_)), "{}", err);

    let query = from("T", vec![int_column("A")], SelectList::All).limit_offset(u64::MAX - 1, 1);
    assert!(render(Dialect::Oracle, query).contains(&format!("ROWNUM <= {}", u64::MAX)));
}

#[test]
fn test_string_literal_escaping() {
    let query = || from("T", vec![], SelectList::Expressions(vec![Expr::string("i'm")]));
    assert_eq!(render(Dialect::Exasol, query()), "SELECT 'i''m' FROM T");
    assert_eq!(render(Dialect::Sqlserver, query()), "SELECT 'i''m' FROM T");
    assert_eq!(render(Dialect::Mysql, query()), "SELECT 'i''m' FROM T");
    assert_eq!(render(Dialect::Bigquery, query()), "SELECT 'i\\'m' FROM T");
}

#[test]
fn test_identifier_quoting_per_dialect() {
    let query = || from("my table", vec![], SelectList::All);
    assert_eq!(render(Dialect::Exasol, query()), "SELECT * FROM \"my table\"");
    assert_eq!(render(Dialect::Sqlserver, query()), "SELECT * FROM [my table]");
    assert_eq!(render(Dialect::Mysql, query()), "SELECT * FROM `my table`");
    assert_eq!(render(Dialect::Bigquery, query()), "SELECT * FROM `my table`");
    assert_eq!(render(Dialect::Postgresql, query()), "SELECT * FROM \"my table\"");
}

#[test]
fn test_catalog_qualification() {
    let context = RenderContext::new().catalog("cat").schema("sch");
    let query = || from("T", vec![], SelectList::All);
    let render_in = |dialect| try_render(dialect, query(), &context).unwrap();
    assert_eq!(render_in(Dialect::Mysql), "SELECT * FROM cat.T");
    assert_eq!(render_in(Dialect::Sqlserver), "SELECT * FROM cat.sch.T");
    assert_eq!(render_in(Dialect::Db2), "SELECT * FROM \"sch\".T");
    assert_eq!(render_in(Dialect::Exasol), "SELECT * FROM \"sch\".T");
}

#[test]
fn test_registry_builds_generators() {
    let registry = DialectRegistry::builtin();
    let properties = AdapterProperties::new().with(crate::config::keys::CONNECTION_NAME, "MSSQL_CONN");
    let generator = registry.generator("sqlserver", &properties).unwrap();
    assert_eq!(generator.descriptor().name, "SQLSERVER");
    assert!(registry.generator("sqlserver", &AdapterProperties::new()).is_err());
    assert!(registry.generator("SYBASE", &properties).is_err());
}
