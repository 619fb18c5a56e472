//! `IMPORT` statements wrapping a push-down query.

use crate::metadata::DataType;

/// `c1 <type>, c2 <type>, ...` for the `IMPORT INTO (...)` column list.
pub fn describe_columns(types: &[DataType]) -> String {
    types
        .iter()
        .enumerate()
        .map(|(i, data_type)| format!("c{} {}", i + 1, data_type))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `IMPORT INTO (<columns>) FROM JDBC <connection> STATEMENT '<sql>'`.
pub fn from_jdbc(columns: &str, connection: &str, sql: &str) -> String {
    format!(
        "IMPORT INTO ({}) FROM JDBC {} STATEMENT {}",
        columns,
        connection,
        statement_literal(sql)
    )
}

/// `IMPORT FROM EXA <connection> STATEMENT '<sql>'`.
pub fn from_exa(connection: &str, sql: &str) -> String {
    format!("IMPORT FROM EXA {} STATEMENT {}", connection, statement_literal(sql))
}

/// `IMPORT FROM ORA <connection> STATEMENT '<sql>'`.
pub fn from_ora(connection: &str, sql: &str) -> String {
    format!("IMPORT FROM ORA {} STATEMENT {}", connection, statement_literal(sql))
}

/// `text` as a string literal of the outer Exasol statement.
pub(crate) fn statement_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Charset;

    #[test]
    fn test_describe_columns() {
        let types = [DataType::decimal(18, 0), DataType::varchar(20, Charset::Utf8)];
        assert_eq!(describe_columns(&types), "c1 DECIMAL(18, 0), c2 VARCHAR(20) UTF8");
        assert_eq!(describe_columns(&[]), "");
    }

    #[test]
    fn test_quotes_of_inner_statement_are_doubled() {
        assert_eq!(
            from_jdbc("c1 BOOLEAN", "AT CONN", "SELECT 'it''s' FROM T"),
            "IMPORT INTO (c1 BOOLEAN) FROM JDBC AT CONN STATEMENT 'SELECT ''it''''s'' FROM T'"
        );
        assert_eq!(
            from_ora("AT ORA_CONN", "SELECT 'a' FROM T"),
            "IMPORT FROM ORA AT ORA_CONN STATEMENT 'SELECT ''a'' FROM T'"
        );
    }
}
