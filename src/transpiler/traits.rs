//! Transpiler traits and utilities.

use crate::ast::{AggregateFunction, Expr, Literal, ScalarFunction};
use crate::dialect::DialectDescriptor;
use crate::error::VsResult;
use crate::identifier::IdentifierConverter;
use crate::metadata::ColumnMetadata;
use crate::types::TypeMapper;

/// Quote a string literal, doubling embedded single quotes.
pub fn quote_doubling(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote a string literal, escaping backslashes and single quotes with a backslash.
pub fn quote_backslash(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// One rendered ORDER BY key inside an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub expr: String,
    pub ascending: bool,
    pub nulls_last: bool,
}

/// A `GROUP_CONCAT` call with its parts already rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConcatCall {
    pub arg: String,
    pub distinct: bool,
    /// Raw separator text, unquoted.
    pub separator: Option<String>,
    /// `ORDER BY ...` clause rendered with the dialect's null ordering rules.
    pub order_by: Option<String>,
    pub keys: Vec<OrderKey>,
}

/// Trait for dialect-specific SQL generation.
///
/// Only the three accessors are required. Every other method has the default behaviour of
/// the common grammar and is overridden by the dialects that deviate from it.
pub trait SqlGenerator: Send + Sync {
    /// Static rules of the dialect.
    fn descriptor(&self) -> &DialectDescriptor;
    fn identifiers(&self) -> &IdentifierConverter;
    fn type_mapper(&self) -> &dyn TypeMapper;

    /// Quote an identifier (catalog, schema, table or column name).
    fn quote_identifier(&self, name: &str) -> String {
        self.identifiers().quote(name)
    }

    /// Quote a string value as a literal.
    fn string_literal(&self, value: &str) -> String {
        quote_doubling(value)
    }

    fn bool_literal(&self, value: bool) -> String {
        if value { "true" } else { "false" }.to_string()
    }

    /// Select list used when the host only checks for rows.
    fn any_column(&self) -> &'static str {
        "true"
    }

    /// True if `SELECT *` must be expanded because this column needs a projection rewrite.
    fn requires_cast(&self, _column: &ColumnMetadata) -> bool {
        false
    }

    /// Rewrite a column that is projected directly in the select list.
    fn project_column(&self, _column: &ColumnMetadata, rendered: String) -> String {
        rendered
    }

    /// Rewrite a literal that is projected directly in the select list.
    fn project_literal(&self, _literal: &Literal, rendered: String) -> String {
        rendered
    }

    /// Rewrite an aggregate that is projected directly in the select list.
    fn project_aggregate(&self, _function: AggregateFunction, rendered: String) -> String {
        rendered
    }

    /// Rewrite a scalar call that is projected directly in the select list.
    fn project_scalar(&self, _function: ScalarFunction, rendered: String) -> String {
        rendered
    }

    /// Rewrite of a scalar call that needs the argument nodes, not only their text.
    /// Returns `None` to fall through to the function mapper and the default form.
    fn scalar_call(
        &self,
        _function: ScalarFunction,
        _args: &[Expr],
        _rendered: &[String],
    ) -> Option<VsResult<String>> {
        None
    }

    /// `GROUP_CONCAT([DISTINCT] x [ORDER BY ...] [SEPARATOR 'sep'])`.
    fn group_concat(&self, call: GroupConcatCall) -> VsResult<String> {
        let mut sql = String::from("GROUP_CONCAT(");
        if call.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(&call.arg);
        if let Some(order_by) = &call.order_by {
            sql.push(' ');
            sql.push_str(order_by);
        }
        if let Some(separator) = &call.separator {
            sql.push_str(" SEPARATOR ");
            sql.push_str(&self.string_literal(separator));
        }
        sql.push(')');
        Ok(sql)
    }

    fn regexp_like(&self, expr: &str, pattern: &str) -> String {
        format!("{} REGEXP_LIKE {}", expr, pattern)
    }
}

/// `LISTAGG(x, 'sep') WITHIN GROUP(ORDER BY ...)`, ordering by `x` itself when no keys are given.
pub fn listagg(call: &GroupConcatCall, separator: String, nulls_first: bool) -> String {
    let keys = if call.keys.is_empty() {
        call.arg.clone()
    } else {
        call.keys
            .iter()
            .map(|key| {
                let mut sql = key.expr.clone();
                if !key.ascending {
                    sql.push_str(" DESC");
                }
                if nulls_first && !key.nulls_last {
                    sql.push_str(" NULLS FIRST");
                }
                sql
            })
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!("LISTAGG({}, {}) WITHIN GROUP(ORDER BY {})", call.arg, separator, keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_escaping() {
        assert_eq!(quote_doubling("i'm"), "'i''m'");
        assert_eq!(quote_backslash("i'm"), "'i\\'m'");
        assert_eq!(quote_backslash("a\\'b"), "'a\\\\\\'b'");
    }

    #[test]
    fn test_listagg_defaults_to_argument_order() {
        let call = GroupConcatCall {
            arg: "\"A\"".to_string(),
            distinct: false,
            separator: None,
            order_by: None,
            keys: Vec::new(),
        };
        assert_eq!(
            listagg(&call, "','".to_string(), true),
            "LISTAGG(\"A\", ',') WITHIN GROUP(ORDER BY \"A\")"
        );
    }

    #[test]
    fn test_listagg_keys() {
        let call = GroupConcatCall {
            arg: "A".to_string(),
            distinct: false,
            separator: Some("|".to_string()),
            order_by: None,
            keys: vec![
                OrderKey {
                    expr: "B".to_string(),
                    ascending: false,
                    nulls_last: false,
                },
                OrderKey {
                    expr: "C".to_string(),
                    ascending: true,
                    nulls_last: true,
                },
            ],
        };
        assert_eq!(
            listagg(&call, "'|'".to_string(), true),
            "LISTAGG(A, '|') WITHIN GROUP(ORDER BY B DESC NULLS FIRST, C)"
        );
        assert_eq!(
            listagg(&call, "'|'".to_string(), false),
            "LISTAGG(A, '|') WITHIN GROUP(ORDER BY B DESC, C)"
        );
    }
}
