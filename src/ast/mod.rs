//! Query tree handed over by the host's push-down planner.
//!
//! The tree is a closed set of enums. It is built once per query, rendered, and dropped.
//! Context that a node needs from its ancestors (is this column projected directly
//! in the select list? which columns does the enclosing table have?) is supplied by the
//! renderer while it walks down, see [`crate::transpiler::Position`].

pub mod functions;

use serde::{Deserialize, Serialize};

use crate::metadata::{ColumnMetadata, DataType, TableMetadata};
pub use functions::{AggregateFunction, ScalarFunction};

/// Root of a push-down query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Statement {
    Select(Select),
}

/// `SELECT <list> FROM <table> [WHERE] [GROUP BY] [HAVING] [ORDER BY] [LIMIT]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Select {
    pub select_list: SelectList,
    pub from: TableRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Expr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<Expr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub having: Option<Expr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<Vec<OrderByItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Limit>,
}

impl Select {
    /// A bare `SELECT <list> FROM <table>`.
    pub fn new(select_list: SelectList, from: TableRef) -> Self {
        Self {
            select_list,
            from,
            filter: None,
            group_by: None,
            having: None,
            order_by: None,
            limit: None,
        }
    }

    pub fn filter(mut self, expr: impl Into<Expr>) -> Self {
        self.filter = Some(expr.into());
        self
    }

    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = Some(exprs);
        self
    }

    pub fn having(mut self, expr: impl Into<Expr>) -> Self {
        self.having = Some(expr.into());
        self
    }

    pub fn order_by(mut self, items: Vec<OrderByItem>) -> Self {
        self.order_by = Some(items);
        self
    }

    pub fn limit(mut self, count: u64) -> Self {
        self.limit = Some(Limit {
            count,
            offset: None,
        });
        self
    }

    pub fn limit_offset(mut self, count: u64, offset: u64) -> Self {
        self.limit = Some(Limit {
            count,
            offset: Some(offset),
        });
        self
    }

    /// Number of result columns this select produces.
    pub fn result_width(&self) -> usize {
        match &self.select_list {
            SelectList::All => self.from.table.columns.len(),
            SelectList::AnyColumn => 1,
            SelectList::Expressions(exprs) => exprs.len(),
        }
    }
}

impl From<Select> for Statement {
    fn from(select: Select) -> Self {
        Statement::Select(select)
    }
}

/// The three kinds of select list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "expressions", rename_all = "snake_case")]
pub enum SelectList {
    /// `SELECT *`.
    All,
    /// The host only checks for row existence, any single column will do.
    AnyColumn,
    Expressions(Vec<Expr>),
}

/// Table in the FROM clause together with its resolved metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    pub table: TableMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(table: TableMetadata) -> Self {
        Self { table, alias: None }
    }

    pub fn name(&self) -> &str {
        &self.table.name
    }
}

/// `LIMIT count [OFFSET offset]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

/// One ORDER BY key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderByItem {
    pub expr: Expr,
    #[serde(default = "default_true")]
    pub ascending: bool,
    #[serde(default = "default_true")]
    pub nulls_last: bool,
}

fn default_true() -> bool {
    true
}

impl OrderByItem {
    pub fn asc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            ascending: true,
            nulls_last: true,
        }
    }

    pub fn desc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            ascending: false,
            nulls_last: false,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls_last = false;
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls_last = true;
        self
    }
}

/// Expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    Column {
        column: ColumnMetadata,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        table_alias: Option<String>,
    },
    Literal {
        value: Literal,
    },
    Scalar {
        function: ScalarFunction,
        #[serde(default)]
        args: Vec<Expr>,
    },
    Aggregate {
        function: AggregateFunction,
        #[serde(default)]
        args: Vec<Expr>,
        #[serde(default)]
        distinct: bool,
    },
    GroupConcat {
        arg: Box<Expr>,
        #[serde(default)]
        distinct: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        separator: Option<String>,
        #[serde(default)]
        order_by: Vec<OrderByItem>,
    },
    Cast {
        expr: Box<Expr>,
        data_type: DataType,
    },
    Extract {
        part: String,
        expr: Box<Expr>,
    },
    Case {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        basis: Option<Box<Expr>>,
        branches: Vec<WhenThen>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        otherwise: Option<Box<Expr>>,
    },
    Predicate {
        predicate: Predicate,
    },
}

/// `WHEN <condition> THEN <result>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenThen {
    pub when: Expr,
    pub then: Expr,
}

impl Expr {
    pub fn column(column: ColumnMetadata) -> Self {
        Expr::Column {
            column,
            table_alias: None,
        }
    }

    pub fn literal(value: Literal) -> Self {
        Expr::Literal { value }
    }

    pub fn int(value: i64) -> Self {
        Expr::literal(Literal::ExactNumeric(value.to_string()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::literal(Literal::String(value.into()))
    }

    pub fn null() -> Self {
        Expr::literal(Literal::Null)
    }

    pub fn scalar(function: ScalarFunction, args: Vec<Expr>) -> Self {
        Expr::Scalar { function, args }
    }

    pub fn aggregate(function: AggregateFunction, args: Vec<Expr>) -> Self {
        Expr::Aggregate {
            function,
            args,
            distinct: false,
        }
    }

    pub fn count(arg: Expr) -> Self {
        Expr::aggregate(AggregateFunction::Count, vec![arg])
    }

    pub fn count_star() -> Self {
        Expr::aggregate(AggregateFunction::Count, Vec::new())
    }

    pub fn cast(expr: Expr, data_type: DataType) -> Self {
        Expr::Cast {
            expr: Box::new(expr),
            data_type,
        }
    }

    pub fn compare(op: CompareOp, left: Expr, right: Expr) -> Self {
        Predicate::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
        .into()
    }

    pub fn lt(left: Expr, right: Expr) -> Self {
        Expr::compare(CompareOp::Less, left, right)
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Expr::compare(CompareOp::Equal, left, right)
    }

    pub fn and(exprs: Vec<Expr>) -> Self {
        Predicate::And { operands: exprs }.into()
    }

    pub fn or(exprs: Vec<Expr>) -> Self {
        Predicate::Or { operands: exprs }.into()
    }

    pub fn not(expr: Expr) -> Self {
        Predicate::Not {
            expr: Box::new(expr),
        }
        .into()
    }

    pub fn is_null(expr: Expr) -> Self {
        Predicate::IsNull {
            expr: Box::new(expr),
        }
        .into()
    }

    pub fn is_not_null(expr: Expr) -> Self {
        Predicate::IsNotNull {
            expr: Box::new(expr),
        }
        .into()
    }

    /// Short name of the node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Column { .. } => "column",
            Expr::Literal { .. } => "literal",
            Expr::Scalar { .. } => "scalar function",
            Expr::Aggregate { .. } => "aggregate function",
            Expr::GroupConcat { .. } => "GROUP_CONCAT",
            Expr::Cast { .. } => "CAST",
            Expr::Extract { .. } => "EXTRACT",
            Expr::Case { .. } => "CASE",
            Expr::Predicate { .. } => "predicate",
        }
    }
}

impl From<ColumnMetadata> for Expr {
    fn from(column: ColumnMetadata) -> Self {
        Expr::column(column)
    }
}

impl From<Literal> for Expr {
    fn from(value: Literal) -> Self {
        Expr::literal(value)
    }
}

impl From<Predicate> for Expr {
    fn from(predicate: Predicate) -> Self {
        Expr::Predicate { predicate }
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Null,
    Bool(bool),
    /// Exact numeric in its decimal text form, e.g. `-12.50`.
    ExactNumeric(String),
    Double(f64),
    String(String),
    /// `YYYY-MM-DD`.
    Date(String),
    /// `YYYY-MM-DD HH:MM:SS[.fff]`.
    Timestamp(String),
    TimestampUtc(String),
    IntervalYearToMonth { value: String, precision: u32 },
    IntervalDayToSecond {
        value: String,
        precision: u32,
        fraction: u32,
    },
}

impl Literal {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Literal::ExactNumeric(_) | Literal::Double(_))
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
}

impl CompareOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::NotEqual => "!=",
            CompareOp::Less => "<",
            CompareOp::LessEqual => "<=",
        }
    }
}

/// Boolean-valued nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    And {
        operands: Vec<Expr>,
    },
    Or {
        operands: Vec<Expr>,
    },
    Not {
        expr: Box<Expr>,
    },
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        escape: Option<Box<Expr>>,
    },
    RegexpLike {
        expr: Box<Expr>,
        pattern: Box<Expr>,
    },
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
    },
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
    },
    IsNull {
        expr: Box<Expr>,
    },
    IsNotNull {
        expr: Box<Expr>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Charset, ColumnAdapterNotes};

    fn column(name: &str) -> ColumnMetadata {
        ColumnMetadata::new(
            name,
            DataType::varchar(10, Charset::Utf8),
            ColumnAdapterNotes::new(12, "VARCHAR"),
        )
    }

    #[test]
    fn test_result_width() {
        let table = TableMetadata::new("T", vec![column("A"), column("B"), column("C")]);
        let all = Select::new(SelectList::All, TableRef::new(table.clone()));
        assert_eq!(all.result_width(), 3);
        let any_column = Select::new(SelectList::AnyColumn, TableRef::new(table.clone()));
        assert_eq!(any_column.result_width(), 1);
        let list = Select::new(
            SelectList::Expressions(vec![Expr::column(column("A"))]),
            TableRef::new(table),
        );
        assert_eq!(list.result_width(), 1);
    }

    #[test]
    fn test_statement_from_json() {
        let json = r#"{
            "type": "select",
            "selectList": {"kind": "all"},
            "from": {"table": {"name": "T"}},
            "filter": {"type": "predicate", "predicate": {"kind": "compare", "op": "LESS",
                "left": {"type": "literal", "value": {"kind": "exact_numeric", "value": "1"}},
                "right": {"type": "literal", "value": {"kind": "double", "value": 2.5}}}},
            "groupBy": [{"type": "predicate", "predicate": {"kind": "is_null",
                "expr": {"type": "literal", "value": {"kind": "null"}}}}],
            "limit": {"count": 5, "offset": 2}
        }"#;
        let Statement::Select(select) = serde_json::from_str::<Statement>(json).unwrap();
        assert_eq!(select.select_list, SelectList::All);
        assert_eq!(select.limit, Some(Limit { count: 5, offset: Some(2) }));
        assert!(matches!(
            select.filter,
            Some(Expr::Predicate { predicate: Predicate::Compare { op: CompareOp::Less, .. } })
        ));
    }
}
