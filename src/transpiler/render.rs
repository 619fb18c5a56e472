//! Statement rendering shared by every dialect.
//!
//! The renderer walks the query tree top-down. Whether a node sits directly in the select
//! list is passed down as a [`Position`], so dialects can wrap projected columns, literals
//! and functions without the tree carrying parent links.

use crate::ast::*;
use crate::config::AdapterProperties;
use crate::dialect::{LimitStyle, NullOrdering, NullSorting};
use crate::error::{VsError, VsResult};
use crate::metadata::{ColumnMetadata, SchemaAdapterNotes};

use super::traits::{GroupConcatCall, OrderKey, SqlGenerator};

/// Per-query values the rendered SQL depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    /// Null sorting reported by the foreign database, overriding the dialect default.
    pub null_sorting: Option<NullSorting>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog and schema from `CATALOG_NAME` and `SCHEMA_NAME`.
    pub fn from_properties(properties: &AdapterProperties) -> Self {
        Self {
            catalog: properties.catalog_name().map(str::to_string),
            schema: properties.schema_name().map(str::to_string),
            null_sorting: None,
        }
    }

    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_schema_notes(mut self, notes: &SchemaAdapterNotes) -> Self {
        self.null_sorting = Some(notes.null_sorting());
        self
    }
}

/// Where an expression sits relative to the select list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// A top-level select list item.
    SelectList,
    /// Anywhere else, including inside a select list item.
    Nested,
}

/// Renders statements for one dialect.
pub struct Renderer<'a> {
    generator: &'a dyn SqlGenerator,
    context: &'a RenderContext,
}

impl<'a> Renderer<'a> {
    pub fn new(generator: &'a dyn SqlGenerator, context: &'a RenderContext) -> Self {
        Self { generator, context }
    }

    pub fn render(&self, statement: &Statement) -> VsResult<String> {
        match statement {
            Statement::Select(select) => self.select(select),
        }
    }

    fn dialect(&self) -> &'static str {
        self.generator.descriptor().name
    }

    fn select(&self, select: &Select) -> VsResult<String> {
        match (self.generator.descriptor().limit_style, select.limit) {
            (LimitStyle::RowNum, Some(limit)) => self.rownum_select(select, limit),
            _ => self.select_body(select, false),
        }
    }

    /// Oracle-style limit: filter on ROWNUM around the unlimited query.
    fn rownum_select(&self, select: &Select, limit: Limit) -> VsResult<String> {
        let offset = limit.offset.unwrap_or(0);
        if offset == 0 {
            let inner = self.select_body(select, false)?;
            return Ok(format!(
                "SELECT LIMIT_SUBSELECT.* FROM ( {} ) LIMIT_SUBSELECT WHERE ROWNUM <= {}",
                inner, limit.count
            ));
        }
        // ROWNUM_SUB must not leak into the result, so the outer list names every column.
        let width = select.result_width();
        if width == 0 {
            return Err(VsError::unsupported("LIMIT with OFFSET over a table without columns", self.dialect()));
        }
        let Some(last_row) = limit.count.checked_add(offset) else {
            return Err(VsError::Generation(format!(
                "LIMIT {} with OFFSET {} exceeds the largest row number",
                limit.count, offset
            )));
        };
        let inner = self.select_body(select, true)?;
        let columns: Vec<String> = (0..width).map(|i| format!("c{}", i)).collect();
        Ok(format!(
            "SELECT {} FROM ( SELECT LIMIT_SUBSELECT.*, ROWNUM ROWNUM_SUB FROM ( {} ) LIMIT_SUBSELECT WHERE ROWNUM <= {} ) WHERE ROWNUM_SUB > {}",
            columns.join(", "),
            inner,
            last_row,
            offset
        ))
    }

    fn select_body(&self, select: &Select, aliased: bool) -> VsResult<String> {
        let descriptor = self.generator.descriptor();
        let mut sql = String::from("SELECT ");

        if let (LimitStyle::TopPrefix, Some(limit)) = (descriptor.limit_style, select.limit) {
            if limit.offset.unwrap_or(0) != 0 {
                return Err(VsError::unsupported("LIMIT with OFFSET", descriptor.name));
            }
            sql.push_str(&format!("TOP {} ", limit.count));
        }

        sql.push_str(&self.select_list(select, aliased)?);
        sql.push_str(" FROM ");
        sql.push_str(&self.table(&select.from));

        if let Some(filter) = &select.filter {
            sql.push_str(" WHERE ");
            sql.push_str(&self.nested(filter)?);
        }
        if let Some(group_by) = &select.group_by {
            if group_by.is_empty() {
                return Err(VsError::Generation("GROUP BY without expressions".to_string()));
            }
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.list(group_by)?);
        }
        if let Some(having) = &select.having {
            sql.push_str(" HAVING ");
            sql.push_str(&self.nested(having)?);
        }
        if let Some(items) = select.order_by.as_deref().filter(|items| !items.is_empty()) {
            sql.push(' ');
            sql.push_str(&self.order_by(items)?);
        }

        if let Some(limit) = select.limit {
            let offset = limit.offset.unwrap_or(0);
            match descriptor.limit_style {
                LimitStyle::Suffix => {
                    sql.push_str(&format!(" LIMIT {}", limit.count));
                    if offset != 0 {
                        sql.push_str(&format!(" OFFSET {}", offset));
                    }
                }
                LimitStyle::FetchFirst => {
                    if offset != 0 {
                        sql.push_str(&format!(" OFFSET {} ROWS", offset));
                    }
                    sql.push_str(&format!(" FETCH FIRST {} ROWS ONLY", limit.count));
                }
                LimitStyle::TopPrefix | LimitStyle::RowNum => {}
            }
        }
        Ok(sql)
    }

    fn select_list(&self, select: &Select, aliased: bool) -> VsResult<String> {
        let items: Vec<String> = match &select.select_list {
            SelectList::AnyColumn => vec![self.generator.any_column().to_string()],
            SelectList::All => {
                let columns = &select.from.table.columns;
                let expand = aliased || columns.iter().any(|c| self.generator.requires_cast(c));
                if expand && !columns.is_empty() {
                    columns
                        .iter()
                        .map(|c| self.column(c, Position::SelectList))
                        .collect()
                } else {
                    vec!["*".to_string()]
                }
            }
            SelectList::Expressions(exprs) => exprs
                .iter()
                .map(|e| self.expr(e, Position::SelectList))
                .collect::<VsResult<_>>()?,
        };
        if aliased {
            let aliased: Vec<String> = items
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{} AS c{}", item, i))
                .collect();
            return Ok(aliased.join(", "));
        }
        Ok(items.join(", "))
    }

    fn table(&self, from: &TableRef) -> String {
        let descriptor = self.generator.descriptor();
        let mut sql = String::new();
        let qualifiers = [
            (descriptor.requires_catalog_qualified_tables, &self.context.catalog),
            (descriptor.requires_schema_qualified_tables, &self.context.schema),
        ];
        for (required, name) in qualifiers {
            if let Some(name) = name.as_deref().filter(|n| required && !n.is_empty()) {
                sql.push_str(&self.generator.quote_identifier(name));
                sql.push('.');
            }
        }
        sql.push_str(&self.generator.quote_identifier(from.name()));
        sql
    }

    fn column(&self, column: &ColumnMetadata, position: Position) -> String {
        let rendered = self.generator.quote_identifier(&column.name);
        match position {
            Position::SelectList => self.generator.project_column(column, rendered),
            Position::Nested => rendered,
        }
    }

    fn nested(&self, expr: &Expr) -> VsResult<String> {
        self.expr(expr, Position::Nested)
    }

    fn list(&self, exprs: &[Expr]) -> VsResult<String> {
        let rendered = exprs.iter().map(|e| self.nested(e)).collect::<VsResult<Vec<_>>>()?;
        Ok(rendered.join(", "))
    }

    /// Render one expression at `position`.
    pub fn expr(&self, expr: &Expr, position: Position) -> VsResult<String> {
        let projected = position == Position::SelectList;
        match expr {
            Expr::Column { column, .. } => Ok(self.column(column, position)),
            Expr::Literal { value } => {
                let rendered = self.literal(value)?;
                Ok(if projected {
                    self.generator.project_literal(value, rendered)
                } else {
                    rendered
                })
            }
            Expr::Scalar { function, args } => {
                let rendered = self.scalar(*function, args)?;
                Ok(if projected {
                    self.generator.project_scalar(*function, rendered)
                } else {
                    rendered
                })
            }
            Expr::Aggregate {
                function,
                args,
                distinct,
            } => {
                let rendered = self.aggregate(*function, args, *distinct)?;
                Ok(if projected {
                    self.generator.project_aggregate(*function, rendered)
                } else {
                    rendered
                })
            }
            Expr::GroupConcat {
                arg,
                distinct,
                separator,
                order_by,
            } => {
                let rendered = self.group_concat(arg, *distinct, separator.clone(), order_by)?;
                Ok(if projected {
                    self.generator
                        .project_aggregate(AggregateFunction::GroupConcat, rendered)
                } else {
                    rendered
                })
            }
            Expr::Cast { expr, data_type } => {
                Ok(format!("CAST({} AS {})", self.nested(expr)?, data_type))
            }
            Expr::Extract { part, expr } => {
                Ok(format!("EXTRACT({} FROM {})", part, self.nested(expr)?))
            }
            Expr::Case {
                basis,
                branches,
                otherwise,
            } => self.case(basis.as_deref(), branches, otherwise.as_deref()),
            Expr::Predicate { predicate } => self.predicate(predicate),
        }
    }

    fn literal(&self, literal: &Literal) -> VsResult<String> {
        let quoted = |value: &str| self.generator.string_literal(value);
        Ok(match literal {
            Literal::Null => "NULL".to_string(),
            Literal::Bool(value) => self.generator.bool_literal(*value),
            Literal::ExactNumeric(value) => value.clone(),
            Literal::Double(value) if !value.is_finite() => {
                return Err(VsError::Generation(format!("Cannot render double literal {}", value)));
            }
            Literal::Double(value) => format!("{:?}", value),
            Literal::String(value) => quoted(value),
            Literal::Date(value) => format!("DATE {}", quoted(value)),
            Literal::Timestamp(value) | Literal::TimestampUtc(value) => {
                format!("TIMESTAMP {}", quoted(value))
            }
            Literal::IntervalYearToMonth { value, precision } => {
                format!("INTERVAL {} YEAR ({}) TO MONTH", quoted(value), precision)
            }
            Literal::IntervalDayToSecond {
                value,
                precision,
                fraction,
            } => format!(
                "INTERVAL {} DAY ({}) TO SECOND ({})",
                quoted(value),
                precision,
                fraction
            ),
        })
    }

    fn scalar(&self, function: ScalarFunction, args: &[Expr]) -> VsResult<String> {
        if matches!(
            function,
            ScalarFunction::Case | ScalarFunction::Cast | ScalarFunction::Extract
        ) {
            return Err(VsError::Generation(format!(
                "{} must be given as its own node kind, not as a scalar call",
                function
            )));
        }
        let rendered = args.iter().map(|a| self.nested(a)).collect::<VsResult<Vec<_>>>()?;
        if let Some(result) = self.generator.scalar_call(function, args, &rendered) {
            return result;
        }
        let descriptor = self.generator.descriptor();
        if let Some(result) = descriptor.functions.translate(function, &rendered) {
            return result;
        }

        // An alias overrides the infix spelling.
        let name = match descriptor.functions.alias(function) {
            Some(alias) => alias,
            None => {
                if let Some(operator) = function.infix_operator() {
                    if rendered.len() != 2 {
                        return Err(VsError::arity(function, "2", rendered.len()));
                    }
                    return Ok(format!("({} {} {})", rendered[0], operator, rendered[1]));
                }
                if function == ScalarFunction::Neg {
                    if rendered.len() != 1 {
                        return Err(VsError::arity(function, "1", rendered.len()));
                    }
                    return Ok(format!("(-{})", rendered[0]));
                }
                function.name()
            }
        };
        if rendered.is_empty() && descriptor.omit_parentheses.contains(&function) {
            return Ok(name.to_string());
        }
        Ok(format!("{}({})", name, rendered.join(", ")))
    }

    fn aggregate(&self, function: AggregateFunction, args: &[Expr], distinct: bool) -> VsResult<String> {
        if function == AggregateFunction::GroupConcat {
            return match args {
                [arg] => self.group_concat(arg, distinct, None, &[]),
                _ => Err(VsError::arity(function, "1", args.len())),
            };
        }
        let mut rendered = args.iter().map(|a| self.nested(a)).collect::<VsResult<Vec<_>>>()?;
        if function == AggregateFunction::Count && rendered.is_empty() {
            rendered.push("*".to_string());
        }
        let name = self
            .generator
            .descriptor()
            .aggregate_aliases
            .get(&function)
            .copied()
            .unwrap_or_else(|| function.name());
        let distinct = if distinct { "DISTINCT " } else { "" };
        Ok(format!("{}({}{})", name, distinct, rendered.join(", ")))
    }

    fn group_concat(
        &self,
        arg: &Expr,
        distinct: bool,
        separator: Option<String>,
        order_by: &[OrderByItem],
    ) -> VsResult<String> {
        let keys = order_by
            .iter()
            .map(|item| {
                Ok(OrderKey {
                    expr: self.nested(&item.expr)?,
                    ascending: item.ascending,
                    nulls_last: item.nulls_last,
                })
            })
            .collect::<VsResult<Vec<_>>>()?;
        let order_by = if order_by.is_empty() {
            None
        } else {
            Some(self.order_by(order_by)?)
        };
        self.generator.group_concat(GroupConcatCall {
            arg: self.nested(arg)?,
            distinct,
            separator,
            order_by,
            keys,
        })
    }

    fn case(&self, basis: Option<&Expr>, branches: &[WhenThen], otherwise: Option<&Expr>) -> VsResult<String> {
        let mut sql = String::from("CASE");
        if let Some(basis) = basis {
            sql.push(' ');
            sql.push_str(&self.nested(basis)?);
        }
        for branch in branches {
            sql.push_str(&format!(
                " WHEN {} THEN {}",
                self.nested(&branch.when)?,
                self.nested(&branch.then)?
            ));
        }
        if let Some(otherwise) = otherwise {
            sql.push_str(" ELSE ");
            sql.push_str(&self.nested(otherwise)?);
        }
        sql.push_str(" END");
        Ok(sql)
    }

    /// `ORDER BY ...`, making the null placement explicit only where it differs from the
    /// foreign default.
    fn order_by(&self, items: &[OrderByItem]) -> VsResult<String> {
        let descriptor = self.generator.descriptor();
        let sorting = self.context.null_sorting.unwrap_or(descriptor.null_sorting);
        let mut keys = Vec::with_capacity(items.len());
        for item in items {
            let expr = self.nested(&item.expr)?;
            let explicit = item.nulls_last != sorting.nulls_at_end_by_default(item.ascending);
            let direction = if item.ascending { "" } else { " DESC" };
            match descriptor.null_ordering {
                NullOrdering::Native => {
                    let placement = match (explicit, item.nulls_last) {
                        (false, _) => "",
                        (true, true) => " NULLS LAST",
                        (true, false) => " NULLS FIRST",
                    };
                    keys.push(format!("{}{}{}", expr, direction, placement));
                }
                NullOrdering::Emulated => {
                    if explicit {
                        // The tie-breaker always sorts ascending: 0 rows first, 1 rows last.
                        let (null_rank, value_rank) = if item.nulls_last { (1, 0) } else { (0, 1) };
                        keys.push(format!(
                            "(CASE WHEN {} IS NULL THEN {} ELSE {} END)",
                            expr, null_rank, value_rank
                        ));
                    }
                    keys.push(format!("{}{}", expr, direction));
                }
            }
        }
        Ok(format!("ORDER BY {}", keys.join(", ")))
    }

    fn predicate(&self, predicate: &Predicate) -> VsResult<String> {
        match predicate {
            Predicate::And { operands } => self.junction(operands, "AND"),
            Predicate::Or { operands } => self.junction(operands, "OR"),
            Predicate::Not { expr } => Ok(format!("NOT ({})", self.nested(expr)?)),
            Predicate::Compare { op, left, right } => Ok(format!(
                "{} {} {}",
                self.nested(left)?,
                op.as_sql(),
                self.nested(right)?
            )),
            Predicate::Like {
                expr,
                pattern,
                escape,
            } => {
                let mut sql = format!("{} LIKE {}", self.nested(expr)?, self.nested(pattern)?);
                if let Some(escape) = escape {
                    sql.push_str(" ESCAPE ");
                    sql.push_str(&self.nested(escape)?);
                }
                Ok(sql)
            }
            Predicate::RegexpLike { expr, pattern } => Ok(self
                .generator
                .regexp_like(&self.nested(expr)?, &self.nested(pattern)?)),
            Predicate::Between { expr, low, high } => Ok(format!(
                "{} BETWEEN {} AND {}",
                self.nested(expr)?,
                self.nested(low)?,
                self.nested(high)?
            )),
            Predicate::InList { expr, list } => {
                if list.is_empty() {
                    return Err(VsError::Generation("IN with an empty list".to_string()));
                }
                Ok(format!("{} IN ({})", self.nested(expr)?, self.list(list)?))
            }
            Predicate::IsNull { expr } => Ok(format!("{} IS NULL", self.nested(expr)?)),
            Predicate::IsNotNull { expr } => Ok(format!("{} IS NOT NULL", self.nested(expr)?)),
        }
    }

    fn junction(&self, operands: &[Expr], keyword: &str) -> VsResult<String> {
        if operands.is_empty() {
            return Err(VsError::Generation(format!("{} without operands", keyword)));
        }
        let rendered = operands.iter().map(|o| self.nested(o)).collect::<VsResult<Vec<_>>>()?;
        Ok(format!("({})", rendered.join(&format!(" {} ", keyword))))
    }
}
