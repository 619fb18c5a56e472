//! Google BigQuery generator.
//!
//! Identifiers are quoted with backticks escaped by backslash, and string literals use
//! backslash escapes as well.

use crate::ast::{AggregateFunction, ScalarFunction, ScalarFunction as F};
use crate::config::AdapterProperties;
use crate::dialect::capabilities::{
    AggregateCapability as Agg, LiteralCapability as Lit, MainCapability as Main, PredicateCapability as Pred,
};
use crate::dialect::{Capabilities, DialectDescriptor, NullSorting};
use crate::error::VsResult;
use crate::identifier::{IdentifierConverter, QuoteStyle};
use crate::metadata::{Charset, DataType, NativeTypeDescriptor};
use crate::transpiler::function_mapper::FunctionMapper;
use crate::transpiler::traits::{SqlGenerator, quote_backslash};
use crate::types::{BinaryColumnHandling, TypeMapper, jdbc, map_base};

use super::keywords;

const SCALAR_FUNCTIONS: &[ScalarFunction] = &[
    F::Abs, F::Acos, F::Asin, F::Atan, F::Atan2, F::Ceil, F::Cos, F::Cosh, F::Degrees, F::Div,
    F::Exp, F::Floor, F::Ln, F::Log, F::Mod, F::Power, F::Rand, F::Round, F::Sign, F::Sin, F::Sinh,
    F::Sqrt, F::Tan, F::Tanh, F::Trunc, F::ColognePhonetic, F::Concat, F::Insert, F::Instr,
    F::Length, F::Lower, F::Lpad, F::Ltrim, F::RegexpReplace, F::Repeat, F::Replace, F::Reverse,
    F::Right, F::Rpad, F::Rtrim, F::Soundex, F::Space, F::Substr, F::Trim, F::Upper,
    F::CurrentDate, F::CurrentTimestamp, F::DateTrunc, F::Day, F::Extract, F::Minute, F::Month,
    F::Second, F::Week, F::Year, F::StX, F::StY, F::StArea, F::StDistance, F::StIntersects,
    F::StTouches, F::StUnion, F::StWithin, F::Cast, F::ToTimestamp, F::BitAnd, F::BitOr, F::BitXor,
    F::Case, F::HashMd5,
];

/// Width of the text a `TIME` value is delivered as.
const TIME_AS_VARCHAR_SIZE: u32 = 30;

pub struct BigQueryGenerator {
    descriptor: DialectDescriptor,
    identifiers: IdentifierConverter,
    types: BigQueryTypeMapper,
}

impl BigQueryGenerator {
    pub fn new(properties: &AdapterProperties) -> VsResult<Self> {
        let capabilities = Capabilities::builder()
            .main(&[
                Main::SelectlistProjection,
                Main::SelectlistExpressions,
                Main::FilterExpressions,
                Main::AggregateSingleGroup,
                Main::AggregateGroupByColumn,
                Main::AggregateGroupByTuple,
                Main::AggregateHaving,
                Main::OrderByExpression,
                Main::Limit,
                Main::LimitWithOffset,
            ])
            .literals(&[Lit::Null, Lit::Bool, Lit::Date, Lit::Timestamp, Lit::ExactNumeric, Lit::String])
            .predicates(&[
                Pred::And,
                Pred::Or,
                Pred::Not,
                Pred::Equal,
                Pred::NotEqual,
                Pred::Less,
                Pred::LessEqual,
                Pred::Like,
                Pred::RegexpLike,
                Pred::Between,
                Pred::InConstList,
                Pred::IsNull,
                Pred::IsNotNull,
            ])
            .scalar_functions(SCALAR_FUNCTIONS)
            .aggregates(&[
                Agg::Count,
                Agg::CountStar,
                Agg::CountDistinct,
                Agg::Sum,
                Agg::SumDistinct,
                Agg::Min,
                Agg::Max,
                Agg::Avg,
                Agg::AvgDistinct,
                Agg::FirstValue,
                Agg::LastValue,
                Agg::Stddev,
                Agg::StddevDistinct,
                Agg::StddevPop,
                Agg::StddevPopDistinct,
                Agg::StddevSamp,
                Agg::StddevSampDistinct,
                Agg::Variance,
                Agg::VarianceDistinct,
                Agg::VarPop,
                Agg::VarPopDistinct,
                Agg::VarSamp,
                Agg::VarSampDistinct,
                Agg::GroupConcat,
                Agg::ApproximateCountDistinct,
            ])
            .build();
        let descriptor = DialectDescriptor::new("BIGQUERY", capabilities)
            .null_sorting(NullSorting::AtEnd)
            .qualification(true, true)
            .functions(FunctionMapper::new().rename(F::HashMd5, "MD5"))
            .aggregate_alias(AggregateFunction::ApproximateCountDistinct, "APPROX_COUNT_DISTINCT")
            .excluding(properties)?;
        Ok(Self {
            descriptor,
            identifiers: IdentifierConverter::case_sensitive(QuoteStyle::BacktickBackslash)
                .with_reserved_words(keywords::BIGQUERY),
            types: BigQueryTypeMapper {
                binary_handling: properties.binary_column_handling()?,
            },
        })
    }
}

impl SqlGenerator for BigQueryGenerator {
    fn descriptor(&self) -> &DialectDescriptor {
        &self.descriptor
    }

    fn identifiers(&self) -> &IdentifierConverter {
        &self.identifiers
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        &self.types
    }

    fn string_literal(&self, value: &str) -> String {
        quote_backslash(value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BigQueryTypeMapper {
    binary_handling: BinaryColumnHandling,
}

impl TypeMapper for BigQueryTypeMapper {
    fn map(&self, descriptor: &NativeTypeDescriptor) -> DataType {
        match descriptor.jdbc_type {
            jdbc::TIME => DataType::varchar(TIME_AS_VARCHAR_SIZE, Charset::Utf8),
            _ => map_base(descriptor, self.binary_handling),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, OrderByItem, SelectList};
    use crate::transpiler::RenderContext;
    use crate::transpiler::ToSql;
    use crate::transpiler::sql::fixtures::{column, select};

    fn generator() -> BigQueryGenerator {
        BigQueryGenerator::new(&AdapterProperties::new()).unwrap()
    }

    #[test]
    fn test_qualified_backslash_quoting() {
        let c = column("my`col", jdbc::VARCHAR, "STRING");
        let query = select(SelectList::Expressions(vec![Expr::column(c.clone())]), vec![])
            .filter(Expr::eq(Expr::column(c), Expr::string("it's")));
        let statement: crate::ast::Statement = query.into();
        let context = RenderContext::new().catalog("project-1").schema("dataset");
        assert_eq!(
            statement.to_sql(&generator(), &context).unwrap(),
            "SELECT `my\\`col` FROM `project-1`.dataset.T WHERE `my\\`col` = 'it\\'s'"
        );
    }

    #[test]
    fn test_native_null_ordering() {
        let c = column("c", jdbc::INTEGER, "INT64");
        let query = select(SelectList::Expressions(vec![Expr::column(c.clone())]), vec![])
            .order_by(vec![OrderByItem::asc(c.clone()).nulls_first(), OrderByItem::desc(c).nulls_last()])
            .limit_offset(5, 5);
        let statement: crate::ast::Statement = query.into();
        assert_eq!(
            statement.to_sql(&generator(), &RenderContext::new()).unwrap(),
            "SELECT c FROM T ORDER BY c NULLS FIRST, c DESC LIMIT 5 OFFSET 5"
        );
    }

    #[test]
    fn test_aliases() {
        let c = Expr::column(column("c", jdbc::VARCHAR, "STRING"));
        let query = select(
            SelectList::Expressions(vec![
                Expr::scalar(F::HashMd5, vec![c.clone()]),
                Expr::aggregate(AggregateFunction::ApproximateCountDistinct, vec![c]),
            ]),
            vec![],
        );
        let statement: crate::ast::Statement = query.into();
        assert_eq!(
            statement.to_sql(&generator(), &RenderContext::new()).unwrap(),
            "SELECT MD5(c), APPROX_COUNT_DISTINCT(c) FROM T"
        );
    }

    #[test]
    fn test_time_maps_to_varchar() {
        let generator = generator();
        assert_eq!(
            generator.type_mapper().map(&NativeTypeDescriptor::new(jdbc::TIME, "TIME")),
            DataType::varchar(30, Charset::Utf8)
        );
    }
}
