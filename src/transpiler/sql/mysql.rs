//! MySQL generator.

use crate::ast::{ScalarFunction, ScalarFunction as F};
use crate::config::AdapterProperties;
use crate::dialect::capabilities::{
    AggregateCapability as Agg, LiteralCapability as Lit, PredicateCapability as Pred,
};
use crate::dialect::{Capabilities, DialectDescriptor, NullOrdering, NullSorting};
use crate::error::VsResult;
use crate::identifier::{IdentifierConverter, QuoteStyle};
use crate::metadata::{Charset, DataType, NativeTypeDescriptor};
use crate::transpiler::function_mapper::{FunctionMapper, expect_args};
use crate::transpiler::traits::SqlGenerator;
use crate::types::{BinaryColumnHandling, TypeMapper, jdbc, map_base, varchar_of_size};

use super::{MAIN_FULL, keywords};

/// `TEXT` columns report no usable size.
const TEXT_TYPE_NAME: &str = "TEXT";
const TEXT_TYPE_SIZE: i32 = 65535;

const SCALAR_FUNCTIONS: &[ScalarFunction] = &[
    F::Abs, F::Acos, F::Asin, F::Atan, F::Atan2, F::Ceil, F::Cos, F::Cot, F::Degrees, F::Div,
    F::Exp, F::Floor, F::Ln, F::Log, F::Mod, F::Power, F::Radians, F::Rand, F::Round, F::Sign,
    F::Sin, F::Sqrt, F::Tan, F::Ascii, F::BitLength, F::Concat, F::Insert, F::Instr, F::Length,
    F::Locate, F::Lower, F::Lpad, F::Ltrim, F::OctetLength, F::RegexpInstr, F::RegexpReplace,
    F::RegexpSubstr, F::Repeat, F::Replace, F::Reverse, F::Right, F::Rpad, F::Rtrim, F::Soundex,
    F::Space, F::Substr, F::Trim, F::Upper, F::AddDays, F::AddHours, F::AddMinutes, F::AddMonths,
    F::AddSeconds, F::AddWeeks, F::AddYears, F::ConvertTz, F::CurrentDate, F::CurrentTimestamp,
    F::Extract, F::Localtimestamp, F::Minute, F::Month, F::Second, F::Sysdate, F::Systimestamp,
    F::Week, F::Year, F::StX, F::StY, F::StArea, F::StDistance, F::StIntersects, F::StTouches,
    F::StUnion, F::StWithin, F::Cast, F::BitAnd, F::BitOr, F::BitXor, F::Case, F::CurrentUser,
];

pub struct MysqlGenerator {
    descriptor: DialectDescriptor,
    identifiers: IdentifierConverter,
    types: MysqlTypeMapper,
}

impl MysqlGenerator {
    pub fn new(properties: &AdapterProperties) -> VsResult<Self> {
        let capabilities = Capabilities::builder()
            .main(MAIN_FULL)
            .literals(&[
                Lit::Null,
                Lit::Bool,
                Lit::Date,
                Lit::Timestamp,
                Lit::TimestampUtc,
                Lit::Double,
                Lit::ExactNumeric,
                Lit::String,
                Lit::Interval,
            ])
            .predicates(&[
                Pred::And,
                Pred::Or,
                Pred::Not,
                Pred::Equal,
                Pred::NotEqual,
                Pred::Less,
                Pred::LessEqual,
                Pred::Like,
                Pred::Between,
                Pred::IsNull,
                Pred::IsNotNull,
            ])
            .scalar_functions(SCALAR_FUNCTIONS)
            .aggregates(&[
                Agg::Count,
                Agg::Sum,
                Agg::Min,
                Agg::Max,
                Agg::Avg,
                Agg::Stddev,
                Agg::StddevPop,
                Agg::StddevSamp,
                Agg::Variance,
                Agg::VarPop,
                Agg::VarSamp,
            ])
            .build();
        let descriptor = DialectDescriptor::new("MYSQL", capabilities)
            .null_sorting(NullSorting::Low)
            .qualification(true, false)
            .null_ordering(NullOrdering::Emulated)
            .functions(FunctionMapper::new().transform(F::Div, |args| {
                expect_args(F::Div, args, 2..=2)?;
                Ok(format!("{} DIV {}", args[0], args[1]))
            }))
            .excluding(properties)?;
        Ok(Self {
            descriptor,
            identifiers: IdentifierConverter::case_sensitive(QuoteStyle::Backtick).with_reserved_words(keywords::MYSQL),
            types: MysqlTypeMapper {
                binary_handling: properties.binary_column_handling()?,
            },
        })
    }
}

impl SqlGenerator for MysqlGenerator {
    fn descriptor(&self) -> &DialectDescriptor {
        &self.descriptor
    }

    fn identifiers(&self) -> &IdentifierConverter {
        &self.identifiers
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        &self.types
    }

    // Assumes the server does not run with NO_BACKSLASH_ESCAPES.
    fn string_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MysqlTypeMapper {
    binary_handling: BinaryColumnHandling,
}

impl MysqlTypeMapper {
    fn map_long_varchar(descriptor: &NativeTypeDescriptor) -> DataType {
        let size = if descriptor.type_name.eq_ignore_ascii_case(TEXT_TYPE_NAME) {
            TEXT_TYPE_SIZE
        } else {
            descriptor.precision_or_size
        };
        let charset = if descriptor.byte_size == size {
            Charset::Ascii
        } else {
            Charset::Utf8
        };
        varchar_of_size(size, charset)
    }
}

impl TypeMapper for MysqlTypeMapper {
    fn map(&self, descriptor: &NativeTypeDescriptor) -> DataType {
        match descriptor.jdbc_type {
            jdbc::TIME => DataType::timestamp(),
            jdbc::BINARY => DataType::Unsupported,
            jdbc::LONGVARCHAR => Self::map_long_varchar(descriptor),
            _ => map_base(descriptor, self.binary_handling),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, OrderByItem, SelectList};
    use crate::transpiler::sql::fixtures::{column, render, select};

    fn generator() -> MysqlGenerator {
        MysqlGenerator::new(&AdapterProperties::new()).unwrap()
    }

    #[test]
    fn test_backslashes_escaped_before_quotes() {
        let generator = generator();
        assert_eq!(generator.string_literal("i'm"), "'i''m'");
        assert_eq!(generator.string_literal("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn test_emulated_nulls_first_on_descending() {
        let c = column("c1", jdbc::INTEGER, "INT");
        let query = select(SelectList::Expressions(vec![Expr::column(c.clone())]), vec![])
            .order_by(vec![OrderByItem::desc(c).nulls_first()])
            .limit_offset(10, 2);
        assert_eq!(
            render(&generator(), query),
            "SELECT c1 FROM T ORDER BY (CASE WHEN c1 IS NULL THEN 0 ELSE 1 END), c1 DESC LIMIT 10 OFFSET 2"
        );
    }

    #[test]
    fn test_backtick_quoting() {
        let c = column("my col", jdbc::VARCHAR, "VARCHAR");
        let query = select(SelectList::Expressions(vec![Expr::column(c)]), vec![]);
        assert_eq!(render(&generator(), query), "SELECT `my col` FROM T");
    }

    #[test]
    fn test_div() {
        let query = select(
            SelectList::Expressions(vec![Expr::scalar(F::Div, vec![Expr::int(7), Expr::int(2)])]),
            vec![],
        );
        assert_eq!(render(&generator(), query), "SELECT 7 DIV 2 FROM T");
    }

    #[test]
    fn test_type_mapping() {
        let mapper = generator();
        let map = |d: NativeTypeDescriptor| mapper.type_mapper().map(&d);
        assert_eq!(map(NativeTypeDescriptor::new(jdbc::TIME, "TIME")), DataType::timestamp());
        assert_eq!(map(NativeTypeDescriptor::new(jdbc::BINARY, "BINARY")), DataType::Unsupported);
        assert_eq!(
            map(NativeTypeDescriptor::new(jdbc::LONGVARCHAR, "TEXT").with_byte_size(65535)),
            DataType::varchar(65535, Charset::Ascii)
        );
        assert_eq!(
            map(NativeTypeDescriptor::new(jdbc::LONGVARCHAR, "MEDIUMTEXT").with_precision(16_777_215, 0)),
            DataType::varchar(2_000_000, Charset::Utf8)
        );
    }
}
