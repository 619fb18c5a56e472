//! SQL Server (T-SQL) generator.

use crate::ast::{AggregateFunction, ScalarFunction, ScalarFunction as F};
use crate::config::AdapterProperties;
use crate::dialect::capabilities::{AggregateCapability as Agg, LiteralCapability as Lit};
use crate::dialect::{Capabilities, DialectDescriptor, LimitStyle, NullOrdering, NullSorting};
use crate::error::VsResult;
use crate::identifier::{IdentifierConverter, QuoteStyle};
use crate::metadata::{Charset, ColumnMetadata, DataType, NativeTypeDescriptor};
use crate::transpiler::function_mapper::{FunctionMapper, expect_args};
use crate::transpiler::traits::SqlGenerator;
use crate::types::{
    BinaryColumnHandling, TypeMapper, jdbc, map_base, map_numeric_with_double_fallback, varchar_of_size,
};

use super::{MAIN_NO_OFFSET, PREDICATES_FULL, keywords};

/// Largest non-MAX `VARCHAR`.
const MAX_SQLSERVER_VARCHAR_SIZE: u32 = 8000;

const SCALAR_FUNCTIONS: &[ScalarFunction] = &[
    F::Add, F::Sub, F::Mult, F::FloatDiv, F::Neg, F::Abs, F::Acos, F::Asin, F::Atan, F::Atan2,
    F::Ceil, F::Cos, F::Cot, F::Degrees, F::Exp, F::Floor, F::Log, F::Mod, F::Power, F::Radians,
    F::Rand, F::Round, F::Sign, F::Sin, F::Sqrt, F::Tan, F::Trunc, F::Ascii, F::Chr, F::Concat,
    F::Instr, F::Length, F::Locate, F::Lower, F::Lpad, F::Ltrim, F::Repeat, F::Replace, F::Reverse,
    F::Right, F::Rpad, F::Rtrim, F::Soundex, F::Space, F::Substr, F::Trim, F::Unicode, F::Upper,
    F::AddDays, F::AddHours, F::AddMinutes, F::AddMonths, F::AddSeconds, F::AddWeeks, F::AddYears,
    F::SecondsBetween, F::MinutesBetween, F::HoursBetween, F::DaysBetween, F::MonthsBetween,
    F::YearsBetween, F::Day, F::Month, F::Year, F::Sysdate, F::Systimestamp, F::CurrentDate,
    F::CurrentTimestamp, F::StX, F::StY, F::StArea, F::StDistance, F::StIntersects, F::StTouches,
    F::StUnion, F::StWithin, F::BitAnd, F::BitNot, F::BitOr, F::BitXor, F::Case, F::HashMd5,
    F::HashSha, F::HashSha1, F::Nullifzero, F::Zeroifnull,
];

pub struct SqlServerGenerator {
    descriptor: DialectDescriptor,
    identifiers: IdentifierConverter,
    types: SqlServerTypeMapper,
}

impl SqlServerGenerator {
    pub fn new(properties: &AdapterProperties) -> VsResult<Self> {
        let capabilities = Capabilities::builder()
            .main(MAIN_NO_OFFSET)
            .predicates(PREDICATES_FULL)
            .literals(&[
                Lit::Bool,
                Lit::Null,
                Lit::Date,
                Lit::Timestamp,
                Lit::TimestampUtc,
                Lit::Double,
                Lit::ExactNumeric,
                Lit::String,
                Lit::Interval,
            ])
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
                Agg::Median,
                Agg::FirstValue,
                Agg::LastValue,
                Agg::Stddev,
                Agg::StddevDistinct,
                Agg::StddevPop,
                Agg::StddevPopDistinct,
                Agg::Variance,
                Agg::VarianceDistinct,
                Agg::VarPop,
                Agg::VarPopDistinct,
            ])
            .scalar_functions(SCALAR_FUNCTIONS)
            .build();
        let descriptor = DialectDescriptor::new("SQLSERVER", capabilities)
            .null_sorting(NullSorting::Low)
            .qualification(true, true)
            .limit_style(LimitStyle::TopPrefix)
            .null_ordering(NullOrdering::Emulated)
            .functions(function_mapper())
            .aggregate_alias(AggregateFunction::Stddev, "STDEV")
            .aggregate_alias(AggregateFunction::StddevPop, "STDEVP")
            .aggregate_alias(AggregateFunction::Variance, "VAR")
            .aggregate_alias(AggregateFunction::VarPop, "VARP")
            .excluding(properties)?;
        Ok(Self {
            descriptor,
            identifiers: IdentifierConverter::case_sensitive(QuoteStyle::Bracket).with_reserved_words(keywords::SQLSERVER),
            types: SqlServerTypeMapper {
                binary_handling: properties.binary_column_handling()?,
            },
        })
    }
}

fn function_mapper() -> FunctionMapper {
    FunctionMapper::new()
        .rename(F::Atan2, "ATN2")
        .rename(F::Ceil, "CEILING")
        .rename(F::Chr, "CHAR")
        .rename(F::Length, "LEN")
        .rename(F::Locate, "CHARINDEX")
        .rename(F::Repeat, "REPLICATE")
        .rename(F::Substr, "SUBSTRING")
        .transform(F::Instr, |args| {
            expect_args(F::Instr, args, 2..=3)?;
            let mut sql = format!("CHARINDEX({}, {}", args[1], args[0]);
            if let Some(position) = args.get(2) {
                sql.push_str(", ");
                sql.push_str(position);
            }
            sql.push(')');
            Ok(sql)
        })
        .transform(F::Lpad, |args| {
            expect_args(F::Lpad, args, 2..=3)?;
            let pad = args.get(2).map(String::as_str).unwrap_or("' '");
            Ok(format!(
                "RIGHT ( REPLICATE({pad},{len}) + LEFT({s},{len}),{len})",
                pad = pad,
                s = args[0],
                len = args[1]
            ))
        })
        .transform(F::Rpad, |args| {
            expect_args(F::Rpad, args, 2..=3)?;
            let pad = args.get(2).map(String::as_str).unwrap_or("' '");
            Ok(format!(
                "LEFT(RIGHT({s},{len}) + REPLICATE({pad},{len}),{len})",
                pad = pad,
                s = args[0],
                len = args[1]
            ))
        })
        .transform_all(
            &[F::AddDays, F::AddHours, F::AddMinutes, F::AddSeconds, F::AddWeeks, F::AddYears],
            |function, args| {
                expect_args(function, args, 2..=2)?;
                let unit = match function {
                    F::AddWeeks => "WEEK",
                    _ => function.add_unit().unwrap_or("DAY"),
                };
                Ok(format!("DATEADD({},{},{})", unit, args[1], args[0]))
            },
        )
        .transform_all(
            &[
                F::SecondsBetween,
                F::MinutesBetween,
                F::HoursBetween,
                F::DaysBetween,
                F::MonthsBetween,
                F::YearsBetween,
            ],
            |function, args| {
                expect_args(function, args, 2..=2)?;
                let unit = function.between_unit().unwrap_or("DAY");
                Ok(format!("DATEDIFF({},{},{})", unit, args[1], args[0]))
            },
        )
        .transform_all(
            &[F::CurrentDate, F::CurrentTimestamp, F::Sysdate, F::Systimestamp],
            |function, args| {
                expect_args(function, args, 0..=0)?;
                Ok(match function {
                    F::CurrentDate => "CAST(GETDATE() AS DATE)",
                    F::CurrentTimestamp => "GETDATE()",
                    F::Sysdate => "CAST( SYSDATETIME() AS DATE)",
                    _ => "SYSDATETIME()",
                }
                .to_string())
            },
        )
        .transform_all(&[F::StX, F::StY, F::StArea], |function, args| {
            expect_args(function, args, 1..=1)?;
            let method = match function {
                F::StX => "STX",
                F::StY => "STY",
                _ => "STArea()",
            };
            Ok(format!("{}.{}", args[0], method))
        })
        .transform_all(
            &[F::StDistance, F::StIntersects, F::StTouches, F::StWithin],
            |function, args| {
                expect_args(function, args, 2..=2)?;
                let method = match function {
                    F::StDistance => "STDistance",
                    F::StIntersects => "STIntersects",
                    F::StTouches => "STTouches",
                    _ => "STWithin",
                };
                Ok(format!("{}.{}({})", args[0], method, args[1]))
            },
        )
        .transform(F::StUnion, |args| {
            expect_args(F::StUnion, args, 2..=2)?;
            Ok(format!(
                "CAST({}.STUnion({})as VARCHAR({}) )",
                args[0], args[1], MAX_SQLSERVER_VARCHAR_SIZE
            ))
        })
        .transform_all(&[F::BitAnd, F::BitOr, F::BitXor], |function, args| {
            expect_args(function, args, 2..=2)?;
            let operator = match function {
                F::BitAnd => "&",
                F::BitOr => "|",
                _ => "^",
            };
            Ok(format!("{} {} {}", args[0], operator, args[1]))
        })
        .transform(F::BitNot, |args| {
            expect_args(F::BitNot, args, 1..=1)?;
            Ok(format!("~ {}", args[0]))
        })
        .transform_all(&[F::HashMd5, F::HashSha1], |function, args| {
            expect_args(function, args, 1..=1)?;
            let algorithm = if function == F::HashMd5 { "MD5" } else { "SHA1" };
            Ok(format!("CONVERT(Char, HASHBYTES('{}',{}), 2)", algorithm, args[0]))
        })
        .transform(F::Zeroifnull, |args| {
            expect_args(F::Zeroifnull, args, 1..=1)?;
            Ok(format!("ISNULL({},0)", args[0]))
        })
        .transform(F::Nullifzero, |args| {
            expect_args(F::Nullifzero, args, 1..=1)?;
            Ok(format!("NULLIF({}, 0)", args[0]))
        })
}

impl SqlGenerator for SqlServerGenerator {
    fn descriptor(&self) -> &DialectDescriptor {
        &self.descriptor
    }

    fn identifiers(&self) -> &IdentifierConverter {
        &self.identifiers
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        &self.types
    }

    fn requires_cast(&self, column: &ColumnMetadata) -> bool {
        matches!(column.jdbc_type(), jdbc::TIME | jdbc::SQLSERVER_DATETIMEOFFSET)
    }

    fn project_column(&self, column: &ColumnMetadata, rendered: String) -> String {
        match column.jdbc_type() {
            jdbc::TIME => format!("CAST({} as VARCHAR(16))", rendered),
            jdbc::SQLSERVER_DATETIMEOFFSET => format!("CAST({} as VARCHAR(34))", rendered),
            _ => rendered,
        }
    }
}

/// SQL Server-specific native types on top of the base mapping.
#[derive(Debug, Clone, Copy)]
pub struct SqlServerTypeMapper {
    binary_handling: BinaryColumnHandling,
}

impl TypeMapper for SqlServerTypeMapper {
    fn map(&self, descriptor: &NativeTypeDescriptor) -> DataType {
        match descriptor.jdbc_type {
            jdbc::NUMERIC => map_numeric_with_double_fallback(descriptor),
            jdbc::SQLSERVER_DATETIMEOFFSET => varchar_of_size(descriptor.precision_or_size, Charset::Utf8),
            _ => map_base(descriptor, self.binary_handling),
        }
    }
}
