//! PostgreSQL SQL generator.
//!
//! Identifiers are lower-cased before quoting unless `POSTGRESQL_IDENTIFIER_MAPPING` asks to
//! keep the original case. Types without a host counterpart are cast to text in the select list.

use crate::ast::{ScalarFunction, ScalarFunction as F};
use crate::config::{AdapterProperties, PostgresIdentifierMapping};
use crate::dialect::capabilities::{AggregateCapability as Agg, LiteralCapability as Lit};
use crate::dialect::{Capabilities, DialectDescriptor, NullSorting};
use crate::error::VsResult;
use crate::identifier::{ConversionRule, IdentifierCaseHandling, IdentifierConverter, QuoteStyle};
use crate::metadata::{Charset, ColumnMetadata, DataType, NativeTypeDescriptor};
use crate::transpiler::function_mapper::{FunctionMapper, expect_args};
use crate::transpiler::traits::{GroupConcatCall, SqlGenerator};
use crate::types::{BinaryColumnHandling, TypeMapper, jdbc, map_base, varchar_of_size};

use super::{MAIN_FULL, PREDICATES_FULL, keywords};

/// Native types projected as `VARCHAR`.
const CAST_TO_VARCHAR: &[&str] = &[
    "varbit", "point", "line", "lseg", "box", "path", "polygon", "circle", "cidr", "citext", "inet",
    "macaddr", "interval", "json", "jsonb", "uuid", "tsquery", "tsvector", "xml",
];

/// Serial pseudo-types and the integer type they are projected as.
const SERIAL_CASTS: &[(&str, &str)] = &[
    ("smallserial", "SMALLINT"),
    ("serial", "INTEGER"),
    ("bigserial", "BIGINT"),
];

const NOT_SUPPORTED: &[&str] = &["bytea"];

const SCALAR_FUNCTIONS: &[ScalarFunction] = &[
    F::Add, F::Sub, F::Mult, F::FloatDiv, F::Neg, F::Abs, F::Acos, F::Asin, F::Atan, F::Atan2,
    F::Ceil, F::Cos, F::Cosh, F::Cot, F::Degrees, F::Div, F::Exp, F::Floor, F::Ln, F::Log, F::Mod,
    F::Power, F::Radians, F::Rand, F::Round, F::Sign, F::Sin, F::Sinh, F::Sqrt, F::Tan, F::Tanh,
    F::Trunc, F::Ascii, F::BitLength, F::Chr, F::Concat, F::Instr, F::Length, F::Lower, F::Lpad,
    F::Ltrim, F::OctetLength, F::RegexpReplace, F::Repeat, F::Replace, F::Reverse, F::Right,
    F::Rpad, F::Rtrim, F::Substr, F::Translate, F::Trim, F::Unicode, F::Unicodechr, F::Upper,
    F::AddDays, F::AddHours, F::AddMinutes, F::AddMonths, F::AddSeconds, F::AddWeeks, F::AddYears,
    F::SecondsBetween, F::MinutesBetween, F::HoursBetween, F::DaysBetween, F::MonthsBetween,
    F::YearsBetween, F::Minute, F::Second, F::Day, F::Week, F::Month, F::Year, F::CurrentDate,
    F::CurrentTimestamp, F::DateTrunc, F::Extract, F::Localtimestamp, F::PosixTime, F::ToChar,
    F::Case, F::HashMd5,
];

pub struct PostgresGenerator {
    descriptor: DialectDescriptor,
    identifiers: IdentifierConverter,
    types: PostgresTypeMapper,
}

impl PostgresGenerator {
    pub fn new(properties: &AdapterProperties) -> VsResult<Self> {
        let capabilities = Capabilities::builder()
            .main(MAIN_FULL)
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
                Agg::StddevSamp,
                Agg::StddevSampDistinct,
                Agg::Variance,
                Agg::VarianceDistinct,
                Agg::VarPop,
                Agg::VarPopDistinct,
                Agg::VarSamp,
                Agg::VarSampDistinct,
                Agg::GroupConcat,
            ])
            .scalar_functions(SCALAR_FUNCTIONS)
            .build();
        let descriptor = DialectDescriptor::new("POSTGRESQL", capabilities)
            .null_sorting(NullSorting::AtEnd)
            .functions(function_mapper())
            .excluding(properties)?;

        let mapping = properties.postgres_identifier_mapping()?;
        let rule = match mapping {
            PostgresIdentifierMapping::ConvertToUpper => ConversionRule::UpperWhenRegularLower,
            PostgresIdentifierMapping::PreserveOriginalCase => ConversionRule::Preserve,
        };
        let identifiers = IdentifierConverter::new(
            IdentifierCaseHandling::InterpretAsLower,
            IdentifierCaseHandling::InterpretCaseSensitive,
            QuoteStyle::DoubleQuote,
        )
        .with_rule(rule)
        .with_reserved_words(keywords::POSTGRESQL)
        .lower_case_before_quoting(mapping != PostgresIdentifierMapping::PreserveOriginalCase);

        Ok(Self {
            descriptor,
            identifiers,
            types: PostgresTypeMapper {
                binary_handling: properties.binary_column_handling()?,
            },
        })
    }
}

fn function_mapper() -> FunctionMapper {
    FunctionMapper::new()
        .rename(F::Substr, "SUBSTRING")
        .rename(F::HashMd5, "MD5")
        .transform_all(
            &[F::AddDays, F::AddHours, F::AddMinutes, F::AddSeconds, F::AddWeeks, F::AddYears],
            |function, args| {
                expect_args(function, args, 2..=2)?;
                let unit = match function {
                    F::AddWeeks => "week",
                    F::AddHours => "hour",
                    F::AddMinutes => "minute",
                    F::AddSeconds => "second",
                    F::AddYears => "year",
                    _ => "day",
                };
                Ok(format!("{} +  interval '{} {}'", args[0], args[1], unit))
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
                Ok(format!("DATE_PART('{}', AGE({},{}))", unit, args[1], args[0]))
            },
        )
        .transform_all(
            &[F::Second, F::Minute, F::Day, F::Week, F::Month, F::Year],
            |function, args| {
                expect_args(function, args, 1..=1)?;
                Ok(format!("DATE_PART('{}',{})", function.name(), args[0]))
            },
        )
        .transform(F::PosixTime, |args| {
            expect_args(F::PosixTime, args, 1..=1)?;
            Ok(format!("EXTRACT(EPOCH FROM {})", args[0]))
        })
}

impl SqlGenerator for PostgresGenerator {
    fn descriptor(&self) -> &DialectDescriptor {
        &self.descriptor
    }

    fn identifiers(&self) -> &IdentifierConverter {
        &self.identifiers
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        &self.types
    }

    fn any_column(&self) -> &'static str {
        "1"
    }

    fn requires_cast(&self, column: &ColumnMetadata) -> bool {
        let type_name = column.type_name();
        CAST_TO_VARCHAR.contains(&type_name)
            || SERIAL_CASTS.iter().any(|(name, _)| *name == type_name)
            || NOT_SUPPORTED.contains(&type_name)
    }

    fn project_column(&self, column: &ColumnMetadata, rendered: String) -> String {
        let type_name = column.type_name();
        if CAST_TO_VARCHAR.contains(&type_name) {
            return format!("CAST({}  as VARCHAR )", rendered);
        }
        if let Some((_, target)) = SERIAL_CASTS.iter().find(|(name, _)| *name == type_name) {
            return format!("CAST({}  as {} )", rendered, target);
        }
        if NOT_SUPPORTED.contains(&type_name) {
            return format!("cast('{} NOT SUPPORTED' as varchar) as not_supported", type_name);
        }
        rendered
    }

    /// `STRING_AGG([DISTINCT] x, sep [ORDER BY ...])`, ordering inside the call.
    fn group_concat(&self, call: GroupConcatCall) -> VsResult<String> {
        let separator = match &call.separator {
            Some(separator) => self.string_literal(separator),
            None => "','".to_string(),
        };
        let mut sql = String::from("STRING_AGG(");
        if call.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(&call.arg);
        sql.push_str(", ");
        sql.push_str(&separator);
        if let Some(order_by) = &call.order_by {
            sql.push(' ');
            sql.push_str(order_by);
        }
        sql.push(')');
        Ok(sql)
    }
}

/// Postgres-specific native types on top of the base mapping.
#[derive(Debug, Clone, Copy)]
pub struct PostgresTypeMapper {
    binary_handling: BinaryColumnHandling,
}

impl TypeMapper for PostgresTypeMapper {
    fn map(&self, descriptor: &NativeTypeDescriptor) -> DataType {
        match descriptor.jdbc_type {
            jdbc::OTHER if descriptor.type_name == "varbit" => {
                varchar_of_size(descriptor.precision_or_size, Charset::Utf8)
            }
            jdbc::OTHER | jdbc::SQLXML | jdbc::DISTINCT | jdbc::BINARY => {
                tracing::debug!(
                    type_name = %descriptor.type_name,
                    jdbc_type = descriptor.jdbc_type,
                    "mapping PostgreSQL type to maximum VARCHAR"
                );
                DataType::max_varchar(Charset::Utf8)
            }
            _ => map_base(descriptor, self.binary_handling),
        }
    }
}
