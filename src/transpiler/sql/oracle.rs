//! Oracle SQL generator.
//!
//! Oracle reports numeric results without precision, so projected arithmetic and aggregates are
//! cast to FLOAT and projected numeric literals to text. Row limits use a ROWNUM subselect.

use crate::ast::{AggregateFunction, Literal, ScalarFunction, ScalarFunction as F};
use crate::config::{AdapterProperties, keys};
use crate::dialect::capabilities::{AggregateCapability as Agg, LiteralCapability as Lit};
use crate::dialect::{Capabilities, DialectDescriptor, LimitStyle, NullSorting};
use crate::error::{VsError, VsResult};
use crate::identifier::{IdentifierConverter, QuoteStyle};
use crate::metadata::{Charset, ColumnMetadata, DataType, MAX_DECIMAL_PRECISION, NativeTypeDescriptor};
use crate::transpiler::function_mapper::{FunctionMapper, expect_args};
use crate::transpiler::traits::{GroupConcatCall, SqlGenerator, listagg};
use crate::types::{BinaryColumnHandling, TypeMapper, jdbc, map_base};

use super::{MAIN_FULL, PREDICATES_FULL, keywords};

/// Type name prefixes that need a projection rewrite.
const TYPES_REQUIRING_CAST: &[&str] = &[
    "TIMESTAMP",
    "INTERVAL",
    "BINARY_FLOAT",
    "BINARY_DOUBLE",
    "CLOB",
    "NCLOB",
    "ROWID",
    "UROWID",
    "BLOB",
];

/// Oracle's scale marker for `NUMBER` without declared precision.
const UNCONSTRAINED_SCALE: i32 = -127;

const FLOAT_AGGREGATES: &[AggregateFunction] = &[
    AggregateFunction::Sum,
    AggregateFunction::Min,
    AggregateFunction::Max,
    AggregateFunction::Avg,
    AggregateFunction::Median,
    AggregateFunction::FirstValue,
    AggregateFunction::LastValue,
    AggregateFunction::Stddev,
    AggregateFunction::StddevPop,
    AggregateFunction::StddevSamp,
    AggregateFunction::Variance,
    AggregateFunction::VarPop,
    AggregateFunction::VarSamp,
];

const FLOAT_SCALARS: &[ScalarFunction] = &[
    F::Add, F::Sub, F::Mult, F::FloatDiv, F::Neg, F::Abs, F::Acos, F::Asin, F::Atan, F::Atan2,
    F::Cos, F::Cosh, F::Cot, F::Degrees, F::Exp, F::Ln, F::Log, F::Mod, F::Power, F::Radians,
    F::Sin, F::Sinh, F::Sqrt, F::Tan, F::Tanh,
];

const SCALAR_FUNCTIONS: &[ScalarFunction] = &[
    F::Ceil, F::Div, F::Floor, F::Sign, F::Add, F::Sub, F::Mult, F::FloatDiv, F::Neg, F::Abs,
    F::Acos, F::Asin, F::Atan, F::Atan2, F::Cos, F::Cosh, F::Cot, F::Degrees, F::Exp, F::Ln,
    F::Log, F::Mod, F::Power, F::Radians, F::Sin, F::Sinh, F::Sqrt, F::Tan, F::Tanh, F::Ascii,
    F::Chr, F::Instr, F::Length, F::Locate, F::Lower, F::Lpad, F::Ltrim, F::RegexpInstr,
    F::RegexpReplace, F::RegexpSubstr, F::Repeat, F::Replace, F::Reverse, F::Rpad, F::Rtrim,
    F::Soundex, F::Substr, F::Translate, F::Trim, F::Upper, F::AddDays, F::AddHours,
    F::AddMinutes, F::AddMonths, F::AddSeconds, F::AddWeeks, F::AddYears, F::CurrentDate,
    F::CurrentTimestamp, F::Dbtimezone, F::Localtimestamp, F::Numtodsinterval, F::Numtoyminterval,
    F::Sessiontimezone, F::Sysdate, F::Systimestamp, F::Cast, F::ToChar, F::ToDate, F::ToNumber,
    F::ToTimestamp, F::BitAnd, F::BitToNum, F::Case, F::Nullifzero, F::Zeroifnull,
];

pub struct OracleGenerator {
    descriptor: DialectDescriptor,
    identifiers: IdentifierConverter,
    types: OracleTypeMapper,
    /// Timestamps travel natively through `IMPORT FROM ORA`.
    import_from_ora: bool,
}

impl OracleGenerator {
    pub fn new(properties: &AdapterProperties) -> VsResult<Self> {
        let capabilities = Capabilities::builder()
            .main(MAIN_FULL)
            .predicates(PREDICATES_FULL)
            .literals(&[
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
                Agg::GroupConcat,
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
                Agg::StddevSamp,
                Agg::Variance,
                Agg::VarianceDistinct,
                Agg::VarPop,
                Agg::VarSamp,
            ])
            .scalar_functions(SCALAR_FUNCTIONS)
            .build();
        let descriptor = DialectDescriptor::new("ORACLE", capabilities)
            .null_sorting(NullSorting::High)
            .limit_style(LimitStyle::RowNum)
            .omit_parentheses(&[
                F::CurrentDate,
                F::CurrentTimestamp,
                F::Dbtimezone,
                F::Localtimestamp,
                F::Sessiontimezone,
                F::Systimestamp,
            ])
            .functions(function_mapper())
            .excluding(properties)?;
        Ok(Self {
            descriptor,
            identifiers: IdentifierConverter::upper_case(QuoteStyle::DoubleQuote).with_reserved_words(keywords::ORACLE),
            types: OracleTypeMapper {
                binary_handling: properties.binary_column_handling()?,
                number_decimal: properties.oracle_number_decimal()?,
            },
            import_from_ora: properties.is_enabled(keys::IMPORT_FROM_ORA),
        })
    }

    /// The column is a `NUMBER` mapped to exactly the configured cast target.
    fn casts_number_to_decimal(&self, column: &ColumnMetadata) -> bool {
        match (self.types.number_decimal, &column.data_type) {
            (Some((p, s)), DataType::Decimal { precision, scale }) => p == *precision && s == *scale,
            _ => false,
        }
    }
}

fn function_mapper() -> FunctionMapper {
    FunctionMapper::new()
        .transform(F::Locate, |args| {
            expect_args(F::Locate, args, 2..=3)?;
            let mut sql = format!("INSTR({}, {}", args[1], args[0]);
            if let Some(position) = args.get(2) {
                sql.push_str(", ");
                sql.push_str(position);
            }
            sql.push(')');
            Ok(sql)
        })
        .transform(F::Trim, trim)
        .transform_all(
            &[F::AddDays, F::AddHours, F::AddMinutes, F::AddSeconds, F::AddWeeks, F::AddYears],
            |function, args| {
                expect_args(function, args, 2..=2)?;
                let amount = if function == F::AddWeeks {
                    let weeks: i64 = args[1].trim().parse().map_err(|_| {
                        VsError::Generation(format!("ADD_WEEKS expects an integer literal but got {}", args[1]))
                    })?;
                    (7 * weeks).to_string()
                } else {
                    args[1].clone()
                };
                let unit = function.add_unit().unwrap_or("DAY");
                Ok(format!("({} + INTERVAL '{}' {})", args[0], amount, unit))
            },
        )
        .transform(F::Sysdate, |args| {
            expect_args(F::Sysdate, args, 0..=0)?;
            Ok("TO_DATE(SYSDATE)".to_string())
        })
        .rename(F::BitAnd, "BITAND")
        .rename(F::BitToNum, "BIN_TO_NUM")
        .transform(F::Nullifzero, |args| {
            expect_args(F::Nullifzero, args, 1..=1)?;
            Ok(format!("NULLIF({}, 0)", args[0]))
        })
        .transform(F::Zeroifnull, |args| {
            expect_args(F::Zeroifnull, args, 1..=1)?;
            Ok(format!("NVL({}, 0)", args[0]))
        })
        .transform(F::Div, |args| {
            expect_args(F::Div, args, 2..=2)?;
            Ok(format!("CAST(FLOOR({} / {}) AS NUMBER(36, 0))", args[0], args[1]))
        })
        .transform(F::Cot, |args| {
            expect_args(F::Cot, args, 1..=1)?;
            Ok(format!("(1 / TAN({}))", args[0]))
        })
        // ACOS(-1) is pi.
        .transform(F::Degrees, |args| {
            expect_args(F::Degrees, args, 1..=1)?;
            Ok(format!("(({}) * 180 / ACOS(-1))", args[0]))
        })
        .transform(F::Radians, |args| {
            expect_args(F::Radians, args, 1..=1)?;
            Ok(format!("(({}) * ACOS(-1) / 180)", args[0]))
        })
        .transform(F::Repeat, |args| {
            expect_args(F::Repeat, args, 2..=2)?;
            Ok(format!(
                "RPAD(TO_CHAR({0}), LENGTH({0}) * ROUND({1}), {0})",
                args[0], args[1]
            ))
        })
        .transform(F::Reverse, |args| {
            expect_args(F::Reverse, args, 1..=1)?;
            Ok(format!("REVERSE(TO_CHAR({}))", args[0]))
        })
}

/// `TRIM(chars FROM s)` or `TRIM(s)`; shared with DB2.
pub(crate) fn trim(args: &[String]) -> VsResult<String> {
    expect_args(F::Trim, args, 1..=2)?;
    Ok(match args.get(1) {
        Some(characters) => format!("TRIM({} FROM {})", characters, args[0]),
        None => format!("TRIM({})", args[0]),
    })
}

impl SqlGenerator for OracleGenerator {
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
        if type_name == "NUMBER" {
            return matches!(column.data_type, DataType::Varchar { .. }) || self.casts_number_to_decimal(column);
        }
        TYPES_REQUIRING_CAST.iter().any(|prefix| type_name.starts_with(prefix))
    }

    fn project_column(&self, column: &ColumnMetadata, rendered: String) -> String {
        let type_name = column.type_name();
        let to_char = (type_name.starts_with("TIMESTAMP") && !self.import_from_ora)
            || type_name.starts_with("INTERVAL")
            || matches!(type_name, "BINARY_FLOAT" | "BINARY_DOUBLE" | "CLOB" | "NCLOB");
        if to_char {
            return format!("TO_CHAR({})", rendered);
        }
        match type_name {
            "NUMBER" => match (&column.data_type, self.types.number_decimal) {
                (DataType::Varchar { .. }, _) => format!("TO_CHAR({})", rendered),
                (_, Some((precision, scale))) if self.casts_number_to_decimal(column) => {
                    format!("CAST({} AS DECIMAL({},{}))", rendered, precision, scale)
                }
                _ => rendered,
            },
            "ROWID" | "UROWID" => format!("ROWIDTOCHAR({})", rendered),
            "BLOB" => format!("UTL_RAW.CAST_TO_VARCHAR2({})", rendered),
            _ => rendered,
        }
    }

    fn project_literal(&self, literal: &Literal, rendered: String) -> String {
        if literal.is_numeric() {
            format!("TO_CHAR({})", rendered)
        } else {
            rendered
        }
    }

    // Result set metadata reports precision 0 and scale 0 for these.
    fn project_aggregate(&self, function: AggregateFunction, rendered: String) -> String {
        if FLOAT_AGGREGATES.contains(&function) {
            format!("CAST({} AS FLOAT)", rendered)
        } else {
            rendered
        }
    }

    fn project_scalar(&self, function: ScalarFunction, rendered: String) -> String {
        if FLOAT_SCALARS.contains(&function) {
            format!("CAST({} AS FLOAT)", rendered)
        } else {
            rendered
        }
    }

    fn group_concat(&self, call: GroupConcatCall) -> VsResult<String> {
        if call.distinct {
            return Err(VsError::unsupported("GROUP_CONCAT with DISTINCT", self.descriptor.name));
        }
        let separator = self.string_literal(call.separator.as_deref().unwrap_or(","));
        Ok(listagg(&call, separator, true))
    }

    fn regexp_like(&self, expr: &str, pattern: &str) -> String {
        format!("REGEXP_LIKE({}, {})", expr, pattern)
    }
}

/// Oracle-specific native types on top of the base mapping.
#[derive(Debug, Clone, Copy)]
pub struct OracleTypeMapper {
    binary_handling: BinaryColumnHandling,
    /// Target of `ORACLE_CAST_NUMBER_TO_DECIMAL_WITH_PRECISION_AND_SCALE`.
    number_decimal: Option<(u32, u32)>,
}

impl OracleTypeMapper {
    fn map_number(&self, descriptor: &NativeTypeDescriptor) -> DataType {
        let precision = descriptor.precision_or_size;
        let scale = descriptor.decimal_scale;
        if scale == UNCONSTRAINED_SCALE || precision > MAX_DECIMAL_PRECISION as i32 {
            return match self.number_decimal {
                Some((precision, scale)) => DataType::decimal(precision, scale),
                None => DataType::max_varchar(Charset::Utf8),
            };
        }
        match (u32::try_from(precision), u32::try_from(scale)) {
            (Ok(precision), Ok(scale)) if precision > 0 && scale <= precision => {
                DataType::decimal(precision, scale)
            }
            _ => DataType::max_varchar(Charset::Utf8),
        }
    }
}

impl TypeMapper for OracleTypeMapper {
    fn map(&self, descriptor: &NativeTypeDescriptor) -> DataType {
        match descriptor.jdbc_type {
            jdbc::DECIMAL | jdbc::NUMERIC => self.map_number(descriptor),
            jdbc::ORACLE_TIMESTAMP_WITH_TIME_ZONE | jdbc::ORACLE_TIMESTAMP_WITH_LOCAL_TIME_ZONE => {
                DataType::timestamp()
            }
            jdbc::NCLOB
            | jdbc::OTHER
            | jdbc::ORACLE_INTERVAL_YEAR_TO_MONTH
            | jdbc::ORACLE_INTERVAL_DAY_TO_SECOND
            | jdbc::ORACLE_BINARY_FLOAT
            | jdbc::ORACLE_BINARY_DOUBLE
            | jdbc::ROWID => DataType::max_varchar(Charset::Utf8),
            jdbc::BLOB => match self.binary_handling {
                BinaryColumnHandling::Ignore => DataType::Unsupported,
                BinaryColumnHandling::EncodeBase16 => DataType::max_varchar(Charset::Utf8),
            },
            _ => map_base(descriptor, self.binary_handling),
        }
    }
}
