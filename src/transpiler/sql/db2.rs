//! IBM DB2 generator.
//!
//! Row limits are written as `FETCH FIRST n ROWS ONLY`. Temporal, XML and CLOB columns are
//! converted to text when projected so that no precision is lost on the way to the host.

use crate::ast::{AggregateFunction, Expr, ScalarFunction, ScalarFunction as F};
use crate::config::AdapterProperties;
use crate::dialect::capabilities::{
    AggregateCapability as Agg, LiteralCapability as Lit, PredicateCapability as Pred,
};
use crate::dialect::{Capabilities, DialectDescriptor, LimitStyle, NullSorting};
use crate::error::{VsError, VsResult};
use crate::identifier::{IdentifierConverter, QuoteStyle};
use crate::metadata::{Charset, ColumnMetadata, DataType, MAX_VARCHAR_SIZE, NativeTypeDescriptor};
use crate::transpiler::function_mapper::{FunctionMapper, expect_args};
use crate::transpiler::traits::{GroupConcatCall, SqlGenerator, listagg};
use crate::types::{BinaryColumnHandling, TypeMapper, jdbc, map_base, varchar_of_size};

use super::{MAIN_NO_OFFSET, keywords};
use super::oracle::trim;

const TYPES_REQUIRING_CAST: &[&str] = &["TIMESTAMP", "DECFLOAT", "CLOB", "XML", "TIME"];
const TYPES_NOT_SUPPORTED: &[&str] = &["BLOB"];

/// DB2 cannot cast a CLOB to a longer VARCHAR.
const MAX_CLOB_CAST_SIZE: u32 = 32672;
const TIMESTAMP_AS_VARCHAR_SIZE: u32 = 32;

const ADD_FUNCTIONS: &[ScalarFunction] =
    &[F::AddDays, F::AddHours, F::AddMinutes, F::AddSeconds, F::AddWeeks, F::AddYears];

const SCALAR_FUNCTIONS: &[ScalarFunction] = &[
    F::Ceil, F::Div, F::Floor, F::Sign, F::Add, F::Sub, F::Mult, F::FloatDiv, F::Neg, F::Abs,
    F::Acos, F::Asin, F::Atan, F::Atan2, F::Cos, F::Cosh, F::Cot, F::Degrees, F::Exp, F::Ln,
    F::Log, F::Mod, F::Power, F::Radians, F::Sin, F::Sinh, F::Sqrt, F::Tan, F::Tanh, F::Ascii,
    F::Chr, F::Instr, F::Length, F::Locate, F::Lower, F::Lpad, F::Ltrim, F::Repeat, F::Replace,
    F::Right, F::Rpad, F::Rtrim, F::Soundex, F::Substr, F::Translate, F::Trim, F::Upper,
    F::AddDays, F::AddHours, F::AddMinutes, F::AddMonths, F::AddSeconds, F::AddWeeks, F::AddYears,
    F::CurrentDate, F::CurrentTimestamp, F::Localtimestamp, F::Sysdate, F::Systimestamp, F::Cast,
    F::ToChar, F::ToDate, F::ToNumber, F::ToTimestamp, F::Case, F::CurrentSchema, F::CurrentUser,
    F::Nullifzero, F::Zeroifnull,
];

pub struct Db2Generator {
    descriptor: DialectDescriptor,
    identifiers: IdentifierConverter,
    types: Db2TypeMapper,
}

impl Db2Generator {
    pub fn new(properties: &AdapterProperties) -> VsResult<Self> {
        let capabilities = Capabilities::builder()
            .main(MAIN_NO_OFFSET)
            .predicates(&[
                Pred::And,
                Pred::Or,
                Pred::Not,
                Pred::Equal,
                Pred::NotEqual,
                Pred::Less,
                Pred::LessEqual,
                Pred::Like,
                Pred::LikeEscape,
                Pred::Between,
                Pred::InConstList,
                Pred::IsNull,
                Pred::IsNotNull,
            ])
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
                Agg::StddevPop,
                Agg::StddevSamp,
                Agg::Variance,
                Agg::VarianceDistinct,
                Agg::VarPop,
                Agg::VarSamp,
            ])
            .scalar_functions(SCALAR_FUNCTIONS)
            .build();
        let descriptor = DialectDescriptor::new("DB2", capabilities)
            .null_sorting(NullSorting::AtEnd)
            .limit_style(LimitStyle::FetchFirst)
            .omit_parentheses(&[F::Dbtimezone, F::Localtimestamp, F::Sessiontimezone])
            .functions(function_mapper())
            .aggregate_alias(AggregateFunction::VarSamp, "VARIANCE_SAMP")
            .excluding(properties)?;
        Ok(Self {
            descriptor,
            identifiers: IdentifierConverter::upper_case(QuoteStyle::DoubleQuote).with_reserved_words(keywords::DB2),
            types: Db2TypeMapper {
                binary_handling: properties.binary_column_handling()?,
            },
        })
    }
}

fn function_mapper() -> FunctionMapper {
    FunctionMapper::new()
        .transform(F::Trim, trim)
        .transform_all(ADD_FUNCTIONS, add_interval)
        .transform_all(&[F::CurrentDate, F::Sysdate], |function, args| {
            expect_args(function, args, 0..=0)?;
            Ok("CURRENT DATE".to_string())
        })
        .transform_all(&[F::CurrentTimestamp, F::Systimestamp], |function, args| {
            expect_args(function, args, 0..=0)?;
            Ok("VARCHAR(CURRENT TIMESTAMP)".to_string())
        })
        .rename(F::BitAnd, "BITAND")
        .rename(F::BitToNum, "BIN_TO_NUM")
        .transform(F::Nullifzero, |args| {
            expect_args(F::Nullifzero, args, 1..=1)?;
            Ok(format!("NULLIF({}, 0)", args[0]))
        })
        .transform(F::Zeroifnull, |args| {
            expect_args(F::Zeroifnull, args, 1..=1)?;
            Ok(format!("IFNULL({}, 0)", args[0]))
        })
        .transform(F::Div, |args| {
            expect_args(F::Div, args, 2..=2)?;
            Ok(format!("CAST(FLOOR({} / FLOOR({})) AS DECIMAL(36, 0))", args[0], args[1]))
        })
}

/// `x + n UNITS`, weeks written as days.
fn add_interval(function: ScalarFunction, args: &[String]) -> VsResult<String> {
    expect_args(function, args, 2..=2)?;
    let (amount, unit) = match function {
        F::AddWeeks => {
            let weeks: i64 = args[1].trim().parse().map_err(|_| {
                VsError::Generation(format!("ADD_WEEKS expects an integer literal but got {}", args[1]))
            })?;
            ((7 * weeks).to_string(), "DAYS")
        }
        F::AddHours => (args[1].clone(), "HOURS"),
        F::AddMinutes => (args[1].clone(), "MINUTES"),
        F::AddSeconds => (args[1].clone(), "SECONDS"),
        F::AddYears => (args[1].clone(), "YEARS"),
        _ => (args[1].clone(), "DAYS"),
    };
    Ok(format!("{} + {} {}", args[0], amount, unit))
}

impl SqlGenerator for Db2Generator {
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
        TYPES_REQUIRING_CAST.contains(&type_name) || TYPES_NOT_SUPPORTED.contains(&type_name)
    }

    fn project_column(&self, column: &ColumnMetadata, rendered: String) -> String {
        let type_name = column.type_name();
        if TYPES_NOT_SUPPORTED.contains(&type_name) {
            return format!("'{} NOT SUPPORTED'", type_name);
        }
        match type_name {
            "XML" => format!("XMLSERIALIZE({} as VARCHAR(32000) INCLUDING XMLDECLARATION)", rendered),
            "CLOB" => format!(
                "CAST(SUBSTRING({},{size}) AS VARCHAR({size}))",
                rendered,
                size = MAX_CLOB_CAST_SIZE
            ),
            "CHAR () FOR BIT DATA" | "VARCHAR () FOR BIT DATA" => format!("HEX({})", rendered),
            // TIME goes through VARCHAR as well to keep the precision.
            "TIME" | "TIMESTAMP" => format!("VARCHAR({})", rendered),
            _ => rendered,
        }
    }

    // Date arithmetic on a TIMESTAMP column is delivered as text.
    fn scalar_call(&self, function: ScalarFunction, args: &[Expr], rendered: &[String]) -> Option<VsResult<String>> {
        if !ADD_FUNCTIONS.contains(&function) {
            return None;
        }
        match args.first() {
            Some(Expr::Column { column, .. }) if column.type_name().contains("TIMESTAMP") => {
                Some(add_interval(function, rendered).map(|sql| format!("VARCHAR({})", sql)))
            }
            _ => None,
        }
    }

    fn group_concat(&self, call: GroupConcatCall) -> VsResult<String> {
        let separator = self.string_literal(call.separator.as_deref().unwrap_or(","));
        Ok(listagg(&call, separator, false))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Db2TypeMapper {
    binary_handling: BinaryColumnHandling,
}

impl TypeMapper for Db2TypeMapper {
    fn map(&self, descriptor: &NativeTypeDescriptor) -> DataType {
        let size = descriptor.precision_or_size.max(0) as u32;
        if descriptor.type_name.eq_ignore_ascii_case("DECFLOAT") {
            return DataType::Double;
        }
        match descriptor.jdbc_type {
            jdbc::CLOB | jdbc::OTHER | jdbc::SQLXML | jdbc::BLOB => DataType::max_varchar(Charset::Utf8),
            jdbc::TIMESTAMP => DataType::varchar(TIMESTAMP_AS_VARCHAR_SIZE, Charset::Utf8),
            jdbc::VARCHAR | jdbc::NVARCHAR | jdbc::LONGVARCHAR | jdbc::CHAR | jdbc::NCHAR | jdbc::LONGNVARCHAR => {
                DataType::varchar(size.min(MAX_VARCHAR_SIZE), Charset::Utf8)
            }
            jdbc::BINARY => DataType::char(2 * size, Charset::Ascii),
            jdbc::VARBINARY => varchar_of_size((2 * size) as i32, Charset::Ascii),
            _ => map_base(descriptor, self.binary_handling),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{OrderByItem, SelectList};
    use crate::transpiler::sql::fixtures::{column, render, select};

    fn generator() -> Db2Generator {
        Db2Generator::new(&AdapterProperties::new()).unwrap()
    }

    fn projected(function: ScalarFunction, args: Vec<Expr>) -> String {
        let sql = render(&generator(), select(SelectList::Expressions(vec![Expr::scalar(function, args)]), vec![]));
        sql["SELECT ".len()..sql.find(" FROM").unwrap()].to_string()
    }

    #[test]
    fn test_fetch_first() {
        let c = column("C1", jdbc::INTEGER, "INTEGER");
        let query = select(SelectList::Expressions(vec![Expr::column(c.clone())]), vec![])
            .order_by(vec![OrderByItem::asc(c)])
            .limit(10);
        assert_eq!(
            render(&generator(), query),
            "SELECT C1 FROM T ORDER BY C1 FETCH FIRST 10 ROWS ONLY"
        );
    }

    #[test]
    fn test_star_expansion_with_casts() {
        let columns = vec![
            column("TS", jdbc::TIMESTAMP, "TIMESTAMP"),
            column("X", jdbc::SQLXML, "XML"),
            column("C", jdbc::CLOB, "CLOB"),
            column("B", jdbc::BLOB, "BLOB"),
            column("H", jdbc::BINARY, "CHAR () FOR BIT DATA"),
            column("I", jdbc::INTEGER, "INTEGER"),
        ];
        assert_eq!(
            render(&generator(), select(SelectList::All, columns)),
            "SELECT VARCHAR(TS), XMLSERIALIZE(X as VARCHAR(32000) INCLUDING XMLDECLARATION), \
             CAST(SUBSTRING(C,32672) AS VARCHAR(32672)), 'BLOB NOT SUPPORTED', HEX(H), I FROM T"
        );
    }

    #[test]
    fn test_any_column() {
        assert_eq!(render(&generator(), select(SelectList::AnyColumn, vec![])), "SELECT 1 FROM T");
    }

    #[test]
    fn test_date_arithmetic() {
        let d = Expr::column(column("D", jdbc::DATE, "DATE"));
        let ts = Expr::column(column("TS", jdbc::TIMESTAMP, "TIMESTAMP"));
        assert_eq!(projected(F::AddDays, vec![d.clone(), Expr::int(2)]), "D + 2 DAYS");
        assert_eq!(projected(F::AddWeeks, vec![d.clone(), Expr::int(2)]), "D + 14 DAYS");
        assert_eq!(projected(F::AddHours, vec![ts, Expr::int(3)]), "VARCHAR(TS + 3 HOURS)");
        assert_eq!(projected(F::CurrentDate, vec![]), "CURRENT DATE");
        assert_eq!(projected(F::Systimestamp, vec![]), "VARCHAR(CURRENT TIMESTAMP)");
        assert_eq!(projected(F::Localtimestamp, vec![]), "LOCALTIMESTAMP");
    }

    #[test]
    fn test_function_rewrites() {
        let n = Expr::column(column("N", jdbc::INTEGER, "INTEGER"));
        assert_eq!(
            projected(F::Div, vec![n.clone(), Expr::int(2)]),
            "CAST(FLOOR(N / FLOOR(2)) AS DECIMAL(36, 0))"
        );
        assert_eq!(projected(F::Zeroifnull, vec![n.clone()]), "IFNULL(N, 0)");
        assert_eq!(projected(F::BitAnd, vec![n.clone(), Expr::int(1)]), "BITAND(N, 1)");
        assert_eq!(projected(F::Trim, vec![n]), "TRIM(N)");
    }

    #[test]
    fn test_listagg_and_var_samp() {
        let s = column("S", jdbc::VARCHAR, "VARCHAR");
        let query = select(
            SelectList::Expressions(vec![
                Expr::GroupConcat {
                    arg: Box::new(Expr::column(s.clone())),
                    distinct: false,
                    separator: None,
                    order_by: vec![OrderByItem::desc(s.clone())],
                },
                Expr::aggregate(AggregateFunction::VarSamp, vec![Expr::column(s)]),
            ]),
            vec![],
        );
        assert_eq!(
            render(&generator(), query),
            "SELECT LISTAGG(S, ',') WITHIN GROUP(ORDER BY S DESC), VARIANCE_SAMP(S) FROM T"
        );
    }

    #[test]
    fn test_type_mapping() {
        let generator = generator();
        let map = |d: NativeTypeDescriptor| generator.type_mapper().map(&d);
        assert_eq!(map(NativeTypeDescriptor::new(jdbc::OTHER, "DECFLOAT")), DataType::Double);
        assert_eq!(
            map(NativeTypeDescriptor::new(jdbc::TIMESTAMP, "TIMESTAMP")),
            DataType::varchar(32, Charset::Utf8)
        );
        assert_eq!(
            map(NativeTypeDescriptor::new(jdbc::BINARY, "CHAR () FOR BIT DATA").with_precision(8, 0)),
            DataType::char(16, Charset::Ascii)
        );
        assert_eq!(
            map(NativeTypeDescriptor::new(jdbc::CHAR, "CHAR").with_precision(10, 0)),
            DataType::varchar(10, Charset::Utf8)
        );
        assert_eq!(map(NativeTypeDescriptor::new(jdbc::BLOB, "BLOB")), DataType::max_varchar(Charset::Utf8));
    }
}
