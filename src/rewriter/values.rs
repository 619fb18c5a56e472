//! Materialization of a foreign result as a literal `VALUES` table.
//!
//! Dates and timestamps arrive as text in the foreign connector's format (`YYYY-M-D`,
//! `H:M:S[.fraction]`) and are rewritten into the host's `DD.MM.YYYY HH:MM:SS[.mmm]`,
//! with fractional seconds rounded half-up to milliseconds.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, SubsecRound};
use nom::{
    IResult,
    bytes::complete::take_while_m_n,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt},
    sequence::{preceded, tuple},
};

use crate::engine::{ForeignResult, ForeignValue};
use crate::error::{VsError, VsResult};
use crate::metadata::NativeTypeDescriptor;
use crate::transpiler::SqlGenerator;
use crate::types::jdbc;

const MAX_FRACTION_DIGITS: usize = 6;

/// `SELECT * FROM VALUES (..), (..)`, or a single filtered placeholder row if `result` is empty.
pub fn materialize(generator: &dyn SqlGenerator, result: &ForeignResult) -> VsResult<String> {
    let mut sql = String::from("SELECT * FROM VALUES ");
    if result.is_empty() {
        let placeholders = vec!["1"; result.columns.len()].join(", ");
        sql.push_str(&format!("({}) WHERE false", placeholders));
        return Ok(sql);
    }
    let mut rows = Vec::with_capacity(result.rows.len());
    for row in &result.rows {
        let mut cells = Vec::with_capacity(row.len());
        for (column, value) in result.columns.iter().zip(row) {
            cells.push(cell_literal(generator, column, value)?);
        }
        rows.push(format!("({})", cells.join(", ")));
    }
    sql.push_str(&rows.join(", "));
    Ok(sql)
}

fn cell_literal(generator: &dyn SqlGenerator, column: &NativeTypeDescriptor, value: &ForeignValue) -> VsResult<String> {
    match value {
        ForeignValue::Null => Ok(null_literal(column.jdbc_type).to_string()),
        ForeignValue::Bool(b) => Ok(b.to_string()),
        ForeignValue::Int(i) => Ok(i.to_string()),
        ForeignValue::Float(f) if f.is_finite() => Ok(format!("{:?}", f)),
        ForeignValue::Float(f) => Err(VsError::foreign(format!(
            "Cannot materialize the non-finite value {} of a {} column",
            f, column.type_name
        ))),
        ForeignValue::String(s) => match column.jdbc_type {
            jdbc::DATE => Ok(format!("'{}'", convert_date(s)?)),
            jdbc::TIMESTAMP => Ok(format!("'{}'", convert_timestamp(s)?)),
            jdbc::BIGINT | jdbc::INTEGER | jdbc::SMALLINT | jdbc::TINYINT if is_integer(s) => Ok(s.clone()),
            _ => Ok(generator.string_literal(s)),
        },
    }
}

/// A NULL that keeps the column type when every cell of the column is NULL.
pub fn null_literal(jdbc_type: i32) -> &'static str {
    match jdbc_type {
        jdbc::BIGINT | jdbc::INTEGER | jdbc::SMALLINT | jdbc::TINYINT | jdbc::DECIMAL | jdbc::NUMERIC => {
            "CAST (NULL AS DECIMAL(19,0))"
        }
        jdbc::DOUBLE | jdbc::FLOAT | jdbc::REAL => "CAST (NULL AS DOUBLE)",
        jdbc::BOOLEAN | jdbc::BIT => "CAST (NULL AS BOOLEAN)",
        jdbc::DATE => "CAST (NULL AS DATE)",
        jdbc::TIMESTAMP => "CAST (NULL AS TIMESTAMP)",
        _ => "CAST (NULL AS VARCHAR(4))",
    }
}

fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn number<'a>(min: usize, max: usize) -> impl FnMut(&'a str) -> IResult<&'a str, u32> {
    move |input: &'a str| map_res(take_while_m_n(min, max, |c: char| c.is_ascii_digit()), str::parse)(input)
}

/// `YYYY-[M]M-[D]D`.
fn date(input: &str) -> IResult<&str, (u32, u32, u32)> {
    tuple((number(4, 4), preceded(char('-'), number(1, 2)), preceded(char('-'), number(1, 2))))(input)
}

/// `[H]H:[M]M:[S]S[.fraction]`.
fn time(input: &str) -> IResult<&str, (u32, u32, u32, Option<&str>)> {
    tuple((
        number(1, 2),
        preceded(char(':'), number(1, 2)),
        preceded(char(':'), number(1, 2)),
        opt(preceded(char('.'), digit1)),
    ))(input)
}

fn parse_date(value: &str) -> VsResult<NaiveDate> {
    let invalid = || {
        VsError::foreign(format!(
            "Date does not match required format: YYYY-[M]M-[D]D. Actual value was:{}",
            value
        ))
    };
    let (_, (year, month, day)) = all_consuming(date)(value).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)
}

/// Parsed time and whether it carried a fractional part.
fn parse_time(value: &str) -> VsResult<(NaiveTime, bool)> {
    let invalid = || VsError::foreign("Time does not match required format: [H]H:[M]M:[S]S[.DDDDDD]]");
    let (_, (hour, minute, second, fraction)) = all_consuming(time)(value).map_err(|_| invalid())?;
    let nanos = match fraction {
        None => 0,
        Some(digits) if digits.len() > MAX_FRACTION_DIGITS => {
            return Err(VsError::foreign(format!(
                "Fractional seconds with more than {} digits are not supported. Actual value was:{}",
                MAX_FRACTION_DIGITS, value
            )));
        }
        Some(digits) => format!("{:0<9}", digits).parse::<u32>().map_err(|_| invalid())?,
    };
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).ok_or_else(invalid)?;
    Ok((time, fraction.is_some()))
}

/// `YYYY-M-D` to `DD.MM.YYYY`.
pub fn convert_date(value: &str) -> VsResult<String> {
    Ok(parse_date(value)?.format("%d.%m.%Y").to_string())
}

/// `YYYY-M-D[T| ]H:M:S[.f]` to `DD.MM.YYYY HH:MM:SS[.mmm]`.
pub fn convert_timestamp(value: &str) -> VsResult<String> {
    let (date_part, time_part) = value
        .split_once('T')
        .or_else(|| value.split_once(' '))
        .ok_or_else(|| VsError::foreign("Time does not match required format: [H]H:[M]M:[S]S[.DDDDDD]]"))?;
    let date = parse_date(date_part)?;
    let (time, has_fraction) = parse_time(time_part)?;
    let timestamp = NaiveDateTime::new(date, time);
    if has_fraction {
        Ok(timestamp.round_subsecs(3).format("%d.%m.%Y %H:%M:%S%.3f").to_string())
    } else {
        Ok(timestamp.format("%d.%m.%Y %H:%M:%S").to_string())
    }
}
