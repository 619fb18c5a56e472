//! Native type to portable type mapping.
//!
//! Mapping is total: every native descriptor maps to some [`DataType`]. Types the base
//! table does not know degrade to a maximum-size VARCHAR, never to an error.

use crate::metadata::{
    Charset, DataType, MAX_CHAR_SIZE, MAX_DECIMAL_PRECISION, MAX_VARCHAR_SIZE, NativeTypeDescriptor,
};

/// JDBC-style native type codes.
pub mod jdbc {
    pub const BIT: i32 = -7;
    pub const TINYINT: i32 = -6;
    pub const SMALLINT: i32 = 5;
    pub const INTEGER: i32 = 4;
    pub const BIGINT: i32 = -5;
    pub const FLOAT: i32 = 6;
    pub const REAL: i32 = 7;
    pub const DOUBLE: i32 = 8;
    pub const NUMERIC: i32 = 2;
    pub const DECIMAL: i32 = 3;
    pub const CHAR: i32 = 1;
    pub const VARCHAR: i32 = 12;
    pub const LONGVARCHAR: i32 = -1;
    pub const DATE: i32 = 91;
    pub const TIME: i32 = 92;
    pub const TIMESTAMP: i32 = 93;
    pub const BINARY: i32 = -2;
    pub const VARBINARY: i32 = -3;
    pub const LONGVARBINARY: i32 = -4;
    pub const NULL: i32 = 0;
    pub const OTHER: i32 = 1111;
    pub const JAVA_OBJECT: i32 = 2000;
    pub const DISTINCT: i32 = 2001;
    pub const STRUCT: i32 = 2002;
    pub const ARRAY: i32 = 2003;
    pub const BLOB: i32 = 2004;
    pub const CLOB: i32 = 2005;
    pub const REF: i32 = 2006;
    pub const DATALINK: i32 = 70;
    pub const BOOLEAN: i32 = 16;
    pub const ROWID: i32 = -8;
    pub const NCHAR: i32 = -15;
    pub const NVARCHAR: i32 = -9;
    pub const LONGNVARCHAR: i32 = -16;
    pub const NCLOB: i32 = 2011;
    pub const SQLXML: i32 = 2009;
    pub const TIME_WITH_TIMEZONE: i32 = 2013;
    pub const TIMESTAMP_WITH_TIMEZONE: i32 = 2014;

    // Vendor codes
    pub const ORACLE_TIMESTAMP_WITH_TIME_ZONE: i32 = -101;
    pub const ORACLE_TIMESTAMP_WITH_LOCAL_TIME_ZONE: i32 = -102;
    pub const ORACLE_INTERVAL_YEAR_TO_MONTH: i32 = -103;
    pub const ORACLE_INTERVAL_DAY_TO_SECOND: i32 = -104;
    pub const ORACLE_BINARY_FLOAT: i32 = 100;
    pub const ORACLE_BINARY_DOUBLE: i32 = 101;
    pub const SQLSERVER_DATETIMEOFFSET: i32 = -155;
    pub const EXASOL_GEOMETRY: i32 = 123;
    pub const EXASOL_TIMESTAMP_WITH_LOCAL_TIME_ZONE: i32 = 124;
    pub const EXASOL_HASHTYPE: i32 = 125;
}

/// What to do with binary columns the host cannot represent natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryColumnHandling {
    /// Leave them out of the virtual schema.
    #[default]
    Ignore,
    /// Represent them as hex text of twice the byte length.
    EncodeBase16,
}

impl BinaryColumnHandling {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "IGNORE" => Some(BinaryColumnHandling::Ignore),
            "ENCODE_BASE16" => Some(BinaryColumnHandling::EncodeBase16),
            _ => None,
        }
    }
}

/// Maps native type descriptors to portable types.
///
/// Implementations must be pure: the result depends on the descriptor and the mapper's
/// immutable configuration only.
pub trait TypeMapper: Send + Sync {
    fn map(&self, descriptor: &NativeTypeDescriptor) -> DataType;
}

/// The SQL-92 base table shared by all dialects.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseTypeMapper {
    pub binary_handling: BinaryColumnHandling,
}

impl BaseTypeMapper {
    pub fn new(binary_handling: BinaryColumnHandling) -> Self {
        Self { binary_handling }
    }
}

impl TypeMapper for BaseTypeMapper {
    fn map(&self, descriptor: &NativeTypeDescriptor) -> DataType {
        map_base(descriptor, self.binary_handling)
    }
}

/// Base mapping rules.
pub fn map_base(d: &NativeTypeDescriptor, binary_handling: BinaryColumnHandling) -> DataType {
    let precision = d.precision_or_size;
    match d.jdbc_type {
        jdbc::TINYINT | jdbc::SMALLINT => integer_decimal(precision, 9),
        jdbc::INTEGER => integer_decimal(precision, 18),
        jdbc::BIGINT => integer_decimal(precision, 36),
        jdbc::DECIMAL => map_decimal(d),
        jdbc::REAL | jdbc::FLOAT | jdbc::DOUBLE => DataType::Double,
        jdbc::VARCHAR | jdbc::NVARCHAR | jdbc::LONGVARCHAR | jdbc::LONGNVARCHAR => map_varchar(d),
        jdbc::CHAR | jdbc::NCHAR => map_char(d),
        jdbc::DATE => DataType::Date,
        jdbc::TIMESTAMP => DataType::timestamp(),
        jdbc::BIT | jdbc::BOOLEAN => DataType::Boolean,
        jdbc::BINARY | jdbc::VARBINARY | jdbc::LONGVARBINARY => map_binary(d, binary_handling),
        jdbc::CLOB | jdbc::NCLOB | jdbc::TIME | jdbc::NUMERIC | jdbc::SQLXML => {
            DataType::max_varchar(Charset::Utf8)
        }
        _ => DataType::max_varchar(Charset::Utf8),
    }
}

fn integer_decimal(precision: i32, default_precision: u32) -> DataType {
    let precision = if precision <= 0 { default_precision } else { precision as u32 };
    if precision <= MAX_DECIMAL_PRECISION {
        DataType::decimal(precision, 0)
    } else {
        DataType::max_varchar(Charset::Utf8)
    }
}

fn map_decimal(d: &NativeTypeDescriptor) -> DataType {
    match decimal_within_limits(d) {
        Some(data_type) => data_type,
        None => DataType::max_varchar(Charset::Utf8),
    }
}

fn decimal_within_limits(d: &NativeTypeDescriptor) -> Option<DataType> {
    let precision = u32::try_from(d.precision_or_size).ok()?;
    let scale = u32::try_from(d.decimal_scale).ok()?;
    if precision == 0 || precision > MAX_DECIMAL_PRECISION || scale > precision {
        return None;
    }
    Some(DataType::decimal(precision, scale))
}

/// DECIMAL when the declared precision fits the host, DOUBLE otherwise.
pub fn map_numeric_with_double_fallback(d: &NativeTypeDescriptor) -> DataType {
    decimal_within_limits(d).unwrap_or(DataType::Double)
}

/// ASCII when every character takes exactly one byte.
pub fn charset_for(d: &NativeTypeDescriptor) -> Charset {
    if d.byte_size == d.precision_or_size {
        Charset::Ascii
    } else {
        Charset::Utf8
    }
}

/// VARCHAR of the declared size, clamped to the host maximum. Size 0 means unbounded.
pub fn map_varchar(d: &NativeTypeDescriptor) -> DataType {
    varchar_of_size(d.precision_or_size, charset_for(d))
}

pub fn varchar_of_size(size: i32, charset: Charset) -> DataType {
    let size = if size <= 0 { MAX_VARCHAR_SIZE } else { (size as u32).min(MAX_VARCHAR_SIZE) };
    DataType::varchar(size, charset)
}

fn map_char(d: &NativeTypeDescriptor) -> DataType {
    let size = d.precision_or_size.max(1) as u32;
    if size <= MAX_CHAR_SIZE {
        DataType::char(size, charset_for(d))
    } else {
        varchar_of_size(d.precision_or_size, charset_for(d))
    }
}

fn map_binary(d: &NativeTypeDescriptor, binary_handling: BinaryColumnHandling) -> DataType {
    match binary_handling {
        BinaryColumnHandling::Ignore => DataType::Unsupported,
        BinaryColumnHandling::EncodeBase16 => {
            let size = if d.precision_or_size <= 0 {
                MAX_VARCHAR_SIZE
            } else {
                (d.precision_or_size as u32).saturating_mul(2).min(MAX_VARCHAR_SIZE)
            };
            DataType::varchar(size, Charset::Ascii)
        }
    }
}
