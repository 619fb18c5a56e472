//! Table, column and schema metadata.
//!
//! The portable [`DataType`] is the host's own type vocabulary. Facts the portable type
//! cannot carry (the native type code and name) travel alongside it as typed
//! [`ColumnAdapterNotes`], parsed once when the metadata is loaded.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dialect::NullSorting;
use crate::error::{VsError, VsResult};

/// Largest CHAR the host accepts.
pub const MAX_CHAR_SIZE: u32 = 2000;
/// Largest VARCHAR the host accepts.
pub const MAX_VARCHAR_SIZE: u32 = 2_000_000;
/// Largest DECIMAL precision the host accepts.
pub const MAX_DECIMAL_PRECISION: u32 = 36;

/// Character set of a portable text type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Charset {
    Utf8,
    Ascii,
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Charset::Utf8 => write!(f, "UTF8"),
            Charset::Ascii => write!(f, "ASCII"),
        }
    }
}

/// Portable column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Unsupported,
    Decimal { precision: u32, scale: u32 },
    Double,
    Varchar { size: u32, charset: Charset },
    Char { size: u32, charset: Charset },
    Date,
    Timestamp {
        #[serde(default)]
        with_local_time_zone: bool,
    },
    Boolean,
    Geometry { srid: u32 },
    IntervalYearToMonth { precision: u32 },
    IntervalDayToSecond { precision: u32, fraction: u32 },
    Hashtype { bytes: u32 },
}

impl DataType {
    pub fn decimal(precision: u32, scale: u32) -> Self {
        Self::Decimal { precision, scale }
    }

    pub fn varchar(size: u32, charset: Charset) -> Self {
        Self::Varchar { size, charset }
    }

    pub fn char(size: u32, charset: Charset) -> Self {
        Self::Char { size, charset }
    }

    pub fn timestamp() -> Self {
        Self::Timestamp {
            with_local_time_zone: false,
        }
    }

    /// VARCHAR of the maximum size the host supports.
    pub fn max_varchar(charset: Charset) -> Self {
        Self::varchar(MAX_VARCHAR_SIZE, charset)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, DataType::Unsupported)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Unsupported => write!(f, "UNSUPPORTED"),
            DataType::Decimal { precision, scale } => write!(f, "DECIMAL({}, {})", precision, scale),
            DataType::Double => write!(f, "DOUBLE"),
            DataType::Varchar { size, charset } => write!(f, "VARCHAR({}) {}", size, charset),
            DataType::Char { size, charset } => write!(f, "CHAR({}) {}", size, charset),
            DataType::Date => write!(f, "DATE"),
            DataType::Timestamp {
                with_local_time_zone,
            } => {
                write!(f, "TIMESTAMP")?;
                if *with_local_time_zone {
                    write!(f, " WITH LOCAL TIME ZONE")?;
                }
                Ok(())
            }
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::Geometry { srid } => write!(f, "GEOMETRY({})", srid),
            DataType::IntervalYearToMonth { precision } => {
                write!(f, "INTERVAL YEAR ({}) TO MONTH", precision)
            }
            DataType::IntervalDayToSecond {
                precision,
                fraction,
            } => write!(f, "INTERVAL DAY ({}) TO SECOND ({})", precision, fraction),
            DataType::Hashtype { bytes } => write!(f, "HASHTYPE({} BYTE)", bytes),
        }
    }
}

/// The foreign product's own type identity for one column, as reported by introspection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTypeDescriptor {
    pub jdbc_type: i32,
    pub type_name: String,
    #[serde(default)]
    pub precision_or_size: i32,
    #[serde(default)]
    pub decimal_scale: i32,
    #[serde(default)]
    pub byte_size: i32,
}

impl NativeTypeDescriptor {
    pub fn new(jdbc_type: i32, type_name: impl Into<String>) -> Self {
        Self {
            jdbc_type,
            type_name: type_name.into(),
            precision_or_size: 0,
            decimal_scale: 0,
            byte_size: 0,
        }
    }

    pub fn with_precision(mut self, precision_or_size: i32, decimal_scale: i32) -> Self {
        self.precision_or_size = precision_or_size;
        self.decimal_scale = decimal_scale;
        self
    }

    pub fn with_byte_size(mut self, byte_size: i32) -> Self {
        self.byte_size = byte_size;
        self
    }

    /// The subset of this descriptor that is persisted with the column.
    pub fn notes(&self) -> ColumnAdapterNotes {
        ColumnAdapterNotes {
            jdbc_data_type: self.jdbc_type,
            type_name: self.type_name.clone(),
        }
    }
}

/// Per-column adapter notes: `{"jdbcDataType": <int>, "typeName": <string>}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnAdapterNotes {
    pub jdbc_data_type: i32,
    pub type_name: String,
}

const COLUMN_NOTES_KEYS: [&str; 2] = ["jdbcDataType", "typeName"];

impl ColumnAdapterNotes {
    pub fn new(jdbc_data_type: i32, type_name: impl Into<String>) -> Self {
        Self {
            jdbc_data_type,
            type_name: type_name.into(),
        }
    }

    /// Parse the persisted notes of column `column_name`.
    pub fn parse(notes: Option<&str>, column_name: &str) -> VsResult<Self> {
        let notes = match notes {
            Some(n) if !n.trim().is_empty() => n,
            _ => {
                return Err(VsError::Metadata(format!(
                    "The adapternotes field of column {} are empty or null. Please refresh the virtual schema.",
                    column_name
                )));
            }
        };
        let unreadable = || {
            VsError::Metadata(format!(
                "Can not get the json object for column notes of column {}. Please refresh the virtual schema",
                column_name
            ))
        };
        let value: serde_json::Value = serde_json::from_str(notes).map_err(|_| unreadable())?;
        let object = value.as_object().ok_or_else(unreadable)?;
        for key in COLUMN_NOTES_KEYS {
            if !object.contains_key(key) {
                return Err(VsError::Metadata(format!(
                    "Adapter notes of column {} don't have the key {}. Please refresh the virtual schema",
                    column_name, key
                )));
            }
        }
        serde_json::from_value(value).map_err(|_| unreadable())
    }

    /// Serialize into the persisted JSON form.
    pub fn to_json(&self) -> VsResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Serialized shape of a column: the notes are still an opaque string here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawColumnMetadata {
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub adapter_notes: Option<String>,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<String>,
}

fn default_nullable() -> bool {
    true
}

/// A column of a virtual table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawColumnMetadata", into = "RawColumnMetadata")]
pub struct ColumnMetadata {
    pub name: String,
    pub data_type: DataType,
    pub notes: ColumnAdapterNotes,
    pub nullable: bool,
    pub default: Option<String>,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: DataType, notes: ColumnAdapterNotes) -> Self {
        Self {
            name: name.into(),
            data_type,
            notes,
            nullable: true,
            default: None,
        }
    }

    /// Native type name from the adapter notes, e.g. `TIMESTAMP(6)` or `bytea`.
    pub fn type_name(&self) -> &str {
        &self.notes.type_name
    }

    pub fn jdbc_type(&self) -> i32 {
        self.notes.jdbc_data_type
    }
}

impl TryFrom<RawColumnMetadata> for ColumnMetadata {
    type Error = VsError;

    fn try_from(raw: RawColumnMetadata) -> VsResult<Self> {
        let notes = ColumnAdapterNotes::parse(raw.adapter_notes.as_deref(), &raw.name)?;
        Ok(Self {
            name: raw.name,
            data_type: raw.data_type,
            notes,
            nullable: raw.nullable,
            default: raw.default,
        })
    }
}

impl From<ColumnMetadata> for RawColumnMetadata {
    fn from(column: ColumnMetadata) -> Self {
        Self {
            name: column.name,
            data_type: column.data_type,
            adapter_notes: serde_json::to_string(&column.notes).ok(),
            nullable: column.nullable,
            default: column.default,
        }
    }
}

/// A virtual table and its columns, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnMetadata>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// Per-schema adapter notes, persisted when the virtual schema is created or refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAdapterNotes {
    pub catalog_separator: String,
    pub identifier_quote_string: String,
    pub stores_lower_case_identifiers: bool,
    pub stores_upper_case_identifiers: bool,
    pub stores_mixed_case_identifiers: bool,
    pub supports_mixed_case_identifiers: bool,
    pub stores_lower_case_quoted_identifiers: bool,
    pub stores_upper_case_quoted_identifiers: bool,
    pub stores_mixed_case_quoted_identifiers: bool,
    pub supports_mixed_case_quoted_identifiers: bool,
    pub are_nulls_sorted_at_end: bool,
    pub are_nulls_sorted_at_start: bool,
    pub are_nulls_sorted_high: bool,
    pub are_nulls_sorted_low: bool,
}

const SCHEMA_NOTES_KEYS: [&str; 14] = [
    "catalogSeparator",
    "identifierQuoteString",
    "storesLowerCaseIdentifiers",
    "storesUpperCaseIdentifiers",
    "storesMixedCaseIdentifiers",
    "supportsMixedCaseIdentifiers",
    "storesLowerCaseQuotedIdentifiers",
    "storesUpperCaseQuotedIdentifiers",
    "storesMixedCaseQuotedIdentifiers",
    "supportsMixedCaseQuotedIdentifiers",
    "areNullsSortedAtEnd",
    "areNullsSortedAtStart",
    "areNullsSortedHigh",
    "areNullsSortedLow",
];

impl SchemaAdapterNotes {
    /// Parse the persisted notes of virtual schema `schema_name`.
    pub fn parse(notes: Option<&str>, schema_name: &str) -> VsResult<Self> {
        let notes = match notes {
            Some(n) if !n.trim().is_empty() => n,
            _ => {
                return Err(VsError::Metadata(format!(
                    "Adapter notes for virtual schema {} are empty or null. Please refresh the virtual schema",
                    schema_name
                )));
            }
        };
        let unreadable = || {
            VsError::Metadata(format!(
                "Could not parse the json which is expected to be stored in the adapter notes of virtual schema {}. Please refresh the virtual schema",
                schema_name
            ))
        };
        let value: serde_json::Value = serde_json::from_str(notes).map_err(|_| unreadable())?;
        let object = value.as_object().ok_or_else(unreadable)?;
        for key in SCHEMA_NOTES_KEYS {
            if !object.contains_key(key) {
                return Err(VsError::Metadata(format!(
                    "Adapter notes of virtual schema {} don't have the key {}. Please refresh the virtual schema",
                    schema_name, key
                )));
            }
        }
        serde_json::from_value(value).map_err(|_| unreadable())
    }

    pub fn to_json(&self) -> VsResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The null sorting of the foreign database. Exactly one flag is expected to be set.
    pub fn null_sorting(&self) -> NullSorting {
        if self.are_nulls_sorted_at_end {
            NullSorting::AtEnd
        } else if self.are_nulls_sorted_at_start {
            NullSorting::AtStart
        } else if self.are_nulls_sorted_low {
            NullSorting::Low
        } else {
            NullSorting::High
        }
    }
}
