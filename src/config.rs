//! Adapter properties.
//!
//! Properties arrive as a flat string map, either set by the host, passed as `KEY=VALUE`
//! pairs on the command line, or read from a TOML file. They are validated once, before
//! anything is rendered.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use nom::{
    IResult,
    bytes::complete::tag,
    character::complete::{digit1, space0},
    combinator::{all_consuming, map_res},
    sequence::{delimited, separated_pair},
};
use serde::{Deserialize, Serialize};

use crate::dialect::{Dialect, capabilities::parse_capability};
use crate::error::{VsError, VsResult};
use crate::types::BinaryColumnHandling;

/// Property names.
pub mod keys {
    pub const SQL_DIALECT: &str = "SQL_DIALECT";
    pub const CONNECTION_NAME: &str = "CONNECTION_NAME";
    pub const CONNECTION_STRING: &str = "CONNECTION_STRING";
    pub const USERNAME: &str = "USERNAME";
    pub const PASSWORD: &str = "PASSWORD";
    pub const CATALOG_NAME: &str = "CATALOG_NAME";
    pub const SCHEMA_NAME: &str = "SCHEMA_NAME";
    pub const TABLE_FILTER: &str = "TABLE_FILTER";
    pub const EXCLUDED_CAPABILITIES: &str = "EXCLUDED_CAPABILITIES";
    pub const DEBUG_ADDRESS: &str = "DEBUG_ADDRESS";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const IGNORE_ERRORS: &str = "IGNORE_ERRORS";
    pub const BINARY_COLUMN_HANDLING: &str = "BINARY_COLUMN_HANDLING";
    pub const IS_LOCAL: &str = "IS_LOCAL";
    pub const IMPORT_FROM_EXA: &str = "IMPORT_FROM_EXA";
    pub const EXA_CONNECTION_STRING: &str = "EXA_CONNECTION_STRING";
    pub const IMPORT_FROM_ORA: &str = "IMPORT_FROM_ORA";
    pub const ORA_CONNECTION_NAME: &str = "ORA_CONNECTION_NAME";
    pub const ORACLE_CAST_NUMBER_TO_DECIMAL: &str =
        "ORACLE_CAST_NUMBER_TO_DECIMAL_WITH_PRECISION_AND_SCALE";
    pub const POSTGRESQL_IDENTIFIER_MAPPING: &str = "POSTGRESQL_IDENTIFIER_MAPPING";
    pub const BIGQUERY_ENABLE_IMPORT: &str = "BIGQUERY_ENABLE_IMPORT";
}

/// Properties every dialect accepts.
pub const COMMON_PROPERTIES: &[&str] = &[
    keys::SQL_DIALECT,
    keys::CONNECTION_NAME,
    keys::CONNECTION_STRING,
    keys::USERNAME,
    keys::PASSWORD,
    keys::TABLE_FILTER,
    keys::EXCLUDED_CAPABILITIES,
    keys::DEBUG_ADDRESS,
    keys::LOG_LEVEL,
    keys::BINARY_COLUMN_HANDLING,
];

const BOOLEAN_PROPERTIES: &[&str] = &[
    keys::IS_LOCAL,
    keys::IMPORT_FROM_EXA,
    keys::IMPORT_FROM_ORA,
    keys::BIGQUERY_ENABLE_IMPORT,
    keys::IGNORE_ERRORS,
];

/// How PostgreSQL identifiers are mapped into the virtual schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostgresIdentifierMapping {
    #[default]
    ConvertToUpper,
    PreserveOriginalCase,
}

impl PostgresIdentifierMapping {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "CONVERT_TO_UPPER" => Some(Self::ConvertToUpper),
            "PRESERVE_ORIGINAL_CASE" => Some(Self::PreserveOriginalCase),
            _ => None,
        }
    }
}

/// Ordered `KEY -> VALUE` map of adapter properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdapterProperties {
    values: BTreeMap<String, String>,
}

impl AdapterProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Parse `KEY=VALUE` pairs, e.g. from repeated `--property` flags.
    pub fn from_pairs<I, S>(pairs: I) -> VsResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut properties = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                VsError::config(format!("Invalid property '{}'. Expected KEY=VALUE", pair))
            })?;
            properties.set(key.trim(), value.trim());
        }
        Ok(properties)
    }

    /// Parse a flat TOML table. Booleans and integers are stored in their text form.
    pub fn from_toml_str(text: &str) -> VsResult<Self> {
        let table: toml::Table = text
            .parse()
            .map_err(|e: toml::de::Error| VsError::config(format!("Invalid properties file: {}", e)))?;
        let mut properties = Self::new();
        for (key, value) in table {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Boolean(b) => if b { "TRUE" } else { "FALSE" }.to_string(),
                toml::Value::Integer(i) => i.to_string(),
                other => {
                    return Err(VsError::config(format!(
                        "Property {} must be a string, boolean or integer, found {}",
                        key,
                        other.type_str()
                    )));
                }
            };
            properties.values.insert(key, value);
        }
        Ok(properties)
    }

    /// Load properties from a TOML file.
    pub fn load(path: &Path) -> VsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading adapter properties");
        Self::from_toml_str(&text)
    }

    /// `<config dir>/vschema/adapter.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vschema").join("adapter.toml"))
    }

    /// Layer `other` on top of these properties.
    pub fn merge(mut self, other: AdapterProperties) -> Self {
        self.values.extend(other.values);
        self
    }

    /// Value of `key`. Empty values count as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// True if a boolean property is set to `TRUE` (case insensitive).
    pub fn is_enabled(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.eq_ignore_ascii_case("TRUE"))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn catalog_name(&self) -> Option<&str> {
        self.get(keys::CATALOG_NAME)
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.get(keys::SCHEMA_NAME)
    }

    pub fn connection_name(&self) -> Option<&str> {
        self.get(keys::CONNECTION_NAME)
    }

    pub fn connection_string(&self) -> Option<&str> {
        self.get(keys::CONNECTION_STRING)
    }

    pub fn username(&self) -> Option<&str> {
        self.get(keys::USERNAME)
    }

    pub fn password(&self) -> Option<&str> {
        self.get(keys::PASSWORD)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.get(keys::LOG_LEVEL)
    }

    pub fn is_local(&self) -> bool {
        self.is_enabled(keys::IS_LOCAL)
    }

    /// Table names from `TABLE_FILTER`.
    pub fn filtered_tables(&self) -> Vec<String> {
        split_list(self.get(keys::TABLE_FILTER))
    }

    /// Capability names from `EXCLUDED_CAPABILITIES`.
    pub fn excluded_capabilities(&self) -> Vec<String> {
        split_list(self.get(keys::EXCLUDED_CAPABILITIES))
    }

    pub fn binary_column_handling(&self) -> VsResult<BinaryColumnHandling> {
        match self.get(keys::BINARY_COLUMN_HANDLING) {
            None => Ok(BinaryColumnHandling::default()),
            Some(value) => BinaryColumnHandling::from_name(value).ok_or_else(|| {
                VsError::config(format!(
                    "Invalid value '{}' for property {}. Choose one of: IGNORE, ENCODE_BASE16.",
                    value,
                    keys::BINARY_COLUMN_HANDLING
                ))
            }),
        }
    }

    pub fn postgres_identifier_mapping(&self) -> VsResult<PostgresIdentifierMapping> {
        match self.get(keys::POSTGRESQL_IDENTIFIER_MAPPING) {
            None => Ok(PostgresIdentifierMapping::default()),
            Some(value) => PostgresIdentifierMapping::from_name(value).ok_or_else(|| {
                VsError::config(format!(
                    "Value for {} must be PRESERVE_ORIGINAL_CASE or CONVERT_TO_UPPER",
                    keys::POSTGRESQL_IDENTIFIER_MAPPING
                ))
            }),
        }
    }

    /// Precision and scale Oracle `NUMBER` columns without a usable precision are cast to.
    pub fn oracle_number_decimal(&self) -> VsResult<Option<(u32, u32)>> {
        let Some(value) = self.get(keys::ORACLE_CAST_NUMBER_TO_DECIMAL) else {
            return Ok(None);
        };
        match all_consuming(precision_and_scale)(value) {
            Ok((_, parsed)) => Ok(Some(parsed)),
            Err(_) => Err(VsError::config(format!(
                "Unable to parse adapter property {} value \"{}\" into a number precision and scale. \
                 The required format is \"<precision>,<scale>\", where both are integer numbers.",
                keys::ORACLE_CAST_NUMBER_TO_DECIMAL,
                value
            ))),
        }
    }

    /// Check the properties against what `dialect` accepts.
    pub fn validate(&self, dialect: &Dialect) -> VsResult<()> {
        self.validate_supported(dialect)?;
        self.validate_booleans()?;
        self.validate_debug_address()?;
        self.validate_import_consistency(keys::IMPORT_FROM_EXA, keys::EXA_CONNECTION_STRING)?;
        self.validate_import_consistency(keys::IMPORT_FROM_ORA, keys::ORA_CONNECTION_NAME)?;
        self.oracle_number_decimal()?;
        self.postgres_identifier_mapping()?;
        self.binary_column_handling()?;
        for name in self.excluded_capabilities() {
            parse_capability(&name)?;
        }
        if crate::rewriter::DeliveryStrategy::select(*dialect, self).needs_connection_definition() {
            crate::rewriter::connection::check_complete(self)?;
        }
        Ok(())
    }

    fn validate_supported(&self, dialect: &Dialect) -> VsResult<()> {
        let supported = dialect.supported_properties();
        for key in self.values.keys() {
            if !COMMON_PROPERTIES.contains(&key.as_str()) && !supported.contains(&key.as_str()) {
                return Err(VsError::config(format!(
                    "The dialect {} does not support {} property. Please, do not set the \"{}\" property.",
                    dialect, key, key
                )));
            }
        }
        Ok(())
    }

    fn validate_booleans(&self) -> VsResult<()> {
        for key in BOOLEAN_PROPERTIES {
            if let Some(value) = self.get(key) {
                if !value.eq_ignore_ascii_case("TRUE") && !value.eq_ignore_ascii_case("FALSE") {
                    return Err(VsError::config(format!(
                        "The value '{}' for the property {} is invalid. It has to be either 'true' or 'false' (case insensitive).",
                        value, key
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_debug_address(&self) -> VsResult<()> {
        let Some(address) = self.get(keys::DEBUG_ADDRESS) else {
            return Ok(());
        };
        let valid = match address.split_once(':') {
            Some((host, port)) => !host.is_empty() && !port.contains(':') && port.parse::<u16>().is_ok(),
            None => false,
        };
        if valid {
            Ok(())
        } else {
            Err(VsError::config(format!(
                "You specified an invalid hostname and port for the udf debug service ({}). \
                 Please provide a valid value, e.g. 'hostname:3000'",
                keys::DEBUG_ADDRESS
            )))
        }
    }

    fn validate_import_consistency(&self, switch: &str, connection: &str) -> VsResult<()> {
        let is_import = self.is_enabled(switch);
        let has_connection = self.contains(connection);
        if is_import && !has_connection {
            return Err(VsError::config(format!(
                "You defined the property {}, please also define {}",
                switch, connection
            )));
        }
        if !is_import && has_connection {
            return Err(VsError::config(format!(
                "You defined the property {} without setting {} to 'TRUE'. This is not allowed",
                connection, switch
            )));
        }
        Ok(())
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(delimited(space0, digit1, space0), str::parse)(input)
}

/// `<precision>,<scale>` with optional blanks around both numbers.
fn precision_and_scale(input: &str) -> IResult<&str, (u32, u32)> {
    separated_pair(number, tag(","), number)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs() {
        let props = AdapterProperties::from_pairs(["SCHEMA_NAME=s", "TABLE_FILTER= a, b ,,c"]).unwrap();
        assert_eq!(props.schema_name(), Some("s"));
        assert_eq!(props.filtered_tables(), vec!["a", "b", "c"]);
        assert!(AdapterProperties::from_pairs(["NOPE"]).is_err());
    }

    #[test]
    fn test_from_toml() {
        let props = AdapterProperties::from_toml_str(
            "SQL_DIALECT = \"EXASOL\"\nIS_LOCAL = true\nDEBUG_ADDRESS = \"host:3000\"\n",
        )
        .unwrap();
        assert!(props.is_local());
        assert_eq!(props.get(keys::SQL_DIALECT), Some("EXASOL"));
        assert!(AdapterProperties::from_toml_str("X = [1, 2]").is_err());
    }

    #[test]
    fn test_empty_values_are_unset() {
        let props = AdapterProperties::new().with(keys::CATALOG_NAME, "");
        assert_eq!(props.catalog_name(), None);
    }

    #[test]
    fn test_oracle_number_decimal() {
        let props = AdapterProperties::new().with(keys::ORACLE_CAST_NUMBER_TO_DECIMAL, " 36 , 2 ");
        assert_eq!(props.oracle_number_decimal().unwrap(), Some((36, 2)));
        let bad = AdapterProperties::new().with(keys::ORACLE_CAST_NUMBER_TO_DECIMAL, "36.2");
        let err = bad.oracle_number_decimal().unwrap_err().to_string();
        assert!(err.starts_with("Unable to parse adapter property"), "{}", err);
    }

    #[test]
    fn test_validate_unsupported_property() {
        let props = AdapterProperties::new()
            .with(keys::CONNECTION_NAME, "C")
            .with(keys::IMPORT_FROM_ORA, "TRUE");
        let err = props.validate(&Dialect::Postgresql).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The dialect POSTGRESQL does not support IMPORT_FROM_ORA property. Please, do not set the \"IMPORT_FROM_ORA\" property."
        );
    }

    #[test]
    fn test_validate_booleans() {
        let props = AdapterProperties::new()
            .with(keys::CONNECTION_NAME, "C")
            .with(keys::IS_LOCAL, "yes");
        let err = props.validate(&Dialect::Exasol).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The value 'yes' for the property IS_LOCAL is invalid. It has to be either 'true' or 'false' (case insensitive)."
        );
    }

    #[test]
    fn test_validate_import_consistency() {
        let missing = AdapterProperties::new()
            .with(keys::CONNECTION_NAME, "C")
            .with(keys::IMPORT_FROM_EXA, "true");
        assert_eq!(
            missing.validate(&Dialect::Exasol).unwrap_err().to_string(),
            "You defined the property IMPORT_FROM_EXA, please also define EXA_CONNECTION_STRING"
        );
        let dangling = AdapterProperties::new()
            .with(keys::CONNECTION_NAME, "C")
            .with(keys::EXA_CONNECTION_STRING, "localhost:8563");
        assert_eq!(
            dangling.validate(&Dialect::Exasol).unwrap_err().to_string(),
            "You defined the property EXA_CONNECTION_STRING without setting IMPORT_FROM_EXA to 'TRUE'. This is not allowed"
        );
    }

    #[test]
    fn test_validate_debug_address() {
        let props = AdapterProperties::new()
            .with(keys::CONNECTION_NAME, "C")
            .with(keys::DEBUG_ADDRESS, "host");
        assert!(props.validate(&Dialect::Mysql).is_err());
        let ok = AdapterProperties::new()
            .with(keys::CONNECTION_NAME, "C")
            .with(keys::DEBUG_ADDRESS, "host:3000");
        assert!(ok.validate(&Dialect::Mysql).is_ok());
    }

    #[test]
    fn test_validate_excluded_capabilities() {
        let props = AdapterProperties::new()
            .with(keys::CONNECTION_NAME, "C")
            .with(keys::EXCLUDED_CAPABILITIES, "LIMIT, FN_NOPE");
        assert_eq!(
            props.validate(&Dialect::Mysql).unwrap_err().to_string(),
            "Unknown capability 'FN_NOPE' in EXCLUDED_CAPABILITIES"
        );
    }

    #[test]
    fn test_validate_incomplete_connection() {
        let props = AdapterProperties::new().with(keys::USERNAME, "u");
        let err = props.validate(&Dialect::Mysql).unwrap_err();
        assert!(err.to_string().starts_with("Incomplete remote connection information."));
        // BigQuery materializes through the local connection and needs no definition.
        assert!(AdapterProperties::new().validate(&Dialect::Bigquery).is_ok());
    }

    #[test]
    fn test_postgres_mapping() {
        let props = AdapterProperties::new()
            .with(keys::CONNECTION_NAME, "C")
            .with(keys::POSTGRESQL_IDENTIFIER_MAPPING, "LOWER");
        assert_eq!(
            props.validate(&Dialect::Postgresql).unwrap_err().to_string(),
            "Value for POSTGRESQL_IDENTIFIER_MAPPING must be PRESERVE_ORIGINAL_CASE or CONVERT_TO_UPPER"
        );
    }
}
