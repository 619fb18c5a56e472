//! Connection definitions for `IMPORT` statements.
//!
//! Precedence: explicit `CONNECTION_STRING` + `USERNAME` + `PASSWORD` wins; otherwise the
//! named connection from `CONNECTION_NAME` is used, with any individually set property
//! overriding the named connection's value. Both fallbacks are deprecated and logged.

use serde::{Deserialize, Serialize};

use crate::config::{AdapterProperties, keys};
use crate::error::{VsError, VsResult};

use super::import::statement_literal;

const INCOMPLETE_CONNECTION: &str = "Incomplete remote connection information. Please specify at least a named \
     connection with CONNECTION_NAME or individual connetion properties CONNECTION_STRING, USERNAME and PASSWORD.";

const INCOMPLETE_EXA_CONNECTION: &str = "Incomplete remote connection information. Please specify an Exasol \
     connection string with property EXA_CONNECTION_STRING plus either a named connection with CONNECTION_NAME \
     or individual connetion properties CONNECTION_STRING, USERNAME and PASSWORD.";

const MISSING_ORA_CONNECTION: &str = "If you enable IMPORT FROM ORA with property \"IMPORT_FROM_ORA\" you also \
     need to provide the name of an Oracle connection with \"ORA_CONNECTION_NAME\".";

/// Details of a named connection, as stored by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInformation {
    pub address: String,
    pub user: String,
    pub password: String,
}

impl ConnectionInformation {
    pub fn new(address: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            user: user.into(),
            password: password.into(),
        }
    }
}

/// Fail if the properties cannot produce a connection definition.
pub fn check_complete(properties: &AdapterProperties) -> VsResult<()> {
    if properties.is_enabled(keys::IMPORT_FROM_ORA) {
        if !properties.contains(keys::ORA_CONNECTION_NAME) {
            return Err(VsError::config(MISSING_ORA_CONNECTION));
        }
    } else if properties.is_enabled(keys::IMPORT_FROM_EXA) {
        let credentials = properties.username().is_some() && properties.password().is_some();
        if !properties.contains(keys::EXA_CONNECTION_STRING)
            || !(credentials || properties.connection_name().is_some())
        {
            return Err(VsError::config(INCOMPLETE_EXA_CONNECTION));
        }
    } else if !has_individual_credentials(properties) && properties.connection_name().is_none() {
        return Err(VsError::config(INCOMPLETE_CONNECTION));
    }
    Ok(())
}

/// `AT <name>` or `AT '<address>' USER '<user>' IDENTIFIED BY '<password>'` for `FROM JDBC`.
pub fn jdbc_definition(
    properties: &AdapterProperties,
    named: Option<&ConnectionInformation>,
) -> VsResult<String> {
    if let (Some(address), Some(user), Some(password)) = (
        properties.connection_string(),
        properties.username(),
        properties.password(),
    ) {
        warn_individual_credentials();
        return Ok(credentials_definition(address, user, password));
    }
    let Some(name) = properties.connection_name() else {
        return Err(VsError::config(INCOMPLETE_CONNECTION));
    };
    let overridden = properties.connection_string().is_some()
        || properties.username().is_some()
        || properties.password().is_some();
    if !overridden {
        return Ok(format!("AT {}", name));
    }
    warn_overridden_named_connection();
    let named = named_connection(name, named)?;
    Ok(credentials_definition(
        properties.connection_string().unwrap_or(named.address.as_str()),
        properties.username().unwrap_or(named.user.as_str()),
        properties.password().unwrap_or(named.password.as_str()),
    ))
}

/// Connection definition for `IMPORT FROM EXA`. The address is always `EXA_CONNECTION_STRING`.
pub fn exa_definition(
    properties: &AdapterProperties,
    named: Option<&ConnectionInformation>,
) -> VsResult<String> {
    let Some(address) = properties.get(keys::EXA_CONNECTION_STRING) else {
        return Err(VsError::config(INCOMPLETE_EXA_CONNECTION));
    };
    if let (Some(user), Some(password)) = (properties.username(), properties.password()) {
        warn_individual_credentials();
        return Ok(credentials_definition(address, user, password));
    }
    let Some(name) = properties.connection_name() else {
        return Err(VsError::config(INCOMPLETE_EXA_CONNECTION));
    };
    let named = named_connection(name, named)?;
    if properties.username().is_some() || properties.password().is_some() {
        warn_overridden_named_connection();
    } else {
        tracing::debug!(address, connection = name, "mixing Exasol connection string into named connection");
    }
    Ok(credentials_definition(
        address,
        properties.username().unwrap_or(named.user.as_str()),
        properties.password().unwrap_or(named.password.as_str()),
    ))
}

/// Connection definition for `IMPORT FROM ORA`.
pub fn ora_definition(properties: &AdapterProperties) -> VsResult<String> {
    let Some(name) = properties.get(keys::ORA_CONNECTION_NAME) else {
        return Err(VsError::config(MISSING_ORA_CONNECTION));
    };
    match (properties.username(), properties.password()) {
        (Some(user), Some(password)) if properties.connection_name().is_none() => {
            warn_individual_credentials();
            Ok(format!(
                "AT {} USER {} IDENTIFIED BY {}",
                name,
                statement_literal(user),
                statement_literal(password)
            ))
        }
        _ => Ok(format!("AT {}", name)),
    }
}

fn has_individual_credentials(properties: &AdapterProperties) -> bool {
    properties.connection_string().is_some() && properties.username().is_some() && properties.password().is_some()
}

fn named_connection<'a>(
    name: &str,
    named: Option<&'a ConnectionInformation>,
) -> VsResult<&'a ConnectionInformation> {
    named.ok_or_else(|| {
        VsError::config(format!(
            "Unable to access information about the Exasol connection named \"{}\" trying to create a \
             connection definition for rewritten query.",
            name
        ))
    })
}

fn credentials_definition(address: &str, user: &str, password: &str) -> String {
    format!(
        "AT {} USER {} IDENTIFIED BY {}",
        statement_literal(address),
        statement_literal(user),
        statement_literal(password)
    )
}

fn warn_individual_credentials() {
    tracing::warn!(
        "Defining credentials individually with properties is deprecated. \
         Provide a connection name instead in property {}.",
        keys::CONNECTION_NAME
    );
}

fn warn_overridden_named_connection() {
    tracing::warn!(
        "Overriding details of a named connection with individually with properties is deprecated. \
         Provide only the connection name in property {}.",
        keys::CONNECTION_NAME
    );
}
