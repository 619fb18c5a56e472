//! Push-down request as handed over by the host, in JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ast::Statement;
use crate::config::AdapterProperties;
use crate::error::VsResult;
use crate::metadata::SchemaAdapterNotes;
use crate::transpiler::RenderContext;

/// One query to push down, plus the adapter notes of the virtual schema it runs in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushdownRequest {
    pub statement: Statement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    /// Persisted schema adapter notes, still as the raw JSON string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_notes: Option<String>,
}

impl PushdownRequest {
    pub fn new(statement: impl Into<Statement>) -> Self {
        Self {
            statement: statement.into(),
            schema_name: None,
            schema_notes: None,
        }
    }

    pub fn from_json(text: &str) -> VsResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> VsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Rendering context from the properties, with the null sorting reported in the
    /// schema notes if the request carries any.
    pub fn render_context(&self, properties: &AdapterProperties) -> VsResult<RenderContext> {
        let context = RenderContext::from_properties(properties);
        match &self.schema_notes {
            None => Ok(context),
            Some(notes) => {
                let schema_name = self.schema_name.as_deref().unwrap_or_default();
                let notes = SchemaAdapterNotes::parse(Some(notes), schema_name)?;
                Ok(context.with_schema_notes(&notes))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Select, SelectList};
    use crate::dialect::NullSorting;
    use crate::error::VsError;

    const REQUEST: &str = r#"{
        "statement": {
            "type": "select",
            "selectList": {"kind": "all"},
            "from": {"table": {"name": "T", "columns": []}}
        },
        "schemaName": "VS"
    }"#;

    #[test]
    fn test_from_json() {
        let request = PushdownRequest::from_json(REQUEST).unwrap();
        let Statement::Select(Select { select_list, .. }) = &request.statement;
        assert_eq!(select_list, &SelectList::All);
        assert_eq!(request.schema_name.as_deref(), Some("VS"));
    }

    #[test]
    fn test_render_context_uses_schema_notes() {
        let mut request = PushdownRequest::from_json(REQUEST).unwrap();
        request.schema_notes = Some(
            r#"{"catalogSeparator":".","identifierQuoteString":"\"","storesLowerCaseIdentifiers":false,
                "storesUpperCaseIdentifiers":true,"storesMixedCaseIdentifiers":false,
                "supportsMixedCaseIdentifiers":false,"storesLowerCaseQuotedIdentifiers":false,
                "storesUpperCaseQuotedIdentifiers":false,"storesMixedCaseQuotedIdentifiers":true,
                "supportsMixedCaseQuotedIdentifiers":true,"areNullsSortedAtEnd":true,
                "areNullsSortedAtStart":false,"areNullsSortedHigh":false,"areNullsSortedLow":false}"#
                .to_string(),
        );
        let context = request.render_context(&AdapterProperties::new()).unwrap();
        assert_eq!(context.null_sorting, Some(NullSorting::AtEnd));
    }

    #[test]
    fn test_corrupt_schema_notes() {
        let mut request = PushdownRequest::from_json(REQUEST).unwrap();
        request.schema_notes = Some("{".to_string());
        let err = request.render_context(&AdapterProperties::new()).unwrap_err();
        assert!(matches!(err, VsError::Metadata(_)));
        assert!(err.to_string().ends_with("Please refresh the virtual schema"));
    }
}
