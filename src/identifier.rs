//! Identifier quoting and case folding.
//!
//! Two independent axes decide how an identifier is written into foreign SQL:
//! the quoting style (fixed per dialect) and the case handling of quoted and
//! unquoted identifiers. An identifier is only quoted when writing it bare
//! would make the foreign parser resolve a different spelling.

use crate::metadata::SchemaAdapterNotes;

/// How the foreign parser treats the case of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierCaseHandling {
    InterpretAsUpper,
    InterpretAsLower,
    InterpretCaseSensitive,
}

impl IdentifierCaseHandling {
    fn fold(&self, identifier: &str) -> String {
        match self {
            IdentifierCaseHandling::InterpretAsUpper => identifier.to_uppercase(),
            IdentifierCaseHandling::InterpretAsLower => identifier.to_lowercase(),
            IdentifierCaseHandling::InterpretCaseSensitive => identifier.to_string(),
        }
    }

    fn from_flags(supports_mixed: bool, stores_lower: bool, stores_upper: bool) -> Self {
        if supports_mixed {
            IdentifierCaseHandling::InterpretCaseSensitive
        } else if stores_lower {
            IdentifierCaseHandling::InterpretAsLower
        } else if stores_upper {
            IdentifierCaseHandling::InterpretAsUpper
        } else {
            IdentifierCaseHandling::InterpretCaseSensitive
        }
    }
}

/// Quote characters and the escaping applied inside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `"id"`, embedded `"` doubled.
    DoubleQuote,
    /// `[id]`, embedded `]` doubled.
    Bracket,
    /// `` `id` ``, embedded backtick doubled.
    Backtick,
    /// `` `id` ``, embedded backtick and backslash escaped with a backslash.
    BacktickBackslash,
}

impl QuoteStyle {
    pub fn quote(&self, identifier: &str) -> String {
        match self {
            QuoteStyle::DoubleQuote => format!("\"{}\"", identifier.replace('"', "\"\"")),
            QuoteStyle::Bracket => format!("[{}]", identifier.replace(']', "]]")),
            QuoteStyle::Backtick => format!("`{}`", identifier.replace('`', "``")),
            QuoteStyle::BacktickBackslash => {
                format!("`{}`", identifier.replace('\\', "\\\\").replace('`', "\\`"))
            }
        }
    }

    /// Inverse of [`QuoteStyle::quote`]. Returns `None` if `text` is not quoted in this style.
    pub fn unquote(&self, text: &str) -> Option<String> {
        let (open, close) = match self {
            QuoteStyle::DoubleQuote => ('"', '"'),
            QuoteStyle::Bracket => ('[', ']'),
            QuoteStyle::Backtick | QuoteStyle::BacktickBackslash => ('`', '`'),
        };
        let inner = text.strip_prefix(open)?.strip_suffix(close)?;
        Some(match self {
            QuoteStyle::DoubleQuote => inner.replace("\"\"", "\""),
            QuoteStyle::Bracket => inner.replace("]]", "]"),
            QuoteStyle::Backtick => inner.replace("``", "`"),
            QuoteStyle::BacktickBackslash => unescape_backslashes(inner),
        })
    }
}

fn unescape_backslashes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Rule used by [`IdentifierConverter::convert`] to turn foreign names into host names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionRule {
    /// Upper-case when quoted and unquoted handling agree and are not case sensitive.
    UpperWhenUniform,
    /// Upper-case identifiers that the foreign system stores in its folded lower case.
    UpperWhenRegularLower,
    /// Keep the spelling.
    Preserve,
}

/// Words that are always quoted, whatever the case handling.
const RESERVED_WORDS: &[&str] = &[
    "ALL", "AND", "ANY", "AS", "ASC", "AUTHORIZATION", "BETWEEN", "BY", "CASE", "CAST", "CHECK",
    "COLUMN", "CONSTRAINT", "CREATE", "CROSS", "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP",
    "CURRENT_USER", "DATE", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END",
    "ESCAPE", "EXCEPT", "EXISTS", "FALSE", "FETCH", "FOR", "FOREIGN", "FROM", "FULL", "GRANT",
    "GROUP", "HAVING", "IN", "INNER", "INSERT", "INTERSECT", "INTERVAL", "INTO", "IS", "JOIN",
    "KEY", "LEFT", "LIKE", "LIMIT", "NATURAL", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER",
    "OUTER", "PRIMARY", "REFERENCES", "RIGHT", "ROW", "ROWNUM", "ROWS", "SCHEMA", "SELECT",
    "SESSION_USER", "SET", "SOME", "TABLE", "THEN", "TIME", "TIMESTAMP", "TO", "TOP", "TRUE",
    "UNION", "UNIQUE", "UPDATE", "USER", "USING", "VALUES", "VIEW", "WHEN", "WHERE", "WITH",
];

/// Quotes and case-folds identifiers for one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierConverter {
    pub unquoted: IdentifierCaseHandling,
    pub quoted: IdentifierCaseHandling,
    pub style: QuoteStyle,
    pub rule: ConversionRule,
    /// Lower-case identifiers before quoting. Used where host names are upper case and the
    /// foreign system folds to lower case.
    pub lower_case_before_quoting: bool,
    /// Keywords of this dialect on top of the common keyword list, upper case.
    pub reserved_words: &'static [&'static str],
}

impl IdentifierConverter {
    pub fn new(unquoted: IdentifierCaseHandling, quoted: IdentifierCaseHandling, style: QuoteStyle) -> Self {
        Self {
            unquoted,
            quoted,
            style,
            rule: ConversionRule::UpperWhenUniform,
            lower_case_before_quoting: false,
            reserved_words: &[],
        }
    }

    /// Unquoted identifiers fold to upper case, quoted ones are case sensitive.
    pub fn upper_case(style: QuoteStyle) -> Self {
        Self::new(
            IdentifierCaseHandling::InterpretAsUpper,
            IdentifierCaseHandling::InterpretCaseSensitive,
            style,
        )
    }

    /// Unquoted identifiers keep their spelling.
    pub fn case_sensitive(style: QuoteStyle) -> Self {
        Self::new(
            IdentifierCaseHandling::InterpretCaseSensitive,
            IdentifierCaseHandling::InterpretCaseSensitive,
            style,
        )
        .with_rule(ConversionRule::Preserve)
    }

    /// Derive the case handling from the flags persisted in the schema adapter notes.
    pub fn from_schema_notes(notes: &SchemaAdapterNotes, style: QuoteStyle) -> Self {
        let unquoted = IdentifierCaseHandling::from_flags(
            notes.supports_mixed_case_identifiers,
            notes.stores_lower_case_identifiers,
            notes.stores_upper_case_identifiers,
        );
        let quoted = IdentifierCaseHandling::from_flags(
            notes.supports_mixed_case_quoted_identifiers,
            notes.stores_lower_case_quoted_identifiers,
            notes.stores_upper_case_quoted_identifiers,
        );
        Self::new(unquoted, quoted, style)
    }

    pub fn with_rule(mut self, rule: ConversionRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_reserved_words(mut self, words: &'static [&'static str]) -> Self {
        self.reserved_words = words;
        self
    }

    pub fn lower_case_before_quoting(mut self, lower: bool) -> Self {
        self.lower_case_before_quoting = lower;
        self
    }

    /// Write `identifier` so that the foreign parser resolves exactly this spelling.
    pub fn quote(&self, identifier: &str) -> String {
        let identifier = if self.lower_case_before_quoting {
            identifier.to_lowercase()
        } else {
            identifier.to_string()
        };
        if self.needs_quoting(&identifier) {
            self.style.quote(&identifier)
        } else {
            identifier
        }
    }

    /// How the foreign parser resolves identifier text written by [`IdentifierConverter::quote`].
    pub fn unquote(&self, text: &str) -> String {
        match self.style.unquote(text) {
            Some(inner) => self.quoted.fold(&inner),
            None => self.unquoted.fold(text),
        }
    }

    /// True if writing `identifier` bare would change what the foreign parser resolves.
    pub fn needs_quoting(&self, identifier: &str) -> bool {
        !is_regular_identifier(identifier)
            || self.unquoted.fold(identifier) != identifier
            || self.is_reserved(identifier)
    }

    /// True if `identifier` is a keyword, in any case.
    pub fn is_reserved(&self, identifier: &str) -> bool {
        let upper = identifier.to_uppercase();
        RESERVED_WORDS.contains(&upper.as_str()) || self.reserved_words.contains(&upper.as_str())
    }

    /// Apply the case folding alone, for identifiers that are compared rather than emitted.
    pub fn convert(&self, identifier: &str) -> String {
        match self.rule {
            ConversionRule::UpperWhenUniform => {
                if self.quoted == self.unquoted
                    && self.quoted != IdentifierCaseHandling::InterpretCaseSensitive
                {
                    identifier.to_uppercase()
                } else {
                    identifier.to_string()
                }
            }
            ConversionRule::UpperWhenRegularLower => {
                if is_regular_lower(identifier) {
                    identifier.to_uppercase()
                } else {
                    identifier.to_string()
                }
            }
            ConversionRule::Preserve => identifier.to_string(),
        }
    }
}

fn is_regular_identifier(identifier: &str) -> bool {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn is_regular_lower(identifier: &str) -> bool {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "C1", "c1", "Mixed", "with space", "quote\"inside", "back`tick", "br]acket", "back\\slash",
        "schema", "TABLE", "_x", "1abc", "",
    ];

    fn converters() -> Vec<IdentifierConverter> {
        vec![
            IdentifierConverter::upper_case(QuoteStyle::DoubleQuote),
            IdentifierConverter::new(
                IdentifierCaseHandling::InterpretAsLower,
                IdentifierCaseHandling::InterpretCaseSensitive,
                QuoteStyle::DoubleQuote,
            ),
            IdentifierConverter::case_sensitive(QuoteStyle::Bracket),
            IdentifierConverter::case_sensitive(QuoteStyle::Backtick),
            IdentifierConverter::case_sensitive(QuoteStyle::BacktickBackslash),
        ]
    }

    #[test]
    fn test_round_trip() {
        for converter in converters() {
            for sample in SAMPLES {
                let quoted = converter.quote(sample);
                assert_eq!(converter.unquote(&quoted), *sample, "{:?} via {}", converter.style, quoted);
            }
        }
    }

    #[test]
    fn test_quote_is_injective() {
        for converter in converters() {
            let mut seen = std::collections::HashSet::new();
            for sample in SAMPLES {
                assert!(seen.insert(converter.quote(sample)), "collision for {}", sample);
            }
        }
    }

    #[test]
    fn test_quote_only_when_needed() {
        let upper = IdentifierConverter::upper_case(QuoteStyle::DoubleQuote);
        assert_eq!(upper.quote("C1"), "C1");
        assert_eq!(upper.quote("c1"), "\"c1\"");
        assert_eq!(upper.quote("TABLE"), "\"TABLE\"");
        assert_eq!(upper.quote("a\"b"), "\"a\"\"b\"");

        let brackets = IdentifierConverter::case_sensitive(QuoteStyle::Bracket);
        assert_eq!(brackets.quote("c1"), "c1");
        assert_eq!(brackets.quote("my col"), "[my col]");
        assert_eq!(brackets.quote("a]b"), "[a]]b]");

        let bigquery = IdentifierConverter::case_sensitive(QuoteStyle::BacktickBackslash);
        assert_eq!(bigquery.quote("a`b"), "`a\\`b`");
    }

    #[test]
    fn test_dialect_reserved_words() {
        let mysql = IdentifierConverter::case_sensitive(QuoteStyle::Backtick).with_reserved_words(&["INDEX"]);
        assert_eq!(mysql.quote("index"), "`index`");
        assert_eq!(mysql.quote("Index"), "`Index`");
        assert_eq!(mysql.unquote(&mysql.quote("index")), "index");
        assert_eq!(mysql.quote("indexes"), "indexes");
    }

    #[test]
    fn test_lower_case_before_quoting() {
        let postgres = IdentifierConverter::new(
            IdentifierCaseHandling::InterpretAsLower,
            IdentifierCaseHandling::InterpretCaseSensitive,
            QuoteStyle::DoubleQuote,
        )
        .lower_case_before_quoting(true);
        assert_eq!(postgres.quote("C1"), "c1");
        assert_eq!(postgres.quote("Table"), "\"table\"");
        assert_eq!(postgres.unquote(&postgres.quote("MIXED_Case")), "mixed_case");
    }

    #[test]
    fn test_convert() {
        let uniform = IdentifierConverter::new(
            IdentifierCaseHandling::InterpretAsLower,
            IdentifierCaseHandling::InterpretAsLower,
            QuoteStyle::DoubleQuote,
        );
        assert_eq!(uniform.convert("abc"), "ABC");
        let exasol = IdentifierConverter::upper_case(QuoteStyle::DoubleQuote);
        assert_eq!(exasol.convert("abc"), "abc");
        let postgres = exasol.with_rule(ConversionRule::UpperWhenRegularLower);
        assert_eq!(postgres.convert("abc_1"), "ABC_1");
        assert_eq!(postgres.convert("Abc"), "Abc");
        assert_eq!(postgres.with_rule(ConversionRule::Preserve).convert("abc"), "abc");
    }

    #[test]
    fn test_from_schema_notes() {
        let notes = SchemaAdapterNotes {
            catalog_separator: ".".to_string(),
            identifier_quote_string: "\"".to_string(),
            stores_lower_case_identifiers: true,
            stores_upper_case_identifiers: false,
            stores_mixed_case_identifiers: false,
            supports_mixed_case_identifiers: false,
            stores_lower_case_quoted_identifiers: false,
            stores_upper_case_quoted_identifiers: false,
            stores_mixed_case_quoted_identifiers: true,
            supports_mixed_case_quoted_identifiers: true,
            are_nulls_sorted_at_end: true,
            are_nulls_sorted_at_start: false,
            are_nulls_sorted_high: false,
            are_nulls_sorted_low: false,
        };
        let converter = IdentifierConverter::from_schema_notes(&notes, QuoteStyle::DoubleQuote);
        assert_eq!(converter.unquoted, IdentifierCaseHandling::InterpretAsLower);
        assert_eq!(converter.quoted, IdentifierCaseHandling::InterpretCaseSensitive);
        assert_eq!(converter.quote("abc"), "abc");
        assert_eq!(converter.quote("ABC"), "\"ABC\"");
    }
}
