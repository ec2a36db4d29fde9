//! Parser configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::DEFAULT_MAX_PASSES;
use crate::lexer::{KeywordTable, TokenKind};

/// Settings for building a [`Parser`](crate::Parser).
///
/// Deserializes from JSON such as:
///
/// ```
/// use oxide_sqltree::ParserConfig;
///
/// let config: ParserConfig =
///     serde_json::from_str(r#"{ "keywords": { "ILIKE": "LIKE" }, "max_passes": 500 }"#).unwrap();
/// assert_eq!(config.max_passes, 500);
/// ```
///
/// Missing fields take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Extra keyword or operator entries, merged over the built-in table.
    pub keywords: BTreeMap<String, TokenKind>,
    /// Ceiling on the passes one rule may take over one branch.
    pub max_passes: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            keywords: BTreeMap::new(),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl ParserConfig {
    /// Returns the built-in keyword table extended with [`Self::keywords`].
    #[must_use]
    pub fn keyword_table(&self) -> KeywordTable {
        KeywordTable::default().extended(self.keywords.iter().map(|(text, kind)| (text.as_str(), *kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config: ParserConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ParserConfig::default());
        assert_eq!(config.max_passes, DEFAULT_MAX_PASSES);
    }

    #[test]
    fn test_extra_keywords_extend_table() {
        let config: ParserConfig = serde_json::from_str(r#"{ "keywords": { "ilike": "LIKE" } }"#).unwrap();
        let table = config.keyword_table();
        assert_eq!(table.get("ILIKE"), Some(TokenKind::Like));
        assert_eq!(table.get("SELECT"), Some(TokenKind::Select));
    }

    #[test]
    fn test_unknown_token_kind_is_rejected() {
        let result: Result<ParserConfig, _> = serde_json::from_str(r#"{ "keywords": { "X": "NOPE" } }"#);
        assert!(result.is_err());
    }
}
