//! The keyword and operator table consulted by the tokenizer.

use std::collections::BTreeMap;

use super::TokenKind;

/// Words and operators recognized by longest match.
///
/// Keys are stored upper-cased; alphabetic entries match case-insensitively
/// and only on word boundaries. The default table is a plain value: build
/// one, extend it, and hand it to a [`Tokenizer`](super::Tokenizer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    entries: BTreeMap<String, TokenKind>,
}

const DEFAULT_ENTRIES: &[(&str, TokenKind)] = &[
    ("SELECT", TokenKind::Select),
    ("DISTINCT", TokenKind::Distinct),
    ("AS", TokenKind::As),
    ("FROM", TokenKind::From),
    ("JOIN", TokenKind::Join),
    ("INNER", TokenKind::Inner),
    ("LEFT", TokenKind::Left),
    ("RIGHT", TokenKind::Right),
    ("FULL", TokenKind::Full),
    ("OUTER", TokenKind::Outer),
    ("CROSS", TokenKind::Cross),
    ("NATURAL", TokenKind::Natural),
    ("ON", TokenKind::On),
    ("USING", TokenKind::Using),
    ("WHERE", TokenKind::Where),
    ("AND", TokenKind::And),
    ("OR", TokenKind::Or),
    ("NOT", TokenKind::Not),
    ("LIKE", TokenKind::Like),
    ("IS", TokenKind::Is),
    ("IN", TokenKind::In),
    ("NULL", TokenKind::Null),
    ("ORDER", TokenKind::Order),
    ("BY", TokenKind::By),
    ("ASC", TokenKind::Asc),
    ("DESC", TokenKind::Desc),
    ("GROUP", TokenKind::Group),
    ("HAVING", TokenKind::Having),
    ("SET", TokenKind::Set),
    ("UPDATE", TokenKind::Update),
    ("=", TokenKind::Operator),
    ("!=", TokenKind::Operator),
    ("<>", TokenKind::Operator),
    ("<", TokenKind::Operator),
    ("<=", TokenKind::Operator),
    (">", TokenKind::Operator),
    (">=", TokenKind::Operator),
    ("<=>", TokenKind::Operator),
    ("+", TokenKind::Operator),
    ("-", TokenKind::Operator),
    ("*", TokenKind::Operator),
    ("/", TokenKind::Operator),
    ("%", TokenKind::Operator),
    ("||", TokenKind::Operator),
    ("(", TokenKind::BracketOpen),
    (")", TokenKind::BracketClose),
    (",", TokenKind::Comma),
    (";", TokenKind::Semicolon),
    (".", TokenKind::Dot),
];

/// Returns true for characters that may appear inside a bare identifier.
pub(crate) const fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl KeywordTable {
    /// Creates a table with no entries at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds or overrides an entry. Words are matched case-insensitively.
    pub fn insert(&mut self, text: &str, kind: TokenKind) {
        self.entries.insert(text.to_ascii_uppercase(), kind);
    }

    /// Returns a copy of this table with `extra` entries merged over it.
    #[must_use]
    pub fn extended<'a>(mut self, extra: impl IntoIterator<Item = (&'a str, TokenKind)>) -> Self {
        for (text, kind) in extra {
            self.insert(text, kind);
        }
        self
    }

    /// Looks up the kind of an entry.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<TokenKind> {
        self.entries.get(&text.to_ascii_uppercase()).copied()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the longest entry matching `input` at byte offset `at`.
    ///
    /// Entries starting with a letter must not touch another identifier
    /// character on either side, so `JOINER` never yields `JOIN`.
    /// Returns the matched byte length and kind.
    #[must_use]
    pub fn longest_match(&self, input: &str, at: usize) -> Option<(usize, TokenKind)> {
        let rest = input.get(at..)?;
        let before = input[..at].chars().next_back();

        self.entries
            .iter()
            .filter(|(text, _)| {
                rest.get(..text.len())
                    .is_some_and(|candidate| candidate.eq_ignore_ascii_case(text))
            })
            .filter(|(text, _)| {
                let is_word = text.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
                if !is_word {
                    return true;
                }
                let after = rest[text.len()..].chars().next();
                !before.is_some_and(is_symbol_char) && !after.is_some_and(is_symbol_char)
            })
            .map(|(text, kind)| (text.len(), *kind))
            .max_by_key(|(len, _)| *len)
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::empty().extended(DEFAULT_ENTRIES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_lookup() {
        let table = KeywordTable::default();
        assert_eq!(table.get("select"), Some(TokenKind::Select));
        assert_eq!(table.get("<>"), Some(TokenKind::Operator));
        assert_eq!(table.get("frobnicate"), None);
    }

    #[test]
    fn test_longest_match_prefers_longer_operator() {
        let table = KeywordTable::default();
        assert_eq!(table.longest_match("a <= b", 2), Some((2, TokenKind::Operator)));
        assert_eq!(table.longest_match("a <=> b", 2), Some((3, TokenKind::Operator)));
        assert_eq!(table.longest_match("a < b", 2), Some((1, TokenKind::Operator)));
    }

    #[test]
    fn test_longest_match_case_insensitive() {
        let table = KeywordTable::default();
        assert_eq!(table.longest_match("select", 0), Some((6, TokenKind::Select)));
        assert_eq!(table.longest_match("SeLeCt", 0), Some((6, TokenKind::Select)));
    }

    #[test]
    fn test_word_boundary() {
        let table = KeywordTable::default();
        assert_eq!(table.longest_match("JOINER", 0), None);
        assert_eq!(table.longest_match("xJOIN", 1), None);
        assert_eq!(table.longest_match("INNER JOIN", 0), Some((5, TokenKind::Inner)));
        assert_eq!(table.longest_match("INDEX", 0), None);
        assert_eq!(table.longest_match("a.join", 2), Some((4, TokenKind::Join)));
    }

    #[test]
    fn test_custom_entries() {
        let table = KeywordTable::default().extended([("ILIKE", TokenKind::Like)]);
        assert_eq!(table.longest_match("ILIKE 'x'", 0), Some((5, TokenKind::Like)));
        assert_eq!(table.len(), KeywordTable::default().len() + 1);
    }

    #[test]
    fn test_empty_table() {
        let table = KeywordTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.longest_match("SELECT", 0), None);
    }
}
