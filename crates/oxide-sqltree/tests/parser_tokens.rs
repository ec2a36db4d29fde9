//! Tests for the tokenizer.

use oxide_sqltree::{KeywordTable, TokenKind, Tokenizer};

fn tokenize(sql: &str) -> oxide_sqltree::TokenStream {
    Tokenizer::default()
        .tokenize(sql)
        .unwrap_or_else(|e| panic!("Failed to tokenize: {sql}\nError: {e:?}"))
}

fn kinds(sql: &str) -> Vec<TokenKind> {
    tokenize(sql)
        .without_whitespace()
        .iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn lexemes_reproduce_input() {
    for sql in [
        "SELECT a, b FROM t WHERE a = 1",
        "  select\t*\nfrom `weird name` -- trailing\n",
        "UPDATE t SET a = 'it''s', b = :name /* note */ WHERE c <=> ?",
        "SELECT COUNT(*) * 2, -3.5 FROM t # done",
    ] {
        let rebuilt: String = tokenize(sql).iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(rebuilt, sql);
    }
}

#[test]
fn star_is_operator_between_operands() {
    assert_eq!(
        kinds("SELECT 3 * 3"),
        vec![TokenKind::Select, TokenKind::NumericLiteral, TokenKind::Operator, TokenKind::NumericLiteral]
    );
}

#[test]
fn star_is_selector_after_dot() {
    assert_eq!(
        kinds("SELECT foo.* FROM foo"),
        vec![
            TokenKind::Select,
            TokenKind::Symbol,
            TokenKind::Dot,
            TokenKind::Star,
            TokenKind::From,
            TokenKind::Symbol,
        ]
    );
}

#[test]
fn star_after_call_is_multiplication() {
    let kinds = kinds("COUNT(*) * 2");
    assert_eq!(kinds[2], TokenKind::Star);
    assert_eq!(kinds[4], TokenKind::Operator);
}

#[test]
fn dotted_name_dump() {
    assert_eq!(
        tokenize("a.b.c").dump(),
        "0,0,SYMBOL\n0,1,DOT\n0,2,SYMBOL\n0,3,DOT\n0,4,SYMBOL"
    );
}

#[test]
fn dump_tracks_lines() {
    assert_eq!(
        tokenize("SELECT a\nFROM t").dump(),
        "0,0,SELECT\n0,7,SYMBOL\n1,0,FROM\n1,5,SYMBOL"
    );
}

#[test]
fn dump_keeps_comments() {
    assert_eq!(tokenize("a -- x\nb").dump(), "0,0,SYMBOL\n0,2,COMMENT\n1,0,SYMBOL");
}

#[test]
fn operators_take_longest_match() {
    let lexemes: Vec<String> = tokenize("a<=>b<>c<=d||e")
        .iter()
        .filter(|t| t.kind == TokenKind::Operator)
        .map(|t| t.lexeme.clone())
        .collect();
    assert_eq!(lexemes, vec!["<=>", "<>", "<=", "||"]);
}

#[test]
fn keyword_inside_word_is_a_symbol() {
    assert_eq!(kinds("JOINER joined_at"), vec![TokenKind::Symbol, TokenKind::Symbol]);
}

#[test]
fn custom_keyword_table() {
    let tokenizer = Tokenizer::new(KeywordTable::default().extended([("ILIKE", TokenKind::Like)]));
    let tokens = tokenizer.tokenize("a ilike b").unwrap();
    assert_eq!(tokens.without_whitespace().as_slice()[1].kind, TokenKind::Like);
}

#[test]
fn unknown_character_location() {
    let err = Tokenizer::default().tokenize("SELECT a\nFROM @").unwrap_err();
    assert_eq!((err.line, err.offset), (1, 5));
}

#[test]
fn unterminated_string_points_at_quote() {
    let err = Tokenizer::default().tokenize("SELECT 'abc").unwrap_err();
    assert_eq!((err.line, err.offset), (0, 7));
}
