//! Lexical analysis for the mini-C language
//!
//! The lexer walks the source one character at a time and produces a flat
//! token stream. Alongside the stream it fills the five category tables
//! (keywords, identifiers, constants, operators, separators); each table maps
//! a lexeme to its 1-based code in first-seen order, and the standard token
//! sequence reports every token as a `(CATEGORY, lexeme)` pair.
//!
//! Unknown characters are reported to the log and skipped, so a stray `@`
//! cannot take the whole submission down. Malformed literals are hard errors.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::logger;

const KEYWORDS: [&str; 8] = ["if", "else", "while", "for", "int", "char", "string", "return"];
const OPERATOR_CHARS: [char; 8] = ['+', '-', '*', '/', '=', '<', '>', '!'];
const TWO_CHAR_OPERATORS: [&str; 6] = ["++", "--", "==", "!=", "<=", ">="];
const SEPARATORS: [char; 8] = ['(', ')', '{', '}', ';', ',', '[', ']'];

/// Token category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Number,
    CharLiteral,
    StringLiteral,
    Operator,
    Separator,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::CharLiteral => "CHAR_LITERAL",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Separator => "SEPARATOR",
            TokenKind::Eof => "EOF",
        };
        write!(f, "{}", name)
    }
}

/// One lexical unit, with the byte offset where it starts in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl Token {
    pub fn eof(offset: usize) -> Self {
        Token {
            kind: TokenKind::Eof,
            text: String::new(),
            offset,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.text)
    }
}

/// Error produced for a malformed literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub offset: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for LexError {}

/// Lexeme-to-code table filled in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct CategoryTable {
    entries: Vec<String>,
    codes: FxHashMap<String, usize>,
}

impl CategoryTable {
    /// Record a lexeme, returning its 1-based code.
    fn record(&mut self, lexeme: &str) -> usize {
        if let Some(&code) = self.codes.get(lexeme) {
            return code;
        }
        self.entries.push(lexeme.to_string());
        let code = self.entries.len();
        self.codes.insert(lexeme.to_string(), code);
        code
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `lexeme -> code` rows in first-seen order.
    pub fn rows(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, lexeme)| format!("{:<12} -> {}", lexeme, i + 1))
            .collect()
    }
}

/// Full lexer output: the token stream plus the category bookkeeping.
#[derive(Debug, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub standard_sequence: Vec<String>,
    pub keyword_table: CategoryTable,
    pub identifier_table: CategoryTable,
    pub constant_table: CategoryTable,
    pub operator_table: CategoryTable,
    pub separator_table: CategoryTable,
}

pub struct Lexer<'a> {
    input: &'a str,
    chars: Vec<char>,
    /// Byte offset of each element of `chars`.
    offsets: Vec<usize>,
    pos: usize,
    out: LexOutput,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut chars = Vec::new();
        let mut offsets = Vec::new();
        for (offset, c) in input.char_indices() {
            chars.push(c);
            offsets.push(offset);
        }
        Lexer {
            input,
            chars,
            offsets,
            pos: 0,
            out: LexOutput::default(),
        }
    }

    pub fn analyze(mut self) -> Result<LexOutput, LexError> {
        while self.pos < self.chars.len() {
            let current = self.chars[self.pos];
            if current.is_whitespace() {
                self.pos += 1;
            } else if current == '\'' {
                self.read_char_literal()?;
            } else if current == '"' {
                self.read_string_literal()?;
            } else if current.is_alphabetic() {
                self.read_identifier_or_keyword();
            } else if current.is_ascii_digit() {
                self.read_number();
            } else if OPERATOR_CHARS.contains(&current) {
                self.read_operator();
            } else if SEPARATORS.contains(&current) {
                let offset = self.offsets[self.pos];
                self.push(TokenKind::Separator, current.to_string(), offset);
                self.pos += 1;
            } else {
                logger::warn(format!("skipping unknown character: {:?}", current));
                self.pos += 1;
            }
        }
        Ok(self.out)
    }

    fn offset(&self) -> usize {
        self.offsets
            .get(self.pos)
            .copied()
            .unwrap_or(self.input.len())
    }

    fn push(&mut self, kind: TokenKind, text: String, offset: usize) {
        let table = match kind {
            TokenKind::Keyword => Some(&mut self.out.keyword_table),
            TokenKind::Identifier => Some(&mut self.out.identifier_table),
            TokenKind::Number | TokenKind::CharLiteral | TokenKind::StringLiteral => {
                Some(&mut self.out.constant_table)
            }
            TokenKind::Operator => Some(&mut self.out.operator_table),
            TokenKind::Separator => Some(&mut self.out.separator_table),
            TokenKind::Eof => None,
        };
        if let Some(table) = table {
            table.record(&text);
        }
        self.out
            .standard_sequence
            .push(format!("({}, {})", kind, text));
        self.out.tokens.push(Token { kind, text, offset });
    }

    fn read_identifier_or_keyword(&mut self) {
        let offset = self.offset();
        let start = self.pos;
        while self.pos < self.chars.len()
            && (self.chars[self.pos].is_alphanumeric() || self.chars[self.pos] == '_')
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        let kind = if KEYWORDS.contains(&text.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.push(kind, text, offset);
    }

    fn read_number(&mut self) {
        let offset = self.offset();
        let start = self.pos;
        while self.pos < self.chars.len() && self.chars[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.push(TokenKind::Number, text, offset);
    }

    fn read_char_literal(&mut self) -> Result<(), LexError> {
        let offset = self.offset();
        self.pos += 1; // opening quote
        if self.pos < self.chars.len() && self.chars[self.pos] != '\'' {
            let value = self.chars[self.pos];
            self.pos += 1;
            if self.pos < self.chars.len() && self.chars[self.pos] == '\'' {
                self.pos += 1; // closing quote
                self.push(TokenKind::CharLiteral, value.to_string(), offset);
                Ok(())
            } else {
                Err(LexError {
                    message: "Unclosed character literal".to_string(),
                    offset,
                })
            }
        } else {
            Err(LexError {
                message: "Empty character literal".to_string(),
                offset,
            })
        }
    }

    fn read_string_literal(&mut self) -> Result<(), LexError> {
        let offset = self.offset();
        self.pos += 1; // opening quote
        let start = self.pos;
        while self.pos < self.chars.len() && self.chars[self.pos] != '"' {
            self.pos += 1;
        }
        if self.pos >= self.chars.len() {
            return Err(LexError {
                message: "Unclosed string literal".to_string(),
                offset,
            });
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.pos += 1; // closing quote
        self.push(TokenKind::StringLiteral, text, offset);
        Ok(())
    }

    fn read_operator(&mut self) {
        let offset = self.offset();
        let current = self.chars[self.pos];
        // Two-character operators win over their one-character prefixes.
        if self.pos + 1 < self.chars.len() {
            let two: String = [current, self.chars[self.pos + 1]].iter().collect();
            if TWO_CHAR_OPERATORS.contains(&two.as_str()) {
                self.push(TokenKind::Operator, two, offset);
                self.pos += 2;
                return;
            }
        }
        self.push(TokenKind::Operator, current.to_string(), offset);
        self.pos += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> LexOutput {
        Lexer::new(input).analyze().unwrap()
    }

    fn kinds_and_texts(out: &LexOutput) -> Vec<(TokenKind, &str)> {
        out.tokens
            .iter()
            .map(|t| (t.kind, t.text.as_str()))
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let out = lex("int count = 42;");
        assert_eq!(
            kinds_and_texts(&out),
            vec![
                (TokenKind::Keyword, "int"),
                (TokenKind::Identifier, "count"),
                (TokenKind::Operator, "="),
                (TokenKind::Number, "42"),
                (TokenKind::Separator, ";"),
            ]
        );
    }

    #[test]
    fn test_two_char_operators_win() {
        let out = lex("a <= b == c < d");
        let ops: Vec<&str> = out
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(ops, vec!["<=", "==", "<"]);
    }

    #[test]
    fn test_brackets_are_separators() {
        let out = lex("a[3]");
        assert_eq!(
            kinds_and_texts(&out),
            vec![
                (TokenKind::Identifier, "a"),
                (TokenKind::Separator, "["),
                (TokenKind::Number, "3"),
                (TokenKind::Separator, "]"),
            ]
        );
    }

    #[test]
    fn test_char_and_string_literals() {
        let out = lex("c = 'x'; s = \"hi\";");
        assert!(out
            .tokens
            .iter()
            .any(|t| t.kind == TokenKind::CharLiteral && t.text == "x"));
        assert!(out
            .tokens
            .iter()
            .any(|t| t.kind == TokenKind::StringLiteral && t.text == "hi"));
    }

    #[test]
    fn test_unclosed_char_literal_is_error() {
        let err = Lexer::new("c = 'x").analyze().unwrap_err();
        assert_eq!(err.message, "Unclosed character literal");
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn test_empty_char_literal_is_error() {
        let err = Lexer::new("''").analyze().unwrap_err();
        assert_eq!(err.message, "Empty character literal");
    }

    #[test]
    fn test_unknown_character_skipped() {
        let out = lex("a @ b");
        assert_eq!(
            kinds_and_texts(&out),
            vec![(TokenKind::Identifier, "a"), (TokenKind::Identifier, "b")]
        );
    }

    #[test]
    fn test_category_codes_first_seen_order() {
        let out = lex("int a; int b; a = b;");
        let rows = out.identifier_table.rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("a"));
        assert!(rows[0].ends_with("1"));
        assert!(rows[1].starts_with("b"));
        assert!(rows[1].ends_with("2"));
        // Repeats do not mint new codes.
        let kw = out.keyword_table.rows();
        assert_eq!(kw.len(), 1);
    }

    #[test]
    fn test_standard_sequence_format() {
        let out = lex("if (x)");
        assert_eq!(out.standard_sequence[0], "(KEYWORD, if)");
        assert_eq!(out.standard_sequence[1], "(SEPARATOR, ()");
        assert_eq!(out.standard_sequence[2], "(IDENTIFIER, x)");
    }

    #[test]
    fn test_token_display() {
        let out = lex("while");
        assert_eq!(out.tokens[0].to_string(), "KEYWORD:while");
    }

    #[test]
    fn test_offsets_are_byte_positions() {
        let out = lex("int  x");
        assert_eq!(out.tokens[0].offset, 0);
        assert_eq!(out.tokens[1].offset, 5);
    }
}
