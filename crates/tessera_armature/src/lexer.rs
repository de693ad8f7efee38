//! Token scanner for logic blocks.
//!
//! Enough of JavaScript/TypeScript lexing to find statement boundaries, brackets and
//! identifiers reliably: strings, template literals, comments and regular expressions are
//! consumed as single tokens so their contents never confuse the analyzer.

use tessera_carton::Span;
use tessera_relief::{ParseError, ParseErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    Str,
    Template,
    Number,
    RegExp,
    Punct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line break precedes this token.
    pub newline_before: bool,
}

impl Token {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.text(source)
    }

    pub fn is_ident(&self, source: &str, name: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(source) == name
    }

    pub fn is_punct(&self, source: &str, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text(source) == punct
    }
}

/// Longest first, so `===` wins over `==` and `=`. Right shifts are left out so nested
/// type arguments close one `>` at a time.
const PUNCTUATORS: &[&str] = &[
    "...", "===", "!==", "**=", "<<=", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "**", "<<",
];

/// Keywords after which a `/` starts a regular expression.
const REGEXP_PRECEDING_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source).run()
}

struct Lexer<'s> {
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
    tokens: Vec<Token>,
    newline_before: bool,
}

impl<'s> Lexer<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
            newline_before: false,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            match b {
                b'\n' => {
                    self.newline_before = true;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' | b'\x0b' | b'\x0c' => self.pos += 1,
                b'/' if self.peek(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment()?,
                b'/' if self.regexp_allowed() => {
                    let start = self.pos;
                    self.scan_regexp()?;
                    self.push(TokenKind::RegExp, start);
                }
                b'"' | b'\'' => {
                    let start = self.pos;
                    self.scan_string(b)?;
                    self.push(TokenKind::Str, start);
                }
                b'`' => {
                    let start = self.pos;
                    self.scan_template()?;
                    self.push(TokenKind::Template, start);
                }
                b'0'..=b'9' => {
                    let start = self.pos;
                    self.scan_number();
                    self.push(TokenKind::Number, start);
                }
                b'.' if self.peek(1).is_some_and(|n| n.is_ascii_digit()) => {
                    let start = self.pos;
                    self.scan_number();
                    self.push(TokenKind::Number, start);
                }
                _ if is_ident_start(b) => {
                    let start = self.pos;
                    self.scan_ident();
                    self.push(TokenKind::Ident, start);
                }
                _ => {
                    let start = self.pos;
                    let rest = &self.source[self.pos..];
                    let len = PUNCTUATORS
                        .iter()
                        .find(|p| rest.starts_with(**p))
                        .map_or_else(|| rest.chars().next().map_or(1, char::len_utf8), |p| p.len());
                    self.pos += len;
                    self.push(TokenKind::Punct, start);
                }
            }
        }
        Ok(self.tokens)
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token {
            kind,
            span: Span::from_usize(start, self.pos),
            newline_before: self.newline_before,
        });
        self.newline_before = false;
    }

    fn error(&self, code: ParseErrorCode, message: &str, start: usize) -> ParseError {
        ParseError::new(code, message, Span::from_usize(start, self.pos))
    }

    fn regexp_allowed(&self) -> bool {
        let Some(prev) = self.tokens.last() else {
            return true;
        };
        match prev.kind {
            TokenKind::Punct => !matches!(prev.text(self.source), ")" | "]" | "}" | "++" | "--"),
            TokenKind::Ident => REGEXP_PRECEDING_KEYWORDS.contains(&prev.text(self.source)),
            _ => false,
        }
    }

    fn skip_line_comment(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 2;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'*' && self.peek(1) == Some(b'/') {
                self.pos += 2;
                return Ok(());
            }
            if self.bytes[self.pos] == b'\n' {
                self.newline_before = true;
            }
            self.pos += 1;
        }
        Err(self.error(
            ParseErrorCode::UnterminatedComment,
            "Unterminated comment.",
            start,
        ))
    }

    fn scan_string(&mut self, quote: u8) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'\n' => break,
                b if b == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
        Err(self.error(
            ParseErrorCode::UnterminatedString,
            "Unterminated string literal.",
            start,
        ))
    }

    fn scan_template(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return Ok(());
                }
                b'$' if self.peek(1) == Some(b'{') => {
                    self.pos += 2;
                    self.skip_substitution(start)?;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
        Err(self.error(
            ParseErrorCode::UnterminatedTemplateLiteral,
            "Unterminated template literal.",
            start,
        ))
    }

    /// Skip a `${ ... }` body, including nested strings and templates.
    fn skip_substitution(&mut self, template_start: usize) -> Result<(), ParseError> {
        let mut depth = 1usize;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                b'"' | b'\'' => self.scan_string(self.bytes[self.pos])?,
                b'`' => self.scan_template()?,
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment()?,
                _ => self.pos += 1,
            }
        }
        Err(self.error(
            ParseErrorCode::UnterminatedTemplateLiteral,
            "Unterminated template literal.",
            template_start,
        ))
    }

    fn scan_regexp(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut in_class = false;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'\n' => break,
                b'[' => {
                    in_class = true;
                    self.pos += 1;
                }
                b']' => {
                    in_class = false;
                    self.pos += 1;
                }
                b'/' if !in_class => {
                    self.pos += 1;
                    while self.pos < self.bytes.len() && is_ident_part(self.bytes[self.pos]) {
                        self.pos += 1;
                    }
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
        Err(self.error(
            ParseErrorCode::UnterminatedRegExp,
            "Unterminated regular expression literal.",
            start,
        ))
    }

    fn scan_number(&mut self) {
        let start = self.pos;
        let hex = self.source[start..].starts_with("0x") || self.source[start..].starts_with("0X");
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            let exponent_sign = (b == b'+' || b == b'-')
                && !hex
                && self.pos > start
                && matches!(self.bytes[self.pos - 1], b'e' | b'E');
            if b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || exponent_sign {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn scan_ident(&mut self) {
        while self.pos < self.bytes.len() && is_ident_part(self.bytes[self.pos]) {
            self.pos += 1;
        }
    }
}

#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

#[inline]
fn is_ident_part(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

/// For every opening bracket token, the index of its closing token.
pub(crate) fn match_brackets(
    source: &str,
    tokens: &[Token],
) -> Result<Vec<Option<usize>>, ParseError> {
    let mut matches = vec![None; tokens.len()];
    let mut stack: Vec<(usize, u8)> = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Punct {
            continue;
        }
        match token.text(source) {
            "(" => stack.push((index, b')')),
            "[" => stack.push((index, b']')),
            "{" => stack.push((index, b'}')),
            close @ (")" | "]" | "}") => match stack.pop() {
                Some((open, expected)) if expected == close.as_bytes()[0] => {
                    matches[open] = Some(index);
                }
                _ => {
                    return Err(ParseError::new(
                        ParseErrorCode::UnbalancedBracket,
                        format!("Unexpected '{close}'."),
                        token.span,
                    ))
                }
            },
            _ => {}
        }
    }

    if let Some((open, expected)) = stack.pop() {
        return Err(ParseError::new(
            ParseErrorCode::UnbalancedBracket,
            format!("'{}' expected.", expected as char),
            tokens[open].span,
        ));
    }
    Ok(matches)
}
