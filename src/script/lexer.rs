//! Tokenizer for expression programs.

use std::fmt;

use crate::script::error::ScriptError;

const SNIPPET_RADIUS: usize = 16;

/// Byte range inside a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    /// Creates a span and normalizes offset ordering.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `=`
    Assign,
    /// `+`
    Plus,
    /// `(`
    LeftParen,
    /// `,`
    Comma,
    /// `)`
    RightParen,
    /// `?`
    Question,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// Name, possibly rule-qualified with `.`.
    Identifier,
    /// Quoted text, quotes included.
    Literal,
    /// Zero-length token at end of input.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
}

/// Returns `true` for single-character operators other than `;`.
pub fn is_operator(ch: char) -> bool {
    matches!(ch, '=' | '+' | '(' | ',' | ')' | '?' | ':')
}

pub fn is_quote(ch: char) -> bool {
    matches!(ch, '\'' | '"')
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '.' || ch == '_'
}

/// Pull-based lexer over one program.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Scans the next token. At end of input every call returns
    /// [`TokenKind::End`].
    pub fn next_token(&mut self) -> Result<Token<'a>, ScriptError> {
        let input = self.input;
        let rest = &input[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
        let start = self.pos;

        let Some(first) = trimmed.chars().next() else {
            return Ok(self.token(TokenKind::End, start, start));
        };
        let kind = match first {
            '=' => Some(TokenKind::Assign),
            '+' => Some(TokenKind::Plus),
            '(' => Some(TokenKind::LeftParen),
            ',' => Some(TokenKind::Comma),
            ')' => Some(TokenKind::RightParen),
            '?' => Some(TokenKind::Question),
            ':' => Some(TokenKind::Colon),
            ';' => Some(TokenKind::Semicolon),
            _ => None,
        };
        if let Some(kind) = kind {
            return Ok(self.token(kind, start, start + 1));
        }
        if is_quote(first) {
            return self.scan_literal(first, start);
        }
        let len = trimmed
            .find(|ch: char| !is_identifier_char(ch))
            .unwrap_or(trimmed.len());
        if len == 0 {
            let span = Span::new(start, start + first.len_utf8());
            return Err(ScriptError::UnexpectedChar {
                ch: first,
                span,
                near: near_text(input, span),
            });
        }
        Ok(self.token(TokenKind::Identifier, start, start + len))
    }

    fn scan_literal(&mut self, quote: char, start: usize) -> Result<Token<'a>, ScriptError> {
        let input = self.input;
        let mut escaped = false;
        for (at, ch) in input[start..].char_indices().skip(1) {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                return Ok(self.token(TokenKind::Literal, start, start + at + 1));
            }
        }
        let span = Span::new(start, input.len());
        self.pos = input.len();
        Err(ScriptError::UnterminatedLiteral {
            span,
            near: near_text(input, span),
        })
    }

    fn token(&mut self, kind: TokenKind, start: usize, end: usize) -> Token<'a> {
        self.pos = end;
        Token {
            kind,
            text: &self.input[start..end],
            span: Span::new(start, end),
        }
    }
}

/// Returns the text around `span`, widened to char boundaries.
pub fn near_text(input: &str, span: Span) -> String {
    let mut start = span.start.saturating_sub(SNIPPET_RADIUS).min(input.len());
    while !input.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = span.end.saturating_add(SNIPPET_RADIUS).min(input.len());
    while !input.is_char_boundary(end) {
        end += 1;
    }
    input[start..end].to_string()
}

/// Strips the quotes of a literal token and resolves `\x` to `x`.
pub fn unescape_literal(literal: &str) -> String {
    let inner = match literal.chars().next() {
        Some(quote) if is_quote(quote) => {
            let body = &literal[1..];
            body.strip_suffix(quote).unwrap_or(body)
        }
        _ => literal,
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
                continue;
            }
        }
        out.push(ch);
    }
    out
}
