//! Parse errors.

use serde::Serialize;
use tessera_carton::Span;

/// Machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParseErrorCode {
    DuplicateBlock,
    UnclosedBlock,
    UnclosedElement,
    UnexpectedClosingTag,
    UnclosedInterpolation,
    UnclosedComment,
    InvalidVFor,
    UnterminatedString,
    UnterminatedTemplateLiteral,
    UnterminatedComment,
    UnterminatedRegExp,
    UnbalancedBracket,
}

impl ParseErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateBlock => "duplicate-block",
            Self::UnclosedBlock => "unclosed-block",
            Self::UnclosedElement => "unclosed-element",
            Self::UnexpectedClosingTag => "unexpected-closing-tag",
            Self::UnclosedInterpolation => "unclosed-interpolation",
            Self::UnclosedComment => "unclosed-comment",
            Self::InvalidVFor => "invalid-v-for",
            Self::UnterminatedString => "unterminated-string",
            Self::UnterminatedTemplateLiteral => "unterminated-template-literal",
            Self::UnterminatedComment => "unterminated-comment",
            Self::UnterminatedRegExp => "unterminated-regexp",
            Self::UnbalancedBracket => "unbalanced-bracket",
        }
    }
}

/// A parse error with the span it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub code: ParseErrorCode,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(code: ParseErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
        }
    }

    /// Shift the span by `base`, used when a block-relative error is reported against the
    /// whole file.
    pub fn offset_by(mut self, base: u32) -> Self {
        self.span = self.span.offset_by(base);
        self
    }
}
