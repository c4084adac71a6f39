//! Errors produced while tokenizing and parsing an expression.
//!
//! Every error carries the byte offset into the input where it was detected,
//! so a host can point at the offending character with
//! [`ParseError::diagnostic`].

use std::fmt;

use thiserror::Error;

use super::lexer::TokenKind;

/// Errors detected while grouping characters into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string starting at offset {pos}")]
    UnterminatedString { pos: usize },
    #[error("unexpected character {ch:?} at offset {pos}")]
    UnexpectedCharacter { ch: char, pos: usize },
    /// The token grammar stopped before it could classify the input, e.g.
    /// because pest's resource limits were reached.
    #[error("tokenizer stopped at offset {pos}: {message}")]
    ScanAborted { message: String, pos: usize },
}

impl LexError {
    pub fn position(&self) -> usize {
        match self {
            LexError::UnterminatedString { pos } => *pos,
            LexError::UnexpectedCharacter { pos, .. } => *pos,
            LexError::ScanAborted { pos, .. } => *pos,
        }
    }
}

/// Errors detected while combining tokens into an expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("expected {expected}, found {found} at offset {pos}")]
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
        pos: usize,
    },
    #[error("expected an argument at offset {pos}")]
    ExpectedArgument { pos: usize },
    #[error("invalid function name '{name}' at offset {pos}; names may only contain letters")]
    InvalidFunctionName { name: String, pos: usize },
    #[error("missing function name before '(' at offset {pos}")]
    EmptyFunctionName { pos: usize },
    #[error("unexpected content after the closing ']' at offset {pos}")]
    TrailingContent { pos: usize },
    /// A call opened more than [`MAX_NESTING`](crate::parser::MAX_NESTING)
    /// levels deep.
    #[error("calls nested more than {limit} levels deep at offset {pos}")]
    NestingTooDeep { limit: usize, pos: usize },
}

impl SyntaxError {
    pub fn position(&self) -> usize {
        match self {
            SyntaxError::ExpectedToken { pos, .. }
            | SyntaxError::ExpectedArgument { pos }
            | SyntaxError::InvalidFunctionName { pos, .. }
            | SyntaxError::EmptyFunctionName { pos }
            | SyntaxError::TrailingContent { pos }
            | SyntaxError::NestingTooDeep { pos, .. } => *pos,
        }
    }
}

/// The error returned by [`parse`](crate::parse). Parsing stops at the first
/// error; no partial tree is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl ParseError {
    /// Byte offset into the input where the error was detected.
    pub fn position(&self) -> usize {
        match self {
            ParseError::Lex(e) => e.position(),
            ParseError::Syntax(e) => e.position(),
        }
    }

    /// Render this error against the input it came from, with a caret under
    /// the offending character:
    ///
    /// ```text
    /// error: expected ')', found ']' at offset 4
    ///   |
    /// 1 | [f(1]
    ///   |     ^
    /// ```
    pub fn diagnostic<'a>(&'a self, source: &'a str) -> Diagnostic<'a> {
        Diagnostic {
            error: self,
            source,
        }
    }
}

/// Caret-style rendering of a [`ParseError`]; see [`ParseError::diagnostic`].
pub struct Diagnostic<'a> {
    error: &'a ParseError,
    source: &'a str,
}

impl Diagnostic<'_> {
    /// 1-based line and character column of the error position.
    pub fn line_col(&self) -> (usize, usize) {
        let pos = floor_char_boundary(self.source, self.error.position());
        let before = &self.source[..pos];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let col = before[line_start..].chars().count() + 1;
        (line, col)
    }
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line_no, col) = self.line_col();
        let src_line = self.source.lines().nth(line_no - 1).unwrap_or("");
        let gutter = line_no.to_string().len();

        writeln!(f, "error: {}", self.error)?;
        writeln!(f, "{:gutter$} |", "")?;
        writeln!(f, "{line_no} | {src_line}")?;
        write!(f, "{:gutter$} | {:>col$}", "", "^")
    }
}

fn floor_char_boundary(s: &str, mut pos: usize) -> usize {
    if pos >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_of_each_kind() {
        let lex: ParseError = LexError::UnterminatedString { pos: 3 }.into();
        assert_eq!(lex.position(), 3);

        let syntax: ParseError = SyntaxError::ExpectedToken {
            expected: TokenKind::RParen,
            found: TokenKind::RBracket,
            pos: 4,
        }
        .into();
        assert_eq!(syntax.position(), 4);
        assert_eq!(syntax.to_string(), "expected ')', found ']' at offset 4");
    }

    #[test]
    fn test_diagnostic_caret() {
        let source = "[f(1]";
        let err: ParseError = SyntaxError::ExpectedToken {
            expected: TokenKind::RParen,
            found: TokenKind::RBracket,
            pos: 4,
        }
        .into();

        let rendered = err.diagnostic(source).to_string();
        let expected = "error: expected ')', found ']' at offset 4\n  |\n1 | [f(1]\n  |     ^";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_diagnostic_counts_characters_not_bytes() {
        let source = "[f('é')]x";
        let err: ParseError = SyntaxError::TrailingContent { pos: 9 }.into();
        assert_eq!(err.diagnostic(source).line_col(), (1, 9));
    }

    #[test]
    fn test_diagnostic_at_end_of_input() {
        let source = "[f(";
        let err: ParseError = SyntaxError::ExpectedArgument { pos: 3 }.into();
        assert_eq!(err.diagnostic(source).line_col(), (1, 4));
        assert!(err.diagnostic(source).to_string().ends_with("|    ^"));
    }
}
