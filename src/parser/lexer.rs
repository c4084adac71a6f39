//! Tokenizer for bracketed expressions.
//!
//! The lexical rules live in `token_grammar.pest`; [`Tokenizer`] drives them
//! one token at a time, so the parser only ever scans as far as it needs to.

use std::borrow::Cow;
use std::fmt;

use pest::Parser as PestParser;
use pest::error::ErrorVariant;
use pest_derive::Parser as PestParser;
use tracing::trace;

use super::error::LexError;

#[derive(PestParser)]
#[grammar = "parser/token_grammar.pest"] // Path relative to src
pub struct TokenGrammar;

/// A half-open byte range `[start, end)` into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Dot,
    Identifier,
    StringLit,
    NumberLit,
    BooleanLit,
    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::StringLit => write!(f, "string"),
            TokenKind::NumberLit => write!(f, "number"),
            TokenKind::BooleanLit => write!(f, "boolean"),
            TokenKind::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// A token borrowed from the input. `text` is the raw source slice, including
/// the quotes of a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    /// Whether this token is a run of `[a-zA-Z0-9_-]` characters, i.e. an
    /// identifier, number or boolean.
    pub fn is_word(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Identifier | TokenKind::NumberLit | TokenKind::BooleanLit
        )
    }

    /// The decoded value of a string literal, with the surrounding quotes
    /// removed and each doubled quote collapsed to one. Returns `None` for any
    /// other kind of token.
    pub fn string_value(&self) -> Option<Cow<'a, str>> {
        if self.kind != TokenKind::StringLit {
            return None;
        }
        let inner = &self.text[1..self.text.len() - 1];
        Some(unescape_string(inner))
    }
}

/// Collapse every doubled single quote into one.
pub fn unescape_string(s: &str) -> Cow<'_, str> {
    if s.contains("''") {
        Cow::Owned(s.replace("''", "'"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Double every single quote, so the result can sit between single quotes.
pub fn escape_string(s: &str) -> Cow<'_, str> {
    if s.contains('\'') {
        Cow::Owned(s.replace('\'', "''"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Pull-based tokenizer over a single input string.
///
/// Yields `Ok(token)` for each token, then a single
/// [`TokenKind::EndOfInput`] token, then `None`. After an error, the iterator
/// is fused and yields nothing further.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            finished: false,
        }
    }

    /// Skip whitespace and return the offset of the next unconsumed
    /// character, or the input length if nothing but whitespace remains.
    pub fn skip_whitespace(&mut self) -> usize {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
        self.pos
    }

    /// Whether only whitespace remains.
    pub fn at_end(&mut self) -> bool {
        self.skip_whitespace() == self.input.len()
    }

    /// Scan the next token.
    pub fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        let input = self.input;
        let start = self.skip_whitespace();
        let rest = &input[start..];

        let Some(first) = rest.chars().next() else {
            return Ok(Token {
                kind: TokenKind::EndOfInput,
                text: "",
                span: Span::new(start, start),
            });
        };

        let pair = match TokenGrammar::parse(Rule::token, rest) {
            Ok(mut pairs) => pairs.next().and_then(|pair| pair.into_inner().next()),
            Err(e) => {
                return Err(match e.variant {
                    ErrorVariant::ParsingError { .. } if first == '\'' => {
                        LexError::UnterminatedString { pos: start }
                    }
                    ErrorVariant::ParsingError { .. } => LexError::UnexpectedCharacter {
                        ch: first,
                        pos: start,
                    },
                    // pest refuses to run when its call or stack budget is spent.
                    ErrorVariant::CustomError { message } => {
                        LexError::ScanAborted { message, pos: start }
                    }
                });
            }
        };
        let Some(pair) = pair else {
            return Err(LexError::UnexpectedCharacter {
                ch: first,
                pos: start,
            });
        };

        let kind = match pair.as_rule() {
            Rule::lbracket => TokenKind::LBracket,
            Rule::rbracket => TokenKind::RBracket,
            Rule::lparen => TokenKind::LParen,
            Rule::rparen => TokenKind::RParen,
            Rule::comma => TokenKind::Comma,
            Rule::dot => TokenKind::Dot,
            Rule::string => TokenKind::StringLit,
            Rule::number => TokenKind::NumberLit,
            Rule::boolean => TokenKind::BooleanLit,
            Rule::identifier => TokenKind::Identifier,
            r => unreachable!("token grammar produced unexpected rule {r:?}"),
        };

        let span = pair.as_span();
        let token = Token {
            kind,
            text: span.as_str(),
            span: Span::new(start + span.start(), start + span.end()),
        };
        self.pos = token.span.end;
        trace!(kind = ?token.kind, text = token.text, pos = token.span.start, "token");
        Ok(token)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(Token {
                kind: TokenKind::EndOfInput,
                ..
            })
            | Err(_) => self.finished = true,
            Ok(_) => {}
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input)
            .map(|t| t.unwrap_or_else(|e| panic!("Failed to tokenize '{input}': {e}")))
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_punctuation_and_words() {
        use TokenKind::*;
        assert_eq!(
            kinds("[f(1, 'a', true).out_put-1]"),
            vec![
                LBracket, Identifier, LParen, NumberLit, Comma, StringLit, Comma, BooleanLit,
                RParen, Dot, Identifier, RBracket, EndOfInput
            ]
        );
    }

    #[test]
    fn test_whitespace_is_skipped() {
        let tokens: Vec<_> = Tokenizer::new("  [ f ( ) ]  ")
            .map(|t| t.unwrap())
            .collect();
        let texts: Vec<_> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["[", "f", "(", ")", "]", ""]);
        assert_eq!(tokens[1].span, Span::new(4, 5));
        assert_eq!(tokens[5].span, Span::new(13, 13));
    }

    #[test]
    fn test_words_are_lexed_maximally() {
        use TokenKind::*;
        assert_eq!(kinds("12"), vec![NumberLit, EndOfInput]);
        assert_eq!(kinds("12ab"), vec![Identifier, EndOfInput]);
        assert_eq!(kinds("true"), vec![BooleanLit, EndOfInput]);
        assert_eq!(kinds("truest"), vec![Identifier, EndOfInput]);
        assert_eq!(kinds("false-y"), vec![Identifier, EndOfInput]);
        assert_eq!(kinds("_x"), vec![Identifier, EndOfInput]);
    }

    #[test]
    fn test_string_escapes() {
        let mut tokenizer = Tokenizer::new("'it''s' '' ''''");
        let t = tokenizer.next_token().unwrap();
        assert_eq!(t.text, "'it''s'");
        assert_eq!(t.string_value().unwrap(), "it's");

        let t = tokenizer.next_token().unwrap();
        assert_eq!(t.string_value().unwrap(), "");

        let t = tokenizer.next_token().unwrap();
        assert_eq!(t.string_value().unwrap(), "'");

        assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::EndOfInput);
    }

    #[test]
    fn test_string_keeps_inner_whitespace_and_brackets() {
        let t = Tokenizer::new("' a ]( b '").next_token().unwrap();
        assert_eq!(t.string_value().unwrap(), " a ]( b ");
    }

    #[test]
    fn test_unterminated_string() {
        let mut tokenizer = Tokenizer::new("[f('abc]");
        for _ in 0..3 {
            tokenizer.next_token().unwrap();
        }
        assert_eq!(
            tokenizer.next_token(),
            Err(LexError::UnterminatedString { pos: 3 })
        );
    }

    #[test]
    fn test_unterminated_after_escape() {
        assert_eq!(
            Tokenizer::new("'abc''").next_token(),
            Err(LexError::UnterminatedString { pos: 0 })
        );
    }

    #[test]
    fn test_unexpected_character() {
        let results: Vec<_> = Tokenizer::new("[f(#)]").collect();
        assert_eq!(results.len(), 4);
        assert_eq!(
            results[3],
            Err(LexError::UnexpectedCharacter { ch: '#', pos: 3 })
        );
    }

    #[test]
    fn test_non_ascii_letters_are_rejected() {
        assert_eq!(
            Tokenizer::new("é").next_token(),
            Err(LexError::UnexpectedCharacter { ch: 'é', pos: 0 })
        );
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("it's"), "it''s");
        assert_eq!(escape_string("plain"), "plain");
        assert_eq!(unescape_string(&escape_string("''x'")), "''x'");
    }

    #[test]
    fn test_long_input_tokenizes() {
        let depth = 5000;
        let input = format!("[{}{}]", "a(".repeat(depth), ")".repeat(depth));
        let tokens: Vec<_> = Tokenizer::new(&input)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(tokens.len(), 3 * depth + 3);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::EndOfInput);
    }
}
