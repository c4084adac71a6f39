//! Recursive-descent parser for bracketed expressions.
//!
//! The grammar, one token of lookahead:
//!
//! ```text
//! expression   := '[' functionCall members? ']'
//! functionCall := functionName '(' arguments? ')'
//! arguments    := argument (',' argument)*
//! argument     := functionCall | string | number | boolean
//! members      := ('.' memberName)+
//! ```

use tracing::debug;

use super::ast::{Argument, Expression, FunctionCall, is_function_name};
use super::error::{LexError, ParseError, SyntaxError};
use super::lexer::{Token, TokenKind, Tokenizer};

/// Deepest allowed nesting of function calls, counting the outermost call.
/// Deeper input fails with [`SyntaxError::NestingTooDeep`].
pub const MAX_NESTING: usize = 1024;

/// What [`Parser::call`] accepts next inside an argument list.
#[derive(Debug, Clone, Copy)]
enum Expect {
    /// Just after `(`: an argument, or `)` for an empty list.
    ArgumentOrClose,
    /// Just after `,`.
    Argument,
    /// Just after an argument.
    CommaOrClose,
}

enum Operand {
    Value(Argument),
    Call { name: String, pos: usize },
}

/// Parser over a single input string. Holds at most one token of lookahead.
pub struct Parser<'a> {
    tokens: Tokenizer<'a>,
    peeked: Option<Token<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: Tokenizer::new(input),
            peeked: None,
        }
    }

    /// Parse `input` as a complete expression. The whole input must be
    /// consumed; anything but whitespace after the closing `]` is an error.
    pub fn parse(input: &str) -> Result<Expression, ParseError> {
        debug!("Parsing expression: {input}");
        let mut parser = Parser::new(input);
        let expression = parser.expression()?;
        parser.finish()?;
        debug!(
            function = expression.function.name.as_str(),
            members = expression.members.len(),
            "Parsed expression"
        );
        Ok(expression)
    }

    fn peek(&mut self) -> Result<Token<'a>, LexError> {
        match self.peeked {
            Some(token) => Ok(token),
            None => {
                let token = self.tokens.next_token()?;
                self.peeked = Some(token);
                Ok(token)
            }
        }
    }

    fn bump(&mut self) -> Result<Token<'a>, LexError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.tokens.next_token(),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token<'a>, ParseError> {
        let token = self.bump()?;
        if token.kind != expected {
            return Err(unexpected(expected, &token));
        }
        Ok(token)
    }

    fn expression(&mut self) -> Result<Expression, ParseError> {
        self.expect(TokenKind::LBracket)?;

        let name = self.bump()?;
        let function = match name.kind {
            TokenKind::LParen => {
                return Err(SyntaxError::EmptyFunctionName {
                    pos: name.span.start,
                }
                .into());
            }
            _ if name.is_word() => {
                let name = function_name(&name)?;
                self.expect(TokenKind::LParen)?;
                self.call(name)?
            }
            _ => return Err(unexpected(TokenKind::Identifier, &name)),
        };

        let members = self.members()?;
        self.expect(TokenKind::RBracket)?;

        Ok(Expression { function, members })
    }

    /// Parse the argument list of a call, after its opening `(`, up to and
    /// including the closing `)`.
    ///
    /// Calls still waiting for their `)` are kept on `open` rather than on the
    /// native stack, so nesting depth only costs heap.
    fn call(&mut self, name: String) -> Result<FunctionCall, ParseError> {
        let mut open: Vec<FunctionCall> = Vec::new();
        let mut current = FunctionCall {
            name,
            args: Vec::new(),
        };
        let mut expect = Expect::ArgumentOrClose;

        loop {
            let closed = match expect {
                Expect::CommaOrClose => {
                    let token = self.bump()?;
                    match token.kind {
                        TokenKind::Comma => {
                            expect = Expect::Argument;
                            false
                        }
                        TokenKind::RParen => true,
                        _ => return Err(unexpected(TokenKind::RParen, &token)),
                    }
                }
                Expect::ArgumentOrClose if self.peek()?.kind == TokenKind::RParen => {
                    self.bump()?;
                    true
                }
                Expect::ArgumentOrClose | Expect::Argument => {
                    match self.argument()? {
                        Operand::Value(arg) => {
                            current.args.push(arg);
                            expect = Expect::CommaOrClose;
                        }
                        Operand::Call { name, pos } => {
                            if open.len() + 1 >= MAX_NESTING {
                                return Err(SyntaxError::NestingTooDeep {
                                    limit: MAX_NESTING,
                                    pos,
                                }
                                .into());
                            }
                            let inner = FunctionCall {
                                name,
                                args: Vec::new(),
                            };
                            open.push(std::mem::replace(&mut current, inner));
                            expect = Expect::ArgumentOrClose;
                        }
                    }
                    false
                }
            };

            if closed {
                let Some(parent) = open.pop() else {
                    return Ok(current);
                };
                let done = std::mem::replace(&mut current, parent);
                current.args.push(Argument::FunctionCall(done));
                expect = Expect::CommaOrClose;
            }
        }
    }

    /// Read one argument. A nested call is returned as soon as its `(` has
    /// been consumed; [`Parser::call`] reads its arguments.
    fn argument(&mut self) -> Result<Operand, ParseError> {
        let token = self.bump()?;
        match token.kind {
            TokenKind::StringLit => {
                let value = token.string_value().unwrap_or_default();
                return Ok(Operand::Value(Argument::String(value.into_owned())));
            }
            TokenKind::LParen => {
                return Err(SyntaxError::EmptyFunctionName {
                    pos: token.span.start,
                }
                .into());
            }
            _ if token.is_word() => {}
            _ => {
                return Err(SyntaxError::ExpectedArgument {
                    pos: token.span.start,
                }
                .into());
            }
        }

        // Any word directly followed by '(' is a nested call, even `true(`.
        let next = self.peek()?;
        if next.kind == TokenKind::LParen {
            let name = function_name(&token)?;
            self.bump()?;
            return Ok(Operand::Call {
                name,
                pos: token.span.start,
            });
        }

        match token.kind {
            TokenKind::NumberLit => Ok(Operand::Value(Argument::Number(token.text.to_string()))),
            TokenKind::BooleanLit => Ok(Operand::Value(Argument::Boolean(token.text == "true"))),
            _ => Err(unexpected(TokenKind::LParen, &next)),
        }
    }

    fn members(&mut self) -> Result<Vec<String>, ParseError> {
        let mut members = Vec::new();
        while self.peek()?.kind == TokenKind::Dot {
            self.bump()?;
            let name = self.bump()?;
            // Numbers and booleans are valid member names too, e.g. `.0`.
            if !name.is_word() {
                return Err(unexpected(TokenKind::Identifier, &name));
            }
            members.push(name.text.to_string());
        }
        Ok(members)
    }

    /// Require that nothing but whitespace follows the expression.
    fn finish(&mut self) -> Result<(), ParseError> {
        if let Some(token) = self.peeked.take() {
            if token.kind != TokenKind::EndOfInput {
                return Err(SyntaxError::TrailingContent {
                    pos: token.span.start,
                }
                .into());
            }
            return Ok(());
        }
        // Checked on the raw text, so trailing content is reported as such
        // even when it would not tokenize.
        if !self.tokens.at_end() {
            return Err(SyntaxError::TrailingContent {
                pos: self.tokens.skip_whitespace(),
            }
            .into());
        }
        Ok(())
    }
}

fn function_name(token: &Token) -> Result<String, ParseError> {
    if !is_function_name(token.text) {
        return Err(SyntaxError::InvalidFunctionName {
            name: token.text.to_string(),
            pos: token.span.start,
        }
        .into());
    }
    Ok(token.text.to_string())
}

fn unexpected(expected: TokenKind, found: &Token) -> ParseError {
    SyntaxError::ExpectedToken {
        expected,
        found: found.kind,
        pos: found.span.start,
    }
    .into()
}
