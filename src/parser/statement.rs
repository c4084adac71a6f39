//! Classification of raw configuration values.
//!
//! Only values that look like `[...]` are expressions. A leading `[[` escapes
//! the bracket, so `[[abc]` is the literal text `[abc]`.

use tracing::debug;

use super::ast::Expression;
use super::error::ParseError;
use super::expressions::Parser;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    Literal(String),
    Expression(Expression),
}

impl Statement {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if let Some(escaped) = input.strip_prefix("[[") {
            debug!("Escaped literal: {input}");
            return Ok(Statement::Literal(format!("[{escaped}")));
        }
        if !input.starts_with('[') || !input.ends_with(']') {
            return Ok(Statement::Literal(input.to_string()));
        }
        Ok(Statement::Expression(Parser::parse(input)?))
    }

    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Statement::Expression(e) => Some(e),
            Statement::Literal(_) => None,
        }
    }
}
