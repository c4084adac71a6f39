mod ast;
mod error;
mod expressions;
mod lexer;
mod statement;

pub use ast::{Argument, Expression, FunctionCall, is_function_name, is_member_name, is_number};
pub use error::{Diagnostic, LexError, ParseError, SyntaxError};
pub use expressions::{MAX_NESTING, Parser};
pub use lexer::{Span, Token, TokenKind, Tokenizer, escape_string, unescape_string};
pub use statement::Statement;
