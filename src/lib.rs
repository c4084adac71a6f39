//! Parse bracketed function-call expressions, as found in the values of
//! declarative configuration documents:
//!
//! ```text
//! [concat('web-', parameters('name')).length]
//! ```
//!
//! An expression is a single function call, whose arguments are strings,
//! numbers, booleans or further calls, optionally followed by a chain of
//! member accesses, all inside one pair of brackets.

pub mod parser;
pub mod textify;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types for easier access
pub use parser::{Argument, Expression, FunctionCall, ParseError, Statement};
pub use textify::{FormatError, OutputOptions};

use textify::{ErrorVec, ScopedContext, Textify};

/// Parse a single expression.
///
/// The whole input must be one expression: a `[`, a function call, optional
/// `.member` accesses, and a `]`. Whitespace between tokens is ignored.
///
/// # Example
/// ```rust
/// use dsc_expression::{parse, Argument};
///
/// let expr = parse("[concat('a', 'b').length]").unwrap();
/// assert_eq!(expr.function.name, "concat");
/// assert_eq!(expr.function.args[1], Argument::String("b".to_string()));
/// assert_eq!(expr.members, vec!["length"]);
/// ```
///
/// # Errors
///
/// Returns a `ParseError` for the first problem found, with the byte offset
/// where it was detected.
///
/// ```rust
/// use dsc_expression::parse;
///
/// let input = "[concat('a',)]";
/// match parse(input) {
///     Ok(_) => println!("Valid expression"),
///     Err(e) => println!("{}", e.diagnostic(input)),
/// }
/// ```
pub fn parse(input: &str) -> Result<Expression, ParseError> {
    parser::Parser::parse(input)
}

/// Classify a raw configuration value as either a literal string or an
/// expression, parsing it in the latter case. See [`Statement`].
pub fn parse_statement(input: &str) -> Result<Statement, ParseError> {
    Statement::parse(input)
}

/// Format an expression in canonical text form.
///
/// Returns a tuple of `(formatted_text, errors)`. The text is always
/// generated; trees built by hand with invalid names are written with error
/// markers in their place, and the errors are returned for inspection.
///
/// # Example
/// ```rust
/// use dsc_expression::{parse, format};
///
/// let expr = parse("[ f( 1,'it''s' ) .out ]").unwrap();
/// let (text, errors) = format(&expr);
/// assert_eq!(text, "[f(1, 'it''s').out]");
/// assert!(errors.is_empty());
/// ```
pub fn format(expr: &Expression) -> (String, Vec<FormatError>) {
    format_with_options(expr, &OutputOptions::default())
}

/// Format an expression with custom options.
///
/// ```rust
/// use dsc_expression::{parse, format_with_options, OutputOptions};
///
/// let expr = parse("[f(1, 2)]").unwrap();
/// let (text, _errors) = format_with_options(&expr, &OutputOptions::compact());
/// assert_eq!(text, "[f(1,2)]");
/// ```
pub fn format_with_options(
    expr: &Expression,
    options: &OutputOptions,
) -> (String, Vec<FormatError>) {
    let mut errors = ErrorVec::default();
    let mut output = String::new();
    let mut ctx = ScopedContext::new(options, &mut errors);
    if let Err(e) = expr.textify(&mut ctx, &mut output) {
        errors.0.push(e.into());
    }
    (output, errors.into_iter().collect())
}
