//! Common test utilities for roundtrip testing

#![allow(dead_code)]

use dsc_expression::{Expression, format, parse};

/// Parse an expression, panicking with a caret diagnostic on failure.
pub fn parse_ok(input: &str) -> Expression {
    match parse(input) {
        Ok(expr) => expr,
        Err(e) => {
            println!("Error parsing expression:\n{}", e.diagnostic(input));
            panic!("{}", e);
        }
    }
}

/// Format an expression, panicking if any formatting errors occur.
pub fn format_ok(expr: &Expression) -> String {
    let (actual, errors) = format(expr);

    if !errors.is_empty() {
        println!("Formatting errors:");
        for error in errors {
            println!("  {error}");
        }
        panic!("Formatting errors occurred");
    }
    actual
}

/// Roundtrip an expression in canonical form and verify that the output is
/// the same as the input, after being parsed to a tree and back to text.
pub fn roundtrip_expression(input: &str) {
    let actual = format_ok(&parse_ok(input));

    assert_eq!(
        actual, input,
        "Expected:\n---\n{}\n---\nActual:\n---\n{}\n---",
        input, actual
    );
}

/// Parse a non-canonical expression, and verify that its canonical form
/// re-parses to an equal tree.
pub fn roundtrip_tree(input: &str) -> String {
    let expr = parse_ok(input);
    let canonical = format_ok(&expr);
    let reparsed = parse_ok(&canonical);
    assert_eq!(expr, reparsed, "Canonical form: {canonical}");
    canonical
}
