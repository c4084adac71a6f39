//! Property tests: any well-formed tree survives formatting and re-parsing,
//! and arbitrary input never panics the parser.

use dsc_expression::{
    Argument, Expression, FunctionCall, OutputOptions, format, format_with_options, parse,
};
use proptest::prelude::*;

fn function_name() -> impl Strategy<Value = String> {
    "[a-zA-Z]{1,8}"
}

fn member_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,8}"
}

fn argument() -> impl Strategy<Value = Argument> {
    let leaf = prop_oneof![
        any::<String>().prop_map(Argument::String),
        "[0-9]{1,24}".prop_map(Argument::Number),
        any::<bool>().prop_map(Argument::Boolean),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        (function_name(), prop::collection::vec(inner, 0..4))
            .prop_map(|(name, args)| Argument::FunctionCall(FunctionCall::new(name, args)))
    })
}

fn expression() -> impl Strategy<Value = Expression> {
    (
        function_name(),
        prop::collection::vec(argument(), 0..4),
        prop::collection::vec(member_name(), 0..4),
    )
        .prop_map(|(name, args, members)| Expression {
            function: FunctionCall::new(name, args),
            members,
        })
}

/// Errors must point inside the input and render without panicking.
fn check_error(input: &str) -> Result<(), TestCaseError> {
    if let Err(e) = parse(input) {
        prop_assert!(e.position() <= input.len());
        let _ = e.diagnostic(input).to_string();
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_formatted_expression_reparses(expr in expression()) {
        let (text, errors) = format(&expr);
        prop_assert!(errors.is_empty(), "{:?}", errors);
        prop_assert_eq!(parse(&text), Ok(expr));
    }

    #[test]
    fn test_compact_expression_reparses(expr in expression()) {
        let (text, errors) = format_with_options(&expr, &OutputOptions::compact());
        prop_assert!(errors.is_empty(), "{:?}", errors);
        prop_assert_eq!(parse(&text), Ok(expr));
    }

    #[test]
    fn test_canonical_form_is_stable(expr in expression()) {
        let (text, _) = format(&expr);
        let reparsed = parse(&text).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let (again, _) = format(&reparsed);
        prop_assert_eq!(again, text);
    }

    #[test]
    fn test_arbitrary_input_never_panics(input in ".{0,64}") {
        check_error(&input)?;
    }

    #[test]
    fn test_bracketed_input_never_panics(input in "\\[[a-z(),.' 0-9#]{0,64}\\]?") {
        check_error(&input)?;
    }

    #[test]
    fn test_truncated_expression_never_panics(expr in expression(), cut in any::<prop::sample::Index>()) {
        let (text, _) = format(&expr);
        let mut end = cut.index(text.len() + 1);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        check_error(&text[..end])?;
    }

    #[test]
    fn test_bracketed_noise_roundtrips_when_valid(input in "\\[[a-z(),.' 0-9]{0,24}\\]") {
        if let Ok(expr) = parse(&input) {
            let (text, errors) = format(&expr);
            prop_assert!(errors.is_empty());
            prop_assert_eq!(parse(&text), Ok(expr));
        }
    }
}
