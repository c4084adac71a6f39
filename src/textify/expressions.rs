use std::fmt;

use super::foundation::{ErrorVec, FormatError, OutputOptions, Scope, ScopedContext, Textify};
use crate::parser::{
    Argument, Expression, FunctionCall, escape_string, is_function_name, is_member_name,
    is_number,
};

/// Write `value` if it passes `valid`, otherwise an error marker.
fn checked<S: Scope, W: fmt::Write>(
    ctx: &mut S,
    w: &mut W,
    message: &'static str,
    value: &str,
    valid: fn(&str) -> bool,
    description: &'static str,
) -> fmt::Result {
    if valid(value) {
        return w.write_str(value);
    }
    ctx.failure(
        w,
        FormatError::invalid(message, Some(value.to_string()), description),
    )
}

impl Textify for Expression {
    fn textify<S: Scope, W: fmt::Write>(&self, ctx: &mut S, w: &mut W) -> fmt::Result {
        w.write_char('[')?;
        self.function.textify(ctx, w)?;
        for member in &self.members {
            w.write_char('.')?;
            checked(
                ctx,
                w,
                "MemberName",
                member,
                is_member_name,
                "member names must match [a-zA-Z0-9_-]+",
            )?;
        }
        w.write_char(']')
    }
}

impl Textify for FunctionCall {
    fn textify<S: Scope, W: fmt::Write>(&self, ctx: &mut S, w: &mut W) -> fmt::Result {
        checked(
            ctx,
            w,
            "FunctionName",
            &self.name,
            is_function_name,
            "function names must match [a-zA-Z]+",
        )?;
        w.write_char('(')?;
        let mut first = true;
        for arg in &self.args {
            if !first {
                w.write_str(&ctx.options().separator)?;
            }
            first = false;
            arg.textify(ctx, w)?;
        }
        w.write_char(')')
    }
}

impl Textify for Argument {
    fn textify<S: Scope, W: fmt::Write>(&self, ctx: &mut S, w: &mut W) -> fmt::Result {
        match self {
            Argument::FunctionCall(call) => call.textify(ctx, w),
            Argument::String(s) => write!(w, "'{}'", escape_string(s)),
            Argument::Number(digits) => checked(
                ctx,
                w,
                "NumberLiteral",
                digits,
                is_number,
                "number literals must be decimal digits",
            ),
            Argument::Boolean(b) => write!(w, "{b}"),
        }
    }
}

/// Write with default options. Invalid names are written as error markers;
/// use [`crate::format`] to also collect the errors.
macro_rules! display_via_textify {
    ($($t:ty),*) => {
        $(
            impl fmt::Display for $t {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let options = OutputOptions::default();
                    let mut errors = ErrorVec::default();
                    let mut ctx = ScopedContext::new(&options, &mut errors);
                    self.textify(&mut ctx, f)
                }
            }
        )*
    };
}

display_via_textify!(Expression, FunctionCall, Argument);
