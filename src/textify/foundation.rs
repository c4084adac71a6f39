use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

const ERROR_MARKER_START: &str = "!{";
const ERROR_MARKER_END: &str = "}";

/// OutputOptions holds the options for writing an expression as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Written between function arguments.
    pub separator: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            separator: ", ".to_string(),
        }
    }
}

impl OutputOptions {
    /// No whitespace between arguments: `[f(1,2)]`.
    pub fn compact() -> Self {
        Self {
            separator: ",".to_string(),
        }
    }
}

pub trait ErrorAccumulator {
    fn push(&mut self, e: FormatError);
}

#[derive(Default, Debug, Clone)]
pub struct ErrorVec(pub Vec<FormatError>);

impl ErrorAccumulator for ErrorVec {
    fn push(&mut self, e: FormatError) {
        self.0.push(e);
    }
}

impl IntoIterator for ErrorVec {
    type Item = FormatError;
    type IntoIter = std::vec::IntoIter<FormatError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ErrorVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.0 {
            if first {
                first = false;
            } else {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormatErrorType {
    InvalidValue,
    Fmt,
}

impl fmt::Display for FormatErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatErrorType::InvalidValue => write!(f, "InvalidValue"),
            FormatErrorType::Fmt => write!(f, "Fmt"),
        }
    }
}

/// An error encountered while writing a tree that could not have come from
/// the parser, e.g. a hand-built call with an empty name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error_type} Error writing {message}: {description}")]
pub struct FormatError {
    // The kind of token being written
    pub message: &'static str,
    // The offending value, if there is one
    pub lookup: Option<Cow<'static, str>>,
    pub description: Cow<'static, str>,
    pub error_type: FormatErrorType,
}

impl FormatError {
    pub fn invalid(
        message: &'static str,
        specific: Option<impl Into<Cow<'static, str>>>,
        description: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            message,
            lookup: specific.map(|s| s.into()),
            description: description.into(),
            error_type: FormatErrorType::InvalidValue,
        }
    }
}

impl From<fmt::Error> for FormatError {
    fn from(_: fmt::Error) -> Self {
        Self {
            message: "fmt",
            lookup: None,
            description: Cow::Borrowed("fmt error"),
            error_type: FormatErrorType::Fmt,
        }
    }
}

/// A trait for types that can be written in canonical expression syntax.
pub trait Textify {
    fn textify<S: Scope, W: fmt::Write>(&self, ctx: &mut S, w: &mut W) -> fmt::Result;
}

pub trait Scope: Sized {
    type Errors: ErrorAccumulator;

    fn options(&self) -> &OutputOptions;
    fn errors(&mut self) -> &mut Self::Errors;

    fn push_error(&mut self, e: FormatError) {
        self.errors().push(e);
    }

    /// Handle a value that cannot be written. It is replaced in the output by
    /// "!{name: value}", and the error is pushed to the error accumulator.
    fn failure<W: fmt::Write>(&mut self, w: &mut W, e: FormatError) -> fmt::Result {
        if e.error_type == FormatErrorType::Fmt {
            return Err(fmt::Error);
        }
        write!(w, "{}{}", ERROR_MARKER_START, e.message)?;
        if let Some(ref lookup) = e.lookup {
            write!(w, ": {}", lookup)?;
        }
        write!(w, "{}", ERROR_MARKER_END)?;
        self.push_error(e);
        Ok(())
    }
}

pub struct ScopedContext<'a, Err: ErrorAccumulator> {
    errors: &'a mut Err,
    options: &'a OutputOptions,
}

impl<'a, Err: ErrorAccumulator> ScopedContext<'a, Err> {
    pub fn new(options: &'a OutputOptions, errors: &'a mut Err) -> Self {
        Self { options, errors }
    }
}

impl<Err: ErrorAccumulator> Scope for ScopedContext<'_, Err> {
    type Errors = Err;

    fn options(&self) -> &OutputOptions {
        self.options
    }

    fn errors(&mut self) -> &mut Self::Errors {
        self.errors
    }
}
