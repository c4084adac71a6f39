//! Output an expression in canonical text format.

pub mod expressions;
pub mod foundation;

pub use foundation::{
    ErrorAccumulator, ErrorVec, FormatError, FormatErrorType, OutputOptions, Scope, ScopedContext,
    Textify,
};
