//! The expression tree produced by the parser.
//!
//! The tree is strictly hierarchical: every node owns its children, and a
//! new tree is produced for every parse.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A complete bracketed expression: `[name(args...).member.member]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expression {
    pub function: FunctionCall,
    // Outer-to-inner access, in source order.
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Argument>,
}

/// A single function argument. Nested calls carry no member chain of their
/// own.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Argument {
    FunctionCall(FunctionCall),
    /// Decoded text, without quotes or escapes.
    String(String),
    /// Decimal digits exactly as written, e.g. `"007"`.
    Number(String),
    Boolean(bool),
}

impl Expression {
    pub fn new(function: FunctionCall) -> Self {
        Self {
            function,
            members: Vec::new(),
        }
    }

    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members.extend(members.into_iter().map(Into::into));
        self
    }
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Vec<Argument>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl Argument {
    pub fn string(s: impl Into<String>) -> Self {
        Argument::String(s.into())
    }

    pub fn number(digits: impl Into<String>) -> Self {
        Argument::Number(digits.into())
    }
}

impl From<FunctionCall> for Argument {
    fn from(call: FunctionCall) -> Self {
        Argument::FunctionCall(call)
    }
}

impl From<bool> for Argument {
    fn from(b: bool) -> Self {
        Argument::Boolean(b)
    }
}

/// Function names are one or more ASCII letters.
pub fn is_function_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())
}

/// Member names are one or more ASCII letters, digits, `_` or `-`.
pub fn is_member_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Number literals are one or more ASCII digits.
pub fn is_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
