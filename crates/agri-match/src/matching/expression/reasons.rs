use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison operators of the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    AtLeast,
    AtMost,
    Equals,
}

impl Comparison {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
            Self::Equals => "==",
        }
    }

    const fn satisfied_symbol(self) -> &'static str {
        match self {
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
            Self::Equals => "=",
        }
    }

    const fn violated_symbol(self) -> &'static str {
        match self {
            Self::AtLeast => "<",
            Self::AtMost => ">",
            Self::Equals => "≠",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReasonDetail {
    /// Collection field with at least one member in the accepted set.
    Matched { values: Vec<String> },
    NoMatch,
    /// Scalar field found in the accepted set.
    Member { value: String },
    NotMember,
    Comparison {
        actual: String,
        operator: Comparison,
        expected: String,
    },
}

/// One comparison outcome in an expression's reason trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionReason {
    pub field: String,
    pub passed: bool,
    pub detail: ReasonDetail,
}

impl fmt::Display for ExpressionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.passed { '✔' } else { '✘' };
        write!(f, "{mark} {}: ", self.field)?;
        match &self.detail {
            ReasonDetail::Matched { values } => write!(f, "{}", values.join(", ")),
            ReasonDetail::NoMatch => write!(f, "no match"),
            ReasonDetail::Member { value } => write!(f, "{value}"),
            ReasonDetail::NotMember => write!(f, "not in accepted values"),
            ReasonDetail::Comparison {
                actual,
                operator,
                expected,
            } => {
                if self.passed {
                    write!(f, "{actual} {} {expected}", operator.satisfied_symbol())
                } else if *operator == Comparison::AtLeast {
                    write!(
                        f,
                        "{actual} {} {expected} required",
                        operator.violated_symbol()
                    )
                } else {
                    write!(f, "{actual} {} {expected}", operator.violated_symbol())
                }
            }
        }
    }
}
