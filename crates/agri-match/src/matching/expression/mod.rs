//! Interpreter for the nested hard-criteria rule trees stored alongside legacy aids.
//!
//! A tree is either null/empty (always satisfied) or an object keyed by one of
//! `and`, `or`, `in`, `>=`, `<=`, `==`. Field operands are `$`-prefixed tokens
//! resolved against the canonical [`FarmerProfile`].

mod ast;
mod fields;
mod reasons;

pub use ast::Expression;
pub use fields::{FieldRef, ProfileField, ProfileValue};
pub use reasons::{Comparison, ExpressionReason, ReasonDetail};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::domain::FarmerProfile;
use super::evaluator::{Evaluator, Verdict};

/// How unknown field tokens and operator keys are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTermPolicy {
    #[default]
    Reject,
    /// Unknown fields resolve as absent and unknown operators hold.
    Permissive,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("unknown profile field `{token}`")]
    UnknownField { token: String },
    #[error("unknown operator `{operator}`")]
    UnknownOperator { operator: String },
    #[error("operator `{operator}` expects {expected}")]
    MalformedOperands {
        operator: String,
        expected: &'static str,
    },
    #[error("operator `{operator}` requires a numeric operand")]
    NonNumericOperand { operator: String },
    #[error("expression node must be an object or null, got {node}")]
    MalformedNode { node: String },
}

/// Outcome of evaluating one expression against one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionVerdict {
    pub passed: bool,
    pub reasons: Vec<ExpressionReason>,
}

impl ExpressionVerdict {
    pub fn rendered_reasons(&self) -> Vec<String> {
        self.reasons.iter().map(ToString::to_string).collect()
    }
}

impl Verdict for ExpressionVerdict {
    fn passed(&self) -> bool {
        self.passed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpressionEvaluator {
    policy: UnknownTermPolicy,
}

impl ExpressionEvaluator {
    pub const fn new(policy: UnknownTermPolicy) -> Self {
        Self { policy }
    }

    pub const fn strict() -> Self {
        Self::new(UnknownTermPolicy::Reject)
    }

    pub const fn permissive() -> Self {
        Self::new(UnknownTermPolicy::Permissive)
    }

    pub fn policy(&self) -> UnknownTermPolicy {
        self.policy
    }

    pub fn parse(&self, expression: &Value) -> Result<Expression, ExpressionError> {
        Expression::parse(expression, self.policy)
    }

    pub fn evaluate(
        &self,
        expression: &Value,
        profile: &FarmerProfile,
    ) -> Result<ExpressionVerdict, ExpressionError> {
        let parsed = self.parse(expression)?;
        Ok(self.evaluate_parsed(&parsed, profile))
    }

    /// Evaluate an already parsed tree; the reason trail follows document order.
    pub fn evaluate_parsed(&self, expression: &Expression, profile: &FarmerProfile) -> ExpressionVerdict {
        let mut reasons = Vec::new();
        let passed = expression.evaluate(profile, &mut reasons);
        ExpressionVerdict { passed, reasons }
    }
}

impl Evaluator for ExpressionEvaluator {
    type Subject = Value;
    type Verdict = ExpressionVerdict;
    type Error = ExpressionError;

    fn evaluate(
        &self,
        subject: &Self::Subject,
        profile: &FarmerProfile,
    ) -> Result<Self::Verdict, Self::Error> {
        ExpressionEvaluator::evaluate(self, subject, profile)
    }
}
