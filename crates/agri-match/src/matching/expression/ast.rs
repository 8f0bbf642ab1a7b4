use serde_json::{Map, Value};
use tracing::warn;

use super::super::domain::FarmerProfile;
use super::fields::{render_operand, FieldRef, ProfileValue};
use super::{Comparison, ExpressionError, ExpressionReason, ReasonDetail, UnknownTermPolicy};

/// Parsed hard-criteria expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Null or empty node, or any falsy node under the permissive policy; vacuously satisfied.
    Always,
    All(Vec<Expression>),
    Any(Vec<Expression>),
    In {
        field: FieldRef,
        values: Vec<Value>,
    },
    Compare {
        field: FieldRef,
        operator: Comparison,
        operand: Value,
    },
    /// Operator key kept under the permissive policy; evaluates to true.
    Unrecognized { operator: String },
}

impl Expression {
    /// Parse a JSON node. When a node carries several operator keys, the first of
    /// `and`, `or`, `in`, `>=`, `<=`, `==` wins.
    pub fn parse(node: &Value, policy: UnknownTermPolicy) -> Result<Self, ExpressionError> {
        let map = match node {
            Value::Null => return Ok(Self::Always),
            Value::Object(map) => map,
            other if policy == UnknownTermPolicy::Permissive && is_falsy(other) => {
                return Ok(Self::Always)
            }
            other => {
                return Err(ExpressionError::MalformedNode {
                    node: other.to_string(),
                })
            }
        };

        if map.is_empty() {
            return Ok(Self::Always);
        }

        if let Some(children) = map.get("and") {
            return Ok(Self::All(parse_children("and", children, policy)?));
        }
        if let Some(children) = map.get("or") {
            return Ok(Self::Any(parse_children("or", children, policy)?));
        }
        if let Some(operands) = map.get("in") {
            let (token, values) = field_operands("in", operands)?;
            let values = values
                .as_array()
                .ok_or_else(|| ExpressionError::MalformedOperands {
                    operator: "in".to_string(),
                    expected: "[field, [values...]]",
                })?
                .clone();
            return Ok(Self::In {
                field: FieldRef::parse(token, policy)?,
                values,
            });
        }
        for operator in [Comparison::AtLeast, Comparison::AtMost, Comparison::Equals] {
            if let Some(operands) = map.get(operator.symbol()) {
                return parse_comparison(operator, operands, policy);
            }
        }

        unrecognized(map, policy)
    }

    pub(crate) fn evaluate(
        &self,
        profile: &FarmerProfile,
        reasons: &mut Vec<ExpressionReason>,
    ) -> bool {
        match self {
            Self::Always => true,
            // Every branch is visited so the reason trail is complete.
            Self::All(children) => {
                let results: Vec<bool> = children
                    .iter()
                    .map(|child| child.evaluate(profile, reasons))
                    .collect();
                results.into_iter().all(|passed| passed)
            }
            Self::Any(children) => {
                let results: Vec<bool> = children
                    .iter()
                    .map(|child| child.evaluate(profile, reasons))
                    .collect();
                results.into_iter().any(|passed| passed)
            }
            Self::In { field, values } => {
                let (passed, detail) = match field.resolve(profile) {
                    ProfileValue::List(items) => {
                        let matched: Vec<String> = items
                            .into_iter()
                            .filter(|item| values.iter().any(|v| v.as_str() == Some(item)))
                            .collect();
                        if matched.is_empty() {
                            (false, ReasonDetail::NoMatch)
                        } else {
                            (true, ReasonDetail::Matched { values: matched })
                        }
                    }
                    scalar => {
                        if values.iter().any(|candidate| scalar.matches(candidate)) {
                            (
                                true,
                                ReasonDetail::Member {
                                    value: scalar.render(),
                                },
                            )
                        } else {
                            (false, ReasonDetail::NotMember)
                        }
                    }
                };
                reasons.push(ExpressionReason {
                    field: field.label(),
                    passed,
                    detail,
                });
                passed
            }
            Self::Compare {
                field,
                operator,
                operand,
            } => {
                let actual = field.resolve(profile);
                let passed = match operator {
                    Comparison::AtLeast => compare(&actual, operand, |a, b| a >= b),
                    Comparison::AtMost => compare(&actual, operand, |a, b| a <= b),
                    Comparison::Equals => actual.equals(operand),
                };
                reasons.push(ExpressionReason {
                    field: field.label(),
                    passed,
                    detail: ReasonDetail::Comparison {
                        actual: actual.render(),
                        operator: *operator,
                        expected: render_operand(operand),
                    },
                });
                passed
            }
            Self::Unrecognized { operator } => {
                warn!(%operator, "unrecognized expression operator treated as satisfied");
                true
            }
        }
    }
}

/// `false`, `0`, `""` and `[]`.
fn is_falsy(node: &Value) -> bool {
    match node {
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Null | Value::Object(_) => false,
    }
}

fn parse_children(
    operator: &str,
    children: &Value,
    policy: UnknownTermPolicy,
) -> Result<Vec<Expression>, ExpressionError> {
    children
        .as_array()
        .ok_or_else(|| ExpressionError::MalformedOperands {
            operator: operator.to_string(),
            expected: "an array of sub-expressions",
        })?
        .iter()
        .map(|child| Expression::parse(child, policy))
        .collect()
}

fn field_operands<'a>(
    operator: &str,
    operands: &'a Value,
) -> Result<(&'a str, &'a Value), ExpressionError> {
    let malformed = || ExpressionError::MalformedOperands {
        operator: operator.to_string(),
        expected: "a [field, operand] pair",
    };

    match operands.as_array().map(Vec::as_slice) {
        Some([Value::String(token), operand]) => Ok((token.as_str(), operand)),
        _ => Err(malformed()),
    }
}

fn parse_comparison(
    operator: Comparison,
    operands: &Value,
    policy: UnknownTermPolicy,
) -> Result<Expression, ExpressionError> {
    let (token, operand) = field_operands(operator.symbol(), operands)?;
    if operator != Comparison::Equals
        && operand.as_f64().is_none()
        && policy == UnknownTermPolicy::Reject
    {
        return Err(ExpressionError::NonNumericOperand {
            operator: operator.symbol().to_string(),
        });
    }

    Ok(Expression::Compare {
        field: FieldRef::parse(token, policy)?,
        operator,
        operand: operand.clone(),
    })
}

fn unrecognized(
    map: &Map<String, Value>,
    policy: UnknownTermPolicy,
) -> Result<Expression, ExpressionError> {
    let operator = map.keys().next().cloned().unwrap_or_default();
    match policy {
        UnknownTermPolicy::Reject => Err(ExpressionError::UnknownOperator { operator }),
        UnknownTermPolicy::Permissive => Ok(Expression::Unrecognized { operator }),
    }
}

/// Missing or non-numeric values fail the comparison instead of erroring.
fn compare(actual: &ProfileValue, operand: &Value, holds: fn(f64, f64) -> bool) -> bool {
    match (actual.as_number(), operand.as_f64()) {
        (Some(actual), Some(expected)) => holds(actual, expected),
        _ => false,
    }
}
