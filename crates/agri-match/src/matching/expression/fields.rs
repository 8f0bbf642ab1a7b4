use serde_json::Value;

use super::super::domain::FarmerProfile;
use super::{ExpressionError, UnknownTermPolicy};

/// Closed table of profile fields an expression may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Region,
    Department,
    LegalStatus,
    Surface,
    Productions,
    Labels,
    Age,
    YoungFarmer,
    Projects,
}

impl ProfileField {
    /// Tokens as written in stored hard-criteria expressions, plus their English aliases.
    pub fn from_token(token: &str) -> Option<Self> {
        let field = match token {
            "$region" => Self::Region,
            "$departement" | "$department" => Self::Department,
            "$statut" | "$legal_status" => Self::LegalStatus,
            "$superficie_ha" | "$surface" => Self::Surface,
            "$productions" => Self::Productions,
            "$labels" => Self::Labels,
            "$age" => Self::Age,
            "$jeune_agriculteur" | "$young_farmer" => Self::YoungFarmer,
            "$projets" | "$projects" => Self::Projects,
            _ => return None,
        };
        Some(field)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Region => "Region",
            Self::Department => "Department",
            Self::LegalStatus => "Legal status",
            Self::Surface => "Surface",
            Self::Productions => "Productions",
            Self::Labels => "Labels",
            Self::Age => "Age",
            Self::YoungFarmer => "Young farmer",
            Self::Projects => "Projects",
        }
    }

    pub fn resolve(self, profile: &FarmerProfile) -> ProfileValue {
        match self {
            Self::Region => ProfileValue::Text(profile.region.clone()),
            Self::Department => ProfileValue::Text(profile.department.clone()),
            Self::LegalStatus => ProfileValue::Text(profile.legal_status.code().to_string()),
            Self::Surface => ProfileValue::Number(profile.total_surface),
            Self::Productions => ProfileValue::List(
                profile
                    .productions
                    .iter()
                    .map(|production| production.code().to_string())
                    .collect(),
            ),
            Self::Labels => ProfileValue::List(profile.labels.iter().cloned().collect()),
            Self::Age => profile
                .age
                .map(|age| ProfileValue::Number(f64::from(age)))
                .unwrap_or(ProfileValue::Absent),
            Self::YoungFarmer => ProfileValue::Flag(profile.young_farmer),
            Self::Projects => ProfileValue::List(
                profile
                    .projects
                    .iter()
                    .map(|project| project.code().to_string())
                    .collect(),
            ),
        }
    }
}

/// Field reference as parsed from an expression. Unknown tokens only survive under the permissive policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRef {
    Known(ProfileField),
    Unknown(String),
}

impl FieldRef {
    pub(crate) fn parse(token: &str, policy: UnknownTermPolicy) -> Result<Self, ExpressionError> {
        match ProfileField::from_token(token) {
            Some(field) => Ok(Self::Known(field)),
            None => match policy {
                UnknownTermPolicy::Reject => Err(ExpressionError::UnknownField {
                    token: token.to_string(),
                }),
                UnknownTermPolicy::Permissive => Ok(Self::Unknown(token.to_string())),
            },
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Known(field) => field.label().to_string(),
            Self::Unknown(token) => {
                let name = token.trim_start_matches('$');
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }

    pub fn resolve(&self, profile: &FarmerProfile) -> ProfileValue {
        match self {
            Self::Known(field) => field.resolve(profile),
            Self::Unknown(token) => {
                tracing::warn!(%token, "unknown profile field resolved as absent");
                ProfileValue::Absent
            }
        }
    }
}

/// Profile data as seen by the expression language.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileValue {
    Absent,
    Text(String),
    Number(f64),
    Flag(bool),
    List(Vec<String>),
}

impl ProfileValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Scalar membership test against one JSON candidate.
    pub(crate) fn matches(&self, candidate: &Value) -> bool {
        match (self, candidate) {
            (Self::Text(text), Value::String(other)) => text == other,
            (Self::Number(number), Value::Number(other)) => other.as_f64() == Some(*number),
            (Self::Flag(flag), Value::Bool(other)) => flag == other,
            _ => false,
        }
    }

    pub(crate) fn equals(&self, operand: &Value) -> bool {
        match (self, operand) {
            (Self::List(items), Value::Array(others)) => {
                items.len() == others.len()
                    && items
                        .iter()
                        .zip(others)
                        .all(|(item, other)| other.as_str() == Some(item.as_str()))
            }
            (Self::Absent, Value::Null) => true,
            _ => self.matches(operand),
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Absent => "none".to_string(),
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
            Self::Flag(flag) => flag.to_string(),
            Self::List(items) => items.join(", "),
        }
    }
}

pub(crate) fn render_operand(operand: &Value) -> String {
    match operand {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_operand)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
