use serde::{Deserialize, Serialize};

use super::errors::ValidationError;
use super::validations::validate_nullable_string;

/// A norm that the user wants to be satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Norm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name of the attribute the norm compares against, e.g. `has_car`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<NormOperator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
    #[serde(default = "default_negation")]
    pub negation: bool,
}

fn default_negation() -> bool {
    true
}

impl Default for Norm {
    fn default() -> Self {
        Norm {
            id: None,
            attribute: None,
            operator: None,
            comparison: None,
            negation: default_negation(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NormOperator {
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessThanOrEquals,
    GreaterThanOrEquals,
}

impl Norm {
    pub fn validate(&mut self, code_prefix: &str) -> Result<(), ValidationError> {
        self.id = validate_nullable_string(code_prefix, "id", 255, self.id.take())?;
        self.attribute =
            validate_nullable_string(code_prefix, "attribute", 255, self.attribute.take())?;
        self.comparison =
            validate_nullable_string(code_prefix, "comparison", 255, self.comparison.take())?;
        Ok(())
    }

    pub fn merge(&self, source: Norm, code_prefix: &str) -> Result<Norm, ValidationError> {
        let mut merged = Norm {
            id: None,
            attribute: source.attribute.or_else(|| self.attribute.clone()),
            operator: source.operator.or(self.operator),
            comparison: source.comparison.or_else(|| self.comparison.clone()),
            negation: source.negation,
        };
        merged.validate(code_prefix)?;
        merged.id = self.id.clone();
        Ok(merged)
    }
}
