use serde::{Deserialize, Serialize};

use super::errors::ValidationError;
use super::validations::validate_nullable_string;
use super::ProfileReference;

/// A social relationship with another user of the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialNetworkRelationship {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<RelationshipType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    Family,
    Friend,
    Colleague,
    Acquaintance,
    Follower,
}

impl SocialNetworkRelationship {
    pub fn validate(&mut self, code_prefix: &str) -> Result<(), ValidationError> {
        if self.relationship_type.is_none() {
            return Err(ValidationError::field(
                code_prefix,
                "type",
                "It is not allowed a social relationship without a type.",
            ));
        }
        self.user_id = validate_nullable_string(code_prefix, "userId", 255, self.user_id.take())?;
        if self.user_id.is_none() {
            return Err(ValidationError::field(
                code_prefix,
                "userId",
                "It is not allowed a social relationship without an user identifier.",
            ));
        }
        Ok(())
    }

    pub fn merge(
        &self,
        source: SocialNetworkRelationship,
        code_prefix: &str,
    ) -> Result<SocialNetworkRelationship, ValidationError> {
        let mut merged = SocialNetworkRelationship {
            user_id: source.user_id.or_else(|| self.user_id.clone()),
            relationship_type: source.relationship_type.or(self.relationship_type),
        };
        merged.validate(code_prefix)?;
        Ok(merged)
    }

    pub fn references(&self, code_prefix: &str) -> Vec<ProfileReference> {
        self.user_id
            .iter()
            .map(|id| ProfileReference::new(format!("{}.userId", code_prefix), id))
            .collect()
    }
}
