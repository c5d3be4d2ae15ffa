use serde::{Deserialize, Serialize};

use super::errors::ValidationError;
use super::validations::{validate_nullable_string, validate_range};

/// A location of interest for the user, such as home or work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevantLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl RelevantLocation {
    pub fn validate(&mut self, code_prefix: &str) -> Result<(), ValidationError> {
        self.id = validate_nullable_string(code_prefix, "id", 255, self.id.take())?;
        self.label = validate_nullable_string(code_prefix, "label", 255, self.label.take())?;
        self.latitude = validate_range(code_prefix, "latitude", self.latitude, -90.0, 90.0)?;
        self.longitude = validate_range(code_prefix, "longitude", self.longitude, -180.0, 180.0)?;
        Ok(())
    }

    pub fn merge(
        &self,
        source: RelevantLocation,
        code_prefix: &str,
    ) -> Result<RelevantLocation, ValidationError> {
        let mut merged = RelevantLocation {
            id: None,
            label: source.label.or_else(|| self.label.clone()),
            latitude: source.latitude.or(self.latitude),
            longitude: source.longitude.or(self.longitude),
        };
        merged.validate(code_prefix)?;
        merged.id = self.id.clone();
        Ok(merged)
    }
}
