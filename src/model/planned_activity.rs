use serde::{Deserialize, Serialize};

use super::errors::ValidationError;
use super::validations::{validate_nullable_instant, validate_nullable_string};
use super::ProfileReference;

/// An activity planned by the user, possibly with other users.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedActivity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Profile identifiers of the other users taking part
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlannedActivityStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlannedActivityStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

impl PlannedActivity {
    pub fn validate(&mut self, code_prefix: &str) -> Result<(), ValidationError> {
        self.id = validate_nullable_string(code_prefix, "id", 255, self.id.take())?;
        self.start_time =
            validate_nullable_instant(code_prefix, "startTime", self.start_time.take())?;
        self.end_time = validate_nullable_instant(code_prefix, "endTime", self.end_time.take())?;
        self.description =
            validate_nullable_string(code_prefix, "description", 255, self.description.take())?;
        if let Some(attendees) = self.attendees.take() {
            let mut validated = Vec::with_capacity(attendees.len());
            for (index, attendee) in attendees.into_iter().enumerate() {
                let field = format!("attendees[{}]", index);
                if let Some(id) = validate_nullable_string(code_prefix, &field, 255, Some(attendee))?
                {
                    if validated.contains(&id) {
                        return Err(ValidationError::field(
                            code_prefix,
                            &field,
                            format!("The attendee '{}' is duplicated.", id),
                        ));
                    }
                    validated.push(id);
                }
            }
            self.attendees = Some(validated);
        }
        Ok(())
    }

    pub fn merge(
        &self,
        source: PlannedActivity,
        code_prefix: &str,
    ) -> Result<PlannedActivity, ValidationError> {
        let mut merged = PlannedActivity {
            id: None,
            start_time: source.start_time.or_else(|| self.start_time.clone()),
            end_time: source.end_time.or_else(|| self.end_time.clone()),
            description: source.description.or_else(|| self.description.clone()),
            attendees: source.attendees.or_else(|| self.attendees.clone()),
            status: source.status.or(self.status),
        };
        merged.validate(code_prefix)?;
        merged.id = self.id.clone();
        Ok(merged)
    }

    /// Every attendee has to be a known profile.
    pub fn references(&self, code_prefix: &str) -> Vec<ProfileReference> {
        self.attendees
            .iter()
            .flatten()
            .enumerate()
            .map(|(index, id)| {
                ProfileReference::new(format!("{}.attendees[{}]", code_prefix, index), id)
            })
            .collect()
    }
}
