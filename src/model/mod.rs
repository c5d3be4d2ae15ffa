//! Profile documents, the models embedded in them, and their validation.

pub mod errors;
pub mod field;
pub mod historic;
pub mod norm;
pub mod planned_activity;
pub mod profile;
pub mod relationship;
pub mod relevant_location;
pub mod validations;

pub use errors::ValidationError;
pub use field::{Norms, PlannedActivities, ProfileField, Relationships, RelevantLocations};
pub use historic::{HistoricProfile, HistoricProfilesPage, ProfilesPage, UserIdentifiersPage};
pub use norm::{Norm, NormOperator};
pub use planned_activity::{PlannedActivity, PlannedActivityStatus};
pub use profile::{Profile, ProfileDate, UserName, GENDERS};
pub use relationship::{RelationshipType, SocialNetworkRelationship};
pub use relevant_location::RelevantLocation;

/// A profile identifier mentioned by a model, together with the error code to
/// report when no such profile exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileReference {
    pub code: String,
    pub profile_id: String,
}

impl ProfileReference {
    pub fn new(code: impl Into<String>, profile_id: impl Into<String>) -> Self {
        ProfileReference {
            code: code.into(),
            profile_id: profile_id.into(),
        }
    }
}
