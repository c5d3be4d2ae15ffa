//! The collections embedded in a profile that can be managed one item at a
//! time (`/profiles/{userId}/norms/{id}` and friends).
//!
//! Each collection is described by a marker type implementing
//! [`ProfileField`], so the HTTP layer can serve all of them with a single set
//! of generic handlers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::errors::ValidationError;
use super::norm::Norm;
use super::planned_activity::PlannedActivity;
use super::profile::Profile;
use super::relationship::SocialNetworkRelationship;
use super::relevant_location::RelevantLocation;
use super::ProfileReference;

pub trait ProfileField: Send + Sync + 'static {
    type Item: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Used to build error codes, e.g. `bad_norm` or `norm_not_defined`.
    const MODEL_NAME: &'static str;

    fn items(profile: &Profile) -> &[Self::Item];

    fn items_mut(profile: &mut Profile) -> &mut Vec<Self::Item>;

    fn validate(item: &mut Self::Item, code_prefix: &str) -> Result<(), ValidationError>;

    fn merge(
        target: &Self::Item,
        source: Self::Item,
        code_prefix: &str,
    ) -> Result<Self::Item, ValidationError>;

    fn id(item: &Self::Item) -> Option<&str>;

    fn set_id(item: &mut Self::Item, id: String);

    fn references(_item: &Self::Item, _code_prefix: &str) -> Vec<ProfileReference> {
        Vec::new()
    }

    /// Position of the item addressed by the `key` path segment.
    fn locate(items: &[Self::Item], key: &str) -> Option<usize> {
        items.iter().position(|item| Self::id(item) == Some(key))
    }

    /// Whether `a` and `b` cannot live together in the same collection.
    fn is_duplicate(a: &Self::Item, b: &Self::Item) -> bool {
        Self::id(a).is_some() && Self::id(a) == Self::id(b)
    }

    /// Fails when an entry of `items`, other than the one at `replacing`,
    /// duplicates `item`.
    fn ensure_distinct(
        items: &[Self::Item],
        replacing: Option<usize>,
        item: &Self::Item,
    ) -> Result<(), ValidationError> {
        let duplicated = items
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != replacing)
            .any(|(_, other)| Self::is_duplicate(other, item));
        if duplicated {
            return Err(ValidationError::new(
                Self::duplicated_code(),
                format!(
                    "Already exist a {} with the specified identifier.",
                    Self::MODEL_NAME
                ),
            ));
        }
        Ok(())
    }

    /// Give a validated item its identity before it joins `items`.
    fn prepare_new(items: &[Self::Item], item: &mut Self::Item) -> Result<(), ValidationError> {
        if Self::id(item).is_none() {
            Self::set_id(item, Uuid::new_v4().to_string());
        }
        Self::ensure_distinct(items, None, item)
    }

    /// An item replacing `existing` keeps its identity.
    fn keep_identity(existing: &Self::Item, replacement: &mut Self::Item) {
        if let Some(id) = Self::id(existing) {
            Self::set_id(replacement, id.to_string());
        }
    }

    fn bad_code() -> String {
        format!("bad_{}", Self::MODEL_NAME)
    }

    fn not_found_code() -> String {
        format!("{}_not_defined", Self::MODEL_NAME)
    }

    fn duplicated_code() -> String {
        format!("duplicated_{}_identifier", Self::MODEL_NAME)
    }
}

pub struct Norms;

impl ProfileField for Norms {
    type Item = Norm;
    const MODEL_NAME: &'static str = "norm";

    fn items(profile: &Profile) -> &[Norm] {
        profile.norms.as_deref().unwrap_or(&[])
    }

    fn items_mut(profile: &mut Profile) -> &mut Vec<Norm> {
        profile.norms.get_or_insert_with(Vec::new)
    }

    fn validate(item: &mut Norm, code_prefix: &str) -> Result<(), ValidationError> {
        item.validate(code_prefix)
    }

    fn merge(target: &Norm, source: Norm, code_prefix: &str) -> Result<Norm, ValidationError> {
        target.merge(source, code_prefix)
    }

    fn id(item: &Norm) -> Option<&str> {
        item.id.as_deref()
    }

    fn set_id(item: &mut Norm, id: String) {
        item.id = Some(id);
    }
}

pub struct PlannedActivities;

impl ProfileField for PlannedActivities {
    type Item = PlannedActivity;
    const MODEL_NAME: &'static str = "planned_activity";

    fn items(profile: &Profile) -> &[PlannedActivity] {
        profile.planned_activities.as_deref().unwrap_or(&[])
    }

    fn items_mut(profile: &mut Profile) -> &mut Vec<PlannedActivity> {
        profile.planned_activities.get_or_insert_with(Vec::new)
    }

    fn validate(item: &mut PlannedActivity, code_prefix: &str) -> Result<(), ValidationError> {
        item.validate(code_prefix)
    }

    fn merge(
        target: &PlannedActivity,
        source: PlannedActivity,
        code_prefix: &str,
    ) -> Result<PlannedActivity, ValidationError> {
        target.merge(source, code_prefix)
    }

    fn id(item: &PlannedActivity) -> Option<&str> {
        item.id.as_deref()
    }

    fn set_id(item: &mut PlannedActivity, id: String) {
        item.id = Some(id);
    }

    fn references(item: &PlannedActivity, code_prefix: &str) -> Vec<ProfileReference> {
        item.references(code_prefix)
    }
}

pub struct RelevantLocations;

impl ProfileField for RelevantLocations {
    type Item = RelevantLocation;
    const MODEL_NAME: &'static str = "relevant_location";

    fn items(profile: &Profile) -> &[RelevantLocation] {
        profile.relevant_locations.as_deref().unwrap_or(&[])
    }

    fn items_mut(profile: &mut Profile) -> &mut Vec<RelevantLocation> {
        profile.relevant_locations.get_or_insert_with(Vec::new)
    }

    fn validate(item: &mut RelevantLocation, code_prefix: &str) -> Result<(), ValidationError> {
        item.validate(code_prefix)
    }

    fn merge(
        target: &RelevantLocation,
        source: RelevantLocation,
        code_prefix: &str,
    ) -> Result<RelevantLocation, ValidationError> {
        target.merge(source, code_prefix)
    }

    fn id(item: &RelevantLocation) -> Option<&str> {
        item.id.as_deref()
    }

    fn set_id(item: &mut RelevantLocation, id: String) {
        item.id = Some(id);
    }
}

/// Relationships have no identifier of their own; they are addressed by
/// their position in the list.
pub struct Relationships;

impl ProfileField for Relationships {
    type Item = SocialNetworkRelationship;
    const MODEL_NAME: &'static str = "relationship";

    fn items(profile: &Profile) -> &[SocialNetworkRelationship] {
        profile.relationships.as_deref().unwrap_or(&[])
    }

    fn items_mut(profile: &mut Profile) -> &mut Vec<SocialNetworkRelationship> {
        profile.relationships.get_or_insert_with(Vec::new)
    }

    fn validate(
        item: &mut SocialNetworkRelationship,
        code_prefix: &str,
    ) -> Result<(), ValidationError> {
        item.validate(code_prefix)
    }

    fn merge(
        target: &SocialNetworkRelationship,
        source: SocialNetworkRelationship,
        code_prefix: &str,
    ) -> Result<SocialNetworkRelationship, ValidationError> {
        target.merge(source, code_prefix)
    }

    fn id(_item: &SocialNetworkRelationship) -> Option<&str> {
        None
    }

    fn set_id(_item: &mut SocialNetworkRelationship, _id: String) {}

    fn references(item: &SocialNetworkRelationship, code_prefix: &str) -> Vec<ProfileReference> {
        item.references(code_prefix)
    }

    fn locate(items: &[SocialNetworkRelationship], key: &str) -> Option<usize> {
        key.parse::<usize>().ok().filter(|index| *index < items.len())
    }

    fn is_duplicate(a: &SocialNetworkRelationship, b: &SocialNetworkRelationship) -> bool {
        a == b
    }
}
