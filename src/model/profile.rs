//! The user profile document and its embedded value models.
//!
//! A profile is exchanged as a camelCase JSON document. Optional scalars are
//! omitted when absent. Collections stay `None` on a source document that did
//! not provide them, which matters for merges; validation turns them into
//! empty lists so stored profiles always carry them.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::errors::ValidationError;
use super::norm::Norm;
use super::planned_activity::PlannedActivity;
use super::relationship::SocialNetworkRelationship;
use super::relevant_location::RelevantLocation;
use super::validations::{
    validate_calendar_date, validate_nullable_email, validate_nullable_locale,
    validate_nullable_string, validate_nullable_string_in, validate_nullable_telephone,
    OLDEST_BIRTH_DATE,
};
use super::ProfileReference;

pub const FEMALE: &str = "F";
pub const MALE: &str = "M";
pub const OTHER: &str = "O";
pub const NON_BINARY: &str = "non-binary";
pub const NOT_SAY: &str = "not-say";
pub const GENDERS: [&str; 5] = [FEMALE, MALE, OTHER, NON_BINARY, NOT_SAY];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<UserName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<ProfileDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub norms: Option<Vec<Norm>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_activities: Option<Vec<PlannedActivity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevant_locations: Option<Vec<RelevantLocation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<SocialNetworkRelationship>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_behaviors: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_practices: Option<Vec<Value>>,
    #[serde(rename = "_creationTs", default)]
    pub creation_ts: i64,
    #[serde(rename = "_lastUpdateTs", default)]
    pub last_update_ts: i64,
}

/// The parts of a user name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl UserName {
    pub fn validate(&mut self, code_prefix: &str) -> Result<(), ValidationError> {
        self.prefix = validate_nullable_string(code_prefix, "prefix", 10, self.prefix.take())?;
        self.first = validate_nullable_string(code_prefix, "first", 255, self.first.take())?;
        self.middle = validate_nullable_string(code_prefix, "middle", 255, self.middle.take())?;
        self.last = validate_nullable_string(code_prefix, "last", 255, self.last.take())?;
        self.suffix = validate_nullable_string(code_prefix, "suffix", 10, self.suffix.take())?;
        Ok(())
    }

    /// Field by field: a part given in `source` replaces the current one.
    pub fn merge(&self, source: UserName, code_prefix: &str) -> Result<UserName, ValidationError> {
        let mut merged = UserName {
            prefix: source.prefix.or_else(|| self.prefix.clone()),
            first: source.first.or_else(|| self.first.clone()),
            middle: source.middle.or_else(|| self.middle.clone()),
            last: source.last.or_else(|| self.last.clone()),
            suffix: source.suffix.or_else(|| self.suffix.clone()),
        };
        merged.validate(code_prefix)?;
        Ok(merged)
    }
}

impl ProfileDate {
    pub fn validate(&self, code_prefix: &str) -> Result<NaiveDate, ValidationError> {
        validate_calendar_date(code_prefix, self.year, self.month, self.day)
    }

    /// A birth date is a real date, not in the future and not before the
    /// birth of the oldest living person.
    pub fn validate_birth_date(&self, code_prefix: &str) -> Result<(), ValidationError> {
        let date = self.validate(code_prefix)?;
        if date > Utc::now().date_naive() {
            return Err(ValidationError::new(
                code_prefix,
                "The birth date can not be on the future.",
            ));
        }
        let (year, month, day) = OLDEST_BIRTH_DATE;
        if NaiveDate::from_ymd_opt(year, month, day).is_some_and(|oldest| date < oldest) {
            return Err(ValidationError::new(
                code_prefix,
                "The user can not be born before the oldest living person on earth.",
            ));
        }
        Ok(())
    }
}

impl Profile {
    pub fn validate(&mut self, code_prefix: &str) -> Result<(), ValidationError> {
        self.id = validate_nullable_string(code_prefix, "id", 255, self.id.take())?;
        if let Some(name) = self.name.as_mut() {
            name.validate(&format!("{}.name", code_prefix))?;
        }
        if let Some(date) = self.date_of_birth.as_ref() {
            date.validate_birth_date(&format!("{}.dateOfBirth", code_prefix))?;
        }
        self.gender =
            validate_nullable_string_in(code_prefix, "gender", 25, self.gender.take(), &GENDERS)?;
        self.email = validate_nullable_email(code_prefix, "email", self.email.take())?;
        self.locale = validate_nullable_locale(code_prefix, "locale", self.locale.take())?;
        self.phone_number =
            validate_nullable_telephone(code_prefix, "phoneNumber", self.phone_number.take())?;
        self.avatar = validate_nullable_string(code_prefix, "avatar", 255, self.avatar.take())?;
        self.nationality =
            validate_nullable_string(code_prefix, "nationality", 255, self.nationality.take())?;
        self.occupation =
            validate_nullable_string(code_prefix, "occupation", 255, self.occupation.take())?;

        // Stored profiles always carry their collections.
        self.norms.get_or_insert_with(Vec::new);
        self.planned_activities.get_or_insert_with(Vec::new);
        self.relevant_locations.get_or_insert_with(Vec::new);
        self.relationships.get_or_insert_with(Vec::new);
        self.personal_behaviors.get_or_insert_with(Vec::new);
        self.languages.get_or_insert_with(Vec::new);
        self.social_practices.get_or_insert_with(Vec::new);

        if let Some(norms) = self.norms.as_mut() {
            let prefix = format!("{}.norms", code_prefix);
            for (index, norm) in norms.iter_mut().enumerate() {
                norm.validate(&format!("{}[{}]", prefix, index))?;
            }
            assign_missing_ids(norms, |n| &mut n.id);
            ensure_unique_ids(norms, &prefix, |n| n.id.as_deref())?;
        }
        if let Some(activities) = self.planned_activities.as_mut() {
            let prefix = format!("{}.plannedActivities", code_prefix);
            for (index, activity) in activities.iter_mut().enumerate() {
                activity.validate(&format!("{}[{}]", prefix, index))?;
            }
            assign_missing_ids(activities, |a| &mut a.id);
            ensure_unique_ids(activities, &prefix, |a| a.id.as_deref())?;
        }
        if let Some(locations) = self.relevant_locations.as_mut() {
            let prefix = format!("{}.relevantLocations", code_prefix);
            for (index, location) in locations.iter_mut().enumerate() {
                location.validate(&format!("{}[{}]", prefix, index))?;
            }
            assign_missing_ids(locations, |l| &mut l.id);
            ensure_unique_ids(locations, &prefix, |l| l.id.as_deref())?;
        }
        if let Some(relationships) = self.relationships.as_mut() {
            let prefix = format!("{}.relationships", code_prefix);
            for index in 0..relationships.len() {
                let item_prefix = format!("{}[{}]", prefix, index);
                relationships[index].validate(&item_prefix)?;
                if relationships[..index].contains(&relationships[index]) {
                    return Err(ValidationError::new(
                        item_prefix,
                        "The relationship is duplicated.",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Merge `source` into this profile. Values present in the source win;
    /// identifier and creation time always come from this profile.
    pub fn merge(&self, source: Profile, code_prefix: &str) -> Result<Profile, ValidationError> {
        let name = match (self.name.as_ref(), source.name) {
            (Some(target), Some(source)) => {
                Some(target.merge(source, &format!("{}.name", code_prefix))?)
            }
            (target, source) => source.or_else(|| target.cloned()),
        };

        let mut merged = Profile {
            id: None,
            name,
            date_of_birth: source.date_of_birth.or(self.date_of_birth),
            gender: source.gender.or_else(|| self.gender.clone()),
            email: source.email.or_else(|| self.email.clone()),
            phone_number: source.phone_number.or_else(|| self.phone_number.clone()),
            locale: source.locale.or_else(|| self.locale.clone()),
            avatar: source.avatar.or_else(|| self.avatar.clone()),
            nationality: source.nationality.or_else(|| self.nationality.clone()),
            occupation: source.occupation.or_else(|| self.occupation.clone()),
            norms: merge_by_id(
                self.norms.as_deref(),
                source.norms,
                &format!("{}.norms", code_prefix),
                |n| n.id.as_deref(),
                |target, source, prefix| target.merge(source, prefix),
            )?,
            planned_activities: merge_by_id(
                self.planned_activities.as_deref(),
                source.planned_activities,
                &format!("{}.plannedActivities", code_prefix),
                |a| a.id.as_deref(),
                |target, source, prefix| target.merge(source, prefix),
            )?,
            relevant_locations: merge_by_id(
                self.relevant_locations.as_deref(),
                source.relevant_locations,
                &format!("{}.relevantLocations", code_prefix),
                |l| l.id.as_deref(),
                |target, source, prefix| target.merge(source, prefix),
            )?,
            relationships: source.relationships.or_else(|| self.relationships.clone()),
            personal_behaviors: source
                .personal_behaviors
                .or_else(|| self.personal_behaviors.clone()),
            languages: source.languages.or_else(|| self.languages.clone()),
            social_practices: source
                .social_practices
                .or_else(|| self.social_practices.clone()),
            creation_ts: self.creation_ts,
            last_update_ts: self.last_update_ts,
        };
        merged.validate(code_prefix)?;
        merged.id = self.id.clone();
        Ok(merged)
    }

    /// Replace every value with the ones of `source`, keeping identifier and
    /// time stamps. `source` must already be validated.
    pub fn update(&self, source: Profile) -> Profile {
        Profile {
            id: self.id.clone(),
            creation_ts: self.creation_ts,
            last_update_ts: self.last_update_ts,
            ..source
        }
    }

    /// Profiles this one points at (relationships and activity attendees).
    pub fn references(&self, code_prefix: &str) -> Vec<ProfileReference> {
        let mut references = Vec::new();
        for (index, relationship) in self.relationships.iter().flatten().enumerate() {
            references.extend(
                relationship.references(&format!("{}.relationships[{}]", code_prefix, index)),
            );
        }
        for (index, activity) in self.planned_activities.iter().flatten().enumerate() {
            references.extend(
                activity.references(&format!("{}.plannedActivities[{}]", code_prefix, index)),
            );
        }
        references
    }
}

pub(crate) fn assign_missing_ids<T>(items: &mut [T], id_of: impl Fn(&mut T) -> &mut Option<String>) {
    for item in items.iter_mut() {
        let id = id_of(item);
        if id.is_none() {
            *id = Some(Uuid::new_v4().to_string());
        }
    }
}

pub(crate) fn ensure_unique_ids<T>(
    items: &[T],
    code_prefix: &str,
    id_of: impl Fn(&T) -> Option<&str>,
) -> Result<(), ValidationError> {
    for (index, item) in items.iter().enumerate() {
        if let Some(id) = id_of(item) {
            if items[..index].iter().any(|other| id_of(other) == Some(id)) {
                return Err(ValidationError::new(
                    format!("{}[{}].id", code_prefix, index),
                    format!("The identifier '{}' is duplicated.", id),
                ));
            }
        }
    }
    Ok(())
}

/// A source collection replaces the target one; each source entry whose id
/// matches a target entry is merged into it, the others are taken as new.
fn merge_by_id<T: Clone>(
    target: Option<&[T]>,
    source: Option<Vec<T>>,
    code_prefix: &str,
    id_of: impl Fn(&T) -> Option<&str>,
    merge: impl Fn(&T, T, &str) -> Result<T, ValidationError>,
) -> Result<Option<Vec<T>>, ValidationError> {
    let Some(source) = source else {
        return Ok(target.map(|t| t.to_vec()));
    };
    let target = target.unwrap_or(&[]);
    let mut merged = Vec::with_capacity(source.len());
    for (index, item) in source.into_iter().enumerate() {
        let existing = id_of(&item)
            .and_then(|id| target.iter().find(|candidate| id_of(*candidate) == Some(id)));
        match existing {
            Some(existing) => {
                merged.push(merge(existing, item, &format!("{}[{}]", code_prefix, index))?)
            }
            None => merged.push(item),
        }
    }
    Ok(Some(merged))
}
