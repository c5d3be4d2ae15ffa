//! Storage of profiles and of their historic versions.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{HistoricProfile, HistoricProfilesPage, Profile, ProfilesPage};

pub mod memory;
pub mod seed;

pub use memory::InMemoryProfilesRepository;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PersistenceError {
    #[error("No profile is associated to the identifier '{0}'")]
    NotFound(String),

    #[error("A profile with the identifier '{0}' already exists")]
    Duplicated(String),

    #[error("Cannot read seed file {path}: {message}")]
    SeedRead { path: String, message: String },

    #[error("Cannot parse seed file {path}: {message}")]
    SeedParse { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Filter over the historic versions of one profile.
///
/// `from` and `to` bound the window of each historic entry, both inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricQuery {
    pub profile_id: String,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub ascending: bool,
    pub offset: usize,
    pub limit: usize,
}

impl HistoricQuery {
    pub fn for_profile(profile_id: impl Into<String>) -> Self {
        HistoricQuery {
            profile_id: profile_id.into(),
            from: None,
            to: None,
            ascending: true,
            offset: 0,
            limit: 10,
        }
    }

    pub fn matches(&self, historic: &HistoricProfile) -> bool {
        historic.profile.id.as_deref() == Some(self.profile_id.as_str())
            && self.from.is_none_or(|from| historic.from >= from)
            && self.to.is_none_or(|to| historic.to <= to)
    }
}

/// The store the REST API works on.
#[async_trait]
pub trait ProfilesRepository: Send + Sync {
    /// Finds the profile with the given identifier.
    async fn search_profile(&self, id: &str) -> Result<Option<Profile>>;

    /// Stores a new profile, stamping both time stamps with the current time.
    /// A fresh identifier is assigned when the profile has none.
    async fn store_profile(&self, profile: Profile) -> Result<Profile>;

    /// Stores a profile exactly as given, time stamps included.
    async fn import_profile(&self, profile: Profile) -> Result<Profile>;

    /// Replaces a stored profile, stamping `_lastUpdateTs` with the current time.
    async fn update_profile(&self, profile: Profile) -> Result<Profile>;

    /// Removes a profile together with its historic versions.
    async fn delete_profile(&self, id: &str) -> Result<()>;

    /// Profiles ordered by creation time and then identifier.
    async fn retrieve_profiles_page(&self, offset: usize, limit: usize) -> Result<ProfilesPage>;

    async fn store_historic_profile(&self, historic: HistoricProfile) -> Result<()>;

    async fn search_historic_profile_page(
        &self,
        query: &HistoricQuery,
    ) -> Result<HistoricProfilesPage>;

    async fn count_profiles(&self) -> Result<usize>;
}
