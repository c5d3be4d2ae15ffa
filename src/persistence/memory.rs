use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{HistoricQuery, PersistenceError, ProfilesRepository, Result};
use crate::model::{HistoricProfile, HistoricProfilesPage, Profile, ProfilesPage};
use crate::utils::{Clock, SystemClock};

#[derive(Default)]
struct Store {
    profiles: HashMap<String, Profile>,
    historic: Vec<HistoricProfile>,
}

/// Profiles kept in process memory.
pub struct InMemoryProfilesRepository {
    store: RwLock<Store>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryProfilesRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProfilesRepository {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        InMemoryProfilesRepository {
            store: RwLock::new(Store::default()),
            clock,
        }
    }
}

fn page<T: Clone>(items: &[T], offset: usize, limit: usize) -> Vec<T> {
    items.iter().skip(offset).take(limit).cloned().collect()
}

#[async_trait]
impl ProfilesRepository for InMemoryProfilesRepository {
    async fn search_profile(&self, id: &str) -> Result<Option<Profile>> {
        let store = self.store.read().await;
        Ok(store.profiles.get(id).cloned())
    }

    async fn store_profile(&self, mut profile: Profile) -> Result<Profile> {
        let now = self.clock.now();
        profile.creation_ts = now;
        profile.last_update_ts = now;
        let id = profile
            .id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();

        let mut store = self.store.write().await;
        if store.profiles.contains_key(&id) {
            return Err(PersistenceError::Duplicated(id));
        }
        store.profiles.insert(id, profile.clone());
        Ok(profile)
    }

    async fn import_profile(&self, mut profile: Profile) -> Result<Profile> {
        let id = profile
            .id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        let mut store = self.store.write().await;
        if store.profiles.contains_key(&id) {
            return Err(PersistenceError::Duplicated(id));
        }
        store.profiles.insert(id, profile.clone());
        Ok(profile)
    }

    async fn update_profile(&self, mut profile: Profile) -> Result<Profile> {
        let id = profile.id.clone().unwrap_or_default();
        let mut store = self.store.write().await;
        let Some(stored) = store.profiles.get_mut(&id) else {
            return Err(PersistenceError::NotFound(id));
        };
        profile.creation_ts = stored.creation_ts;
        profile.last_update_ts = self.clock.now();
        *stored = profile.clone();
        Ok(profile)
    }

    async fn delete_profile(&self, id: &str) -> Result<()> {
        let mut store = self.store.write().await;
        if store.profiles.remove(id).is_none() {
            return Err(PersistenceError::NotFound(id.to_string()));
        }
        store
            .historic
            .retain(|historic| historic.profile.id.as_deref() != Some(id));
        Ok(())
    }

    async fn retrieve_profiles_page(&self, offset: usize, limit: usize) -> Result<ProfilesPage> {
        let store = self.store.read().await;
        let mut profiles: Vec<&Profile> = store.profiles.values().collect();
        profiles.sort_by(|a, b| {
            a.creation_ts
                .cmp(&b.creation_ts)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(ProfilesPage {
            offset,
            total: profiles.len(),
            profiles: profiles
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
        })
    }

    async fn store_historic_profile(&self, historic: HistoricProfile) -> Result<()> {
        let mut store = self.store.write().await;
        store.historic.push(historic);
        Ok(())
    }

    async fn search_historic_profile_page(
        &self,
        query: &HistoricQuery,
    ) -> Result<HistoricProfilesPage> {
        let store = self.store.read().await;
        let mut matching: Vec<HistoricProfile> = store
            .historic
            .iter()
            .filter(|historic| query.matches(historic))
            .cloned()
            .collect();
        // Stable sort keeps insertion order between entries with the same start.
        matching.sort_by_key(|historic| historic.from);
        if !query.ascending {
            matching.reverse();
        }
        Ok(HistoricProfilesPage {
            offset: query.offset,
            total: matching.len(),
            profiles: page(&matching, query.offset, query.limit),
        })
    }

    async fn count_profiles(&self) -> Result<usize> {
        Ok(self.store.read().await.profiles.len())
    }
}
