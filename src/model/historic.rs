use serde::{Deserialize, Serialize};

use super::profile::Profile;

/// The state a profile had between two instants, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricProfile {
    pub from: i64,
    pub to: i64,
    pub profile: Profile,
}

impl HistoricProfile {
    /// Snapshot of `previous` that stopped being current at `to`.
    pub fn superseded(previous: Profile, to: i64) -> Self {
        HistoricProfile {
            from: previous.last_update_ts,
            to,
            profile: previous,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilesPage {
    pub offset: usize,
    pub total: usize,
    pub profiles: Vec<Profile>,
}

/// Identifiers of the stored profiles, in the order of [`ProfilesPage`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentifiersPage {
    pub offset: usize,
    pub total: usize,
    pub user_ids: Vec<String>,
}

impl From<ProfilesPage> for UserIdentifiersPage {
    fn from(page: ProfilesPage) -> Self {
        UserIdentifiersPage {
            offset: page.offset,
            total: page.total,
            user_ids: page
                .profiles
                .into_iter()
                .filter_map(|profile| profile.id)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricProfilesPage {
    pub offset: usize,
    pub total: usize,
    pub profiles: Vec<HistoricProfile>,
}
