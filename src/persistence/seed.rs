//! Bootstrap a repository from a fixture file.
//!
//! The file holds a list of profile documents, as JSON (`.json`) or YAML
//! (`.yaml` / `.yml`). Documents keep their identifiers and time stamps, but
//! are validated like any new profile: missing collections become empty lists
//! and collection items get identifiers. Invalid documents are skipped.

use std::path::Path;

use super::{PersistenceError, ProfilesRepository, Result};
use crate::model::Profile;

/// Outcome of a seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    /// Identifier already taken
    pub skipped: usize,
    /// Failed validation
    pub rejected: usize,
}

pub fn read_seed_file(path: &Path) -> Result<Vec<Profile>> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| PersistenceError::SeedRead {
        path: display.clone(),
        message: e.to_string(),
    })?;
    let parse_error = |message: String| PersistenceError::SeedParse {
        path: display.clone(),
        message,
    };

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))
        }
        _ => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Insert every profile of the fixture file. Profiles whose identifier is
/// already taken are left untouched.
pub async fn seed_from_file(repository: &dyn ProfilesRepository, path: &Path) -> Result<SeedReport> {
    let profiles = read_seed_file(path)?;
    log::info!(
        "Seeding {} profile(s) from {}",
        profiles.len(),
        path.display()
    );

    let mut report = SeedReport::default();
    for (index, mut profile) in profiles.into_iter().enumerate() {
        if let Err(e) = profile.validate(&format!("bad_seed[{}]", index)) {
            log::warn!("Seed entry {} is not a valid profile, skipping it: {}", index, e);
            report.rejected += 1;
            continue;
        }
        match repository.import_profile(profile).await {
            Ok(stored) => {
                log::debug!("Seeded profile {:?}", stored.id);
                report.inserted += 1;
            }
            Err(PersistenceError::Duplicated(id)) => {
                log::warn!("Profile '{}' already exists, skipping seed entry", id);
                report.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}
