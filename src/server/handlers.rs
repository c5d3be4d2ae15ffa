use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};

use crate::model::{
    HistoricProfile, HistoricProfilesPage, Profile, ProfileReference, ProfilesPage,
    UserIdentifiersPage,
};
use crate::persistence::HistoricQuery;

use super::{
    errors::ApiError,
    models::{ApiPath, ApiQuery, HistoricPageQuery, JsonBody, PageQuery},
    AppState,
};

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let profiles = state.repository.count_profiles().await.ok();
    Json(serde_json::json!({
        "service": "wenet-profile-manager",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "profiles": profiles,
    }))
}

pub async fn help_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.config.help_info.clone())
}

pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(
        "not_found",
        format!("There is no resource at '{}'.", uri.path()),
    )
}

/// Load a stored profile or answer 404 with `code`.
pub(super) async fn load_profile(
    state: &AppState,
    id: &str,
    code: &str,
) -> Result<Profile, ApiError> {
    state.repository.search_profile(id).await?.ok_or_else(|| {
        log::debug!("Profile '{}' not found", id);
        ApiError::not_found(
            code,
            format!("Does not exist a profile associated to '{}'.", id),
        )
    })
}

/// Every referenced profile has to exist.
pub(super) async fn check_references(
    state: &AppState,
    references: Vec<ProfileReference>,
) -> Result<(), ApiError> {
    for reference in references {
        if state
            .repository
            .search_profile(&reference.profile_id)
            .await?
            .is_none()
        {
            return Err(ApiError::bad_request(
                reference.code,
                format!(
                    "The profile '{}' is not defined.",
                    reference.profile_id
                ),
            ));
        }
    }
    Ok(())
}

/// Replace `previous` by `next`, keeping `previous` as a historic version.
pub(super) async fn store_new_version(
    state: &AppState,
    previous: Profile,
    next: Profile,
) -> Result<Profile, ApiError> {
    let updated = state.repository.update_profile(next).await?;
    state
        .repository
        .store_historic_profile(HistoricProfile::superseded(
            previous,
            updated.last_update_ts,
        ))
        .await?;
    Ok(updated)
}

pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Profile>), ApiError> {
    let mut profile: Profile = body.decode("bad_profile", "profile")?;
    profile.validate("bad_profile")?;

    if let Some(id) = profile.id.as_deref() {
        if state.repository.search_profile(id).await?.is_some() {
            return Err(ApiError::bad_request(
                "bad_profile.id",
                format!("The '{}' is already used by another profile.", id),
            ));
        }
    }
    check_references(&state, profile.references("bad_profile")).await?;

    let stored = state.repository.store_profile(profile).await?;
    log::info!("Created profile {:?}", stored.id);
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn retrieve_profiles_page(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<ProfilesPage>, ApiError> {
    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(state.config.default_page_limit);
    let page = state.repository.retrieve_profiles_page(offset, limit).await?;
    Ok(Json(page))
}

pub async fn retrieve_user_identifiers_page(
    state: State<Arc<AppState>>,
    query: ApiQuery<PageQuery>,
) -> Result<Json<UserIdentifiersPage>, ApiError> {
    let Json(page) = retrieve_profiles_page(state, query).await?;
    Ok(Json(page.into()))
}

pub async fn retrieve_profile(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<Json<Profile>, ApiError> {
    let profile = load_profile(&state, &user_id, "not_found_profile").await?;
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<String>,
    body: JsonBody,
) -> Result<Json<Profile>, ApiError> {
    let mut source: Profile = body.decode("bad_profile_to_update", "profile to update")?;
    let target = load_profile(&state, &user_id, "not_found_profile_to_update").await?;

    source.validate("bad_new_profile")?;
    check_references(&state, source.references("bad_new_profile")).await?;
    let updated = target.update(source);
    if updated == target {
        return Err(ApiError::bad_request(
            "profile_to_update_equal_to_original",
            "You can not update the profile, because the new values are equal to the current ones.",
        ));
    }

    let stored = store_new_version(&state, target, updated).await?;
    log::info!("Updated profile '{}'", user_id);
    Ok(Json(stored))
}

pub async fn merge_profile(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<String>,
    body: JsonBody,
) -> Result<Json<Profile>, ApiError> {
    let source: Profile = body.decode("bad_profile_to_merge", "profile to merge")?;
    let target = load_profile(&state, &user_id, "not_found_profile_to_merge").await?;

    let merged = target.merge(source, "bad_new_profile")?;
    check_references(&state, merged.references("bad_new_profile")).await?;
    if merged == target {
        return Err(ApiError::bad_request(
            "profile_to_merge_equal_to_original",
            "You can not merge the profile, because the new values do not modify the current one.",
        ));
    }

    let stored = store_new_version(&state, target, merged).await?;
    log::info!("Merged profile '{}'", user_id);
    Ok(Json(stored))
}

pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    state.repository.delete_profile(&user_id).await?;
    log::info!("Deleted profile '{}'", user_id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn retrieve_historic_profiles_page(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<String>,
    ApiQuery(params): ApiQuery<HistoricPageQuery>,
) -> Result<Json<HistoricProfilesPage>, ApiError> {
    let query = HistoricQuery {
        profile_id: user_id,
        from: params.from,
        to: params.to,
        ascending: params.ascending()?,
        offset: params.offset.unwrap_or(0),
        limit: params.limit.unwrap_or(state.config.default_page_limit),
    };
    let page = state.repository.search_historic_profile_page(&query).await?;
    if page.total == 0 {
        return Err(ApiError::not_found(
            "not_found",
            format!(
                "No historic versions of the profile '{}' match the query.",
                query.profile_id
            ),
        ));
    }
    Ok(Json(page))
}
