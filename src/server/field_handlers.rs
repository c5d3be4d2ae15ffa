//! Handlers for the collections embedded in a profile. They are generic over
//! [`ProfileField`] and mounted once per collection.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::model::ProfileField;

use super::{
    errors::ApiError,
    handlers::{check_references, load_profile, store_new_version},
    models::{ApiPath, JsonBody},
    AppState,
};

const PROFILE_NOT_DEFINED: &str = "profile_not_defined";

fn item_not_found<F: ProfileField>(user_id: &str, key: &str) -> ApiError {
    ApiError::not_found(
        F::not_found_code(),
        format!(
            "The profile '{}' has no {} '{}'.",
            user_id,
            F::MODEL_NAME,
            key
        ),
    )
}

pub async fn add_item<F: ProfileField>(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<String>,
    body: JsonBody,
) -> Result<Json<F::Item>, ApiError> {
    let code = F::bad_code();
    let mut item: F::Item = body.decode("bad_json", F::MODEL_NAME)?;
    let profile = load_profile(&state, &user_id, PROFILE_NOT_DEFINED).await?;

    F::validate(&mut item, &code)?;
    check_references(&state, F::references(&item, &code)).await?;
    F::prepare_new(F::items(&profile), &mut item)?;

    let mut next = profile.clone();
    F::items_mut(&mut next).push(item.clone());
    store_new_version(&state, profile, next).await?;
    log::info!("Added a {} to profile '{}'", F::MODEL_NAME, user_id);
    Ok(Json(item))
}

pub async fn retrieve_items<F: ProfileField>(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<Json<Vec<F::Item>>, ApiError> {
    let profile = load_profile(&state, &user_id, PROFILE_NOT_DEFINED).await?;
    Ok(Json(F::items(&profile).to_vec()))
}

pub async fn retrieve_item<F: ProfileField>(
    State(state): State<Arc<AppState>>,
    ApiPath((user_id, key)): ApiPath<(String, String)>,
) -> Result<Json<F::Item>, ApiError> {
    let profile = load_profile(&state, &user_id, PROFILE_NOT_DEFINED).await?;
    let items = F::items(&profile);
    let index = F::locate(items, &key).ok_or_else(|| item_not_found::<F>(&user_id, &key))?;
    Ok(Json(items[index].clone()))
}

pub async fn update_item<F: ProfileField>(
    State(state): State<Arc<AppState>>,
    ApiPath((user_id, key)): ApiPath<(String, String)>,
    body: JsonBody,
) -> Result<Json<F::Item>, ApiError> {
    let code = F::bad_code();
    let mut source: F::Item = body.decode("bad_json", F::MODEL_NAME)?;
    let profile = load_profile(&state, &user_id, PROFILE_NOT_DEFINED).await?;
    let index = F::locate(F::items(&profile), &key)
        .ok_or_else(|| item_not_found::<F>(&user_id, &key))?;

    F::validate(&mut source, &code)?;
    check_references(&state, F::references(&source, &code)).await?;
    let current = &F::items(&profile)[index];
    F::keep_identity(current, &mut source);
    if &source == current {
        return Err(ApiError::bad_request(
            format!("{}_to_update_equal_to_original", F::MODEL_NAME),
            format!(
                "The new {} is equal to the current one.",
                F::MODEL_NAME
            ),
        ));
    }
    F::ensure_distinct(F::items(&profile), Some(index), &source)?;

    let mut next = profile.clone();
    F::items_mut(&mut next)[index] = source.clone();
    store_new_version(&state, profile, next).await?;
    log::info!("Updated {} '{}' of profile '{}'", F::MODEL_NAME, key, user_id);
    Ok(Json(source))
}

pub async fn merge_item<F: ProfileField>(
    State(state): State<Arc<AppState>>,
    ApiPath((user_id, key)): ApiPath<(String, String)>,
    body: JsonBody,
) -> Result<Json<F::Item>, ApiError> {
    let code = F::bad_code();
    let source: F::Item = body.decode("bad_json", F::MODEL_NAME)?;
    let profile = load_profile(&state, &user_id, PROFILE_NOT_DEFINED).await?;
    let index = F::locate(F::items(&profile), &key)
        .ok_or_else(|| item_not_found::<F>(&user_id, &key))?;

    let current = &F::items(&profile)[index];
    let merged = F::merge(current, source, &code)?;
    check_references(&state, F::references(&merged, &code)).await?;
    if &merged == current {
        return Err(ApiError::bad_request(
            format!("{}_to_merge_equal_to_original", F::MODEL_NAME),
            format!(
                "The merged {} is equal to the current one.",
                F::MODEL_NAME
            ),
        ));
    }
    F::ensure_distinct(F::items(&profile), Some(index), &merged)?;

    let mut next = profile.clone();
    F::items_mut(&mut next)[index] = merged.clone();
    store_new_version(&state, profile, next).await?;
    log::info!("Merged {} '{}' of profile '{}'", F::MODEL_NAME, key, user_id);
    Ok(Json(merged))
}

pub async fn delete_item<F: ProfileField>(
    State(state): State<Arc<AppState>>,
    ApiPath((user_id, key)): ApiPath<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let profile = load_profile(&state, &user_id, PROFILE_NOT_DEFINED).await?;
    let index = F::locate(F::items(&profile), &key)
        .ok_or_else(|| item_not_found::<F>(&user_id, &key))?;

    let mut next = profile.clone();
    F::items_mut(&mut next).remove(index);
    store_new_version(&state, profile, next).await?;
    log::info!("Deleted {} '{}' of profile '{}'", F::MODEL_NAME, key, user_id);
    Ok(StatusCode::NO_CONTENT)
}
