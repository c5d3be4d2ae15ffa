use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::errors::ApiError;

/// Query of `GET /profiles` and `GET /userIdentifiers`
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

/// Query of `GET /profiles/{userId}/historic`
#[derive(Debug, Default, Deserialize)]
pub struct HistoricPageQuery {
    /// Only versions that became current at or after this instant
    pub from: Option<i64>,
    /// Only versions superseded at or before this instant
    pub to: Option<i64>,
    /// `+` (ascending, the default) or `-`
    pub order: Option<String>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl HistoricPageQuery {
    /// Whether the versions are listed from the oldest.
    pub fn ascending(&self) -> Result<bool, ApiError> {
        // An unescaped `+` reaches us as a space.
        match self.order.as_deref().map(str::trim) {
            None | Some("") | Some("+") | Some("asc") => Ok(true),
            Some("-") | Some("desc") => Ok(false),
            Some(other) => Err(ApiError::bad_request(
                "bad_order",
                format!("The order '{}' is not valid, use '+' or '-'.", other),
            )),
        }
    }
}

/// Query string parameters. A query that does not decode is answered with a
/// `bad_query` error.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

/// Path parameters, with rejections reported as `bad_path`.
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

/// A JSON request body. Malformed JSON is answered with a `bad_json` error
/// instead of axum's plain text rejection.
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

impl JsonBody {
    /// Decode the body as a model, reporting failures under `code`.
    pub fn decode<T: DeserializeOwned>(self, code: &str, model: &str) -> Result<T, ApiError> {
        if !self.0.is_object() {
            return Err(ApiError::bad_request(
                code,
                format!("The {} has to be a JSON object.", model),
            ));
        }
        serde_json::from_value(self.0).map_err(|e| {
            ApiError::bad_request(code, format!("The {} is not right: {}", model, e))
        })
    }
}
