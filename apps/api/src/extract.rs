use async_trait::async_trait;
use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, rejection::QueryRejection,
        FromRequest, FromRequestParts, Multipart, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// `Json<T>` whose rejections (missing fields, wrong types, bad syntax,
/// missing content type) come back as a 400 in the standard error envelope.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| AppError::Validation(e.body_text()))?;
        Ok(Self(value))
    }
}

/// `Query<T>` with the same 400 envelope on a malformed query string.
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| AppError::Validation(e.body_text()))?;
        Ok(Self(value))
    }
}

/// `Multipart` whose rejection (wrong content type, missing boundary) is a 400
/// in the standard envelope.
pub struct UploadForm(pub Multipart);

#[async_trait]
impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e: MultipartRejection| {
                AppError::Validation(format!("Invalid upload: {}", e.body_text()))
            })?;
        Ok(Self(multipart))
    }
}

/// Optional free-text fields: blank counts as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
