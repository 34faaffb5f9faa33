use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppError;

/// `Json<T>` whose rejections surface as `AppError::Validation`, so a body that
/// is missing a required field reports serde's message in the usual error shape.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                debug!(status = %rejection.status(), "rejected JSON body");
                Err(AppError::Validation(rejection.body_text()))
            }
        }
    }
}
