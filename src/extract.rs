// SPDX-License-Identifier: MIT

//! Request extractors.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON body extractor that reports malformed input as a validation error.
///
/// Axum's stock `Json` rejection answers 422 for bodies that parse as JSON
/// but fail deserialization (wrong type, unknown enum variant). Every other
/// invalid input on this API is a 400 `validation_error`, so the rejection
/// is folded into `AppError::Validation` to keep the surface uniform.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}
