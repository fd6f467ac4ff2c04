use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Request body accepted either as JSON or as an urlencoded form.
///
/// The form decoder is chosen only when the request says
/// `application/x-www-form-urlencoded`; anything else goes through the JSON
/// decoder. Decoding failures become `400` with a fixed message; the decoder
/// detail only goes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| rejected(e.body_text()))?;
            Ok(Payload(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| rejected(e.body_text()))?;
            Ok(Payload(value))
        }
    }
}

pub const INVALID_BODY: &str = "Invalid request body";

fn rejected(detail: String) -> ApiError {
    tracing::warn!("undecodable request body: {detail}");
    ApiError::BadRequest(INVALID_BODY.to_string())
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}
