//! Request extraction for the warehouse endpoints
//!
//! - `FulfillOrderJson`: JSON body extractor that answers malformed input
//!   with `400 Bad Request` and a plain-text reason

use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::fulfillment::FulfillOrderRequest;

/// Body extractor for `FulfillOrderRequest`.
///
/// Unknown content types, invalid JSON, missing fields and unparsable
/// timestamps all surface as `400` instead of axum's default `415`/`422`.
#[derive(Debug)]
pub struct FulfillOrderJson(pub FulfillOrderRequest);

/// Rejection type for FulfillOrderJson
#[derive(Debug)]
pub struct RequestBodyRejection {
    pub message: String,
}

impl IntoResponse for RequestBodyRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", self.message),
        )
            .into_response()
    }
}

impl<S> FromRequest<S> for FulfillOrderJson
where
    S: Send + Sync,
{
    type Rejection = RequestBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<FulfillOrderRequest>::from_request(req, state)
            .await
            .map_err(|e| RequestBodyRejection {
                message: e.body_text(),
            })?;

        Ok(FulfillOrderJson(body))
    }
}
