//! API request helpers

use axum::extract::FromRequest;
use axum::extract::Json;
use axum::extract::Request;
use axum::extract::rejection::JsonRejection;
use serde::de::DeserializeOwned;

use super::Error;

/// Wrapper for the JSON extractor
///
/// Turns every body rejection into the `{"error": ...}` shape the rest of
/// the API speaks, instead of axum's plain-text rejections
pub struct Form<F>(pub F);

impl<S, F> FromRequest<S> for Form<F>
where
    S: Send + Sync,
    F: DeserializeOwned,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = Json::<F>::from_request(req, state).await;

        parse_json(json).map(Form)
    }
}

fn parse_json<F>(json: Result<Json<F>, JsonRejection>) -> Result<F, Error> {
    match json {
        Ok(Json(json)) => Ok(json),
        Err(JsonRejection::MissingJsonContentType(_)) => Err(Error::bad_request(
            "Missing `application/json` content type",
        )),
        Err(err) => Err(Error::bad_request(err.body_text())),
    }
}
