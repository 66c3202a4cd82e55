//! Body and query extractors whose rejections use the action envelope.

use axum::async_trait;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::response::Response;
use axum::Json;
use mc_domain::error::Error;
use serde::de::DeserializeOwned;

use super::failure;

/// `Json<T>` that fails as `{success: false, error}` with 400.
#[derive(Debug, Clone)]
pub struct ActionJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ActionJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(reject_body(rejection)),
        }
    }
}

/// `Query<T>` that fails as `{success: false, error}` with 400.
#[derive(Debug, Clone)]
pub struct ActionQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ActionQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(reject_query(rejection)),
        }
    }
}

fn reject_body(rejection: JsonRejection) -> Response {
    failure("read_body", Error::BadRequest(rejection.body_text()))
}

fn reject_query(rejection: QueryRejection) -> Response {
    failure("read_query", Error::BadRequest(rejection.body_text()))
}
