use axum::{
  response::{IntoResponse, Response},
  Json,
};
use http::StatusCode;

use crate::api::Reply;

#[derive(Debug)]
pub enum Error {
  Server(anyhow::Error),
  Client(anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, err) = match self {
      Error::Server(err) => (StatusCode::INTERNAL_SERVER_ERROR, err),
      Error::Client(err) => (StatusCode::BAD_REQUEST, err),
    };

    (status, Json(Reply::<()>::failure(err.to_string()))).into_response()
  }
}

impl<E> From<E> for Error
where
  E: Into<anyhow::Error>,
{
  fn from(err: E) -> Self {
    Error::Server(err.into())
  }
}
