use std::any::Any;

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tower_http::catch_panic::ResponseForPanic;
use tracing::error;

/// Errors a handler turns into an HTTP response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The invoicing API could not be reached or answered with something
    /// unreadable. `detail` is only set in development mode.
    #[error("{message}")]
    Upstream {
        message: &'static str,
        detail: Option<String>,
    },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::BadRequest(message) | AppError::NotFound(message) => {
                json!({ "message": message })
            }
            AppError::Upstream { message, detail } => {
                let mut body = json!({ "succeeded": false, "message": message });
                if let Some(detail) = detail {
                    body["error"] = detail.into();
                }
                body
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Last-resort handler for panics inside the router.
#[derive(Clone, Copy, Debug)]
pub struct PanicHandler {
    pub development: bool,
}

impl ResponseForPanic for PanicHandler {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "unknown panic".to_string()
        };
        error!(panic = %detail, "request handler panicked");

        let mut body = json!({ "message": "Internal server error" });
        if self.development {
            body["error"] = detail.into();
        }
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
