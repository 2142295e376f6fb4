//! Bridge between handlers and the invoicing API.
//!
//! Handlers build a request with `FiscalClient`, then hand it to `relay`,
//! which runs it through the `Transport` and maps the envelope's
//! `succeeded` flag to an HTTP status.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fiscal_core::{ApiError, FiscalClient, HttpRequest, JsonResponse};
use serde::Deserialize;
use tracing::{error, warn};
use utoipa::IntoParams;

use crate::{error::AppError, transport::Transport};

/// Which status a `succeeded == false` envelope is relayed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Failure {
    /// Collection reads: 500.
    List,
    /// Reads of one resource by id: 404.
    Lookup,
    /// Everything that sends a payload: 400.
    Action,
}

impl Failure {
    pub fn status(self) -> StatusCode {
        match self {
            Failure::List => StatusCode::INTERNAL_SERVER_ERROR,
            Failure::Lookup => StatusCode::NOT_FOUND,
            Failure::Action => StatusCode::BAD_REQUEST,
        }
    }
}

/// Optional paging for list routes.
#[derive(Clone, Copy, Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct Paging {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl Paging {
    /// Explicit values, or the route's defaults.
    pub fn or(self, page_number: u32, page_size: u32) -> (u32, u32) {
        (
            self.page_number.unwrap_or(page_number),
            self.page_size.unwrap_or(page_size),
        )
    }
}

#[derive(Clone)]
pub struct FiscalApi {
    client: FiscalClient,
    transport: Arc<dyn Transport>,
    development: bool,
}

impl FiscalApi {
    pub fn new(client: FiscalClient, transport: Arc<dyn Transport>, development: bool) -> Self {
        Self {
            client,
            transport,
            development,
        }
    }

    pub fn client(&self) -> &FiscalClient {
        &self.client
    }

    /// Execute and decode, without any HTTP status mapping.
    pub async fn send(&self, request: HttpRequest) -> Result<JsonResponse, ApiError> {
        let response = self.transport.execute(request).await?;
        self.client.parse_response(response)
    }

    /// Execute `request` and relay the envelope: 200 when it succeeded,
    /// `failure.status()` when it did not. Any error on the way becomes a
    /// 500 carrying `message`.
    pub async fn relay(
        &self,
        request: Result<HttpRequest, ApiError>,
        failure: Failure,
        message: &'static str,
    ) -> Result<Response, AppError> {
        let outcome = match request {
            Ok(request) => self.send(request).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(envelope) if envelope.succeeded => Ok((StatusCode::OK, Json(envelope)).into_response()),
            Ok(envelope) => {
                warn!(
                    upstream_message = envelope.message.as_deref().unwrap_or_default(),
                    upstream_details = envelope.details.as_deref().unwrap_or_default(),
                    "{message}"
                );
                Ok((failure.status(), Json(envelope)).into_response())
            }
            Err(ApiError::NotFound) if failure == Failure::Lookup => {
                Err(AppError::NotFound(message.to_string()))
            }
            Err(e) => {
                error!(error = %e, "{message}");
                Err(AppError::Upstream {
                    message,
                    detail: self.development.then(|| e.to_string()),
                })
            }
        }
    }
}
