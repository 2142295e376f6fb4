#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{self, Request};
use fiscal_core::{ApiError, HttpRequest, HttpResponse};
use fiscal_server::{
    fixtures::Fixtures,
    transport::Transport,
    AppState, Config,
};
use http_body_util::BodyExt;

pub async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

pub fn config(development: bool) -> Config {
    Config::from_lookup(move |key| match key {
        "APP_ENV" if development => Some("development".to_string()),
        "FISCALAPI_API_URL" => Some("http://upstream.test".to_string()),
        "FISCALAPI_API_KEY" => Some("sk_test".to_string()),
        "FISCALAPI_TENANT" => Some("tenant-1".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn state(transport: Arc<dyn Transport>, development: bool) -> AppState {
    AppState::new(config(development), transport, Fixtures::embedded().unwrap())
}

/// Answers every request with the same status and body, recording what it
/// was asked.
pub struct Canned {
    status: u16,
    body: String,
    pub seen: Mutex<Vec<HttpRequest>>,
}

impl Canned {
    pub fn new(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.to_string(),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn last(&self) -> HttpRequest {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }

    pub fn last_body(&self) -> serde_json::Value {
        serde_json::from_str(self.last().body.as_deref().unwrap()).unwrap()
    }
}

#[async_trait]
impl Transport for Canned {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.seen.lock().unwrap().push(request);
        Ok(HttpResponse {
            status: self.status,
            headers: Vec::new(),
            body: self.body.clone(),
        })
    }
}

/// The API cannot be reached at all.
pub struct Unreachable;

#[async_trait]
impl Transport for Unreachable {
    async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
        Err(ApiError::Transport("connection refused".to_string()))
    }
}

pub struct Panicking;

#[async_trait]
impl Transport for Panicking {
    async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
        panic!("transport exploded")
    }
}
