//! Stateless HTTP request builder and response parser for the invoicing API.
//!
//! # Design
//! `FiscalClient` holds only its `FiscalSettings` and carries no mutable
//! state between calls. Each operation is a `build_*` method producing an
//! `HttpRequest`; every answer goes through the single `parse_response`,
//! because the API wraps all results in the same envelope. The caller
//! executes the actual HTTP round-trip in between.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    ApiResponse, CancelInvoiceRequest, CreatePdfRequest, Invoice, InvoiceStatusRequest,
    SendInvoiceRequest,
};

pub const DEFAULT_API_VERSION: &str = "v4";
pub const DEFAULT_TIME_ZONE: &str = "America/Mexico_City";

/// Connection settings for one tenant of the invoicing API.
#[derive(Clone, PartialEq, Eq)]
pub struct FiscalSettings {
    pub api_url: String,
    pub api_key: String,
    pub tenant: String,
    pub api_version: String,
    pub time_zone: String,
}

impl FiscalSettings {
    pub fn new(api_url: &str, api_key: &str, tenant: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            tenant: tenant.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }
}

// The API key must never end up in logs.
impl fmt::Debug for FiscalSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiscalSettings")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("tenant", &self.tenant)
            .field("api_version", &self.api_version)
            .field("time_zone", &self.time_zone)
            .finish()
    }
}

/// Synchronous, stateless client for the invoicing API.
#[derive(Debug, Clone)]
pub struct FiscalClient {
    settings: FiscalSettings,
    base_url: String,
}

impl FiscalClient {
    pub fn new(settings: FiscalSettings) -> Self {
        let base_url = format!(
            "{}/api/{}",
            settings.api_url.trim_end_matches('/'),
            settings.api_version
        );
        Self { settings, base_url }
    }

    pub fn settings(&self) -> &FiscalSettings {
        &self.settings
    }

    // --- products ---

    pub fn build_list_products(&self, page_number: u32, page_size: u32) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            format!("products?pageNumber={page_number}&pageSize={page_size}"),
            None,
        )
    }

    pub fn build_get_product(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, format!("products/{}", encode_segment(id)), None)
    }

    /// Product bodies are forwarded as received.
    pub fn build_create_product(&self, product: &serde_json::Value) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "products".to_string(), product)
    }

    pub fn build_update_product(
        &self,
        id: &str,
        product: &serde_json::Value,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(
            HttpMethod::Put,
            format!("products/{}", encode_segment(id)),
            product,
        )
    }

    pub fn build_delete_product(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("products/{}", encode_segment(id)), None)
    }

    // --- invoices ---

    pub fn build_list_invoices(&self, page_number: u32, page_size: u32) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            format!("invoices?pageNumber={page_number}&pageSize={page_size}"),
            None,
        )
    }

    /// Fetches the invoice with its details expanded.
    pub fn build_get_invoice(&self, id: &str) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            format!("invoices/{}?details=true", encode_segment(id)),
            None,
        )
    }

    /// Routes the invoice to the creation endpoint matching its `typeCode`.
    pub fn build_create_invoice(&self, invoice: &Invoice) -> Result<HttpRequest, ApiError> {
        let kind = invoice
            .invoice_type()
            .ok_or_else(|| ApiError::UnsupportedInvoiceType(invoice.type_code.clone()))?;
        self.json_request(HttpMethod::Post, format!("invoices/{}", kind.endpoint()), invoice)
    }

    pub fn build_cancel_invoice(&self, request: &CancelInvoiceRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Delete, "invoices".to_string(), request)
    }

    pub fn build_invoice_status(&self, request: &InvoiceStatusRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "invoices/status".to_string(), request)
    }

    pub fn build_invoice_pdf(&self, request: &CreatePdfRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "invoices/pdf".to_string(), request)
    }

    pub fn build_invoice_xml(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, format!("invoices/{}/xml", encode_segment(id)), None)
    }

    pub fn build_send_invoice(&self, request: &SendInvoiceRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "invoices/send".to_string(), request)
    }

    // --- responses ---

    /// Decode the API envelope.
    ///
    /// The status code is not checked first: the API reports failures as an
    /// envelope with `succeeded == false`, and those are returned as `Ok`.
    /// Only bodies that are not envelopes become errors.
    pub fn parse_response<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<ApiResponse<T>, ApiError> {
        match serde_json::from_str(&response.body) {
            Ok(envelope) => Ok(envelope),
            Err(e) if response.is_success() => Err(ApiError::DeserializationError(e.to_string())),
            Err(_) if response.status == 404 => Err(ApiError::NotFound),
            Err(_) => Err(ApiError::HttpError {
                status: response.status,
                body: response.body,
            }),
        }
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![
            ("x-api-key".to_string(), self.settings.api_key.clone()),
            ("x-tenant-key".to_string(), self.settings.tenant.clone()),
            ("x-time-zone".to_string(), self.settings.time_zone.clone()),
        ];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            path: format!("{}/{path}", self.base_url),
            headers,
            body,
        }
    }

    fn json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: String,
        payload: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.request(method, path, Some(body)))
    }
}

/// Everything outside RFC 3986 unreserved characters, so an id can never
/// escape its path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}
