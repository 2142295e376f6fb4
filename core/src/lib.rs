//! Synchronous client core for the FiscalAPI electronic-invoicing service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The server crate executes
//! the actual round-trip, keeping this crate deterministic and testable.
//!
//! # Design
//! - `FiscalClient` is stateless; it holds only its settings.
//! - Operations are `build_*` methods; every answer is decoded by
//!   `parse_response` into the API's `ApiResponse` envelope.
//! - Signing, CFDI generation and SAT validation happen on the API side.
//!   The types here only describe the JSON the API accepts.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{FiscalClient, FiscalSettings};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{
    ApiResponse, CancelInvoiceRequest, CreatePdfRequest, FileType, Invoice, InvoiceStatusRequest,
    InvoiceType, JsonResponse, SendInvoiceRequest, TaxCredential,
};
