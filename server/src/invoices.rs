//! Invoice routes.
//!
//! Except for list, get and xml, every route sends a sample payload from
//! `Fixtures`, so each one can be exercised without composing a body.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppError,
    fiscal::{Failure, Paging},
    fixtures::InvoiceFixture,
    state::AppState,
};

const DEFAULT_PAGE_SIZE: u32 = 2;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/invoices", get(list_invoices))
        .route("/api/invoices/{id}", get(get_invoice))
        .route("/api/invoices/create/iva-16", post(create_iva_16))
        .route("/api/invoices/create/iva-exento", post(create_iva_exento))
        .route("/api/invoices/create/iva-tasa-cero", post(create_iva_tasa_cero))
        .route("/api/invoices/create/by-references", post(create_by_references))
        .route(
            "/api/invoices/create/credit-note/by-values",
            post(create_credit_note_by_values),
        )
        .route(
            "/api/invoices/create/credit-note/by-references",
            post(create_credit_note_by_references),
        )
        .route(
            "/api/invoices/create/payment-complement/by-values",
            post(create_payment_complement_by_values),
        )
        .route(
            "/api/invoices/create/payment-complement/by-references",
            post(create_payment_complement_by_references),
        )
        .route("/api/invoices/create/payment-usd-mxn", post(create_payment_usd_mxn))
        .route("/api/invoices/create/payment-mxn-usd", post(create_payment_mxn_usd))
        .route("/api/invoices/create/payment-eur-usd", post(create_payment_eur_usd))
        .route("/api/invoices/cancel/by-values", post(cancel_by_values))
        .route("/api/invoices/cancel/{id}", post(cancel_by_id))
        .route("/api/invoices/status/by-values", get(status_by_values))
        .route("/api/invoices/status/{id}", get(status_by_id))
        .route("/api/invoices/pdf/by-values", get(pdf_by_values))
        .route("/api/invoices/pdf/{id}", get(pdf_by_id))
        .route("/api/invoices/xml/{id}", get(xml_by_id))
        .route("/api/invoices/send/by-values", post(send_by_values))
        .route("/api/invoices/send/{id}", post(send_by_id))
        .route(
            "/api/invoices/factura-global-por-valores",
            post(create_global_by_values),
        )
        .route(
            "/api/invoices/factura-global-por-referencias",
            post(create_global_by_references),
        )
}

/// Stamp the named template and send it to the creation endpoint its
/// `typeCode` selects.
async fn create(
    state: &AppState,
    kind: InvoiceFixture,
    message: &'static str,
) -> Result<Response, AppError> {
    let invoice = state.fixtures.invoice(kind);
    let request = state.fiscal.client().build_create_invoice(&invoice);
    state.fiscal.relay(request, Failure::Action, message).await
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SendQuery {
    /// Recipient address.
    pub email: Option<String>,
}

// --- reads ---

#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "invoices",
    params(Paging),
    responses(
        (status = 200, description = "Page of invoices"),
        (status = 500, description = "The API could not list invoices")
    )
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(paging): Query<Paging>,
) -> Result<Response, AppError> {
    let (page_number, page_size) = paging.or(1, DEFAULT_PAGE_SIZE);
    let request = state.fiscal.client().build_list_invoices(page_number, page_size);
    state
        .fiscal
        .relay(Ok(request), Failure::List, "Error al listar facturas")
        .await
}

#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    tag = "invoices",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "The invoice, with details"),
        (status = 404, description = "Invoice not found")
    )
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let request = state.fiscal.client().build_get_invoice(&id);
    state
        .fiscal
        .relay(Ok(request), Failure::Lookup, "Error al obtener factura")
        .await
}

// --- creation ---

#[utoipa::path(
    post,
    path = "/api/invoices/create/iva-16",
    tag = "invoices",
    responses((status = 200, description = "Income invoice with 16% VAT stamped"))
)]
pub async fn create_iva_16(State(state): State<AppState>) -> Result<Response, AppError> {
    create(&state, InvoiceFixture::Iva16, "Error al crear factura con IVA 16%").await
}

#[utoipa::path(
    post,
    path = "/api/invoices/create/iva-exento",
    tag = "invoices",
    responses((status = 200, description = "VAT-exempt income invoice stamped"))
)]
pub async fn create_iva_exento(State(state): State<AppState>) -> Result<Response, AppError> {
    create(&state, InvoiceFixture::IvaExento, "Error al crear factura con IVA exento").await
}

#[utoipa::path(
    post,
    path = "/api/invoices/create/iva-tasa-cero",
    tag = "invoices",
    responses((status = 200, description = "Zero-rate VAT income invoice stamped"))
)]
pub async fn create_iva_tasa_cero(State(state): State<AppState>) -> Result<Response, AppError> {
    create(
        &state,
        InvoiceFixture::IvaTasaCero,
        "Error al crear factura con IVA tasa cero",
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/invoices/create/by-references",
    tag = "invoices",
    responses((status = 200, description = "Income invoice from stored issuer, recipient and products"))
)]
pub async fn create_by_references(State(state): State<AppState>) -> Result<Response, AppError> {
    create(
        &state,
        InvoiceFixture::ByReferences,
        "Error al crear factura por referencias",
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/invoices/create/credit-note/by-values",
    tag = "invoices",
    responses((status = 200, description = "Credit note stamped"))
)]
pub async fn create_credit_note_by_values(
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    create(
        &state,
        InvoiceFixture::CreditNoteByValues,
        "Error al crear nota de crédito por valores",
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/invoices/create/credit-note/by-references",
    tag = "invoices",
    responses((status = 200, description = "Credit note from stored references stamped"))
)]
pub async fn create_credit_note_by_references(
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    create(
        &state,
        InvoiceFixture::CreditNoteByReferences,
        "Error al crear nota de crédito por referencias",
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/invoices/create/payment-complement/by-values",
    tag = "invoices",
    responses((status = 200, description = "Payment complement stamped"))
)]
pub async fn create_payment_complement_by_values(
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    create(
        &state,
        InvoiceFixture::PaymentComplementByValues,
        "Error al crear complemento de pago por valores",
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/invoices/create/payment-complement/by-references",
    tag = "invoices",
    responses((status = 200, description = "Payment complement from stored references stamped"))
)]
pub async fn create_payment_complement_by_references(
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    create(
        &state,
        InvoiceFixture::PaymentComplementByReferences,
        "Error al crear complemento de pago por referencias",
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/invoices/create/payment-usd-mxn",
    tag = "invoices",
    responses((status = 200, description = "USD payment for MXN invoices stamped"))
)]
pub async fn create_payment_usd_mxn(State(state): State<AppState>) -> Result<Response, AppError> {
    create(
        &state,
        InvoiceFixture::PaymentUsdMxn,
        "Error al crear complemento de pago en USD para facturas en MXN",
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/invoices/create/payment-mxn-usd",
    tag = "invoices",
    responses((status = 200, description = "MXN payment for USD invoices stamped"))
)]
pub async fn create_payment_mxn_usd(State(state): State<AppState>) -> Result<Response, AppError> {
    create(
        &state,
        InvoiceFixture::PaymentMxnUsd,
        "Error al crear complemento de pago en MXN para facturas en USD",
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/invoices/create/payment-eur-usd",
    tag = "invoices",
    responses((status = 200, description = "EUR payment for USD invoices stamped"))
)]
pub async fn create_payment_eur_usd(State(state): State<AppState>) -> Result<Response, AppError> {
    create(
        &state,
        InvoiceFixture::PaymentEurUsd,
        "Error al crear complemento de pago en EUR para facturas en USD",
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/invoices/factura-global-por-valores",
    tag = "invoices",
    responses((status = 200, description = "Global invoice to the general public stamped"))
)]
pub async fn create_global_by_values(State(state): State<AppState>) -> Result<Response, AppError> {
    create(
        &state,
        InvoiceFixture::GlobalByValues,
        "Error al crear factura global por valores",
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/invoices/factura-global-por-referencias",
    tag = "invoices",
    responses((status = 200, description = "Global invoice from stored references stamped"))
)]
pub async fn create_global_by_references(
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    create(
        &state,
        InvoiceFixture::GlobalByReferences,
        "Error al crear factura global por referencias",
    )
    .await
}

// --- cancellation ---

#[utoipa::path(
    post,
    path = "/api/invoices/cancel/by-values",
    tag = "invoices",
    responses(
        (status = 200, description = "Cancellation accepted"),
        (status = 400, description = "Rejected by the API")
    )
)]
pub async fn cancel_by_values(State(state): State<AppState>) -> Result<Response, AppError> {
    let request = state
        .fiscal
        .client()
        .build_cancel_invoice(&state.fixtures.cancel_by_values());
    state
        .fiscal
        .relay(request, Failure::Action, "Error al cancelar factura por valores")
        .await
}

#[utoipa::path(
    post,
    path = "/api/invoices/cancel/{id}",
    tag = "invoices",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Cancellation accepted"),
        (status = 400, description = "Rejected by the API")
    )
)]
pub async fn cancel_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let request = state
        .fiscal
        .client()
        .build_cancel_invoice(&state.fixtures.cancel_by_id(&id));
    state
        .fiscal
        .relay(request, Failure::Action, "Error al cancelar factura por ID")
        .await
}

// --- status ---

#[utoipa::path(
    get,
    path = "/api/invoices/status/by-values",
    tag = "invoices",
    responses((status = 200, description = "SAT status of the invoice"))
)]
pub async fn status_by_values(State(state): State<AppState>) -> Result<Response, AppError> {
    let request = state
        .fiscal
        .client()
        .build_invoice_status(&state.fixtures.status_by_values());
    state
        .fiscal
        .relay(
            request,
            Failure::Action,
            "Error al obtener estado de factura por valores",
        )
        .await
}

#[utoipa::path(
    get,
    path = "/api/invoices/status/{id}",
    tag = "invoices",
    params(("id" = String, Path, description = "Invoice id")),
    responses((status = 200, description = "SAT status of the invoice"))
)]
pub async fn status_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let request = state
        .fiscal
        .client()
        .build_invoice_status(&state.fixtures.status_by_id(&id));
    state
        .fiscal
        .relay(
            request,
            Failure::Action,
            "Error al obtener estado de factura por ID",
        )
        .await
}

// --- documents ---

#[utoipa::path(
    get,
    path = "/api/invoices/pdf/by-values",
    tag = "invoices",
    responses((status = 200, description = "Base64 PDF with custom colours and logo"))
)]
pub async fn pdf_by_values(State(state): State<AppState>) -> Result<Response, AppError> {
    let request = state
        .fiscal
        .client()
        .build_invoice_pdf(&state.fixtures.pdf_by_values());
    state
        .fiscal
        .relay(request, Failure::Action, "Error al generar PDF por valores")
        .await
}

#[utoipa::path(
    get,
    path = "/api/invoices/pdf/{id}",
    tag = "invoices",
    params(("id" = String, Path, description = "Invoice id")),
    responses((status = 200, description = "Base64 PDF"))
)]
pub async fn pdf_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let request = state
        .fiscal
        .client()
        .build_invoice_pdf(&state.fixtures.pdf_by_id(&id));
    state
        .fiscal
        .relay(request, Failure::Action, "Error al generar PDF por ID")
        .await
}

#[utoipa::path(
    get,
    path = "/api/invoices/xml/{id}",
    tag = "invoices",
    params(("id" = String, Path, description = "Invoice id")),
    responses((status = 200, description = "Base64 CFDI XML"))
)]
pub async fn xml_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let request = state.fiscal.client().build_invoice_xml(&id);
    state
        .fiscal
        .relay(Ok(request), Failure::Action, "Error al descargar XML")
        .await
}

#[utoipa::path(
    post,
    path = "/api/invoices/send/by-values",
    tag = "invoices",
    responses((status = 200, description = "Invoice e-mailed"))
)]
pub async fn send_by_values(State(state): State<AppState>) -> Result<Response, AppError> {
    let request = state
        .fiscal
        .client()
        .build_send_invoice(&state.fixtures.send_by_values());
    state
        .fiscal
        .relay(
            request,
            Failure::Action,
            "Error al enviar factura por correo con valores",
        )
        .await
}

#[utoipa::path(
    post,
    path = "/api/invoices/send/{id}",
    tag = "invoices",
    params(("id" = String, Path, description = "Invoice id"), SendQuery),
    responses(
        (status = 200, description = "Invoice e-mailed"),
        (status = 400, description = "Missing email, or rejected by the API")
    )
)]
pub async fn send_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SendQuery>,
) -> Result<Response, AppError> {
    let email = query
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Query parameter email is required".to_string()))?;
    let request = state
        .fiscal
        .client()
        .build_send_invoice(&state.fixtures.send_by_id(&id, &email));
    state
        .fiscal
        .relay(
            request,
            Failure::Action,
            "Error al enviar factura por correo por ID",
        )
        .await
}
