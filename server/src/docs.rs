//! OpenAPI document and the Swagger UI page that renders it.

use axum::{response::Html, routing::get, Json, Router};
use utoipa::OpenApi;

use crate::{invoices, products, state::AppState, todos};

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FiscalAPI demo",
        description = "Todo CRUD example plus pass-through routes to the FiscalAPI invoicing service"
    ),
    paths(
        todos::list_todos,
        todos::get_todo,
        todos::create_todo,
        todos::update_todo,
        todos::delete_todo,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        invoices::list_invoices,
        invoices::get_invoice,
        invoices::create_iva_16,
        invoices::create_iva_exento,
        invoices::create_iva_tasa_cero,
        invoices::create_by_references,
        invoices::create_credit_note_by_values,
        invoices::create_credit_note_by_references,
        invoices::create_payment_complement_by_values,
        invoices::create_payment_complement_by_references,
        invoices::create_payment_usd_mxn,
        invoices::create_payment_mxn_usd,
        invoices::create_payment_eur_usd,
        invoices::create_global_by_values,
        invoices::create_global_by_references,
        invoices::cancel_by_values,
        invoices::cancel_by_id,
        invoices::status_by_values,
        invoices::status_by_id,
        invoices::pdf_by_values,
        invoices::pdf_by_id,
        invoices::xml_by_id,
        invoices::send_by_values,
        invoices::send_by_id,
    ),
    components(schemas(todos::Todo, todos::TodoInput)),
    tags(
        (name = "todos", description = "In-memory todo example"),
        (name = "products", description = "Products stored in FiscalAPI"),
        (name = "invoices", description = "CFDI 4.0 invoices stamped by FiscalAPI")
    )
)]
pub struct ApiDoc;

const SWAGGER_PAGE: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>FiscalAPI demo</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/api-docs/openapi.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api-docs", get(swagger_ui))
        .route(OPENAPI_PATH, get(openapi_json))
}

async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_PAGE)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
