mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, empty_request, json_request, state, Canned, Panicking, Unreachable};
use fiscal_core::HttpMethod;
use fiscal_server::app;
use serde_json::{json, Value};
use tower::ServiceExt;

const SUCCEEDED: &str = r#"{"succeeded":true,"message":"","details":"","httpStatusCode":200,"data":{"id":"x"}}"#;
const FAILED: &str = r#"{"succeeded":false,"message":"Bad Request","details":"rejected","httpStatusCode":400}"#;

const BASE: &str = "http://upstream.test/api/v4";

// --- scenario: unreachable upstream ---

#[tokio::test]
async fn list_products_with_unreachable_api_returns_500() {
    let resp = app(state(Arc::new(Unreachable), false))
        .oneshot(empty_request("GET", "/api/products"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = body_json(resp).await;
    assert_eq!(
        body,
        json!({ "succeeded": false, "message": "Error al listar productos" })
    );
}

#[tokio::test]
async fn development_mode_exposes_transport_error() {
    let resp = app(state(Arc::new(Unreachable), true))
        .oneshot(empty_request("POST", "/api/invoices/create/iva-16"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "Error al crear factura con IVA 16%");
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn non_envelope_answer_is_500() {
    let transport = Canned::new(502, "<html>Bad Gateway</html>");
    let resp = app(state(transport, false))
        .oneshot(empty_request("GET", "/api/invoices/xml/inv-1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({ "succeeded": false, "message": "Error al descargar XML" }));
}

#[tokio::test]
async fn bare_404_outside_lookups_is_500() {
    let app = app(state(Canned::new(404, ""), false));
    let cases = [
        ("GET", "/api/invoices", "Error al listar facturas"),
        ("POST", "/api/invoices/create/iva-16", "Error al crear factura con IVA 16%"),
        ("DELETE", "/api/products/p1", "Error al eliminar producto"),
    ];
    for (method, uri, message) in cases {
        let resp = app.clone().oneshot(empty_request(method, uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        let body: Value = body_json(resp).await;
        assert_eq!(body, json!({ "succeeded": false, "message": message }));
    }
}

#[tokio::test]
async fn bare_404_on_lookup_is_404() {
    let resp = app(state(Canned::new(404, ""), false))
        .oneshot(empty_request("GET", "/api/invoices/inv-1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({ "message": "Error al obtener factura" }));
}

// --- status mapping ---

#[tokio::test]
async fn succeeded_envelope_is_relayed_with_200() {
    let transport = Canned::new(200, SUCCEEDED);
    let resp = app(state(transport, false))
        .oneshot(empty_request("GET", "/api/products/p1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["succeeded"], true);
    assert_eq!(body["data"]["id"], "x");
    assert_eq!(body["httpStatusCode"], 200);
}

#[tokio::test]
async fn failed_envelope_status_depends_on_operation() {
    let cases = [
        ("GET", "/api/products", StatusCode::INTERNAL_SERVER_ERROR),
        ("GET", "/api/invoices", StatusCode::INTERNAL_SERVER_ERROR),
        ("GET", "/api/products/p1", StatusCode::NOT_FOUND),
        ("GET", "/api/invoices/inv-1", StatusCode::NOT_FOUND),
        ("DELETE", "/api/products/p1", StatusCode::BAD_REQUEST),
        ("POST", "/api/invoices/create/iva-exento", StatusCode::BAD_REQUEST),
        ("POST", "/api/invoices/cancel/by-values", StatusCode::BAD_REQUEST),
        ("POST", "/api/invoices/cancel/inv-1", StatusCode::BAD_REQUEST),
        ("GET", "/api/invoices/status/by-values", StatusCode::BAD_REQUEST),
        ("GET", "/api/invoices/status/inv-1", StatusCode::BAD_REQUEST),
        ("GET", "/api/invoices/pdf/by-values", StatusCode::BAD_REQUEST),
        ("GET", "/api/invoices/pdf/inv-1", StatusCode::BAD_REQUEST),
        ("GET", "/api/invoices/xml/inv-1", StatusCode::BAD_REQUEST),
        ("POST", "/api/invoices/send/by-values", StatusCode::BAD_REQUEST),
        ("POST", "/api/invoices/send/inv-1?email=a@b.com", StatusCode::BAD_REQUEST),
    ];
    let app = app(state(Canned::new(400, FAILED), false));
    for (method, uri, expected) in cases {
        let resp = app.clone().oneshot(empty_request(method, uri)).await.unwrap();
        assert_eq!(resp.status(), expected, "{method} {uri}");
        let body: Value = body_json(resp).await;
        assert_eq!(body["details"], "rejected", "{method} {uri}");
    }
}

#[tokio::test]
async fn failed_envelope_on_product_writes_is_400() {
    let app = app(state(Canned::new(400, FAILED), false));
    for (method, uri) in [("POST", "/api/products"), ("PUT", "/api/products/p1")] {
        let resp = app
            .clone()
            .oneshot(json_request(method, uri, r#"{"description":"x"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{method} {uri}");
    }
}

// --- what reaches the API ---

#[tokio::test]
async fn list_products_uses_default_paging() {
    let transport = Canned::new(200, SUCCEEDED);
    app(state(transport.clone(), false))
        .oneshot(empty_request("GET", "/api/products"))
        .await
        .unwrap();
    let sent = transport.last();
    assert_eq!(sent.method, HttpMethod::Get);
    assert_eq!(sent.path, format!("{BASE}/products?pageNumber=1&pageSize=50"));
    assert_eq!(sent.header("x-api-key"), Some("sk_test"));
    assert_eq!(sent.header("x-tenant-key"), Some("tenant-1"));
}

#[tokio::test]
async fn list_invoices_honours_query_paging() {
    let transport = Canned::new(200, SUCCEEDED);
    app(state(transport.clone(), false))
        .oneshot(empty_request("GET", "/api/invoices?pageNumber=3&pageSize=10"))
        .await
        .unwrap();
    assert_eq!(
        transport.last().path,
        format!("{BASE}/invoices?pageNumber=3&pageSize=10")
    );
}

#[tokio::test]
async fn product_body_is_forwarded_untouched() {
    let transport = Canned::new(200, SUCCEEDED);
    let product = json!({ "description": "Libro", "unitPrice": 100.75, "sat": { "code": "01010101" } });
    let resp = app(state(transport.clone(), false))
        .oneshot(json_request("PUT", "/api/products/p1", &product.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let sent = transport.last();
    assert_eq!(sent.method, HttpMethod::Put);
    assert_eq!(sent.path, format!("{BASE}/products/p1"));
    assert_eq!(transport.last_body(), product);
}

#[tokio::test]
async fn malformed_product_body_is_400_without_calling_api() {
    let transport = Canned::new(200, SUCCEEDED);
    let resp = app(state(transport.clone(), false))
        .oneshot(json_request("POST", "/api/products", "{not json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(transport.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_object_product_body_is_400_without_calling_api() {
    let transport = Canned::new(200, SUCCEEDED);
    let app = app(state(transport.clone(), false));
    for body in ["[1,2]", r#""libro""#, "42", "null"] {
        for (method, uri) in [("POST", "/api/products"), ("PUT", "/api/products/p1")] {
            let resp = app
                .clone()
                .oneshot(json_request(method, uri, body))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{method} {uri} {body}");
            let err: Value = body_json(resp).await;
            assert_eq!(err, json!({ "message": "Product body must be a JSON object" }));
        }
    }
    assert!(transport.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_routes_pick_endpoint_from_type_code() {
    let cases = [
        ("/api/invoices/create/iva-16", "invoices/income"),
        ("/api/invoices/create/iva-tasa-cero", "invoices/income"),
        ("/api/invoices/create/by-references", "invoices/income"),
        ("/api/invoices/create/credit-note/by-values", "invoices/credit-note"),
        ("/api/invoices/create/credit-note/by-references", "invoices/credit-note"),
        ("/api/invoices/create/payment-complement/by-values", "invoices/payment"),
        ("/api/invoices/create/payment-complement/by-references", "invoices/payment"),
        ("/api/invoices/create/payment-usd-mxn", "invoices/payment"),
        ("/api/invoices/create/payment-mxn-usd", "invoices/payment"),
        ("/api/invoices/create/payment-eur-usd", "invoices/payment"),
        ("/api/invoices/factura-global-por-valores", "invoices/income"),
        ("/api/invoices/factura-global-por-referencias", "invoices/income"),
    ];
    let transport = Canned::new(200, SUCCEEDED);
    let app = app(state(transport.clone(), false));
    for (uri, endpoint) in cases {
        let resp = app.clone().oneshot(empty_request("POST", uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Post, "{uri}");
        assert_eq!(sent.path, format!("{BASE}/{endpoint}"), "{uri}");
        assert!(transport.last_body()["date"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn by_values_invoice_carries_credentials() {
    let transport = Canned::new(200, SUCCEEDED);
    app(state(transport.clone(), false))
        .oneshot(empty_request("POST", "/api/invoices/create/iva-16"))
        .await
        .unwrap();
    let body = transport.last_body();
    let credentials = body["issuer"]["taxCredentials"].as_array().unwrap();
    assert_eq!(credentials.len(), 2);
    assert_eq!(credentials[0]["fileType"], 0);
    assert_eq!(credentials[1]["fileType"], 1);
    assert_eq!(body["issuer"]["tin"], "FUNK671228PH6");
}

#[tokio::test]
async fn by_references_invoice_has_no_credentials() {
    let transport = Canned::new(200, SUCCEEDED);
    app(state(transport.clone(), false))
        .oneshot(empty_request("POST", "/api/invoices/create/by-references"))
        .await
        .unwrap();
    let body = transport.last_body();
    assert!(body["issuer"].get("taxCredentials").is_none());
    assert!(body["issuer"]["id"].is_string());
}

#[tokio::test]
async fn cancel_by_id_sends_delete_with_id() {
    let transport = Canned::new(200, SUCCEEDED);
    app(state(transport.clone(), false))
        .oneshot(empty_request("POST", "/api/invoices/cancel/inv-42"))
        .await
        .unwrap();
    let sent = transport.last();
    assert_eq!(sent.method, HttpMethod::Delete);
    assert_eq!(sent.path, format!("{BASE}/invoices"));
    let body = transport.last_body();
    assert_eq!(body["id"], "inv-42");
    assert_eq!(body["cancellationReasonCode"], "01");
}

#[tokio::test]
async fn status_by_id_sends_only_the_id() {
    let transport = Canned::new(200, SUCCEEDED);
    app(state(transport.clone(), false))
        .oneshot(empty_request("GET", "/api/invoices/status/inv-42"))
        .await
        .unwrap();
    let sent = transport.last();
    assert_eq!(sent.method, HttpMethod::Post);
    assert_eq!(sent.path, format!("{BASE}/invoices/status"));
    assert_eq!(transport.last_body(), json!({ "id": "inv-42" }));
}

#[tokio::test]
async fn pdf_by_values_sends_logo_and_colours() {
    let transport = Canned::new(200, SUCCEEDED);
    app(state(transport.clone(), false))
        .oneshot(empty_request("GET", "/api/invoices/pdf/by-values"))
        .await
        .unwrap();
    assert_eq!(transport.last().path, format!("{BASE}/invoices/pdf"));
    let body = transport.last_body();
    assert_eq!(body["bandColor"], "#FFA500");
    assert!(body["base64Logo"].as_str().unwrap().starts_with("iVBORw0KGgo"));
}

#[tokio::test]
async fn xml_by_id_is_a_get() {
    let transport = Canned::new(200, SUCCEEDED);
    app(state(transport.clone(), false))
        .oneshot(empty_request("GET", "/api/invoices/xml/inv-42"))
        .await
        .unwrap();
    let sent = transport.last();
    assert_eq!(sent.method, HttpMethod::Get);
    assert_eq!(sent.path, format!("{BASE}/invoices/inv-42/xml"));
    assert!(sent.body.is_none());
}

#[tokio::test]
async fn send_by_id_uses_query_email() {
    let transport = Canned::new(200, SUCCEEDED);
    let resp = app(state(transport.clone(), false))
        .oneshot(empty_request("POST", "/api/invoices/send/inv-42?email=someone@example.com"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(transport.last().path, format!("{BASE}/invoices/send"));
    assert_eq!(
        transport.last_body(),
        json!({ "invoiceId": "inv-42", "toEmail": "someone@example.com" })
    );
}

#[tokio::test]
async fn send_by_id_without_email_is_400() {
    let transport = Canned::new(200, SUCCEEDED);
    let app = app(state(transport.clone(), false));
    for uri in ["/api/invoices/send/inv-42", "/api/invoices/send/inv-42?email="] {
        let resp = app.clone().oneshot(empty_request("POST", uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
    assert!(transport.seen.lock().unwrap().is_empty());
}

// --- panics ---

#[tokio::test]
async fn panic_in_handler_becomes_500() {
    let resp = app(state(Arc::new(Panicking), false))
        .oneshot(empty_request("GET", "/api/products"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({ "message": "Internal server error" }));
}

#[tokio::test]
async fn panic_detail_only_in_development() {
    let resp = app(state(Arc::new(Panicking), true))
        .oneshot(empty_request("GET", "/api/products"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "transport exploded");
}
