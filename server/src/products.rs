//! Product routes. Bodies go to the invoicing API untouched.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::AppError,
    fiscal::{Failure, Paging},
    state::AppState,
};

const DEFAULT_PAGE_SIZE: u32 = 50;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

const INVALID_BODY: &str = "Product body must be a JSON object";

fn product_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    let Json(product) = body.map_err(|rejection| {
        debug!(%rejection, "product body rejected");
        AppError::BadRequest(INVALID_BODY.to_string())
    })?;
    if !product.is_object() {
        debug!("product body is not an object");
        return Err(AppError::BadRequest(INVALID_BODY.to_string()));
    }
    Ok(product)
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    params(Paging),
    responses(
        (status = 200, description = "Page of products"),
        (status = 500, description = "The API could not list products")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(paging): Query<Paging>,
) -> Result<Response, AppError> {
    let (page_number, page_size) = paging.or(1, DEFAULT_PAGE_SIZE);
    let request = state.fiscal.client().build_list_products(page_number, page_size);
    state
        .fiscal
        .relay(Ok(request), Failure::List, "Error al listar productos")
        .await
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let request = state.fiscal.client().build_get_product(&id);
    state
        .fiscal
        .relay(Ok(request), Failure::Lookup, "Error al obtener producto")
        .await
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "products",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Product created"),
        (status = 400, description = "Rejected by the API")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let product = product_body(body)?;
    let request = state.fiscal.client().build_create_product(&product);
    state
        .fiscal
        .relay(request, Failure::Action, "Error al crear producto")
        .await
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Product updated"),
        (status = 400, description = "Rejected by the API")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let product = product_body(body)?;
    let request = state.fiscal.client().build_update_product(&id, &product);
    state
        .fiscal
        .relay(request, Failure::Action, "Error al actualizar producto")
        .await
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 400, description = "Rejected by the API")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let request = state.fiscal.client().build_delete_product(&id);
    state
        .fiscal
        .relay(Ok(request), Failure::Action, "Error al eliminar producto")
        .await
}
