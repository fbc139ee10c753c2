use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};

use crate::{
    dto::orders::{CheckoutPreview, CheckoutRequest, OrderWithItems},
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::order_service::{self, CheckoutOutcome},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(checkout_preview).post(checkout))
}

#[utoipa::path(
    get,
    path = "/api/checkout",
    responses(
        (status = 200, description = "Cart summary and suggested shipping address", body = ApiResponse<CheckoutPreview>)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout_preview(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CheckoutPreview>>> {
    let resp = order_service::checkout_preview(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed; Location points at the order", body = ApiResponse<OrderWithItems>),
        (status = 303, description = "Cart is empty; redirected to the cart"),
        (status = 422, description = "Missing address or invalid discount"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Response> {
    match order_service::checkout(&state, &user, payload).await? {
        CheckoutOutcome::EmptyCart => Ok(Redirect::to("/api/cart").into_response()),
        CheckoutOutcome::Placed(placed) => {
            let location = format!("/api/orders/{}", placed.order.id);
            let body = ApiResponse::success("Order placed", placed, Some(Meta::empty()));
            Ok((
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(body),
            )
                .into_response())
        }
    }
}
