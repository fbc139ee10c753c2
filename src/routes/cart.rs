use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::cart::CartView,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::parse_item_type,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view_cart))
        .route("/add/{item_type}/{item_id}", post(add_to_cart))
        .route("/remove/{cart_item_key}", post(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart of the current session", body = ApiResponse<CartView>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::view_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/add/{item_type}/{item_id}",
    params(
        ("item_type" = String, Path, description = "`phone` or `accessory`"),
        ("item_id" = Uuid, Path, description = "Phone or accessory ID")
    ),
    responses(
        (status = 200, description = "Item added or quantity bumped", body = ApiResponse<CartView>),
        (status = 400, description = "Unknown item type"),
        (status = 404, description = "Item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path((item_type, item_id)): Path<(String, Uuid)>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let item_type = parse_item_type(&item_type)?;
    let resp = cart_service::add_to_cart(&state, &user, item_type, item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/remove/{cart_item_key}",
    params(
        ("cart_item_key" = String, Path, description = "Cart line key, e.g. `phone_<uuid>`")
    ),
    responses(
        (status = 200, description = "Cart after removal; unknown keys are ignored", body = ApiResponse<CartView>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(cart_item_key): Path<String>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::remove_from_cart(&state, &user, &cart_item_key).await?;
    Ok(Json(resp))
}
