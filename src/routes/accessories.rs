use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::catalog::{
        AccessoryDetail, AccessoryList, CreateAccessoryRequest, UpdateAccessoryRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Accessory,
    response::ApiResponse,
    routes::params::AccessoryQuery,
    services::accessory_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accessories).post(create_accessory))
        .route(
            "/{id}",
            get(get_accessory)
                .put(update_accessory)
                .delete(delete_accessory),
        )
}

#[utoipa::path(
    get,
    path = "/api/accessories",
    params(AccessoryQuery),
    responses(
        (status = 200, description = "Filtered accessories, 12 per page", body = ApiResponse<AccessoryList>)
    ),
    tag = "Accessories"
)]
pub async fn list_accessories(
    State(state): State<AppState>,
    Query(query): Query<AccessoryQuery>,
) -> AppResult<Json<ApiResponse<AccessoryList>>> {
    let resp = accessory_service::list_accessories(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/accessories/{id}",
    params(
        ("id" = Uuid, Path, description = "Accessory ID")
    ),
    responses(
        (status = 200, description = "Accessory with reviews and compatible phones", body = ApiResponse<AccessoryDetail>),
        (status = 404, description = "Accessory not found"),
    ),
    tag = "Accessories"
)]
pub async fn get_accessory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<AccessoryDetail>>> {
    let resp = accessory_service::get_accessory(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/accessories",
    request_body = CreateAccessoryRequest,
    responses(
        (status = 201, description = "Create accessory", body = ApiResponse<Accessory>),
        (status = 422, description = "Invalid fields"),
    ),
    security(("bearer_auth" = [])),
    tag = "Accessories"
)]
pub async fn create_accessory(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAccessoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Accessory>>)> {
    let resp = accessory_service::create_accessory(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/accessories/{id}",
    params(
        ("id" = Uuid, Path, description = "Accessory ID")
    ),
    request_body = UpdateAccessoryRequest,
    responses(
        (status = 200, description = "Update accessory", body = ApiResponse<Accessory>),
        (status = 404, description = "Accessory not found"),
        (status = 422, description = "Invalid fields"),
    ),
    security(("bearer_auth" = [])),
    tag = "Accessories"
)]
pub async fn update_accessory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccessoryRequest>,
) -> AppResult<Json<ApiResponse<Accessory>>> {
    let resp = accessory_service::update_accessory(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/accessories/{id}",
    params(
        ("id" = Uuid, Path, description = "Accessory ID")
    ),
    responses(
        (status = 200, description = "Accessory deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Accessory not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Accessories"
)]
pub async fn delete_accessory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = accessory_service::delete_accessory(&state, &user, id).await?;
    Ok(Json(resp))
}
