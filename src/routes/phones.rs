use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::catalog::{CreatePhoneRequest, PhoneDetail, PhoneList, UpdatePhoneRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Phone,
    response::ApiResponse,
    routes::params::PhoneQuery,
    services::phone_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_phones).post(create_phone))
        .route(
            "/{id}",
            get(get_phone).put(update_phone).delete(delete_phone),
        )
}

#[utoipa::path(
    get,
    path = "/api/phones",
    params(PhoneQuery),
    responses(
        (status = 200, description = "Filtered phones, 12 per page", body = ApiResponse<PhoneList>)
    ),
    tag = "Phones"
)]
pub async fn list_phones(
    State(state): State<AppState>,
    Query(query): Query<PhoneQuery>,
) -> AppResult<Json<ApiResponse<PhoneList>>> {
    let resp = phone_service::list_phones(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/phones/{id}",
    params(
        ("id" = Uuid, Path, description = "Phone ID")
    ),
    responses(
        (status = 200, description = "Phone with reviews and compatible accessories", body = ApiResponse<PhoneDetail>),
        (status = 404, description = "Phone not found"),
    ),
    tag = "Phones"
)]
pub async fn get_phone(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PhoneDetail>>> {
    let resp = phone_service::get_phone(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/phones",
    request_body = CreatePhoneRequest,
    responses(
        (status = 201, description = "Create phone", body = ApiResponse<Phone>),
        (status = 422, description = "Invalid fields"),
    ),
    security(("bearer_auth" = [])),
    tag = "Phones"
)]
pub async fn create_phone(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePhoneRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Phone>>)> {
    let resp = phone_service::create_phone(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/phones/{id}",
    params(
        ("id" = Uuid, Path, description = "Phone ID")
    ),
    request_body = UpdatePhoneRequest,
    responses(
        (status = 200, description = "Update phone", body = ApiResponse<Phone>),
        (status = 404, description = "Phone not found"),
        (status = 422, description = "Invalid fields"),
    ),
    security(("bearer_auth" = [])),
    tag = "Phones"
)]
pub async fn update_phone(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePhoneRequest>,
) -> AppResult<Json<ApiResponse<Phone>>> {
    let resp = phone_service::update_phone(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/phones/{id}",
    params(
        ("id" = Uuid, Path, description = "Phone ID")
    ),
    responses(
        (status = 200, description = "Phone deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Phone not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Phones"
)]
pub async fn delete_phone(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = phone_service::delete_phone(&state, &user, id).await?;
    Ok(Json(resp))
}
