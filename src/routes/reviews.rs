use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use uuid::Uuid;

use crate::{
    dto::reviews::CreateReviewRequest,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Review,
    response::ApiResponse,
    routes::params::parse_item_type,
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/add/{item_type}/{item_id}", post(add_review))
}

#[utoipa::path(
    post,
    path = "/api/reviews/add/{item_type}/{item_id}",
    params(
        ("item_type" = String, Path, description = "`phone` or `accessory`"),
        ("item_id" = Uuid, Path, description = "Phone or accessory ID")
    ),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review recorded", body = ApiResponse<Review>),
        (status = 404, description = "Item not found"),
        (status = 422, description = "Rating out of range or missing text"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn add_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path((item_type, item_id)): Path<(String, Uuid)>,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Review>>)> {
    let item_type = parse_item_type(&item_type)?;
    let resp = review_service::add_review(&state, &user, item_type, item_id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
