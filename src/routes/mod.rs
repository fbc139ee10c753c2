use axum::{Router, routing::get};

use crate::state::AppState;

pub mod accessories;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod phones;
pub mod profile;
pub mod reviews;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/phones", phones::router())
        .nest("/accessories", accessories::router())
        .nest("/categories", categories::router())
        .nest("/cart", cart::router())
        .nest("/checkout", checkout::router())
        .nest("/orders", orders::router())
        .nest("/reviews", reviews::router())
        .nest("/profile", profile::router())
        .nest("/auth", auth::router())
}
