use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    audit::{self, AuditEvent},
    dto::cart::CartView,
    entity::{accessories::Entity as Accessories, phones::Entity as Phones},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{ItemRef, ItemType},
    response::{ApiResponse, Meta},
    session::CartEntry,
    state::AppState,
};

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let cart = state.sessions.cart(&user.session_id).await;
    Ok(ApiResponse::success("Cart", CartView::from(&cart), None))
}

/// Put one unit of the item in the cart. A repeat add bumps the quantity and
/// keeps the price captured the first time.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    item_type: ItemType,
    item_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    let item = ItemRef::new(item_type, item_id);
    let key = item.cart_key();

    let bumped = state
        .sessions
        .update_cart(&user.session_id, |cart| cart.increment(&key))
        .await
        .ok_or(AppError::Unauthorized)?;

    if !bumped {
        let (name, price) = snapshot(state, item).await?;
        let entry = CartEntry::new(item, name, price);
        state
            .sessions
            .update_cart(&user.session_id, |cart| cart.add(entry))
            .await
            .ok_or(AppError::Unauthorized)?;
    }
    tracing::debug!(item = %key, "added to cart");

    audit::record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "cart_add",
            "cart",
            serde_json::json!({ "item_type": item_type, "item_id": item_id }),
        ),
    )
    .await;

    let cart = state.sessions.cart(&user.session_id).await;
    Ok(ApiResponse::success(
        "Added to cart",
        CartView::from(&cart),
        Some(Meta::empty()),
    ))
}

/// Drop an entry by key. Unknown keys leave the cart untouched.
pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    cart_item_key: &str,
) -> AppResult<ApiResponse<CartView>> {
    let removed = state
        .sessions
        .update_cart(&user.session_id, |cart| cart.remove(cart_item_key))
        .await
        .ok_or(AppError::Unauthorized)?;

    if removed.is_some() {
        audit::record(
            &state.pool,
            AuditEvent::new(
                user.user_id,
                "cart_remove",
                "cart",
                serde_json::json!({ "key": cart_item_key }),
            ),
        )
        .await;
    }

    let cart = state.sessions.cart(&user.session_id).await;
    Ok(ApiResponse::success(
        "Removed from cart",
        CartView::from(&cart),
        Some(Meta::empty()),
    ))
}

/// Current name and price of a catalog item.
async fn snapshot(state: &AppState, item: ItemRef) -> AppResult<(String, Decimal)> {
    match item {
        ItemRef::Phone(id) => Phones::find_by_id(id)
            .one(&state.orm)
            .await?
            .map(|phone| (phone.name, phone.price))
            .ok_or(AppError::NotFound),
        ItemRef::Accessory(id) => Accessories::find_by_id(id)
            .one(&state.orm)
            .await?
            .map(|accessory| (accessory.name, accessory.price))
            .ok_or(AppError::NotFound),
    }
}
