use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QuerySelect, RelationTrait, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::{self, AuditEvent},
    dto::reviews::CreateReviewRequest,
    entity::{
        accessories::Entity as Accessories,
        order_items::{Column as OrderItemCol, Entity as OrderItems, Relation as OrderItemRel},
        orders::Column as OrderCol,
        phones::Entity as Phones,
        reviews::{ActiveModel, Model as ReviewModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{ItemRef, ItemType, Review},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Record a review of a phone or accessory. A customer may review the same
/// item more than once; each submission is its own review.
pub async fn add_review(
    state: &AppState,
    user: &AuthUser,
    item_type: ItemType,
    item_id: Uuid,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    let target = ItemRef::new(item_type, item_id);
    ensure_target_exists(&state.orm, target).await?;
    payload.validate()?;

    let verified = has_purchased(&state.orm, user.user_id, target).await?;

    let review = ActiveModel {
        id: Set(Uuid::new_v4()),
        phone_id: Set(target.phone_id()),
        accessory_id: Set(target.accessory_id()),
        customer_id: Set(user.user_id),
        rating: Set(payload.rating),
        title: Set(payload.title.trim().to_string()),
        review_text: Set(payload.review_text),
        is_verified_purchase: Set(verified),
        helpful_count: Set(0),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    tracing::info!(review_id = %review.id, item = %target.cart_key(), "review added");

    audit::record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "review_create",
            "reviews",
            serde_json::json!({
                "review_id": review.id,
                "item_type": item_type,
                "item_id": item_id,
            }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Review added",
        review_from_entity(review)?,
        Some(Meta::empty()),
    ))
}

async fn ensure_target_exists<C: ConnectionTrait>(conn: &C, target: ItemRef) -> AppResult<()> {
    let found = match target {
        ItemRef::Phone(id) => Phones::find_by_id(id).count(conn).await?,
        ItemRef::Accessory(id) => Accessories::find_by_id(id).count(conn).await?,
    };
    if found == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// True when one of the customer's orders contains the item.
async fn has_purchased<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
    target: ItemRef,
) -> AppResult<bool> {
    let item_filter = match target {
        ItemRef::Phone(id) => OrderItemCol::PhoneId.eq(id),
        ItemRef::Accessory(id) => OrderItemCol::AccessoryId.eq(id),
    };
    let count = OrderItems::find()
        .join(JoinType::InnerJoin, OrderItemRel::Orders.def())
        .filter(OrderCol::CustomerId.eq(customer_id))
        .filter(item_filter)
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub(crate) fn review_from_entity(model: ReviewModel) -> AppResult<Review> {
    let target = ItemRef::from_columns(model.phone_id, model.accessory_id).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "review {} must reference exactly one item",
            model.id
        ))
    })?;
    Ok(Review {
        id: model.id,
        target,
        customer_id: model.customer_id,
        rating: model.rating,
        title: model.title,
        review_text: model.review_text,
        is_verified_purchase: model.is_verified_purchase,
        helpful_count: model.helpful_count,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn model(phone_id: Option<Uuid>, accessory_id: Option<Uuid>) -> ReviewModel {
        let now = Utc::now().fixed_offset();
        ReviewModel {
            id: Uuid::new_v4(),
            phone_id,
            accessory_id,
            customer_id: Uuid::new_v4(),
            rating: 4,
            title: "Solid".into(),
            review_text: "Battery lasts two days.".into(),
            is_verified_purchase: true,
            helpful_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn review_row_maps_to_typed_target() {
        let id = Uuid::new_v4();
        let review = review_from_entity(model(None, Some(id))).unwrap();
        assert_eq!(review.target, ItemRef::Accessory(id));

        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["item_type"], "accessory");
        assert_eq!(value["item_id"], serde_json::json!(id));
    }

    #[test]
    fn row_without_target_is_an_error() {
        assert!(review_from_entity(model(None, None)).is_err());
    }

    #[test]
    fn purchase_check_joins_orders_of_the_customer() {
        let customer = Uuid::nil();
        let sql = OrderItems::find()
            .join(JoinType::InnerJoin, OrderItemRel::Orders.def())
            .filter(OrderCol::CustomerId.eq(customer))
            .filter(OrderItemCol::PhoneId.eq(customer))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"INNER JOIN "orders""#), "{sql}");
        assert!(sql.contains(r#""orders"."customer_id""#), "{sql}");
    }
}
