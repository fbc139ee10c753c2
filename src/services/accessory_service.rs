use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;

use crate::{
    audit::{self, AuditEvent},
    config::CATALOG_PAGE_SIZE,
    dto::catalog::{
        AccessoryDetail, AccessoryList, CreateAccessoryRequest, UpdateAccessoryRequest,
    },
    entity::{
        accessories::{ActiveModel, Column, Entity as Accessories, Model as AccessoryModel},
        accessory_compatible_phones::{
            ActiveModel as LinkActive, Column as LinkCol, Entity as CompatiblePhones,
        },
        phones::{Column as PhoneCol, Entity as Phones},
        reviews::{Column as ReviewCol, Entity as Reviews},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Accessory,
    response::{ApiResponse, Meta},
    routes::params::{AccessoryQuery, paginate},
    services::{
        category_service::ensure_category_exists, contains_pattern,
        phone_service::phone_from_entity, review_service::review_from_entity,
    },
    state::AppState,
};

/// Same shape as the phone filter, with accessory type in place of condition.
pub fn accessory_filter(query: &AccessoryQuery) -> Condition {
    let mut condition = Condition::all();

    if let Some(search) = query.search.as_ref() {
        let pattern = contains_pattern(search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::AccessoryType).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(category) = query.category {
        condition = condition.add(Column::CategoryId.eq(category));
    }

    if let Some(accessory_type) = query.accessory_type.as_ref() {
        condition = condition.add(Column::AccessoryType.eq(accessory_type.clone()));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    condition
}

pub async fn list_accessories(
    state: &AppState,
    query: AccessoryQuery,
) -> AppResult<ApiResponse<AccessoryList>> {
    let (page, limit, offset) = paginate(query.page, CATALOG_PAGE_SIZE);

    let finder = Accessories::find()
        .filter(accessory_filter(&query))
        .order_by_desc(Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(accessory_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Accessories",
        AccessoryList { items },
        Some(meta),
    ))
}

pub async fn get_accessory(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<AccessoryDetail>> {
    let accessory = Accessories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let reviews = Reviews::find()
        .filter(ReviewCol::AccessoryId.eq(id))
        .order_by_desc(ReviewCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(review_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let compatible_phones = accessory
        .find_related(Phones)
        .order_by_desc(PhoneCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(phone_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Accessory",
        AccessoryDetail {
            accessory: accessory_from_entity(accessory),
            reviews,
            compatible_phones,
        },
        None,
    ))
}

pub async fn create_accessory(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAccessoryRequest,
) -> AppResult<ApiResponse<Accessory>> {
    payload.validate()?;

    let txn = state.orm.begin().await?;
    ensure_category_exists(&txn, payload.category_id).await?;

    let accessory = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        brand: Set(payload.brand),
        description: Set(payload.description),
        price: Set(payload.price),
        stock: Set(payload.stock),
        accessory_type: Set(payload.accessory_type),
        color: Set(payload.color),
        material: Set(payload.material),
        image_url: Set(payload.image_url),
        rating: Set(payload.rating.unwrap_or(0.0)),
        category_id: Set(payload.category_id),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    replace_compatible_phones(&txn, accessory.id, &payload.compatible_phone_ids).await?;
    txn.commit().await?;
    tracing::info!(accessory_id = %accessory.id, "accessory created");

    audit::record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "accessory_create",
            "accessories",
            serde_json::json!({ "accessory_id": accessory.id }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Accessory created",
        accessory_from_entity(accessory),
        Some(Meta::empty()),
    ))
}

pub async fn update_accessory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateAccessoryRequest,
) -> AppResult<ApiResponse<Accessory>> {
    payload.validate()?;

    let txn = state.orm.begin().await?;
    let existing = Accessories::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_category_exists(&txn, payload.category_id).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(brand);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(accessory_type) = payload.accessory_type {
        active.accessory_type = Set(accessory_type);
    }
    if let Some(color) = payload.color {
        active.color = Set(color);
    }
    if let Some(material) = payload.material {
        active.material = Set(material);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(image_url);
    }
    if let Some(rating) = payload.rating {
        active.rating = Set(rating);
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(Some(category_id));
    }
    active.updated_at = Set(Utc::now().into());

    let accessory = active.update(&txn).await?;

    if let Some(phone_ids) = payload.compatible_phone_ids.as_ref() {
        replace_compatible_phones(&txn, accessory.id, phone_ids).await?;
    }
    txn.commit().await?;

    audit::record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "accessory_update",
            "accessories",
            serde_json::json!({ "accessory_id": accessory.id }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        accessory_from_entity(accessory),
        Some(Meta::empty()),
    ))
}

pub async fn delete_accessory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Accessories::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    tracing::info!(accessory_id = %id, "accessory deleted");

    audit::record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "accessory_delete",
            "accessories",
            serde_json::json!({ "accessory_id": id }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Swap the accessory's compatibility links for exactly `phone_ids`.
async fn replace_compatible_phones<C: ConnectionTrait>(
    conn: &C,
    accessory_id: Uuid,
    phone_ids: &[Uuid],
) -> AppResult<()> {
    let wanted: BTreeSet<Uuid> = phone_ids.iter().copied().collect();

    if !wanted.is_empty() {
        let found = Phones::find()
            .filter(PhoneCol::Id.is_in(wanted.iter().copied()))
            .count(conn)
            .await?;
        if found as usize != wanted.len() {
            return Err(AppError::field(
                "compatible_phone_ids",
                "One or more selected phones do not exist.",
            ));
        }
    }

    CompatiblePhones::delete_many()
        .filter(LinkCol::AccessoryId.eq(accessory_id))
        .exec(conn)
        .await?;

    if wanted.is_empty() {
        return Ok(());
    }

    let links = wanted.into_iter().map(|phone_id| LinkActive {
        accessory_id: Set(accessory_id),
        phone_id: Set(phone_id),
    });
    CompatiblePhones::insert_many(links)
        .exec_without_returning(conn)
        .await?;

    Ok(())
}

pub(crate) fn accessory_from_entity(model: AccessoryModel) -> Accessory {
    Accessory {
        id: model.id,
        name: model.name,
        brand: model.brand,
        description: model.description,
        price: model.price,
        stock: model.stock,
        accessory_type: model.accessory_type,
        color: model.color,
        material: model.material,
        image_url: model.image_url,
        rating: model.rating,
        category_id: model.category_id,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn type_filter_is_exact_and_search_covers_type() {
        let query = AccessoryQuery {
            search: Some("case".into()),
            accessory_type: Some("Case".into()),
            ..Default::default()
        };
        let sql = Accessories::find()
            .filter(accessory_filter(&query))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""accessory_type" = 'Case'"#), "{sql}");
        assert_eq!(sql.matches("ILIKE '%case%'").count(), 3, "{sql}");
    }
}
