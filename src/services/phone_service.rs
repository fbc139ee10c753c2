use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;

use crate::{
    audit::{self, AuditEvent},
    config::CATALOG_PAGE_SIZE,
    dto::catalog::{CreatePhoneRequest, PhoneDetail, PhoneList, UpdatePhoneRequest},
    entity::{
        accessories::{Column as AccessoryCol, Entity as Accessories},
        phones::{ActiveModel, Column, Entity as Phones, Model as PhoneModel},
        reviews::{Column as ReviewCol, Entity as Reviews},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Phone,
    response::{ApiResponse, Meta},
    routes::params::{PhoneQuery, paginate},
    services::{
        accessory_service::accessory_from_entity, category_service::ensure_category_exists,
        contains_pattern, review_service::review_from_entity,
    },
    state::AppState,
};

/// Filters combine with AND; the search term matches name, brand or description.
pub fn phone_filter(query: &PhoneQuery) -> Condition {
    let mut condition = Condition::all();

    if let Some(search) = query.search.as_ref() {
        let pattern = contains_pattern(search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Brand).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(category) = query.category {
        condition = condition.add(Column::CategoryId.eq(category));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    if let Some(phone_condition) = query.condition.as_ref() {
        condition = condition.add(Column::Condition.eq(phone_condition.clone()));
    }

    condition
}

pub async fn list_phones(
    state: &AppState,
    query: PhoneQuery,
) -> AppResult<ApiResponse<PhoneList>> {
    let (page, limit, offset) = paginate(query.page, CATALOG_PAGE_SIZE);

    let finder = Phones::find()
        .filter(phone_filter(&query))
        .order_by_desc(Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(phone_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Phones", PhoneList { items }, Some(meta)))
}

pub async fn get_phone(state: &AppState, id: Uuid) -> AppResult<ApiResponse<PhoneDetail>> {
    let phone = Phones::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let reviews = Reviews::find()
        .filter(ReviewCol::PhoneId.eq(id))
        .order_by_desc(ReviewCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(review_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let compatible_accessories = phone
        .find_related(Accessories)
        .order_by_desc(AccessoryCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(accessory_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Phone",
        PhoneDetail {
            phone: phone_from_entity(phone),
            reviews,
            compatible_accessories,
        },
        None,
    ))
}

pub async fn create_phone(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePhoneRequest,
) -> AppResult<ApiResponse<Phone>> {
    payload.validate()?;
    ensure_category_exists(&state.orm, payload.category_id).await?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        brand: Set(payload.brand),
        model: Set(payload.model),
        description: Set(payload.description),
        price: Set(payload.price),
        stock: Set(payload.stock),
        processor: Set(payload.processor),
        ram: Set(payload.ram),
        storage: Set(payload.storage),
        display_size: Set(payload.display_size),
        camera_mp: Set(payload.camera_mp),
        battery_mah: Set(payload.battery_mah),
        os: Set(payload.os),
        condition: Set(payload.condition),
        color: Set(payload.color),
        image_url: Set(payload.image_url),
        rating: Set(payload.rating.unwrap_or(0.0)),
        category_id: Set(payload.category_id),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let phone = active.insert(&state.orm).await?;
    tracing::info!(phone_id = %phone.id, "phone created");

    audit::record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "phone_create",
            "phones",
            serde_json::json!({ "phone_id": phone.id }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Phone created",
        phone_from_entity(phone),
        Some(Meta::empty()),
    ))
}

pub async fn update_phone(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePhoneRequest,
) -> AppResult<ApiResponse<Phone>> {
    payload.validate()?;
    let existing = Phones::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_category_exists(&state.orm, payload.category_id).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(brand);
    }
    if let Some(model) = payload.model {
        active.model = Set(model);
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
    if let Some(processor) = payload.processor {
        active.processor = Set(processor);
    }
    if let Some(ram) = payload.ram {
        active.ram = Set(ram);
    }
    if let Some(storage) = payload.storage {
        active.storage = Set(storage);
    }
    if let Some(display_size) = payload.display_size {
        active.display_size = Set(display_size);
    }
    if let Some(camera_mp) = payload.camera_mp {
        active.camera_mp = Set(camera_mp);
    }
    if let Some(battery_mah) = payload.battery_mah {
        active.battery_mah = Set(Some(battery_mah));
    }
    if let Some(os) = payload.os {
        active.os = Set(os);
    }
    if let Some(condition) = payload.condition {
        active.condition = Set(condition);
    }
    if let Some(color) = payload.color {
        active.color = Set(color);
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

    let phone = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "phone_update",
            "phones",
            serde_json::json!({ "phone_id": phone.id }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        phone_from_entity(phone),
        Some(Meta::empty()),
    ))
}

/// Placed order items keep their snapshot with the phone reference cleared;
/// reviews and compatibility links of the phone are removed with it.
pub async fn delete_phone(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Phones::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    tracing::info!(phone_id = %id, "phone deleted");

    audit::record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "phone_delete",
            "phones",
            serde_json::json!({ "phone_id": id }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub(crate) fn phone_from_entity(model: PhoneModel) -> Phone {
    Phone {
        id: model.id,
        name: model.name,
        brand: model.brand,
        model: model.model,
        description: model.description,
        price: model.price,
        stock: model.stock,
        processor: model.processor,
        ram: model.ram,
        storage: model.storage,
        display_size: model.display_size,
        camera_mp: model.camera_mp,
        battery_mah: model.battery_mah,
        os: model.os,
        condition: model.condition,
        color: model.color,
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
    use rust_decimal_macros::dec;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(query: &PhoneQuery) -> String {
        Phones::find()
            .filter(phone_filter(query))
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn empty_query_has_no_where_clause() {
        assert!(!sql(&PhoneQuery::default()).contains("WHERE"));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let query = PhoneQuery {
            min_price: Some(dec!(100)),
            max_price: Some(dec!(500)),
            condition: Some("used".into()),
            ..Default::default()
        };
        let sql = sql(&query);
        assert!(sql.contains(r#""price" >= 100"#), "{sql}");
        assert!(sql.contains(r#""price" <= 500"#), "{sql}");
        assert!(sql.contains(r#""condition" = 'used'"#), "{sql}");
    }

    #[test]
    fn search_is_or_across_fields() {
        let query = PhoneQuery {
            search: Some("pixel".into()),
            ..Default::default()
        };
        let sql = sql(&query);
        assert_eq!(sql.matches("ILIKE '%pixel%'").count(), 3, "{sql}");
        assert_eq!(sql.matches(" OR ").count(), 2, "{sql}");
    }
}
