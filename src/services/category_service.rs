use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryOrder, Set,
    SqlErr,
};
use sea_orm::ActiveValue::NotSet;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::{self, AuditEvent},
    dto::catalog::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
    entity::categories::{ActiveModel, Column, Entity as Categories, Model as CategoryModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Category,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items: Vec<Category> = Categories::find()
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    payload.validate()?;

    let category = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(duplicate_name)?;

    audit::record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "category_create",
            "categories",
            serde_json::json!({ "category_id": category.id }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Category created",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    payload.validate()?;

    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    let category = active.update(&state.orm).await.map_err(duplicate_name)?;

    audit::record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "category_update",
            "categories",
            serde_json::json!({ "category_id": category.id }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

/// Phones and accessories in the category keep existing with no category.
pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "category_delete",
            "categories",
            serde_json::json!({ "category_id": id }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Reject a `category_id` that does not name an existing category.
pub(crate) async fn ensure_category_exists<C: ConnectionTrait>(
    conn: &C,
    category_id: Option<Uuid>,
) -> AppResult<()> {
    let Some(id) = category_id else {
        return Ok(());
    };
    let found = Categories::find_by_id(id).count(conn).await?;
    if found == 0 {
        return Err(AppError::field(
            "category_id",
            format!("Select a valid choice. {id} is not one of the available choices."),
        ));
    }
    Ok(())
}

fn duplicate_name(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::field("name", "Category with this name already exists.")
        }
        _ => AppError::OrmError(err),
    }
}

fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
