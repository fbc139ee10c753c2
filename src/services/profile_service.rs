use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    sea_query::OnConflict,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::{self, AuditEvent},
    dto::profile::UpdateProfileRequest,
    entity::customer_profiles::{
        ActiveModel, Column, Entity as CustomerProfiles, Model as ProfileModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CustomerProfile,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn get_profile(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CustomerProfile>> {
    let profile = get_or_create(&state.orm, user.user_id).await?;
    Ok(ApiResponse::success(
        "Profile",
        profile_from_entity(profile),
        None,
    ))
}

/// Every field is replaced by the submitted value, blank when omitted.
pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<CustomerProfile>> {
    payload.validate()?;
    let existing = get_or_create(&state.orm, user.user_id).await?;

    let mut active: ActiveModel = existing.into();
    active.phone_number = Set(payload.phone_number);
    active.address = Set(payload.address);
    active.city = Set(payload.city);
    active.state = Set(payload.state);
    active.zip_code = Set(payload.zip_code);
    active.country = Set(payload.country);
    active.date_of_birth = Set(payload.date_of_birth);
    active.updated_at = Set(Utc::now().into());
    let profile = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        AuditEvent::new(
            user.user_id,
            "profile_update",
            "customer_profiles",
            serde_json::json!({ "profile_id": profile.id }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Profile updated",
        profile_from_entity(profile),
        Some(Meta::empty()),
    ))
}

/// Concurrent first visits race on the unique `user_id`; the loser's insert
/// is a no-op and both read the same row.
async fn get_or_create<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> AppResult<ProfileModel> {
    let blank = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        phone_number: Set(String::new()),
        address: Set(String::new()),
        city: Set(String::new()),
        state: Set(String::new()),
        zip_code: Set(String::new()),
        country: Set(String::new()),
        date_of_birth: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    };
    CustomerProfiles::insert(blank)
        .on_conflict(OnConflict::column(Column::UserId).do_nothing().to_owned())
        .exec_without_returning(conn)
        .await?;

    CustomerProfiles::find()
        .filter(Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("profile missing after upsert")))
}

fn profile_from_entity(model: ProfileModel) -> CustomerProfile {
    CustomerProfile {
        id: model.id,
        user_id: model.user_id,
        phone_number: model.phone_number,
        address: model.address,
        city: model.city,
        state: model.state,
        zip_code: model.zip_code,
        country: model.country,
        date_of_birth: model.date_of_birth,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
