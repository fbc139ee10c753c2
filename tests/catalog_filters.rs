use chrono::{Duration, Utc};
use phone_storefront_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::catalog::CreatePhoneRequest,
    middleware::auth::AuthUser,
    routes::params::PhoneQuery,
    services::phone_service,
    state::AppState,
};
use rust_decimal_macros::dec;
use uuid::Uuid;

// Price bounds are inclusive and every filter narrows the result.
#[tokio::test]
async fn price_and_condition_filters_combine() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run catalog tests.");
            return Ok(());
        }
    };

    let pool = create_pool(&database_url).await?;
    run_migrations(&pool).await?;
    let state = AppState::new(
        pool,
        AppConfig {
            database_url,
            jwt_secret: "filter-test-secret".into(),
            host: "127.0.0.1".into(),
            port: 0,
            session_ttl_hours: 1,
        },
    );

    let admin_id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, email, password_hash, role) VALUES ($1, $2, 'x', 'admin')")
        .bind(admin_id)
        .bind(format!("{admin_id}@example.com"))
        .execute(&state.pool)
        .await?;
    let session_id = Uuid::new_v4().simple().to_string();
    state
        .sessions
        .open(&session_id, Utc::now() + Duration::hours(1))
        .await;
    let admin = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
        session_id,
    };

    // Unique token keeps rows from other runs out of the search.
    let token = Uuid::new_v4().simple().to_string();
    for (price, condition) in [
        ("99.99", "used"),
        ("100.00", "used"),
        ("500.00", "used"),
        ("500.01", "used"),
        ("250.00", "new"),
    ] {
        let payload: CreatePhoneRequest = serde_json::from_value(serde_json::json!({
            "name": format!("Filter {token} {price}"),
            "brand": "Test",
            "model": "T",
            "price": price,
            "condition": condition
        }))?;
        phone_service::create_phone(&state, &admin, payload).await?;
    }

    let query = PhoneQuery {
        search: Some(token.clone()),
        min_price: Some(dec!(100)),
        max_price: Some(dec!(500)),
        condition: Some("used".into()),
        ..Default::default()
    };
    let found = phone_service::list_phones(&state, query).await?;
    let mut prices: Vec<_> = found.data.unwrap().items.iter().map(|p| p.price).collect();
    prices.sort();
    assert_eq!(prices, vec![dec!(100.00), dec!(500.00)]);
    assert_eq!(found.meta.unwrap().total, Some(2));

    let all = phone_service::list_phones(
        &state,
        PhoneQuery {
            search: Some(token.to_uppercase()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(all.data.unwrap().items.len(), 5);

    let unknown_category = phone_service::list_phones(
        &state,
        PhoneQuery {
            search: Some(token.clone()),
            category: Some(Uuid::new_v4()),
            ..Default::default()
        },
    )
    .await?;
    assert!(unknown_category.data.unwrap().items.is_empty());

    let unknown_condition = phone_service::list_phones(
        &state,
        PhoneQuery {
            search: Some(token),
            condition: Some("mint".into()),
            ..Default::default()
        },
    )
    .await?;
    assert!(unknown_condition.data.unwrap().items.is_empty());

    Ok(())
}
