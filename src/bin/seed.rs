use phone_storefront_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    services::auth_service::hash_password,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

struct SeedPhone {
    name: &'static str,
    brand: &'static str,
    model: &'static str,
    price: &'static str,
    stock: i32,
    ram: &'static str,
    storage: &'static str,
    condition: &'static str,
}

struct SeedAccessory {
    name: &'static str,
    brand: &'static str,
    accessory_type: &'static str,
    price: &'static str,
    stock: i32,
    /// Names of seeded phones the accessory fits.
    fits: &'static [&'static str],
}

const PHONES: &[SeedPhone] = &[
    SeedPhone {
        name: "Pixel 9",
        brand: "Google",
        model: "GR1YH",
        price: "599.99",
        stock: 25,
        ram: "12GB",
        storage: "128GB",
        condition: "new",
    },
    SeedPhone {
        name: "Galaxy S23",
        brand: "Samsung",
        model: "SM-S911B",
        price: "449.00",
        stock: 8,
        ram: "8GB",
        storage: "256GB",
        condition: "refurbished",
    },
    SeedPhone {
        name: "iPhone 13",
        brand: "Apple",
        model: "A2633",
        price: "329.50",
        stock: 4,
        ram: "4GB",
        storage: "128GB",
        condition: "used",
    },
];

const ACCESSORIES: &[SeedAccessory] = &[
    SeedAccessory {
        name: "USB-C 30W Charger",
        brand: "Anker",
        accessory_type: "Charger",
        price: "19.99",
        stock: 120,
        fits: &["Pixel 9", "Galaxy S23"],
    },
    SeedAccessory {
        name: "Clear Case for Pixel 9",
        brand: "Spigen",
        accessory_type: "Case",
        price: "14.50",
        stock: 60,
        fits: &["Pixel 9"],
    },
    SeedAccessory {
        name: "Tempered Glass Screen Protector",
        brand: "ZAGG",
        accessory_type: "Screen Protector",
        price: "9.99",
        stock: 200,
        fits: &["iPhone 13"],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin12345", "admin").await?;
    let customer_id = ensure_user(&pool, "customer@example.com", "customer123", "customer").await?;
    let phones_category = ensure_category(&pool, "Smartphones").await?;
    let accessories_category = ensure_category(&pool, "Accessories").await?;
    seed_phones(&pool, phones_category).await?;
    seed_accessories(&pool, accessories_category).await?;

    println!("Seed completed. Admin ID: {admin_id}, Customer ID: {customer_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(id)
}

async fn ensure_category(pool: &sqlx::PgPool, name: &str) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO categories (id, name)
        VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn seed_phones(pool: &sqlx::PgPool, category_id: Uuid) -> anyhow::Result<()> {
    for phone in PHONES {
        sqlx::query(
            r#"
            INSERT INTO phones (id, name, brand, model, price, stock, ram, storage, condition, category_id)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10
            WHERE NOT EXISTS (SELECT 1 FROM phones WHERE name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(phone.name)
        .bind(phone.brand)
        .bind(phone.model)
        .bind(Decimal::from_str(phone.price)?)
        .bind(phone.stock)
        .bind(phone.ram)
        .bind(phone.storage)
        .bind(phone.condition)
        .bind(category_id)
        .execute(pool)
        .await?;
    }

    println!("Seeded phones");
    Ok(())
}

async fn seed_accessories(pool: &sqlx::PgPool, category_id: Uuid) -> anyhow::Result<()> {
    for accessory in ACCESSORIES {
        sqlx::query(
            r#"
            INSERT INTO accessories (id, name, brand, accessory_type, price, stock, category_id)
            SELECT $1, $2, $3, $4, $5, $6, $7
            WHERE NOT EXISTS (SELECT 1 FROM accessories WHERE name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(accessory.name)
        .bind(accessory.brand)
        .bind(accessory.accessory_type)
        .bind(Decimal::from_str(accessory.price)?)
        .bind(accessory.stock)
        .bind(category_id)
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO accessory_compatible_phones (accessory_id, phone_id)
            SELECT a.id, p.id
            FROM accessories a, phones p
            WHERE a.name = $1 AND p.name = ANY($2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(accessory.name)
        .bind(accessory.fits.to_vec())
        .execute(pool)
        .await?;
    }

    println!("Seeded accessories");
    Ok(())
}
