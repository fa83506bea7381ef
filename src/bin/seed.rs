use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_delivery_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let owner_id = ensure_user(&pool, "demo_owner", "owner123", "owner").await?;
    let client_id = ensure_user(&pool, "demo_client", "client123", "client").await?;
    ensure_user(&pool, "demo_courier", "courier123", "courier").await?;

    let category_id = ensure_category(&pool, "Fast food").await?;
    let store_id = ensure_store(&pool, owner_id, category_id).await?;
    seed_products(&pool, store_id).await?;

    println!("Seed completed. Owner: {owner_id}, Client: {client_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    username: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (username) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(format!("{username}@example.com"))
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If the user already exists, fetch its id.
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE username = $1")
                .bind(username)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {username} (role={role})");
    Ok(user_id)
}

async fn ensure_category(pool: &sqlx::PgPool, name: &str) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM categories WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO categories (id, name) VALUES ($1, $2)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;
    println!("Seeded category {name}");
    Ok(id)
}

async fn ensure_store(
    pool: &sqlx::PgPool,
    owner_id: Uuid,
    category_id: Uuid,
) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM stores WHERE name = $1")
        .bind("Ferris Diner")
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO stores (id, name, image, category_id, description, address, owner_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind("Ferris Diner")
    .bind("store_images/ferris-diner.png")
    .bind(category_id)
    .bind("Burgers and seafood, delivered fast")
    .bind("12 Harbor St")
    .bind(owner_id)
    .execute(pool)
    .await?;
    println!("Seeded store Ferris Diner");
    Ok(id)
}

async fn seed_products(pool: &sqlx::PgPool, store_id: Uuid) -> anyhow::Result<()> {
    let products = vec![
        ("Crab Burger", "Signature burger", 450),
        ("Fish and Chips", "Classic portion", 380),
        ("Lobster Roll", "Seasonal", 720),
    ];

    for (name, desc, price) in products {
        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM products WHERE name = $1 AND store_id = $2")
                .bind(name)
                .bind(store_id)
                .fetch_optional(pool)
                .await?;
        if existing.is_some() {
            continue;
        }

        sqlx::query(
            r#"
            INSERT INTO products (id, name, image, description, price, store_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(format!("product_images/{}.png", name.to_lowercase().replace(' ', "-")))
        .bind(desc)
        .bind(price as i64)
        .bind(store_id)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
