//! SQLite connection bootstrap, table DDL and sample data.

use crate::error::AppError;
use crate::model::{NewRestaurantPizza, Price};
use crate::service::{EntityStore, SqlEntityStore, ValidationError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Open a pool, creating the database file if needed, with foreign keys enforced.
/// In-memory URLs get a single long-lived connection so every query sees the same database.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if database_url.contains(":memory:") || database_url.contains("mode=memory") {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }
    let pool = pool_options.connect_with(options).await?;
    Ok(pool)
}

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS restaurants (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        address TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pizzas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        ingredients TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS restaurant_pizzas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        price NUMERIC NOT NULL CHECK (price >= 1 AND price <= 30),
        restaurant_id INTEGER NOT NULL REFERENCES restaurants (id) ON DELETE CASCADE,
        pizza_id INTEGER NOT NULL REFERENCES pizzas (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS restaurant_pizzas_restaurant_id ON restaurant_pizzas (restaurant_id)",
    "CREATE INDEX IF NOT EXISTS restaurant_pizzas_pizza_id ON restaurant_pizzas (pizza_id)",
];

/// Create the three tables if they do not exist. Idempotent.
pub async fn ensure_tables(pool: &SqlitePool) -> Result<(), AppError> {
    for ddl in TABLES {
        tracing::debug!(sql = %ddl.trim(), "ddl");
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

const SAMPLE_RESTAURANTS: &[(&str, &str)] = &[
    ("Karen's Pizza Shack", "address1"),
    ("Sanjay's Pizza", "address2"),
    ("Kiki's Pizza", "address3"),
];

const SAMPLE_PIZZAS: &[(&str, &str)] = &[
    ("Emma", "Dough, Tomato Sauce, Cheese"),
    ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
    ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
];

const SAMPLE_PRICES: &[i64] = &[10, 12, 8];

/// Seed a few restaurants, pizzas and menu entries when the restaurants table is empty.
/// Returns whether anything was inserted.
pub async fn seed_sample_data(store: &SqlEntityStore) -> Result<bool, AppError> {
    if !store.list_restaurants().await?.is_empty() {
        return Ok(false);
    }
    let mut restaurants = Vec::with_capacity(SAMPLE_RESTAURANTS.len());
    for (name, address) in SAMPLE_RESTAURANTS {
        restaurants.push(store.insert_restaurant(name, address).await?);
    }
    let mut pizzas = Vec::with_capacity(SAMPLE_PIZZAS.len());
    for (name, ingredients) in SAMPLE_PIZZAS {
        pizzas.push(store.insert_pizza(name, ingredients).await?);
    }
    for ((restaurant, pizza), price) in restaurants.iter().zip(&pizzas).zip(SAMPLE_PRICES) {
        store
            .create_restaurant_pizza(NewRestaurantPizza {
                price: Price::whole(*price).map_err(ValidationError::from)?,
                restaurant_id: restaurant.id,
                pizza_id: pizza.id,
            })
            .await?;
    }
    tracing::info!(
        restaurants = restaurants.len(),
        pizzas = pizzas.len(),
        "seeded sample data"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_tables_is_idempotent() {
        let pool = connect("sqlite::memory:", 5).await.unwrap();
        ensure_tables(&pool).await.unwrap();
        ensure_tables(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_check_constraint_rejects_out_of_range_price() {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        ensure_tables(&pool).await.unwrap();
        let store = SqlEntityStore::new(pool.clone());
        let restaurant = store.insert_restaurant("Kiki's Pizza", "address3").await.unwrap();
        let pizza = store.insert_pizza("Emma", "Dough, Tomato Sauce, Cheese").await.unwrap();

        let result = sqlx::query("INSERT INTO restaurant_pizzas (price, restaurant_id, pizza_id) VALUES (?, ?, ?)")
            .bind(31)
            .bind(restaurant.id)
            .bind(pizza.id)
            .execute(&pool)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_seed_only_once() {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        ensure_tables(&pool).await.unwrap();
        let store = SqlEntityStore::new(pool);

        assert!(seed_sample_data(&store).await.unwrap());
        assert!(!seed_sample_data(&store).await.unwrap());
        assert_eq!(store.list_restaurants().await.unwrap().len(), SAMPLE_RESTAURANTS.len());
        assert_eq!(store.list_pizzas().await.unwrap().len(), SAMPLE_PIZZAS.len());
        assert_eq!(store.list_restaurant_pizzas().await.unwrap().len(), 3);
    }
}
