//! Entity store: the handle request handlers read and write through, and its SQLite implementation.

use crate::error::AppError;
use crate::model::{
    Graph, NewRestaurantPizza, Pizza, Price, Restaurant, RestaurantPizza, RestaurantPizzaDetail,
};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::BTreeSet;

/// Store operations used by the handlers. Writes are transactional: they apply fully or not at all.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, AppError>;

    async fn get_restaurant(&self, id: i64) -> Result<Option<Restaurant>, AppError>;

    /// Delete a restaurant and its menu entries. `Ok(false)` when no such restaurant exists.
    async fn delete_restaurant(&self, id: i64) -> Result<bool, AppError>;

    async fn list_pizzas(&self) -> Result<Vec<Pizza>, AppError>;

    async fn get_pizza(&self, id: i64) -> Result<Option<Pizza>, AppError>;

    async fn list_restaurant_pizzas(&self) -> Result<Vec<RestaurantPizza>, AppError>;

    async fn get_restaurant_pizza(&self, id: i64) -> Result<Option<RestaurantPizza>, AppError>;

    async fn restaurant_pizzas_for_restaurant(&self, restaurant_id: i64) -> Result<Vec<RestaurantPizza>, AppError>;

    /// Insert a menu entry. Unknown restaurant or pizza ids fail with [`AppError::Operation`].
    async fn create_restaurant_pizza(&self, new: NewRestaurantPizza) -> Result<RestaurantPizzaDetail, AppError>;

    async fn ping(&self) -> Result<(), AppError>;

    /// Restaurant with its menu entries and their pizzas, or `None` if the restaurant does not exist.
    async fn restaurant_graph(&self, id: i64) -> Result<Option<Graph>, AppError> {
        let Some(restaurant) = self.get_restaurant(id).await? else {
            return Ok(None);
        };
        let mut graph = Graph::new();
        graph.insert_restaurant(restaurant);
        let entries = self.restaurant_pizzas_for_restaurant(id).await?;
        let pizza_ids: BTreeSet<i64> = entries.iter().map(|rp| rp.pizza_id).collect();
        for rp in entries {
            graph.insert_restaurant_pizza(rp);
        }
        for pizza_id in pizza_ids {
            if let Some(pizza) = self.get_pizza(pizza_id).await? {
                graph.insert_pizza(pizza);
            }
        }
        Ok(Some(graph))
    }
}

/// [`EntityStore`] over a SQLite pool. Cheap to clone.
#[derive(Clone)]
pub struct SqlEntityStore {
    pool: SqlitePool,
}

const RESTAURANT_PIZZA_COLUMNS: &str = "id, price, restaurant_id, pizza_id";

const MENU_WITH_PIZZAS: &str = "SELECT rp.id, rp.price, rp.restaurant_id, rp.pizza_id, \
     p.name AS pizza_name, p.ingredients AS pizza_ingredients \
     FROM restaurant_pizzas rp JOIN pizzas p ON p.id = rp.pizza_id \
     WHERE rp.restaurant_id = ? ORDER BY rp.id";

impl SqlEntityStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_restaurant(&self, name: &str, address: &str) -> Result<Restaurant, AppError> {
        let sql = "INSERT INTO restaurants (name, address) VALUES (?, ?) RETURNING id, name, address";
        tracing::debug!(sql = %sql, "query");
        let restaurant = sqlx::query_as::<_, Restaurant>(sql)
            .bind(name)
            .bind(address)
            .fetch_one(&self.pool)
            .await?;
        Ok(restaurant)
    }

    pub async fn insert_pizza(&self, name: &str, ingredients: &str) -> Result<Pizza, AppError> {
        let sql = "INSERT INTO pizzas (name, ingredients) VALUES (?, ?) RETURNING id, name, ingredients";
        tracing::debug!(sql = %sql, "query");
        let pizza = sqlx::query_as::<_, Pizza>(sql)
            .bind(name)
            .bind(ingredients)
            .fetch_one(&self.pool)
            .await?;
        Ok(pizza)
    }

    async fn fetch_restaurant(conn: &mut SqliteConnection, id: i64) -> Result<Option<Restaurant>, sqlx::Error> {
        sqlx::query_as::<_, Restaurant>("SELECT id, name, address FROM restaurants WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    async fn fetch_pizza(conn: &mut SqliteConnection, id: i64) -> Result<Option<Pizza>, sqlx::Error> {
        sqlx::query_as::<_, Pizza>("SELECT id, name, ingredients FROM pizzas WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    async fn query_restaurant_pizzas(&self, sql: &str, param: Option<i64>) -> Result<Vec<RestaurantPizza>, AppError> {
        tracing::debug!(sql = %sql, params = ?param, "query");
        let mut query = sqlx::query(sql);
        if let Some(p) = param {
            query = query.bind(p);
        }
        let rows = query.fetch_all(&self.pool).await?;
        let records = rows
            .iter()
            .map(restaurant_pizza_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

#[async_trait]
impl EntityStore for SqlEntityStore {
    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, AppError> {
        let sql = "SELECT id, name, address FROM restaurants ORDER BY id";
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Restaurant>(sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get_restaurant(&self, id: i64) -> Result<Option<Restaurant>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(Self::fetch_restaurant(&mut conn, id).await?)
    }

    async fn delete_restaurant(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        let entries = sqlx::query("DELETE FROM restaurant_pizzas WHERE restaurant_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM restaurants WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            // nothing committed; the dropped transaction rolls back
            return Ok(false);
        }
        tx.commit().await?;
        tracing::info!(
            restaurant_id = id,
            restaurant_pizzas = entries.rows_affected(),
            "deleted restaurant"
        );
        Ok(true)
    }

    async fn list_pizzas(&self) -> Result<Vec<Pizza>, AppError> {
        let sql = "SELECT id, name, ingredients FROM pizzas ORDER BY id";
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Pizza>(sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get_pizza(&self, id: i64) -> Result<Option<Pizza>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(Self::fetch_pizza(&mut conn, id).await?)
    }

    async fn list_restaurant_pizzas(&self) -> Result<Vec<RestaurantPizza>, AppError> {
        let sql = format!("SELECT {} FROM restaurant_pizzas ORDER BY id", RESTAURANT_PIZZA_COLUMNS);
        self.query_restaurant_pizzas(&sql, None).await
    }

    async fn get_restaurant_pizza(&self, id: i64) -> Result<Option<RestaurantPizza>, AppError> {
        let sql = format!("SELECT {} FROM restaurant_pizzas WHERE id = ?", RESTAURANT_PIZZA_COLUMNS);
        Ok(self.query_restaurant_pizzas(&sql, Some(id)).await?.into_iter().next())
    }

    async fn restaurant_pizzas_for_restaurant(&self, restaurant_id: i64) -> Result<Vec<RestaurantPizza>, AppError> {
        let sql = format!(
            "SELECT {} FROM restaurant_pizzas WHERE restaurant_id = ? ORDER BY id",
            RESTAURANT_PIZZA_COLUMNS
        );
        self.query_restaurant_pizzas(&sql, Some(restaurant_id)).await
    }

    async fn create_restaurant_pizza(&self, new: NewRestaurantPizza) -> Result<RestaurantPizzaDetail, AppError> {
        let sql = format!(
            "INSERT INTO restaurant_pizzas (price, restaurant_id, pizza_id) VALUES (?, ?, ?) RETURNING {}",
            RESTAURANT_PIZZA_COLUMNS
        );
        tracing::debug!(sql = %sql, params = ?new, "query (tx)");
        let mut tx = self.pool.begin().await.map_err(AppError::operation)?;

        let query = sqlx::query(&sql);
        let query = match new.price {
            Price::Whole(n) => query.bind(n),
            Price::Decimal(f) => query.bind(f),
        };
        let row = query
            .bind(new.restaurant_id)
            .bind(new.pizza_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::operation)?;
        let record = restaurant_pizza_from_row(&row).map_err(AppError::operation)?;

        let restaurant = Self::fetch_restaurant(&mut tx, new.restaurant_id)
            .await
            .map_err(AppError::operation)?
            .ok_or_else(|| AppError::Operation(format!("restaurant {} does not exist", new.restaurant_id)))?;
        let pizza = Self::fetch_pizza(&mut tx, new.pizza_id)
            .await
            .map_err(AppError::operation)?
            .ok_or_else(|| AppError::Operation(format!("pizza {} does not exist", new.pizza_id)))?;

        tx.commit().await.map_err(AppError::operation)?;
        tracing::info!(id = record.id, restaurant_id = record.restaurant_id, pizza_id = record.pizza_id, "created restaurant pizza");
        Ok(RestaurantPizzaDetail {
            record,
            restaurant,
            pizza,
        })
    }

    /// Reads the restaurant and its menu in one transaction, so the graph is a single snapshot.
    async fn restaurant_graph(&self, id: i64) -> Result<Option<Graph>, AppError> {
        let mut tx = self.pool.begin().await?;
        let Some(restaurant) = Self::fetch_restaurant(&mut tx, id).await? else {
            return Ok(None);
        };
        tracing::debug!(sql = %MENU_WITH_PIZZAS, params = ?id, "query (tx)");
        let rows = sqlx::query(MENU_WITH_PIZZAS)
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        let mut graph = Graph::new();
        graph.insert_restaurant(restaurant);
        for row in &rows {
            graph.insert_pizza(Pizza {
                id: row.try_get("pizza_id")?,
                name: row.try_get("pizza_name")?,
                ingredients: row.try_get("pizza_ingredients")?,
            });
            graph.insert_restaurant_pizza(restaurant_pizza_from_row(row)?);
        }
        Ok(Some(graph))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// `price` comes back as INTEGER for whole values and REAL otherwise (NUMERIC affinity).
fn restaurant_pizza_from_row(row: &SqliteRow) -> Result<RestaurantPizza, sqlx::Error> {
    let price = match row.try_get::<i64, _>("price") {
        Ok(n) => Price::Whole(n),
        Err(_) => Price::Decimal(row.try_get::<f64, _>("price")?),
    };
    Ok(RestaurantPizza {
        id: row.try_get("id")?,
        price,
        restaurant_id: row.try_get("restaurant_id")?,
        pizza_id: row.try_get("pizza_id")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{connect, ensure_tables};

    async fn setup_test() -> SqlEntityStore {
        let pool = connect("sqlite::memory:", 1).await.expect("Failed to open test database");
        ensure_tables(&pool).await.expect("Failed to create tables");
        SqlEntityStore::new(pool)
    }

    fn entry(price: Price, restaurant_id: i64, pizza_id: i64) -> NewRestaurantPizza {
        NewRestaurantPizza { price, restaurant_id, pizza_id }
    }

    #[tokio::test]
    async fn test_empty_lists() {
        let store = setup_test().await;
        assert!(store.list_restaurants().await.unwrap().is_empty());
        assert!(store.list_pizzas().await.unwrap().is_empty());
        assert!(store.list_restaurant_pizzas().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_returns_linked_records() {
        let store = setup_test().await;
        let restaurant = store.insert_restaurant("Sanjay's Pizza", "address2").await.unwrap();
        let pizza = store.insert_pizza("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni").await.unwrap();

        let detail = store
            .create_restaurant_pizza(entry(Price::Whole(12), restaurant.id, pizza.id))
            .await
            .unwrap();
        assert_eq!(detail.record.price, Price::Whole(12));
        assert_eq!(detail.restaurant, restaurant);
        assert_eq!(detail.pizza, pizza);

        let stored = store.get_restaurant_pizza(detail.record.id).await.unwrap();
        assert_eq!(stored, Some(detail.record));
    }

    #[tokio::test]
    async fn test_decimal_price_round_trips() {
        let store = setup_test().await;
        let restaurant = store.insert_restaurant("Kiki's Pizza", "address3").await.unwrap();
        let pizza = store.insert_pizza("Emma", "Dough, Tomato Sauce, Cheese").await.unwrap();

        let detail = store
            .create_restaurant_pizza(entry(Price::Decimal(7.25), restaurant.id, pizza.id))
            .await
            .unwrap();
        assert_eq!(detail.record.price, Price::Decimal(7.25));
    }

    #[tokio::test]
    async fn test_unknown_reference_leaves_nothing_behind() {
        let store = setup_test().await;
        let restaurant = store.insert_restaurant("Kiki's Pizza", "address3").await.unwrap();

        let err = store
            .create_restaurant_pizza(entry(Price::Whole(5), restaurant.id, 404))
            .await
            .unwrap_err();
        match err {
            AppError::Operation(message) => assert!(message.contains("FOREIGN KEY"), "{message}"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.list_restaurant_pizzas().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let store = setup_test().await;
        let keep = store.insert_restaurant("Karen's Pizza Shack", "address1").await.unwrap();
        let gone = store.insert_restaurant("Sanjay's Pizza", "address2").await.unwrap();
        let pizza = store.insert_pizza("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard").await.unwrap();

        let mut removed = Vec::new();
        for price in [3, 4, 5] {
            let detail = store
                .create_restaurant_pizza(entry(Price::Whole(price), gone.id, pizza.id))
                .await
                .unwrap();
            removed.push(detail.record.id);
        }
        let kept = store
            .create_restaurant_pizza(entry(Price::Whole(9), keep.id, pizza.id))
            .await
            .unwrap();

        assert!(store.delete_restaurant(gone.id).await.unwrap());
        assert_eq!(store.get_restaurant(gone.id).await.unwrap(), None);
        for id in removed {
            assert_eq!(store.get_restaurant_pizza(id).await.unwrap(), None);
        }
        assert_eq!(store.list_restaurant_pizzas().await.unwrap(), vec![kept.record]);
        assert!(!store.delete_restaurant(gone.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_restaurant_graph() {
        let store = setup_test().await;
        let restaurant = store.insert_restaurant("Karen's Pizza Shack", "address1").await.unwrap();
        let emma = store.insert_pizza("Emma", "Dough, Tomato Sauce, Cheese").await.unwrap();
        let geri = store.insert_pizza("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni").await.unwrap();
        for pizza in [&emma, &geri, &emma] {
            store
                .create_restaurant_pizza(entry(Price::Whole(10), restaurant.id, pizza.id))
                .await
                .unwrap();
        }

        let graph = store.restaurant_graph(restaurant.id).await.unwrap().unwrap();
        assert_eq!(graph.restaurant(restaurant.id), Some(&restaurant));
        assert_eq!(graph.pizza(emma.id), Some(&emma));
        assert_eq!(graph.pizza(geri.id), Some(&geri));
        assert!(store.restaurant_graph(restaurant.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restaurant_graph_holds_only_its_menu() {
        let store = setup_test().await;
        let karen = store.insert_restaurant("Karen's Pizza Shack", "address1").await.unwrap();
        let kiki = store.insert_restaurant("Kiki's Pizza", "address3").await.unwrap();
        let emma = store.insert_pizza("Emma", "Dough, Tomato Sauce, Cheese").await.unwrap();
        let melanie = store.insert_pizza("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard").await.unwrap();
        let first = store
            .create_restaurant_pizza(entry(Price::Whole(10), karen.id, emma.id))
            .await
            .unwrap();
        let second = store
            .create_restaurant_pizza(entry(Price::Decimal(8.5), karen.id, emma.id))
            .await
            .unwrap();
        let other = store
            .create_restaurant_pizza(entry(Price::Whole(12), kiki.id, melanie.id))
            .await
            .unwrap();

        let graph = store.restaurant_graph(karen.id).await.unwrap().unwrap();
        assert_eq!(graph.restaurant_pizza(first.record.id), Some(&first.record));
        assert_eq!(graph.restaurant_pizza(second.record.id), Some(&second.record));
        assert_eq!(graph.restaurant_pizza(other.record.id), None);
        assert_eq!(graph.pizza(emma.id), Some(&emma));
        assert_eq!(graph.pizza(melanie.id), None);
        assert_eq!(graph.restaurant(kiki.id), None);

        let empty = store.restaurant_graph(kiki.id + 1).await.unwrap();
        assert!(empty.is_none());
        let kiki_graph = store.restaurant_graph(kiki.id).await.unwrap().unwrap();
        assert_eq!(kiki_graph.pizza(melanie.id), Some(&melanie));
        assert_eq!(kiki_graph.restaurant_pizza(other.record.id), Some(&other.record));
    }
}
