//! # foodify-db-memory
//!
//! In-process implementation of `FoodRepo` and `OrderRepo`.
//! Nothing survives a restart. Useful for running the storefront locally
//! without a database, and as a stateful test double.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use foodify_core::catalog::rank_top_foods;
use foodify_core::id::RecordId;
use foodify_core::models::{
    DeleteOutcome, Fields, Food, FoodPatch, InsertOutcome, Order, Shelf, TopFood, UpdateOutcome,
};
use foodify_core::traits::{FoodRepo, OrderRepo};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

/// Initial contents, in the same shape as a JSON export of the four collections.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    #[serde(default)]
    pub top_foods: Vec<TopFood>,
    #[serde(default)]
    pub all_foods: Vec<Food>,
    #[serde(default)]
    pub added: Vec<Food>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

#[derive(Debug, Default)]
struct Collections {
    top_foods: Vec<TopFood>,
    admin_foods: Vec<Food>,
    user_foods: Vec<Food>,
    orders: Vec<Order>,
}

impl Collections {
    fn shelf(&self, shelf: Shelf) -> &Vec<Food> {
        match shelf {
            Shelf::Admin => &self.admin_foods,
            Shelf::User => &self.user_foods,
        }
    }
}

/// Cloning shares the underlying collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records without an `_id` get a fresh one.
    pub fn from_seed(seed: Seed) -> Self {
        let with_ids = |foods: Vec<Food>| -> Vec<Food> {
            foods
                .into_iter()
                .map(|mut food| {
                    food.id.get_or_insert_with(RecordId::new);
                    food
                })
                .collect()
        };
        let orders = seed
            .orders
            .into_iter()
            .map(|mut order| {
                order.0.entry("_id").or_insert_with(fresh_order_id);
                order
            })
            .collect();

        let collections = Collections {
            top_foods: seed.top_foods,
            admin_foods: with_ids(seed.all_foods),
            user_foods: with_ids(seed.added),
            orders,
        };
        Self { inner: Arc::new(RwLock::new(collections)) }
    }

    /// Reads a JSON seed file (see [`Seed`]).
    pub async fn load_seed(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = tokio::fs::read(path.as_ref()).await?;
        let seed: Seed = serde_json::from_slice(&raw)?;
        log::info!(
            "Seeded in-memory store: {} top, {} admin, {} user foods, {} orders",
            seed.top_foods.len(),
            seed.all_foods.len(),
            seed.added.len(),
            seed.orders.len()
        );
        Ok(Self::from_seed(seed))
    }
}

#[async_trait]
impl FoodRepo for MemoryStore {
    async fn top_foods(&self, limit: usize) -> anyhow::Result<Vec<TopFood>> {
        let data = self.inner.read().await;
        Ok(rank_top_foods(data.top_foods.clone(), limit))
    }

    async fn list_foods(&self, shelf: Shelf) -> anyhow::Result<Vec<Food>> {
        Ok(self.inner.read().await.shelf(shelf).clone())
    }

    async fn get_food(&self, shelf: Shelf, id: RecordId) -> anyhow::Result<Option<Food>> {
        let data = self.inner.read().await;
        Ok(data.shelf(shelf).iter().find(|f| f.id == Some(id)).cloned())
    }

    async fn foods_added_by(&self, email: &str) -> anyhow::Result<Vec<Food>> {
        let data = self.inner.read().await;
        Ok(data
            .user_foods
            .iter()
            .filter(|f| f.owner_email() == Some(email))
            .cloned()
            .collect())
    }

    async fn insert_food(&self, mut food: Food) -> anyhow::Result<RecordId> {
        let id = *food.id.get_or_insert_with(RecordId::new);
        let mut data = self.inner.write().await;
        if data.user_foods.iter().any(|f| f.id == Some(id)) {
            anyhow::bail!("duplicate key: {id}");
        }
        data.user_foods.push(food);
        Ok(id)
    }

    async fn update_food(&self, id: RecordId, patch: FoodPatch) -> anyhow::Result<UpdateOutcome> {
        let mut data = self.inner.write().await;
        let Some(food) = data.user_foods.iter_mut().find(|f| f.id == Some(id)) else {
            return Ok(UpdateOutcome::default());
        };

        let Value::Object(mut doc) = serde_json::to_value(&*food)? else {
            anyhow::bail!("food {id} did not serialize to an object");
        };
        for (path, value) in patch.into_fields() {
            set_path(&mut doc, &path, value);
        }
        let updated: Food = serde_json::from_value(Value::Object(doc))?;

        let modified = updated != *food;
        *food = updated;
        Ok(UpdateOutcome { matched_count: 1, modified_count: u64::from(modified) })
    }
}

#[async_trait]
impl OrderRepo for MemoryStore {
    async fn insert_order(&self, mut order: Order) -> anyhow::Result<InsertOutcome> {
        let id = order.0.entry("_id").or_insert_with(fresh_order_id).clone();
        let mut data = self.inner.write().await;
        if data.orders.iter().any(|o| o.id() == Some(&id)) {
            anyhow::bail!("duplicate key: {id}");
        }
        data.orders.push(order);
        Ok(InsertOutcome { acknowledged: true, inserted_id: id })
    }

    async fn orders_for_buyer(&self, email: &str) -> anyhow::Result<Vec<Order>> {
        let data = self.inner.read().await;
        Ok(data
            .orders
            .iter()
            .filter(|o| o.buyer_email() == Some(email))
            .cloned()
            .collect())
    }

    async fn delete_order(&self, id: RecordId) -> anyhow::Result<DeleteOutcome> {
        let mut data = self.inner.write().await;
        let before = data.orders.len();
        let id = Value::String(id.to_hex());
        data.orders.retain(|o| o.id() != Some(&id));
        let deleted_count = (before - data.orders.len()) as u64;
        Ok(DeleteOutcome { acknowledged: true, deleted_count })
    }
}

/// Generated order ids are stored in their hex form.
fn fresh_order_id() -> Value {
    Value::String(RecordId::new().to_hex())
}

/// `$set`-style assignment: dotted paths create intermediate objects.
fn set_path(target: &mut Fields, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = target.entry(head).or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                set_path(map, rest, value);
            }
        }
    }
}
