//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::id::RecordId;
use crate::models::{DeleteOutcome, Food, FoodPatch, InsertOutcome, Order, Shelf, TopFood, UpdateOutcome};

/// Persistence contract for featured foods and both food shelves.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait FoodRepo: Send + Sync {
    /// Featured foods, highest `purchaseCount` first, at most `limit`.
    async fn top_foods(&self, limit: usize) -> anyhow::Result<Vec<TopFood>>;

    /// Every food on a shelf, in store order.
    async fn list_foods(&self, shelf: Shelf) -> anyhow::Result<Vec<Food>>;
    async fn get_food(&self, shelf: Shelf, id: RecordId) -> anyhow::Result<Option<Food>>;

    /// User-shelf foods whose `addedBy.email` equals `email`.
    async fn foods_added_by(&self, email: &str) -> anyhow::Result<Vec<Food>>;

    /// Inserts into the user shelf and returns the generated id.
    async fn insert_food(&self, food: Food) -> anyhow::Result<RecordId>;

    /// Applies `patch` to a user-shelf food, leaving other fields untouched.
    async fn update_food(&self, id: RecordId, patch: FoodPatch) -> anyhow::Result<UpdateOutcome>;
}

/// Persistence contract for purchase orders.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait OrderRepo: Send + Sync {
    async fn insert_order(&self, order: Order) -> anyhow::Result<InsertOutcome>;
    async fn orders_for_buyer(&self, email: &str) -> anyhow::Result<Vec<Order>>;

    /// Deleting an id that does not exist reports `deleted_count == 0`.
    async fn delete_order(&self, id: RecordId) -> anyhow::Result<DeleteOutcome>;
}
