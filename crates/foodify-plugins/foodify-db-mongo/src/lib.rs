//! # foodify-db-mongo Implementation
//!
//! This module implements `FoodRepo` and `OrderRepo` on top of a MongoDB
//! database. Documents are mapped to `foodify-core` models in `convert`.

mod convert;

use async_trait::async_trait;
use foodify_core::id::RecordId;
use foodify_core::models::{
    DeleteOutcome, Food, FoodPatch, InsertOutcome, Order, Shelf, TopFood, UpdateOutcome,
};
use foodify_core::traits::{FoodRepo, OrderRepo};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection};

use convert::{decode, encode_food, encode_order, id_filter, record_id, set_update, to_json};

pub const TOP_FOODS: &str = "Top-foods";
pub const ADMIN_FOODS: &str = "all-Foods";
pub const USER_FOODS: &str = "added";
pub const ORDERS: &str = "Orders";

/// Shared handle to the store. Cloning reuses the same connection pool.
#[derive(Clone, Debug)]
pub struct MongoStore {
    /// `Err` holds the reason the client could not be built; every
    /// operation then fails instead of the process exiting.
    client: Result<Client, String>,
    db_name: String,
}

impl MongoStore {
    /// Builds the client with Stable API v1 (strict, deprecation errors on).
    ///
    /// Never fails: a bad URI or an unresolvable SRV record is logged and the
    /// store answers every call with an error.
    pub async fn connect(uri: &str, db_name: &str) -> Self {
        let client = match build_client(uri).await {
            Ok(client) => Ok(client),
            Err(err) => {
                log::error!("❌ MongoDB connection error: {err:#}");
                Err(err.to_string())
            }
        };
        Self { client, db_name: db_name.to_string() }
    }

    /// Round-trips a `ping` against the `admin` database.
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.client()?.database("admin").run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    fn client(&self) -> anyhow::Result<&Client> {
        self.client
            .as_ref()
            .map_err(|reason| anyhow::anyhow!("store unavailable: {reason}"))
    }

    fn collection(&self, name: &str) -> anyhow::Result<Collection<Document>> {
        Ok(self.client()?.database(&self.db_name).collection(name))
    }

    fn shelf(&self, shelf: Shelf) -> anyhow::Result<Collection<Document>> {
        self.collection(match shelf {
            Shelf::Admin => ADMIN_FOODS,
            Shelf::User => USER_FOODS,
        })
    }
}

async fn build_client(uri: &str) -> anyhow::Result<Client> {
    let mut options = ClientOptions::parse(uri).await?;
    options.server_api = Some(
        ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build(),
    );
    Ok(Client::with_options(options)?)
}

async fn find_all<T: serde::de::DeserializeOwned>(
    collection: &Collection<Document>,
    filter: Document,
) -> anyhow::Result<Vec<T>> {
    let docs: Vec<Document> = collection.find(filter).await?.try_collect().await?;
    docs.into_iter().map(decode).collect()
}

#[async_trait]
impl FoodRepo for MongoStore {
    async fn top_foods(&self, limit: usize) -> anyhow::Result<Vec<TopFood>> {
        let docs: Vec<Document> = self
            .collection(TOP_FOODS)?
            .find(doc! {})
            .sort(doc! { "purchaseCount": -1 })
            .limit(i64::try_from(limit)?)
            .await?
            .try_collect()
            .await?;
        docs.into_iter().map(decode).collect()
    }

    async fn list_foods(&self, shelf: Shelf) -> anyhow::Result<Vec<Food>> {
        find_all(&self.shelf(shelf)?, doc! {}).await
    }

    async fn get_food(&self, shelf: Shelf, id: RecordId) -> anyhow::Result<Option<Food>> {
        match self.shelf(shelf)?.find_one(id_filter(id)).await? {
            Some(doc) => Ok(Some(decode(doc)?)),
            None => Ok(None),
        }
    }

    async fn foods_added_by(&self, email: &str) -> anyhow::Result<Vec<Food>> {
        find_all(&self.shelf(Shelf::User)?, doc! { "addedBy.email": email }).await
    }

    async fn insert_food(&self, food: Food) -> anyhow::Result<RecordId> {
        let result = self.shelf(Shelf::User)?.insert_one(encode_food(&food)?).await?;
        record_id(&result.inserted_id)
    }

    /// `$set` keeps every field the patch does not name.
    async fn update_food(&self, id: RecordId, patch: FoodPatch) -> anyhow::Result<UpdateOutcome> {
        let result = self
            .shelf(Shelf::User)?
            .update_one(id_filter(id), set_update(&patch)?)
            .await?;
        Ok(UpdateOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }
}

#[async_trait]
impl OrderRepo for MongoStore {
    async fn insert_order(&self, order: Order) -> anyhow::Result<InsertOutcome> {
        let result = self.collection(ORDERS)?.insert_one(encode_order(&order)?).await?;
        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id: to_json(result.inserted_id),
        })
    }

    async fn orders_for_buyer(&self, email: &str) -> anyhow::Result<Vec<Order>> {
        find_all(&self.collection(ORDERS)?, doc! { "buyerEmail": email }).await
    }

    async fn delete_order(&self, id: RecordId) -> anyhow::Result<DeleteOutcome> {
        let result = self.collection(ORDERS)?.delete_one(id_filter(id)).await?;
        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }
}
