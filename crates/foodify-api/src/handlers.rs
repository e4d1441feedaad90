//! # foodify-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.
//! Each handler validates its input first, then makes its store call(s).
//! Store failures are logged here and answered with a generic 500.

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use foodify_core::catalog::{merge_catalog, TOP_FOODS_LIMIT};
use foodify_core::error::AppError;
use foodify_core::id::RecordId;
use foodify_core::models::{Fields, FoodPatch, NewFood, Order, Shelf};
use foodify_core::traits::{FoodRepo, OrderRepo};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{store_failure, ApiResult};

pub const BANNER: &str = "🍽️ Foodify server is ready";

const SERVER_ERROR: &str = "Server error";

/// State shared across all Actix-web workers.
pub struct AppState {
    pub foods: Box<dyn FoodRepo>,
    pub orders: Box<dyn OrderRepo>,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    email: Option<String>,
}

impl EmailQuery {
    /// Empty counts as absent.
    fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }

    fn require(&self, missing: &str) -> Result<&str, AppError> {
        self.email()
            .ok_or_else(|| AppError::ValidationError(missing.to_string()))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateReply {
    message: &'static str,
    modified_count: u64,
}

fn parse_id(raw: &str, invalid: &str) -> Result<RecordId, AppError> {
    raw.parse()
        .map_err(|_| AppError::ValidationError(invalid.to_string()))
}

/// Liveness banner for "/"
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(BANNER)
}

/// Featured foods, best sellers first.
pub async fn top_foods(data: web::Data<AppState>) -> ApiResult {
    let foods = data
        .foods
        .top_foods(TOP_FOODS_LIMIT)
        .await
        .map_err(store_failure("Failed to fetch top foods", SERVER_ERROR))?;
    Ok(HttpResponse::Ok().json(foods))
}

/// Admin and user shelves fetched concurrently; either failure fails the request.
pub async fn all_foods(data: web::Data<AppState>) -> ApiResult {
    let (admin, user) = futures_util::try_join!(
        data.foods.list_foods(Shelf::Admin),
        data.foods.list_foods(Shelf::User),
    )
    .map_err(store_failure("Error fetching combined foods", SERVER_ERROR))?;

    log::info!("📦 Admin: {} | User: {}", admin.len(), user.len());
    Ok(HttpResponse::Ok().json(merge_catalog(admin, user)))
}

async fn fetch_food(data: &AppState, shelf: Shelf, raw_id: &str, invalid: &str) -> ApiResult {
    let id = parse_id(raw_id, invalid)?;
    let food = data
        .foods
        .get_food(shelf, id)
        .await
        .map_err(store_failure("Error fetching food by ID", SERVER_ERROR))?
        .ok_or_else(|| AppError::NotFound("Food".into(), id.to_string()))?;
    Ok(HttpResponse::Ok().json(food))
}

/// GET /api/all-foods/{id}
pub async fn admin_food(data: web::Data<AppState>, path: web::Path<String>) -> ApiResult {
    fetch_food(&data, Shelf::Admin, &path, "Invalid ID format").await
}

/// GET /api/foods/{id}
pub async fn user_food(data: web::Data<AppState>, path: web::Path<String>) -> ApiResult {
    fetch_food(&data, Shelf::User, &path, "Invalid food ID").await
}

/// Foods a user listed, looked up by `addedBy.email`.
pub async fn my_foods(data: web::Data<AppState>, query: web::Query<EmailQuery>) -> ApiResult {
    let email = query.require("Missing user email")?;
    let foods = data
        .foods
        .foods_added_by(email)
        .await
        .map_err(store_failure("Error fetching user's foods", SERVER_ERROR))?;
    Ok(HttpResponse::Ok().json(foods))
}

/// Adds a listing to the user shelf. `createdAt` is always the server clock.
pub async fn add_food(data: web::Data<AppState>, body: web::Json<Value>) -> ApiResult {
    let new_food = NewFood::from_payload(body.into_inner())?;
    log::info!("📦 Received food {:?} from {}", new_food.name, new_food.added_by.email);

    let inserted_id = data
        .foods
        .insert_food(new_food.into_food(Utc::now()))
        .await
        .map_err(store_failure("Error adding food", "Failed to add food item"))?;

    log::info!("✅ Inserted food {inserted_id}");
    Ok(HttpResponse::Created().json(json!({ "insertedId": inserted_id })))
}

/// Owner-only partial update of a user listing.
///
/// Order matters: read the stored food, check the caller's email against
/// `addedBy.email`, check the patch leaves `name` and `addedBy.email` intact,
/// and only then write.
pub async fn update_food(
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<EmailQuery>,
    body: web::Json<Fields>,
) -> ApiResult {
    let id = parse_id(&path, "Invalid food ID")?;

    let existing = data
        .foods
        .get_food(Shelf::User, id)
        .await
        .map_err(store_failure("Error updating food", SERVER_ERROR))?
        .ok_or_else(|| AppError::NotFound("Food".into(), id.to_string()))?;

    if !existing.is_owned_by(query.email()) {
        return Err(AppError::Forbidden("Not authorized to update this food".into()).into());
    }

    let patch = FoodPatch::from_fields(body.into_inner())?;
    let modified_count = if patch.is_empty() {
        0
    } else {
        data.foods
            .update_food(id, patch)
            .await
            .map_err(store_failure("Error updating food", SERVER_ERROR))?
            .modified_count
    };

    Ok(HttpResponse::Ok().json(UpdateReply {
        message: "Food updated successfully",
        modified_count,
    }))
}

/// Records any JSON object exactly as sent; answers with the raw insert result.
pub async fn purchase(data: web::Data<AppState>, body: web::Json<Order>) -> ApiResult {
    let outcome = data
        .orders
        .insert_order(body.into_inner())
        .await
        .map_err(store_failure("Failed to save purchase", "Purchase failed"))?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Orders placed by `buyerEmail`.
pub async fn my_orders(data: web::Data<AppState>, query: web::Query<EmailQuery>) -> ApiResult {
    let email = query.require("Missing buyer email")?;
    let orders = data
        .orders
        .orders_for_buyer(email)
        .await
        .map_err(store_failure("Error fetching orders", SERVER_ERROR))?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Deletes an order. A second delete of the same id reports `deletedCount: 0`.
pub async fn delete_order(data: web::Data<AppState>, path: web::Path<String>) -> ApiResult {
    let id = parse_id(&path, "Invalid order ID")?;
    let outcome = data
        .orders
        .delete_order(id)
        .await
        .map_err(store_failure("Error deleting order", "Delete failed"))?;
    Ok(HttpResponse::Ok().json(outcome))
}
