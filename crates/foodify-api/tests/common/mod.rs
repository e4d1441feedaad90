use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{test, web, App};
use foodify_api::{configure_routes, AppState};
use foodify_core::traits::{FoodRepo, MockFoodRepo, MockOrderRepo, OrderRepo};
use foodify_db_memory::{MemoryStore, Seed};
use serde_json::Value;

pub fn memory_state(store: &MemoryStore) -> web::Data<AppState> {
    state(store.clone(), store.clone())
}

pub fn state(foods: impl FoodRepo + 'static, orders: impl OrderRepo + 'static) -> web::Data<AppState> {
    web::Data::new(AppState {
        foods: Box::new(foods),
        orders: Box::new(orders),
    })
}

/// Mocks with no expectations: any store call panics the test.
pub fn untouchable_state() -> web::Data<AppState> {
    let mut foods = MockFoodRepo::new();
    foods.expect_get_food().never();
    foods.expect_foods_added_by().never();
    foods.expect_update_food().never();
    foods.expect_insert_food().never();
    let mut orders = MockOrderRepo::new();
    orders.expect_delete_order().never();
    orders.expect_orders_for_buyer().never();
    state(foods, orders)
}

// Order tests never seed.
#[allow(dead_code)]
pub fn seeded(seed: Value) -> MemoryStore {
    let seed: Seed = serde_json::from_value(seed).expect("valid seed");
    MemoryStore::from_seed(seed)
}

pub fn app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).configure(configure_routes)
}

pub async fn read_json(resp: ServiceResponse) -> Value {
    test::read_body_json(resp).await
}
