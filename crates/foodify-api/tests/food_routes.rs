//! HTTP behaviour of the food routes.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{DateTime, Utc};
use foodify_core::id::RecordId;
use foodify_core::models::{Food, NewFood, Shelf};
use foodify_core::traits::{FoodRepo, MockFoodRepo, MockOrderRepo};
use foodify_db_memory::MemoryStore;
use mockall::predicate::eq;
use serde_json::{json, Value};

use common::{app, memory_state, read_json, seeded, state, untouchable_state};

const FOOD_ID: &str = "64b7f0c2a1d3e4f5a6b7c8d9";

fn owned_food(email: &str) -> Food {
    let mut food = NewFood::from_payload(json!({ "name": "Pizza", "addedBy": { "email": email }, "price": 10 }))
        .unwrap()
        .into_food(Utc::now());
    food.id = Some(FOOD_ID.parse().unwrap());
    food
}

async fn post_food(store: &MemoryStore, body: Value) -> (StatusCode, Value) {
    let app = test::init_service(app(memory_state(store))).await;
    let req = test::TestRequest::post().uri("/api/foods").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    (status, read_json(resp).await)
}

#[actix_web::test]
async fn test_root_banner() {
    let app = test::init_service(app(untouchable_state())).await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body, foodify_api::handlers::BANNER.as_bytes());
}

#[actix_web::test]
async fn test_top_foods_capped_and_sorted() {
    let top: Vec<Value> = [4, 18, 9, 30, 1, 22, 15, 7]
        .iter()
        .enumerate()
        .map(|(i, count)| json!({ "_id": format!("{:024x}", i + 1), "name": format!("Dish {i}"), "purchaseCount": count }))
        .collect();
    let store = seeded(json!({ "topFoods": top }));
    let app = test::init_service(app(memory_state(&store))).await;

    let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/top-foods").to_request()).await;
    let counts: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["purchaseCount"].as_i64().unwrap())
        .collect();
    assert_eq!(counts, [30, 22, 18, 15, 9, 7]);
}

#[actix_web::test]
async fn test_top_foods_store_failure_is_generic_500() {
    let mut foods = MockFoodRepo::new();
    foods
        .expect_top_foods()
        .with(eq(6))
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("connection reset by peer")));
    let app = test::init_service(app(state(foods, MockOrderRepo::new()))).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/top-foods").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(resp).await, json!({ "message": "Server error" }));
}

#[actix_web::test]
async fn test_all_foods_lists_admin_shelf_first() {
    let store = seeded(json!({
        "allFoods": [{ "name": "A1" }, { "name": "A2" }],
        "added": [{ "name": "U1", "addedBy": { "email": "u@x.io" } }]
    }));
    let app = test::init_service(app(memory_state(&store))).await;

    let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/all-foods").to_request()).await;
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|f| f["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["A1", "A2", "U1"]);
}

#[actix_web::test]
async fn test_all_foods_fails_when_one_shelf_fails() {
    let mut foods = MockFoodRepo::new();
    foods
        .expect_list_foods()
        .with(eq(Shelf::Admin))
        .returning(|_| Ok(vec![owned_food("a@b.com")]));
    foods
        .expect_list_foods()
        .with(eq(Shelf::User))
        .returning(|_| Err(anyhow::anyhow!("cursor killed")));
    let app = test::init_service(app(state(foods, MockOrderRepo::new()))).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/all-foods").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(resp).await["message"], "Server error");
}

#[actix_web::test]
async fn test_malformed_ids_never_reach_the_store() {
    let app = test::init_service(app(untouchable_state())).await;
    let cases = [
        (test::TestRequest::get().uri("/api/all-foods/not-an-id"), "Invalid ID format"),
        (test::TestRequest::get().uri("/api/foods/123"), "Invalid food ID"),
        (test::TestRequest::delete().uri("/api/my-orders/zzzzzzzzzzzzzzzzzzzzzzzz"), "Invalid order ID"),
        (
            test::TestRequest::put()
                .uri("/api/update-food/64b7f0c2a1d3e4f5a6b7c8d?email=a@b.com")
                .set_json(json!({ "price": 1 })),
            "Invalid food ID",
        ),
    ];

    for (req, message) in cases {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(resp).await, json!({ "message": message }));
    }
}

#[actix_web::test]
async fn test_unknown_id_is_404() {
    let store = MemoryStore::new();
    let app = test::init_service(app(memory_state(&store))).await;

    for uri in [format!("/api/all-foods/{FOOD_ID}"), format!("/api/foods/{FOOD_ID}")] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(resp).await, json!({ "message": "Food not found" }));
    }
}

#[actix_web::test]
async fn test_admin_food_by_id() {
    let store = seeded(json!({ "allFoods": [{ "_id": FOOD_ID, "name": "Biryani", "price": 14 }] }));
    let app = test::init_service(app(memory_state(&store))).await;

    let uri = format!("/api/all-foods/{FOOD_ID}");
    let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(body, json!({ "_id": FOOD_ID, "name": "Biryani", "price": 14 }));
}

#[actix_web::test]
async fn test_my_foods_requires_email() {
    let app = test::init_service(app(untouchable_state())).await;

    for uri in ["/api/my-foods", "/api/my-foods?email="] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(resp).await, json!({ "message": "Missing user email" }));
    }
}

#[actix_web::test]
async fn test_my_foods_filters_by_owner() {
    let store = seeded(json!({
        "added": [
            { "name": "Pho", "addedBy": { "email": "a@b.com" } },
            { "name": "Tacos", "addedBy": { "email": "c@d.com" } }
        ]
    }));
    let app = test::init_service(app(memory_state(&store))).await;

    let req = test::TestRequest::get().uri("/api/my-foods?email=a@b.com").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Pho");

    let req = test::TestRequest::get().uri("/api/my-foods?email=nobody@x.io").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn test_added_food_round_trips_with_server_timestamp() {
    let store = MemoryStore::new();
    let before = Utc::now();

    let (status, body) = post_food(
        &store,
        json!({ "name": "Pizza", "addedBy": { "email": "a@b.com" }, "createdAt": "2001-01-01T00:00:00Z" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["insertedId"].as_str().expect("insertedId").to_string();

    let app = test::init_service(app(memory_state(&store))).await;
    let uri = format!("/api/foods/{id}");
    let food: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri(&uri).to_request()).await;

    assert_eq!(food["_id"], id.as_str());
    assert_eq!(food["name"], "Pizza");
    assert_eq!(food["addedBy"]["email"], "a@b.com");
    let created_at: DateTime<Utc> = food["createdAt"].as_str().unwrap().parse().unwrap();
    assert!(created_at >= before);
}

#[actix_web::test]
async fn test_add_food_rejects_incomplete_listing() {
    let store = MemoryStore::new();
    for body in [json!({}), json!({ "name": "Pizza" }), json!({ "addedBy": { "email": "a@b.com" } })] {
        let (status, reply) = post_food(&store, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply, json!({ "message": "Missing required food data" }));
    }
    assert!(store.list_foods(Shelf::User).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_unparseable_body_is_400_json() {
    let app = test::init_service(app(untouchable_state())).await;
    let req = test::TestRequest::post()
        .uri("/api/foods")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ name: Pizza")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(resp).await, json!({ "message": "Invalid JSON body" }));
}

#[actix_web::test]
async fn test_owner_can_update_food() {
    let store = MemoryStore::new();
    let id = store.insert_food(owned_food("a@b.com")).await.unwrap();
    let app = test::init_service(app(memory_state(&store))).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/update-food/{id}?email=a@b.com"))
        .set_json(json!({ "price": 15, "createdAt": "1999-01-01T00:00:00Z" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "message": "Food updated successfully", "modifiedCount": 1 }));

    let food = store.get_food(Shelf::User, id).await.unwrap().unwrap();
    assert_eq!(food.details["price"], json!(15));
    assert_eq!(food.name(), Some("Pizza"));
    assert!(food.created_at.unwrap() > "2000-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
}

#[actix_web::test]
async fn test_non_owner_gets_403_and_food_is_unchanged() {
    let store = MemoryStore::new();
    let id = store.insert_food(owned_food("a@b.com")).await.unwrap();
    let before = store.get_food(Shelf::User, id).await.unwrap();
    let app = test::init_service(app(memory_state(&store))).await;

    for uri in [
        format!("/api/update-food/{id}?email=intruder@x.io"),
        format!("/api/update-food/{id}"),
    ] {
        let req = test::TestRequest::put().uri(&uri).set_json(json!({ "price": 0 })).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(read_json(resp).await, json!({ "message": "Not authorized to update this food" }));
    }

    assert_eq!(store.get_food(Shelf::User, id).await.unwrap(), before);
}

#[actix_web::test]
async fn test_update_missing_food_is_404() {
    let app = test::init_service(app(memory_state(&MemoryStore::new()))).await;
    let req = test::TestRequest::put()
        .uri(&format!("/api/update-food/{FOOD_ID}?email=a@b.com"))
        .set_json(json!({ "price": 1 }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(resp).await["message"], "Food not found");
}

#[actix_web::test]
async fn test_empty_patch_skips_the_write() {
    let mut foods = MockFoodRepo::new();
    foods
        .expect_get_food()
        .with(eq(Shelf::User), eq(FOOD_ID.parse::<RecordId>().unwrap()))
        .times(1)
        .returning(|_, _| Ok(Some(owned_food("a@b.com"))));
    foods.expect_update_food().never();
    let app = test::init_service(app(state(foods, MockOrderRepo::new()))).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/update-food/{FOOD_ID}?email=a@b.com"))
        .set_json(json!({ "_id": "000000000000000000000000" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["modifiedCount"], 0);
}

#[actix_web::test]
async fn test_update_store_failure_is_500() {
    let mut foods = MockFoodRepo::new();
    foods
        .expect_get_food()
        .returning(|_, _| Ok(Some(owned_food("a@b.com"))));
    foods
        .expect_update_food()
        .times(1)
        .returning(|_, _| Err(anyhow::anyhow!("write concern timeout")));
    let app = test::init_service(app(state(foods, MockOrderRepo::new()))).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/update-food/{FOOD_ID}?email=a@b.com"))
        .set_json(json!({ "price": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(resp).await, json!({ "message": "Server error" }));
}

#[actix_web::test]
async fn test_update_cannot_break_the_listing_shape() {
    let store = MemoryStore::new();
    let id = store.insert_food(owned_food("a@b.com")).await.unwrap();
    let before = store.get_food(Shelf::User, id).await.unwrap();
    let app = test::init_service(app(memory_state(&store))).await;

    let bodies = [
        json!({ "name": 7 }),
        json!({ "name": "" }),
        json!({ "addedBy": { "name": "Bob" } }),
        json!({ "addedBy.email": null }),
        json!({ "price": 20, "name.first": "Piz" }),
    ];
    for body in bodies {
        let req = test::TestRequest::put()
            .uri(&format!("/api/update-food/{id}?email=a@b.com"))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(read_json(resp).await, json!({ "message": "Missing required food data" }));
    }
    assert_eq!(store.get_food(Shelf::User, id).await.unwrap(), before);

    let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/all-foods").to_request()).await;
    assert_eq!(body[0]["name"], "Pizza");
}

#[actix_web::test]
async fn test_owner_can_rename_and_hand_over_a_listing() {
    let store = MemoryStore::new();
    let id = store.insert_food(owned_food("a@b.com")).await.unwrap();
    let app = test::init_service(app(memory_state(&store))).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/update-food/{id}?email=a@b.com"))
        .set_json(json!({ "name": "Calzone", "addedBy": { "email": "c@d.com", "name": "Cy" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["modifiedCount"], 1);

    let food = store.get_food(Shelf::User, id).await.unwrap().unwrap();
    assert_eq!(food.name(), Some("Calzone"));
    assert!(food.is_owned_by(Some("c@d.com")));
}

#[actix_web::test]
async fn test_listing_tolerates_foreign_admin_documents() {
    let store = seeded(json!({
        "allFoods": [{ "price": 3 }, { "name": 9, "addedBy": "kitchen" }],
        "added": [{ "name": "U1", "addedBy": { "email": "u@x.io" } }]
    }));
    let app = test::init_service(app(memory_state(&store))).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/all-foods").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[1]["name"], 9);
}

#[actix_web::test]
async fn test_bad_query_string_is_json_error() {
    let app = test::init_service(app(untouchable_state())).await;
    let cases = [
        (
            test::TestRequest::get().uri("/api/my-foods?email=a@b.com&email=c@d.com"),
            StatusCode::BAD_REQUEST,
            "Missing user email",
        ),
        (
            test::TestRequest::put()
                .uri(&format!("/api/update-food/{FOOD_ID}?email=a@b.com&email=c@d.com"))
                .set_json(json!({ "price": 1 })),
            StatusCode::FORBIDDEN,
            "Not authorized to update this food",
        ),
    ];

    for (req, status, message) in cases {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), status);
        assert_eq!(read_json(resp).await, json!({ "message": message }));
    }
}
