//! # foodify-api
//!
//! The web routing and orchestration layer for Foodify.

pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;
use foodify_core::error::AppError;

pub use handlers::AppState;

/// Configures the storefront routes.
///
/// Also registers the JSON body and query-string settings, so any `App` that
/// calls `.configure(configure_routes)` answers malformed requests the same way.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .route("/", web::get().to(handlers::index))
        .route("/top-foods", web::get().to(handlers::top_foods))
        .service(
            web::scope("/api")
                // Both shelves, admin first
                .route("/all-foods", web::get().to(handlers::all_foods))
                .route("/all-foods/{id}", web::get().to(handlers::admin_food))
                .route("/foods", web::post().to(handlers::add_food))
                .route("/foods/{id}", web::get().to(handlers::user_food))
                .service(
                    web::resource("/my-foods")
                        .app_data(error::query_config(AppError::ValidationError("Missing user email".into())))
                        .route(web::get().to(handlers::my_foods)),
                )
                .service(
                    web::resource("/update-food/{id}")
                        .app_data(error::query_config(AppError::Forbidden(
                            "Not authorized to update this food".into(),
                        )))
                        .route(web::put().to(handlers::update_food)),
                )
                .route("/purchase", web::post().to(handlers::purchase))
                .service(
                    web::resource("/my-orders")
                        .app_data(error::query_config(AppError::ValidationError("Missing buyer email".into())))
                        .route(web::get().to(handlers::my_orders)),
                )
                .route("/my-orders/{id}", web::delete().to(handlers::delete_order)),
        );
}
