//! foodify/crates/foodify-api/src/middleware.rs Middleware
//!
//! Access logging and the cross-origin policy for the storefront frontends.

use actix_cors::Cors;
use actix_web::middleware::Logger;

/// Methods the storefront may call cross-origin.
const CORS_METHODS: [&str; 6] = ["GET", "HEAD", "PUT", "PATCH", "POST", "DELETE"];

// Returns the standard access logger.
pub fn standard_middleware() -> Logger {
    // remote-ip "request-line" status-code response-size "referrer" "user-agent"
    Logger::default()
}

/// Only the listed origins may call the API, with cookies/credentials.
pub fn cors_policy(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(CORS_METHODS)
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    for origin in origins {
        // A credentialed policy cannot use a wildcard origin.
        if origin == "*" {
            log::warn!("Ignoring wildcard CORS origin; list origins explicitly");
            continue;
        }
        cors = cors.allowed_origin(origin);
    }
    cors
}
