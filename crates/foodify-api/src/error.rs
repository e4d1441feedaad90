//! HTTP mapping for `AppError`.
//!
//! Every failure leaves the service as `{"message": ...}` with a status taken
//! from the error variant. Store details are logged by the handler and never
//! reach this layer.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use foodify_core::error::AppError;
use serde::Serialize;

/// Largest JSON body accepted, in bytes.
pub const JSON_BODY_LIMIT: usize = 100 * 1024;

/// Convenient result alias for handlers.
pub type ApiResult = Result<HttpResponse, ApiError>;

/// Wrapper that lets domain errors be returned straight from Actix handlers.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] AppError);

impl ApiError {
    pub fn inner(&self) -> &AppError {
        &self.0
    }
}

#[derive(Serialize)]
pub(crate) struct MessageBody {
    pub message: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(MessageBody {
            message: self.0.public_message(),
        })
    }
}

/// Turns a store failure into a redacted 500 after logging it with context.
pub(crate) fn store_failure(
    context: &'static str,
    public: &'static str,
) -> impl FnOnce(anyhow::Error) -> ApiError {
    move |err| {
        log::error!("❌ {context}: {err:#}");
        AppError::Internal(public.to_string()).into()
    }
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected JSON body on {} {}: {err}", req.method(), req.path());
    ApiError::from(AppError::ValidationError("Invalid JSON body".into())).into()
}

/// Body limit and error shape for every `web::Json` extractor.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(json_error_handler)
}

/// Query-string errors for one resource, answered as `rejection`.
///
/// The only typed query is `?email=`, so each resource says what a bad one
/// means for it.
pub fn query_config(rejection: AppError) -> web::QueryConfig {
    web::QueryConfig::default().error_handler(move |err: QueryPayloadError, req: &HttpRequest| {
        log::warn!("Rejected query string on {} {}: {err}", req.method(), req.path());
        ApiError::from(rejection.clone()).into()
    })
}
