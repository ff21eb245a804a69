use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};
use serde_json::json;

pub mod chat;
pub mod health;
pub mod itinerary;

/// JSON extractor config that answers malformed bodies with the same
/// `{status, message}` envelope the handlers use, instead of actix's
/// plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        let response = HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": message
        }));
        InternalError::from_response(err, response).into()
    })
}
