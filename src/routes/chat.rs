use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::models::chat::{ChatRequest, ChatResponse};
use crate::state::AppState;

/*
    POST /api/chat
*/
pub async fn chat(data: web::Data<AppState>, input: web::Json<ChatRequest>) -> impl Responder {
    let message = input.into_inner().message;
    if message.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": "message must not be empty"
        }));
    }

    let response = data.chat.respond(&message).await;
    HttpResponse::Ok().json(ChatResponse { response })
}
