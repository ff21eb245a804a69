use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::models::preferences::{TransportMode, TripPace, TripPreferences};
use crate::state::AppState;

/*
    POST /api/generate-itinerary
*/
pub async fn generate(
    data: web::Data<AppState>,
    input: web::Json<TripPreferences>,
) -> impl Responder {
    let prefs = input.into_inner();

    match data.planner.plan(&prefs) {
        Ok(plan) => {
            log::info!(
                "Generated itinerary: {} days, {} POIs, total cost {:.0}",
                plan.days.len(),
                plan.total_pois,
                plan.total_cost
            );
            HttpResponse::Ok().json(json!({
                "status": "success",
                "data": plan
            }))
        }
        Err(err) => {
            log::warn!("Rejected planning request: {}", err);
            HttpResponse::BadRequest().json(json!({
                "status": "error",
                "message": err.to_string()
            }))
        }
    }
}

/*
    GET /api/available-pois
*/
pub async fn available_pois(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "success",
        "data": data.catalog.all()
    }))
}

/*
    GET /api/options
*/
pub async fn options() -> impl Responder {
    let transport_modes: Vec<&str> = TransportMode::all()
        .iter()
        .map(|mode| mode.as_str())
        .collect();
    let pace_options: Vec<&str> = TripPace::all().iter().map(|pace| pace.as_str()).collect();

    HttpResponse::Ok().json(json!({
        "status": "success",
        "data": {
            "transport_modes": transport_modes,
            "pace_options": pace_options,
            "available_categories": [
                "nature", "culture", "history", "adventure", "temple",
                "wildlife", "waterfall", "viewpoint", "pilgrimage", "unesco"
            ],
            "default_budget": 15000,
        }
    }))
}
