use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let catalog_result = check_catalog(&data);
    health
        .services
        .insert("poi_catalog".to_string(), catalog_result.clone());

    health
        .services
        .insert("chat_backend".to_string(), check_chat_backend(&data));

    // An empty catalog is a configuration error: the planner still
    // answers, but every day comes back without destinations.
    if catalog_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_catalog(data: &web::Data<AppState>) -> ServiceStatus {
    if data.catalog.is_empty() {
        ServiceStatus {
            status: "error".to_string(),
            details: Some("POI catalog is empty".to_string()),
        }
    } else {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("{} POIs loaded", data.catalog.len())),
        }
    }
}

fn check_chat_backend(data: &web::Data<AppState>) -> ServiceStatus {
    if data.chat.upstream_configured() {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some("Upstream configured, canned fallback armed".to_string()),
        }
    } else {
        // Not an error: the canned responder keeps the endpoint available.
        ServiceStatus {
            status: "ok".to_string(),
            details: Some("No upstream configured, serving canned responses".to_string()),
        }
    }
}
