use actix_web::{get, HttpResponse};

use crate::response::ApiResponse;

pub mod alerts;
pub mod auth;
pub mod devices;
pub mod events;
pub mod profile;
pub mod stations;
pub mod trains;

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::message("rms api is up"))
}
