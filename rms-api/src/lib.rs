use actix_web::web;
use rms_db::connection::{Conn, PgPool};

use error::ApiError;

pub mod config;
pub mod error;
pub mod extract;
pub mod reconcile;
pub mod response;
pub mod routes;

pub fn conn(pool: &PgPool) -> Result<Conn, ApiError> {
    pool.get().map_err(|e| ApiError::Pool(e.to_string()))
}

pub fn configure_service(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::health)
        .service(
            web::scope("/rms")
                .service(routes::trains::create_trains)
                .service(routes::trains::active_trains)
                .service(routes::trains::update_train)
                .service(routes::trains::delete_train)
                .service(routes::stations::create_station)
                .service(routes::stations::list_stations)
                .service(routes::stations::get_station)
                .service(routes::stations::update_station)
                .service(routes::stations::delete_station)
                .service(routes::devices::upsert_devices)
                .service(routes::devices::get_devices)
                .service(routes::devices::delete_devices)
                .service(routes::alerts::create_alert)
                .service(routes::alerts::list_alerts)
                .service(routes::alerts::get_alert)
                .service(routes::alerts::delete_alert)
                .service(routes::events::create_event)
                .service(routes::events::list_events),
        )
        .service(
            web::scope("/auth")
                .service(routes::auth::register)
                .service(routes::auth::login)
                .service(routes::auth::verify_account)
                .service(routes::auth::forgot_password)
                .service(routes::auth::reset_password),
        )
        .service(
            web::scope("/profile")
                .service(routes::profile::get_profile)
                .service(routes::profile::update_profile),
        );
}
