use actix_web::web::{self, Data, Json, Path};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::Utc;
use rms_db::connection::PgPool;
use rms_db::models::station::{NewStation, Station, StationChanges};
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::StationApiKey;
use crate::response::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct StationInput {
    pub code: String,
    pub name_en: String,
    #[serde(default)]
    pub name_hi: String,
    #[serde(default)]
    pub name_regional: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub platform_count: i32,
    #[serde(default)]
    pub entrance_count: i32,
    #[serde(default)]
    pub bridge_count: i32,
}

impl StationInput {
    fn validate(&self) -> Result<(), ApiError> {
        if self.code.trim().is_empty() {
            return Err(ApiError::Validation("code is required".to_string()));
        }
        if self.name_en.trim().is_empty() {
            return Err(ApiError::Validation("name_en is required".to_string()));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ApiError::Validation("latitude out of range".to_string()));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ApiError::Validation("longitude out of range".to_string()));
        }
        Ok(())
    }
}

#[post("/stations")]
pub async fn create_station(
    _key: StationApiKey,
    pool: Data<PgPool>,
    input: Json<StationInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    input.validate()?;
    let row = NewStation {
        code: input.code,
        name_en: input.name_en,
        name_hi: input.name_hi,
        name_regional: input.name_regional,
        latitude: input.latitude,
        longitude: input.longitude,
        platform_count: input.platform_count,
        entrance_count: input.entrance_count,
        bridge_count: input.bridge_count,
    };

    let created = web::block(move || -> Result<Station, ApiError> {
        let mut conn = crate::conn(&pool)?;
        Ok(row.create(&mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

#[get("/stations")]
pub async fn list_stations(
    _key: StationApiKey,
    pool: Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let all = web::block(move || -> Result<Vec<Station>, ApiError> {
        let mut conn = crate::conn(&pool)?;
        Ok(Station::list_all(&mut conn)?)
    })
    .await??;
    Ok(HttpResponse::Ok().json(ApiResponse::success(all)))
}

#[get("/stations/{code}")]
pub async fn get_station(
    _key: StationApiKey,
    pool: Data<PgPool>,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let code = path.into_inner();
    let station = web::block(move || -> Result<Station, ApiError> {
        let mut conn = crate::conn(&pool)?;
        Ok(Station::find_by_code(&code, &mut conn)?)
    })
    .await??;
    Ok(HttpResponse::Ok().json(ApiResponse::success(station)))
}

#[derive(Debug, Deserialize)]
pub struct StationUpdateInput {
    pub name_en: Option<String>,
    pub name_hi: Option<String>,
    pub name_regional: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub platform_count: Option<i32>,
    pub entrance_count: Option<i32>,
    pub bridge_count: Option<i32>,
}

#[put("/stations/{code}")]
pub async fn update_station(
    _key: StationApiKey,
    pool: Data<PgPool>,
    path: Path<String>,
    input: Json<StationUpdateInput>,
) -> Result<HttpResponse, ApiError> {
    let code = path.into_inner();
    let input = input.into_inner();
    if let Some(lat) = input.latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ApiError::Validation("latitude out of range".to_string()));
        }
    }
    if let Some(lon) = input.longitude {
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ApiError::Validation("longitude out of range".to_string()));
        }
    }

    let updated = web::block(move || -> Result<Station, ApiError> {
        let mut conn = crate::conn(&pool)?;
        let station = Station::find_by_code(&code, &mut conn)?;
        let changes = StationChanges {
            name_en: input.name_en,
            name_hi: input.name_hi,
            name_regional: input.name_regional,
            latitude: input.latitude,
            longitude: input.longitude,
            platform_count: input.platform_count,
            entrance_count: input.entrance_count,
            bridge_count: input.bridge_count,
            updated_at: Utc::now().naive_utc(),
        };
        Ok(station.apply(&changes, &mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

#[delete("/stations/{code}")]
pub async fn delete_station(
    _key: StationApiKey,
    pool: Data<PgPool>,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let code = path.into_inner();
    let removed = web::block(move || -> Result<usize, ApiError> {
        let mut conn = crate::conn(&pool)?;
        Ok(Station::delete_by_code(&code, &mut conn)?)
    })
    .await??;

    if removed == 0 {
        return Err(ApiError::NotFound("station not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(ApiResponse::message("station deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> StationInput {
        StationInput {
            code: "NDLS".to_string(),
            name_en: "New Delhi".to_string(),
            name_hi: String::new(),
            name_regional: None,
            latitude: 28.6419,
            longitude: 77.2194,
            platform_count: 16,
            entrance_count: 4,
            bridge_count: 3,
        }
    }

    #[test]
    fn valid_station_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut bad = input();
        bad.latitude = 91.0;
        assert!(matches!(bad.validate(), Err(ApiError::Validation(_))));
        let mut bad = input();
        bad.longitude = -200.0;
        assert!(matches!(bad.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn blank_code_is_rejected() {
        let mut bad = input();
        bad.code = "  ".to_string();
        assert!(matches!(bad.validate(), Err(ApiError::Validation(_))));
    }
}
