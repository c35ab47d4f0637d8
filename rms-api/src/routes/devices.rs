use actix_web::web::{self, Data, Json, Path};
use actix_web::{delete, get, post, HttpResponse};
use chrono::Utc;
use rms_db::connection::PgPool;
use rms_db::models::device::{merge_platforms, NewStationDevices, Platform, StationDevices};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::StationApiKey;
use crate::response::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct DevicesInput {
    pub station_code: String,
    pub platforms: Vec<Platform>,
}

impl DevicesInput {
    fn validate(&self) -> Result<(), ApiError> {
        if self.station_code.trim().is_empty() {
            return Err(ApiError::Validation("station_code is required".to_string()));
        }
        if self.platforms.is_empty() {
            return Err(ApiError::Validation(
                "at least one platform is required".to_string(),
            ));
        }
        for platform in &self.platforms {
            if platform.platform_no < 1 {
                return Err(ApiError::Validation(
                    "platform_no must be positive".to_string(),
                ));
            }
            for device in &platform.devices {
                if device.device_type.trim().is_empty() || device.ip_address.trim().is_empty() {
                    return Err(ApiError::Validation(
                        "device_type and ip_address are required".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct DevicesView {
    pub station_code: String,
    pub platforms: Vec<Platform>,
}

impl TryFrom<StationDevices> for DevicesView {
    type Error = serde_json::Error;

    fn try_from(record: StationDevices) -> Result<Self, Self::Error> {
        Ok(DevicesView {
            station_code: record.station_code,
            platforms: serde_json::from_value(record.platforms)?,
        })
    }
}

/// Create-or-merge. An existing inventory for the station absorbs the
/// incoming platforms (devices are appended under matching platform
/// numbers); otherwise a fresh record is written.
#[post("/devices")]
pub async fn upsert_devices(
    _key: StationApiKey,
    pool: Data<PgPool>,
    input: Json<DevicesInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    input.validate()?;

    let view = web::block(move || -> Result<DevicesView, ApiError> {
        let mut conn = crate::conn(&pool)?;
        let record = match StationDevices::find_by_station(&input.station_code, &mut conn)? {
            Some(existing) => {
                let mut platforms: Vec<Platform> =
                    serde_json::from_value(existing.platforms.clone())?;
                merge_platforms(&mut platforms, input.platforms);
                existing.update_platforms(
                    serde_json::to_value(&platforms)?,
                    Utc::now().naive_utc(),
                    &mut conn,
                )?
            }
            None => NewStationDevices {
                station_code: input.station_code,
                platforms: serde_json::to_value(&input.platforms)?,
            }
            .create(&mut conn)?,
        };
        Ok(DevicesView::try_from(record)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}

#[get("/devices/{station_code}")]
pub async fn get_devices(
    _key: StationApiKey,
    pool: Data<PgPool>,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let code = path.into_inner();
    let view = web::block(move || -> Result<DevicesView, ApiError> {
        let mut conn = crate::conn(&pool)?;
        let record = StationDevices::find_by_station(&code, &mut conn)?
            .ok_or_else(|| ApiError::NotFound("no devices for this station".to_string()))?;
        Ok(DevicesView::try_from(record)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}

#[delete("/devices/{station_code}")]
pub async fn delete_devices(
    _key: StationApiKey,
    pool: Data<PgPool>,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let code = path.into_inner();
    let removed = web::block(move || -> Result<usize, ApiError> {
        let mut conn = crate::conn(&pool)?;
        Ok(StationDevices::delete_by_station(&code, &mut conn)?)
    })
    .await??;

    if removed == 0 {
        return Err(ApiError::NotFound("no devices for this station".to_string()));
    }
    Ok(HttpResponse::Ok().json(ApiResponse::message("device inventory deleted")))
}

#[cfg(test)]
mod tests {
    use rms_db::models::device::Device;

    use super::*;

    fn input() -> DevicesInput {
        DevicesInput {
            station_code: "NDLS".to_string(),
            platforms: vec![Platform {
                platform_no: 1,
                devices: vec![Device {
                    device_type: "PFDB".to_string(),
                    ip_address: "10.20.1.5".to_string(),
                    enabled: true,
                    status: "online".to_string(),
                }],
            }],
        }
    }

    #[test]
    fn valid_inventory_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn empty_platform_list_is_rejected() {
        let mut bad = input();
        bad.platforms.clear();
        assert!(matches!(bad.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn blank_ip_is_rejected() {
        let mut bad = input();
        bad.platforms[0].devices[0].ip_address = String::new();
        assert!(matches!(bad.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn nonpositive_platform_number_is_rejected() {
        let mut bad = input();
        bad.platforms[0].platform_no = 0;
        assert!(matches!(bad.validate(), Err(ApiError::Validation(_))));
    }
}
