use std::str::FromStr;

use actix_web::web::{self, Data, Json, Path, Query};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::Utc;
use rms_common::clock::ClockTime;
use rms_common::status::TrainStatus;
use rms_db::connection::PgPool;
use rms_db::models::train::{NewTrain, Train, TrainChanges};
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::StationApiKey;
use crate::reconcile;
use crate::response::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct TrainInput {
    pub train_no: String,
    pub name_en: String,
    #[serde(default)]
    pub name_hi: String,
    pub source_code: String,
    #[serde(default)]
    pub source_name_en: String,
    #[serde(default)]
    pub source_name_hi: String,
    pub dest_code: String,
    #[serde(default)]
    pub dest_name_en: String,
    #[serde(default)]
    pub dest_name_hi: String,
    #[serde(default)]
    pub sta: String,
    #[serde(default)]
    pub eta: String,
    #[serde(default)]
    pub std: String,
    #[serde(default)]
    pub etd: String,
    #[serde(default)]
    pub platform_no: Option<i32>,
    pub status: String,
    pub is_arrival: bool,
    #[serde(default)]
    pub coaches: Vec<String>,
    pub station_code: String,
}

/// Feeds push either one train or a batch in the same endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TrainPayload {
    Many(Vec<TrainInput>),
    One(TrainInput),
}

fn check_time_field(name: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Ok(());
    }
    ClockTime::from_str(value)
        .map(|_| ())
        .map_err(|e| ApiError::Validation(format!("{}: {}", name, e)))
}

/// Stored times are zero-padded ("9:05" becomes "09:05") so that the
/// lexicographic `ORDER BY` on the listing is chronological. Inputs reach
/// here already validated; anything unparseable is left untouched.
fn normalize_time(value: String) -> String {
    if value.is_empty() {
        return value;
    }
    ClockTime::from_str(&value)
        .map(|t| t.to_string())
        .unwrap_or(value)
}

impl TrainInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.train_no.trim().is_empty() {
            return Err(ApiError::Validation("train_no is required".to_string()));
        }
        if self.station_code.trim().is_empty() {
            return Err(ApiError::Validation("station_code is required".to_string()));
        }
        if self.source_code.trim().is_empty() || self.dest_code.trim().is_empty() {
            return Err(ApiError::Validation(
                "source_code and dest_code are required".to_string(),
            ));
        }
        TrainStatus::from_str(&self.status)
            .map_err(|_| ApiError::Validation(format!("unknown status {:?}", self.status)))?;
        check_time_field("sta", &self.sta)?;
        check_time_field("eta", &self.eta)?;
        check_time_field("std", &self.std)?;
        check_time_field("etd", &self.etd)?;
        Ok(())
    }

    fn into_new(self) -> NewTrain {
        NewTrain {
            train_no: self.train_no,
            name_en: self.name_en,
            name_hi: self.name_hi,
            source_code: self.source_code,
            source_name_en: self.source_name_en,
            source_name_hi: self.source_name_hi,
            dest_code: self.dest_code,
            dest_name_en: self.dest_name_en,
            dest_name_hi: self.dest_name_hi,
            sta: normalize_time(self.sta),
            eta: normalize_time(self.eta),
            std: normalize_time(self.std),
            etd: normalize_time(self.etd),
            platform_no: self.platform_no,
            status: self.status,
            is_arrival: self.is_arrival,
            coaches: self.coaches,
            station_code: self.station_code,
        }
    }
}

#[post("/trains")]
pub async fn create_trains(
    _key: StationApiKey,
    pool: Data<PgPool>,
    payload: Json<TrainPayload>,
) -> Result<HttpResponse, ApiError> {
    let inputs = match payload.into_inner() {
        TrainPayload::One(t) => vec![t],
        TrainPayload::Many(v) => v,
    };
    if inputs.is_empty() {
        return Err(ApiError::Validation("empty train list".to_string()));
    }
    for input in &inputs {
        input.validate()?;
    }
    let rows: Vec<NewTrain> = inputs.into_iter().map(TrainInput::into_new).collect();

    let created = web::block(move || -> Result<Vec<Train>, ApiError> {
        let mut conn = crate::conn(&pool)?;
        Ok(NewTrain::create_many(&rows, &mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

#[derive(Debug, Deserialize)]
pub struct ActiveQuery {
    pub station: String,
}

/// Empty-result policy for the active listing: no qualifying trains is a
/// 404 failure, not an empty success list.
fn require_active(remaining: Vec<Train>) -> Result<Vec<Train>, ApiError> {
    if remaining.is_empty() {
        return Err(ApiError::NotFound("no active trains found".to_string()));
    }
    Ok(remaining)
}

/// Sweep, then list what is still active for the station.
#[get("/trains/active")]
pub async fn active_trains(
    _key: StationApiKey,
    pool: Data<PgPool>,
    query: Query<ActiveQuery>,
) -> Result<HttpResponse, ApiError> {
    let station = query.into_inner().station;
    if station.trim().is_empty() {
        return Err(ApiError::Validation("station is required".to_string()));
    }

    let remaining = web::block(move || -> Result<Vec<Train>, ApiError> {
        let mut conn = crate::conn(&pool)?;
        reconcile::sweep(&mut conn)?;
        let active: Vec<String> = TrainStatus::active_set()
            .iter()
            .map(|s| s.to_string())
            .collect();
        Ok(Train::list_active(&station, &active, &mut conn)?)
    })
    .await??;

    let remaining = require_active(remaining)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(remaining)))
}

#[derive(Debug, Deserialize)]
pub struct TrainUpdateInput {
    pub status: Option<String>,
    pub eta: Option<String>,
    pub etd: Option<String>,
    pub platform_no: Option<i32>,
}

impl TrainUpdateInput {
    fn validate(&self) -> Result<(), ApiError> {
        if self.status.is_none()
            && self.eta.is_none()
            && self.etd.is_none()
            && self.platform_no.is_none()
        {
            return Err(ApiError::Validation("nothing to update".to_string()));
        }
        if let Some(s) = &self.status {
            TrainStatus::from_str(s)
                .map_err(|_| ApiError::Validation(format!("unknown status {:?}", s)))?;
        }
        if let Some(t) = &self.eta {
            check_time_field("eta", t)?;
        }
        if let Some(t) = &self.etd {
            check_time_field("etd", t)?;
        }
        Ok(())
    }
}

/// Status/time update. If the update leaves the train terminal or past its
/// departure window, the record is deleted right away instead of saved.
#[put("/trains/{train_no}")]
pub async fn update_train(
    _key: StationApiKey,
    pool: Data<PgPool>,
    path: Path<String>,
    input: Json<TrainUpdateInput>,
) -> Result<HttpResponse, ApiError> {
    let no = path.into_inner();
    let input = input.into_inner();
    input.validate()?;

    let (train, removed) = web::block(move || -> Result<(Train, bool), ApiError> {
        let mut conn = crate::conn(&pool)?;
        let now = Utc::now();
        let train = Train::find_by_no(&no, &mut conn)?;
        let changes = TrainChanges {
            status: input.status,
            eta: input.eta.map(normalize_time),
            etd: input.etd.map(normalize_time),
            platform_no: input.platform_no,
            updated_at: now.naive_utc(),
        };
        let train = train.apply(&changes, &mut conn)?;

        let gone = reconcile::should_sweep(&train.status, &train.etd, train.updated_at, now);
        if gone {
            train.delete(&mut conn)?;
        }
        Ok((train, gone))
    })
    .await??;

    if removed {
        Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            train,
            "train completed its lifecycle and was removed",
        )))
    } else {
        Ok(HttpResponse::Ok().json(ApiResponse::success(train)))
    }
}

#[delete("/trains/{train_no}")]
pub async fn delete_train(
    _key: StationApiKey,
    pool: Data<PgPool>,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let no = path.into_inner();
    let removed = web::block(move || -> Result<usize, ApiError> {
        let mut conn = crate::conn(&pool)?;
        Ok(Train::delete_by_no(&no, &mut conn)?)
    })
    .await??;

    if removed == 0 {
        return Err(ApiError::NotFound("train not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(ApiResponse::message("train deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> serde_json::Value {
        serde_json::json!({
            "train_no": "12951",
            "name_en": "Mumbai Rajdhani",
            "source_code": "BCT",
            "dest_code": "NDLS",
            "sta": "08:32",
            "etd": "08:50",
            "status": "On Time",
            "is_arrival": true,
            "station_code": "NDLS"
        })
    }

    #[test]
    fn single_object_parses_as_one() {
        let payload: TrainPayload = serde_json::from_value(base_input()).unwrap();
        assert!(matches!(payload, TrainPayload::One(_)));
    }

    #[test]
    fn array_parses_as_many() {
        let payload: TrainPayload =
            serde_json::from_value(serde_json::json!([base_input(), base_input()])).unwrap();
        match payload {
            TrainPayload::Many(v) => assert_eq!(v.len(), 2),
            TrainPayload::One(_) => panic!("expected a batch"),
        }
    }

    #[test]
    fn valid_input_passes_validation() {
        let input: TrainInput = serde_json::from_value(base_input()).unwrap();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut raw = base_input();
        raw["status"] = "Cancelled".into();
        let input: TrainInput = serde_json::from_value(raw).unwrap();
        assert!(matches!(input.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn malformed_time_is_rejected_up_front() {
        let mut raw = base_input();
        raw["etd"] = "25:99".into();
        let input: TrainInput = serde_json::from_value(raw).unwrap();
        assert!(matches!(input.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn nonpadded_times_are_normalized_on_insert() {
        let mut raw = base_input();
        raw["sta"] = "9:05".into();
        raw["etd"] = "8:5".into();
        let input: TrainInput = serde_json::from_value(raw).unwrap();
        input.validate().unwrap();
        let row = input.into_new();
        assert_eq!(row.sta, "09:05");
        assert_eq!(row.etd, "08:05");
    }

    #[test]
    fn normalized_times_sort_chronologically() {
        let mut times = vec![
            normalize_time("12:00".to_string()),
            normalize_time("9:05".to_string()),
        ];
        times.sort();
        assert_eq!(times, vec!["09:05".to_string(), "12:00".to_string()]);
    }

    #[test]
    fn empty_listing_is_a_not_found_failure() {
        use actix_web::http::StatusCode;
        use actix_web::ResponseError;

        let err = require_active(Vec::new()).unwrap_err();
        match &err {
            ApiError::NotFound(msg) => assert_eq!(msg, "no active trains found"),
            other => panic!("expected not-found, got {:?}", other),
        }
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn nonempty_listing_passes_through() {
        let now = Utc::now().naive_utc();
        let train = Train {
            id: 1,
            train_no: "12951".to_string(),
            name_en: "Mumbai Rajdhani".to_string(),
            name_hi: String::new(),
            source_code: "BCT".to_string(),
            source_name_en: String::new(),
            source_name_hi: String::new(),
            dest_code: "NDLS".to_string(),
            dest_name_en: String::new(),
            dest_name_hi: String::new(),
            sta: "08:32".to_string(),
            eta: String::new(),
            std: String::new(),
            etd: String::new(),
            platform_no: Some(4),
            status: "On Time".to_string(),
            is_arrival: true,
            coaches: vec![],
            station_code: "NDLS".to_string(),
            created_at: now,
            updated_at: now,
        };
        let kept = require_active(vec![train]).unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn empty_update_is_rejected() {
        let input = TrainUpdateInput {
            status: None,
            eta: None,
            etd: None,
            platform_no: None,
        };
        assert!(matches!(input.validate(), Err(ApiError::Validation(_))));
    }
}
