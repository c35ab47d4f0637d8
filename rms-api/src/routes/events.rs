use actix_web::web::{self, Data, Json, Query};
use actix_web::{get, post, HttpResponse};
use chrono::{DateTime, Utc};
use rms_db::connection::PgPool;
use rms_db::models::event::{EventLog, NewEventLog};
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::StationApiKey;
use crate::response::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct EventInput {
    pub event_id: i64,
    pub occurred_at: DateTime<Utc>,
    pub event_type: String,
    pub source: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sent_to_server: bool,
    pub station_code: String,
}

impl EventInput {
    fn validate(&self) -> Result<(), ApiError> {
        if self.event_type.trim().is_empty() {
            return Err(ApiError::Validation("event_type is required".to_string()));
        }
        if self.source.trim().is_empty() {
            return Err(ApiError::Validation("source is required".to_string()));
        }
        if self.station_code.trim().is_empty() {
            return Err(ApiError::Validation("station_code is required".to_string()));
        }
        Ok(())
    }
}

/// Append-only: a duplicate event id is a conflict, and nothing updates a
/// log entry after the fact.
#[post("/events")]
pub async fn create_event(
    _key: StationApiKey,
    pool: Data<PgPool>,
    input: Json<EventInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    input.validate()?;
    let row = NewEventLog {
        event_id: input.event_id,
        occurred_at: input.occurred_at.naive_utc(),
        event_type: input.event_type,
        source: input.source,
        description: input.description,
        sent_to_server: input.sent_to_server,
        station_code: input.station_code,
    };

    let created = web::block(move || -> Result<EventLog, ApiError> {
        let mut conn = crate::conn(&pool)?;
        Ok(row.create(&mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

#[derive(Debug, Deserialize)]
pub struct EventQuery {
    pub station: Option<String>,
}

#[get("/events")]
pub async fn list_events(
    _key: StationApiKey,
    pool: Data<PgPool>,
    query: Query<EventQuery>,
) -> Result<HttpResponse, ApiError> {
    let station = query.into_inner().station;
    let logs = web::block(move || -> Result<Vec<EventLog>, ApiError> {
        let mut conn = crate::conn(&pool)?;
        let logs = match station.as_deref() {
            Some(code) => EventLog::list_for_station(code, &mut conn)?,
            None => EventLog::list_all(&mut conn)?,
        };
        Ok(logs)
    })
    .await??;

    Ok(HttpResponse::Ok().json(ApiResponse::success(logs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> EventInput {
        EventInput {
            event_id: 90211,
            occurred_at: Utc::now(),
            event_type: "DEVICE_OFFLINE".to_string(),
            source: "PFDB-4".to_string(),
            description: None,
            sent_to_server: false,
            station_code: "NDLS".to_string(),
        }
    }

    #[test]
    fn valid_event_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn blank_event_type_is_rejected() {
        let mut bad = input();
        bad.event_type = String::new();
        assert!(matches!(bad.validate(), Err(ApiError::Validation(_))));
    }
}
