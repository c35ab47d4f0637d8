use std::str::FromStr;

use actix_web::web::{self, Data, Json, Path};
use actix_web::{delete, get, post, HttpResponse};
use chrono::{DateTime, Utc};
use rms_common::cap::{Category, Certainty, Severity, Urgency};
use rms_db::connection::PgPool;
use rms_db::models::alert::{CapAlert, NewCapAlert};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::StationApiKey;
use crate::response::ApiResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertArea {
    pub area_desc: String,
}

/// Wire shape keeps the CAP nesting: alert envelope plus one `info` block.
#[derive(Debug, Deserialize)]
pub struct AlertInput {
    pub identifier: String,
    pub sender: String,
    pub sent: DateTime<Utc>,
    pub info: AlertInfoInput,
}

#[derive(Debug, Deserialize)]
pub struct AlertInfoInput {
    pub category: String,
    pub event: String,
    pub urgency: String,
    pub severity: String,
    pub certainty: String,
    pub headline: String,
    #[serde(default)]
    pub description: Option<String>,
    pub effective: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    #[serde(default)]
    pub areas: Vec<AlertArea>,
}

impl AlertInput {
    fn validate(&self) -> Result<(), ApiError> {
        if self.identifier.trim().is_empty() {
            return Err(ApiError::Validation("identifier is required".to_string()));
        }
        if self.sender.trim().is_empty() {
            return Err(ApiError::Validation("sender is required".to_string()));
        }
        if self.info.event.trim().is_empty() || self.info.headline.trim().is_empty() {
            return Err(ApiError::Validation(
                "event and headline are required".to_string(),
            ));
        }
        Category::from_str(&self.info.category)
            .map_err(|_| ApiError::Validation(format!("unknown category {:?}", self.info.category)))?;
        Urgency::from_str(&self.info.urgency)
            .map_err(|_| ApiError::Validation(format!("unknown urgency {:?}", self.info.urgency)))?;
        Severity::from_str(&self.info.severity)
            .map_err(|_| ApiError::Validation(format!("unknown severity {:?}", self.info.severity)))?;
        Certainty::from_str(&self.info.certainty).map_err(|_| {
            ApiError::Validation(format!("unknown certainty {:?}", self.info.certainty))
        })?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct AlertView {
    pub identifier: String,
    pub sender: String,
    pub sent: DateTime<Utc>,
    pub info: AlertInfoView,
}

#[derive(Debug, Serialize)]
pub struct AlertInfoView {
    pub category: String,
    pub event: String,
    pub urgency: String,
    pub severity: String,
    pub certainty: String,
    pub headline: String,
    pub description: Option<String>,
    pub effective: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    pub areas: Vec<AlertArea>,
}

impl TryFrom<CapAlert> for AlertView {
    type Error = serde_json::Error;

    fn try_from(row: CapAlert) -> Result<Self, Self::Error> {
        Ok(AlertView {
            identifier: row.identifier,
            sender: row.sender,
            sent: row.sent.and_utc(),
            info: AlertInfoView {
                category: row.category,
                event: row.event,
                urgency: row.urgency,
                severity: row.severity,
                certainty: row.certainty,
                headline: row.headline,
                description: row.description,
                effective: row.effective.and_utc(),
                expires: row.expires.and_utc(),
                areas: serde_json::from_value(row.areas)?,
            },
        })
    }
}

/// Duplicate identifiers are rejected with a conflict, never overwritten.
#[post("/alerts")]
pub async fn create_alert(
    _key: StationApiKey,
    pool: Data<PgPool>,
    input: Json<AlertInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    input.validate()?;
    let areas = serde_json::to_value(&input.info.areas)?;
    let row = NewCapAlert {
        identifier: input.identifier,
        sender: input.sender,
        sent: input.sent.naive_utc(),
        category: input.info.category,
        event: input.info.event,
        urgency: input.info.urgency,
        severity: input.info.severity,
        certainty: input.info.certainty,
        headline: input.info.headline,
        description: input.info.description,
        effective: input.info.effective.naive_utc(),
        expires: input.info.expires.naive_utc(),
        areas,
    };

    let view = web::block(move || -> Result<AlertView, ApiError> {
        let mut conn = crate::conn(&pool)?;
        let created = row.create(&mut conn)?;
        Ok(AlertView::try_from(created)?)
    })
    .await??;

    Ok(HttpResponse::Created().json(ApiResponse::success(view)))
}

#[get("/alerts")]
pub async fn list_alerts(
    _key: StationApiKey,
    pool: Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let views = web::block(move || -> Result<Vec<AlertView>, ApiError> {
        let mut conn = crate::conn(&pool)?;
        CapAlert::list_all(&mut conn)?
            .into_iter()
            .map(|row| AlertView::try_from(row).map_err(ApiError::from))
            .collect()
    })
    .await??;
    Ok(HttpResponse::Ok().json(ApiResponse::success(views)))
}

#[get("/alerts/{identifier}")]
pub async fn get_alert(
    _key: StationApiKey,
    pool: Data<PgPool>,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let ident = path.into_inner();
    let view = web::block(move || -> Result<AlertView, ApiError> {
        let mut conn = crate::conn(&pool)?;
        let row = CapAlert::find_by_identifier(&ident, &mut conn)?;
        Ok(AlertView::try_from(row)?)
    })
    .await??;
    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}

#[delete("/alerts/{identifier}")]
pub async fn delete_alert(
    _key: StationApiKey,
    pool: Data<PgPool>,
    path: Path<String>,
) -> Result<HttpResponse, ApiError> {
    let ident = path.into_inner();
    let removed = web::block(move || -> Result<usize, ApiError> {
        let mut conn = crate::conn(&pool)?;
        Ok(CapAlert::delete_by_identifier(&ident, &mut conn)?)
    })
    .await??;

    if removed == 0 {
        return Err(ApiError::NotFound("alert not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(ApiResponse::message("alert deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> AlertInput {
        serde_json::from_value(serde_json::json!({
            "identifier": "NDLS-2025-0042",
            "sender": "controller@rms.example",
            "sent": "2025-07-14T09:00:00Z",
            "info": {
                "category": "Transport",
                "event": "Platform closure",
                "urgency": "Expected",
                "severity": "Moderate",
                "certainty": "Likely",
                "headline": "Platform 4 closed for inspection",
                "effective": "2025-07-14T10:00:00Z",
                "expires": "2025-07-14T18:00:00Z",
                "areas": [{ "area_desc": "Platform 4" }]
            }
        }))
        .unwrap()
    }

    #[test]
    fn valid_alert_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let mut bad = input();
        bad.info.severity = "Catastrophic".to_string();
        assert!(matches!(bad.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn blank_identifier_is_rejected() {
        let mut bad = input();
        bad.identifier = String::new();
        assert!(matches!(bad.validate(), Err(ApiError::Validation(_))));
    }
}
