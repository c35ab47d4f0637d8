use crate::schema::event_logs;
use crate::schema::event_logs::dsl::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only device/station event log. Rows are never updated.
#[derive(Debug, Serialize, Deserialize, Identifiable, Queryable, Clone)]
#[diesel(table_name = event_logs)]
pub struct EventLog {
    pub id: i32,
    pub event_id: i64,
    pub occurred_at: NaiveDateTime,
    pub event_type: String,
    pub source: String,
    pub description: Option<String>,
    pub sent_to_server: bool,
    pub station_code: String,
    pub created_at: NaiveDateTime,
}

impl EventLog {
    pub fn list_all(conn: &mut PgConnection) -> QueryResult<Vec<Self>> {
        event_logs.order(occurred_at.desc()).load(conn)
    }

    pub fn list_for_station(c: &str, conn: &mut PgConnection) -> QueryResult<Vec<Self>> {
        event_logs
            .filter(station_code.eq(c))
            .order(occurred_at.desc())
            .load(conn)
    }
}

#[derive(Debug, Serialize, Deserialize, Insertable)]
#[diesel(table_name = event_logs)]
pub struct NewEventLog {
    pub event_id: i64,
    pub occurred_at: NaiveDateTime,
    pub event_type: String,
    pub source: String,
    pub description: Option<String>,
    pub sent_to_server: bool,
    pub station_code: String,
}

impl NewEventLog {
    pub fn create(&self, conn: &mut PgConnection) -> QueryResult<EventLog> {
        diesel::insert_into(event_logs::table)
            .values(self)
            .get_result(conn)
    }
}
