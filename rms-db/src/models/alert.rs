use crate::schema::cap_alerts;
use crate::schema::cap_alerts::dsl::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A CAP alert, flattened: the single `<info>` block lives in the same row,
/// affected areas as a jsonb list. Expiry is descriptive data only; nothing
/// deletes alerts automatically.
#[derive(Debug, Serialize, Deserialize, Identifiable, Queryable, Clone)]
#[diesel(table_name = cap_alerts)]
pub struct CapAlert {
    pub id: i32,
    pub identifier: String,
    pub sender: String,
    pub sent: NaiveDateTime,
    pub category: String,
    pub event: String,
    pub urgency: String,
    pub severity: String,
    pub certainty: String,
    pub headline: String,
    pub description: Option<String>,
    pub effective: NaiveDateTime,
    pub expires: NaiveDateTime,
    pub areas: Value,
    pub created_at: NaiveDateTime,
}

impl CapAlert {
    pub fn find_by_identifier(ident: &str, conn: &mut PgConnection) -> QueryResult<Self> {
        cap_alerts.filter(identifier.eq(ident)).first(conn)
    }

    pub fn list_all(conn: &mut PgConnection) -> QueryResult<Vec<Self>> {
        cap_alerts.order(sent.desc()).load(conn)
    }

    pub fn delete_by_identifier(ident: &str, conn: &mut PgConnection) -> QueryResult<usize> {
        diesel::delete(cap_alerts.filter(identifier.eq(ident))).execute(conn)
    }
}

#[derive(Debug, Serialize, Deserialize, Insertable)]
#[diesel(table_name = cap_alerts)]
pub struct NewCapAlert {
    pub identifier: String,
    pub sender: String,
    pub sent: NaiveDateTime,
    pub category: String,
    pub event: String,
    pub urgency: String,
    pub severity: String,
    pub certainty: String,
    pub headline: String,
    pub description: Option<String>,
    pub effective: NaiveDateTime,
    pub expires: NaiveDateTime,
    pub areas: Value,
}

impl NewCapAlert {
    /// Fails with a unique violation on a duplicate identifier; callers turn
    /// that into a conflict response rather than overwriting.
    pub fn create(&self, conn: &mut PgConnection) -> QueryResult<CapAlert> {
        diesel::insert_into(cap_alerts::table)
            .values(self)
            .get_result(conn)
    }
}
