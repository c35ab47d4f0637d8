use crate::schema::trains;
use crate::schema::trains::dsl::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Identifiable, Queryable, AsChangeset, Clone)]
#[diesel(table_name = trains)]
pub struct Train {
    pub id: i32,
    pub train_no: String,
    pub name_en: String,
    pub name_hi: String,
    pub source_code: String,
    pub source_name_en: String,
    pub source_name_hi: String,
    pub dest_code: String,
    pub dest_name_en: String,
    pub dest_name_hi: String,
    pub sta: String,
    pub eta: String,
    #[diesel(column_name = std_)]
    pub std: String,
    pub etd: String,
    pub platform_no: Option<i32>,
    pub status: String,
    pub is_arrival: bool,
    pub coaches: Vec<String>,
    pub station_code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Train {
    pub fn find_by_no(no: &str, conn: &mut PgConnection) -> QueryResult<Self> {
        trains.filter(train_no.eq(no)).first(conn)
    }

    /// Remaining non-terminal trains for one station, earliest arrival
    /// first. Time strings are normalized to zero-padded "HH:MM" on write,
    /// so the lexicographic order here is chronological.
    pub fn list_active(
        station: &str,
        active_statuses: &[String],
        conn: &mut PgConnection,
    ) -> QueryResult<Vec<Self>> {
        trains
            .filter(station_code.eq(station))
            .filter(status.eq_any(active_statuses))
            .order(sta.asc())
            .load(conn)
    }

    /// Everything the sweep needs to classify a record without loading
    /// whole rows: (id, status, etd, updated_at).
    pub fn sweep_candidates(
        conn: &mut PgConnection,
    ) -> QueryResult<Vec<(i32, String, String, NaiveDateTime)>> {
        trains.select((id, status, etd, updated_at)).load(conn)
    }

    pub fn delete_by_ids(doomed: &[i32], conn: &mut PgConnection) -> QueryResult<usize> {
        diesel::delete(trains.filter(id.eq_any(doomed))).execute(conn)
    }

    pub fn delete_by_no(no: &str, conn: &mut PgConnection) -> QueryResult<usize> {
        diesel::delete(trains.filter(train_no.eq(no))).execute(conn)
    }

    pub fn apply(&self, changes: &TrainChanges, conn: &mut PgConnection) -> QueryResult<Self> {
        diesel::update(self).set(changes).get_result(conn)
    }

    pub fn delete(&self, conn: &mut PgConnection) -> QueryResult<usize> {
        diesel::delete(trains.find(self.id)).execute(conn)
    }
}

/// Partial update from the PUT handler. `updated_at` is always refreshed so
/// the staleness rule in the sweep sees real feed activity.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = trains)]
pub struct TrainChanges {
    pub status: Option<String>,
    pub eta: Option<String>,
    pub etd: Option<String>,
    pub platform_no: Option<i32>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, Insertable)]
#[diesel(table_name = trains)]
pub struct NewTrain {
    pub train_no: String,
    pub name_en: String,
    pub name_hi: String,
    pub source_code: String,
    pub source_name_en: String,
    pub source_name_hi: String,
    pub dest_code: String,
    pub dest_name_en: String,
    pub dest_name_hi: String,
    pub sta: String,
    pub eta: String,
    #[diesel(column_name = std_)]
    pub std: String,
    pub etd: String,
    pub platform_no: Option<i32>,
    pub status: String,
    pub is_arrival: bool,
    pub coaches: Vec<String>,
    pub station_code: String,
}

impl NewTrain {
    /// Insert for feed pushes; single trains arrive as a batch of one.
    pub fn create_many(rows: &[NewTrain], conn: &mut PgConnection) -> QueryResult<Vec<Train>> {
        diesel::insert_into(trains::table)
            .values(rows)
            .get_results(conn)
    }
}
