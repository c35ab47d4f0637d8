use crate::schema::stations;
use crate::schema::stations::dsl::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Identifiable, Queryable, AsChangeset, Clone)]
#[diesel(table_name = stations)]
pub struct Station {
    pub id: i32,
    pub code: String,
    pub name_en: String,
    pub name_hi: String,
    pub name_regional: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub platform_count: i32,
    pub entrance_count: i32,
    pub bridge_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Station {
    pub fn find_by_code(c: &str, conn: &mut PgConnection) -> QueryResult<Self> {
        stations.filter(code.eq(c)).first(conn)
    }

    pub fn list_all(conn: &mut PgConnection) -> QueryResult<Vec<Self>> {
        stations.order(code.asc()).load(conn)
    }

    pub fn apply(&self, changes: &StationChanges, conn: &mut PgConnection) -> QueryResult<Self> {
        diesel::update(self).set(changes).get_result(conn)
    }

    pub fn delete_by_code(c: &str, conn: &mut PgConnection) -> QueryResult<usize> {
        diesel::delete(stations.filter(code.eq(c))).execute(conn)
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = stations)]
pub struct StationChanges {
    pub name_en: Option<String>,
    pub name_hi: Option<String>,
    pub name_regional: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub platform_count: Option<i32>,
    pub entrance_count: Option<i32>,
    pub bridge_count: Option<i32>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, Insertable)]
#[diesel(table_name = stations)]
pub struct NewStation {
    pub code: String,
    pub name_en: String,
    pub name_hi: String,
    pub name_regional: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub platform_count: i32,
    pub entrance_count: i32,
    pub bridge_count: i32,
}

impl NewStation {
    pub fn create(&self, conn: &mut PgConnection) -> QueryResult<Station> {
        diesel::insert_into(stations::table)
            .values(self)
            .get_result(conn)
    }
}
