//! Per-station platform/device inventory. The platform list is a jsonb
//! document: an ordered list of platforms, each with an ordered device list.

use crate::schema::station_devices;
use crate::schema::station_devices::dsl::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub device_type: String,
    pub ip_address: String,
    pub enabled: bool,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub platform_no: i32,
    pub devices: Vec<Device>,
}

/// Merge-on-write: devices land under an existing platform with the same
/// number, otherwise the whole incoming platform is appended. Devices are
/// concatenated as-is; resubmitting the same device duplicates it.
pub fn merge_platforms(existing: &mut Vec<Platform>, incoming: Vec<Platform>) {
    for platform in incoming {
        match existing
            .iter_mut()
            .find(|p| p.platform_no == platform.platform_no)
        {
            Some(hit) => hit.devices.extend(platform.devices),
            None => existing.push(platform),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Identifiable, Queryable, Clone)]
#[diesel(table_name = station_devices)]
pub struct StationDevices {
    pub id: i32,
    pub station_code: String,
    pub platforms: Value,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl StationDevices {
    pub fn find_by_station(c: &str, conn: &mut PgConnection) -> QueryResult<Option<Self>> {
        station_devices
            .filter(station_code.eq(c))
            .first(conn)
            .optional()
    }

    pub fn update_platforms(
        &self,
        doc: Value,
        now: NaiveDateTime,
        conn: &mut PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(station_devices.find(self.id))
            .set((platforms.eq(doc), updated_at.eq(now)))
            .get_result(conn)
    }

    pub fn delete_by_station(c: &str, conn: &mut PgConnection) -> QueryResult<usize> {
        diesel::delete(station_devices.filter(station_code.eq(c))).execute(conn)
    }
}

#[derive(Debug, Serialize, Deserialize, Insertable)]
#[diesel(table_name = station_devices)]
pub struct NewStationDevices {
    pub station_code: String,
    pub platforms: Value,
}

impl NewStationDevices {
    pub fn create(&self, conn: &mut PgConnection) -> QueryResult<StationDevices> {
        diesel::insert_into(station_devices::table)
            .values(self)
            .get_result(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(ip: &str) -> Device {
        Device {
            device_type: "CGDB".to_string(),
            ip_address: ip.to_string(),
            enabled: true,
            status: "online".to_string(),
        }
    }

    fn platform(no: i32, devices: Vec<Device>) -> Platform {
        Platform {
            platform_no: no,
            devices,
        }
    }

    #[test]
    fn matched_platform_appends_devices() {
        let mut existing = vec![platform(1, vec![device("10.0.0.1"), device("10.0.0.2")])];
        merge_platforms(
            &mut existing,
            vec![platform(1, vec![device("10.0.0.3")])],
        );
        assert_eq!(existing.len(), 1);
        assert_eq!(existing[0].devices.len(), 3);
        assert_eq!(existing[0].devices[2].ip_address, "10.0.0.3");
    }

    #[test]
    fn unmatched_platform_is_appended_whole() {
        let mut existing = vec![platform(1, vec![device("10.0.0.1")])];
        merge_platforms(
            &mut existing,
            vec![platform(2, vec![device("10.0.1.1"), device("10.0.1.2")])],
        );
        assert_eq!(existing.len(), 2);
        assert_eq!(existing[1].platform_no, 2);
        assert_eq!(existing[1].devices.len(), 2);
    }

    #[test]
    fn resubmitted_device_is_duplicated_not_deduplicated() {
        let mut existing = vec![platform(1, vec![device("10.0.0.1")])];
        merge_platforms(&mut existing, vec![platform(1, vec![device("10.0.0.1")])]);
        assert_eq!(existing[0].devices.len(), 2);
        assert_eq!(existing[0].devices[0], existing[0].devices[1]);
    }

    #[test]
    fn merge_length_is_sum_of_parts() {
        let mut existing = vec![platform(3, vec![device("10.0.3.1"), device("10.0.3.2")])];
        let before = existing[0].devices.len();
        let incoming = vec![platform(3, vec![device("10.0.3.3"), device("10.0.3.4")])];
        let added = incoming[0].devices.len();
        merge_platforms(&mut existing, incoming);
        assert_eq!(existing[0].devices.len(), before + added);
    }
}
