//! Active-train lifecycle reconciliation.
//!
//! The sweep deletes trains that are finished (Arrived/Departed), stale
//! (estimated departure set but no feed update for 15 minutes), or past
//! their departure window in station-local time. It runs on a fixed
//! background interval and again at the top of every active-trains listing,
//! so a listing never shows a record the sweep would have removed.

use std::str::FromStr;
use std::time::Duration as StdDuration;

use actix_web::{rt, web};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use diesel::{PgConnection, QueryResult};
use rms_common::clock::{is_past_departure, ClockTime};
use rms_common::status::TrainStatus;
use rms_db::connection::PgPool;
use rms_db::models::train::Train;
use tracing::{debug, warn};

pub const SWEEP_INTERVAL_SECS: u64 = 60;

/// No feed update for this long (with an estimated departure on record)
/// counts the train as abandoned by the feed.
pub const STALE_AFTER_MINS: i64 = 15;

/// Whether one train record should be removed by the sweep.
pub fn should_sweep(
    status: &str,
    etd: &str,
    updated_at: NaiveDateTime,
    now_utc: DateTime<Utc>,
) -> bool {
    match TrainStatus::from_str(status) {
        Ok(s) if s.is_terminal() => return true,
        Ok(_) => {}
        Err(_) => {
            warn!(status, "unknown train status, leaving record in place");
            return false;
        }
    }

    if etd.is_empty() {
        return false;
    }

    if now_utc.naive_utc() - updated_at > Duration::minutes(STALE_AFTER_MINS) {
        return true;
    }

    match ClockTime::from_str(etd) {
        Ok(t) => is_past_departure(t, now_utc),
        Err(e) => {
            warn!(etd, error = %e, "unparseable estimated departure, leaving record in place");
            false
        }
    }
}

/// One cleanup pass over the whole trains table. Returns how many records
/// were deleted. Idempotent: overlapping sweeps delete disjoint or already
/// gone rows.
pub fn sweep(conn: &mut PgConnection) -> QueryResult<usize> {
    let now = Utc::now();
    let doomed: Vec<i32> = Train::sweep_candidates(conn)?
        .into_iter()
        .filter(|(_, status, etd, updated_at)| should_sweep(status, etd, *updated_at, now))
        .map(|(id, _, _, _)| id)
        .collect();

    if doomed.is_empty() {
        return Ok(0);
    }
    let removed = Train::delete_by_ids(&doomed, conn)?;
    debug!(removed, "reconciliation sweep removed finished/stale trains");
    Ok(removed)
}

/// Background schedule for the sweep, so cleanup does not depend on anyone
/// polling the listing endpoint.
pub fn spawn_sweeper(pool: PgPool) {
    rt::spawn(async move {
        let mut tick = rt::time::interval(StdDuration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            tick.tick().await;
            let pool = pool.clone();
            let outcome = web::block(move || -> anyhow::Result<usize> {
                let mut conn = pool.get()?;
                Ok(sweep(&mut conn)?)
            })
            .await;
            match outcome {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!(error = %e, "reconciliation sweep failed"),
                Err(e) => warn!(error = %e, "reconciliation sweep did not run"),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn local(h: u32, m: u32) -> DateTime<Utc> {
        // UTC instant whose station-local (+05:30) time is h:m on 2025-07-14.
        Utc.with_ymd_and_hms(2025, 7, 14, h, m, 0).unwrap() - Duration::minutes(330)
    }

    fn updated(now: DateTime<Utc>, mins_ago: i64) -> NaiveDateTime {
        (now - Duration::minutes(mins_ago)).naive_utc()
    }

    #[test]
    fn terminal_statuses_are_always_swept() {
        let now = local(12, 0);
        assert!(should_sweep("Arrived", "", updated(now, 0), now));
        assert!(should_sweep("Departed", "13:00", updated(now, 1), now));
    }

    #[test]
    fn active_train_without_etd_is_kept() {
        let now = local(12, 0);
        assert!(!should_sweep("On Time", "", updated(now, 60), now));
    }

    #[test]
    fn stale_update_with_etd_is_swept() {
        // ETD 10:00, last update 20 minutes ago, local clock 10:20.
        let now = local(10, 20);
        assert!(should_sweep("On Time", "10:00", updated(now, 20), now));
    }

    #[test]
    fn fresh_update_before_window_is_kept() {
        let now = local(10, 10);
        assert!(!should_sweep("Running Late", "10:30", updated(now, 2), now));
    }

    #[test]
    fn past_departure_window_is_swept_even_when_fresh() {
        // Updated a minute ago, but the departure window closed at 10:15.
        let now = local(10, 30);
        assert!(should_sweep("Arriving Soon", "10:00", updated(now, 1), now));
    }

    #[test]
    fn malformed_etd_is_kept_not_miscomputed() {
        let now = local(10, 30);
        assert!(!should_sweep("On Time", "10:0x", updated(now, 1), now));
    }

    #[test]
    fn unknown_status_is_left_in_place() {
        let now = local(10, 30);
        assert!(!should_sweep("Cancelled", "09:00", updated(now, 60), now));
    }
}
