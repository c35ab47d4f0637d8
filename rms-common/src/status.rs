use strum_macros::{Display, EnumString};

/// Lifecycle status of a train record as sent by feeds and operators.
///
/// Wire and database representation is the human-readable form
/// ("On Time", "Running Late", ...), so conversions go through strum.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Display, EnumString)]
pub enum TrainStatus {
    #[strum(serialize = "On Time")]
    OnTime,
    #[strum(serialize = "Running Late")]
    RunningLate,
    #[strum(serialize = "Arriving Soon")]
    ArrivingSoon,
    #[strum(serialize = "Arrived")]
    Arrived,
    #[strum(serialize = "Departed")]
    Departed,
}

impl TrainStatus {
    /// Terminal statuses make a record eligible for deletion by the sweep.
    pub fn is_terminal(self) -> bool {
        matches!(self, TrainStatus::Arrived | TrainStatus::Departed)
    }

    pub fn active_set() -> [TrainStatus; 3] {
        [
            TrainStatus::OnTime,
            TrainStatus::RunningLate,
            TrainStatus::ArrivingSoon,
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn parses_wire_form() {
        assert_eq!(TrainStatus::from_str("On Time"), Ok(TrainStatus::OnTime));
        assert_eq!(
            TrainStatus::from_str("Arriving Soon"),
            Ok(TrainStatus::ArrivingSoon)
        );
        assert!(TrainStatus::from_str("Cancelled").is_err());
    }

    #[test]
    fn displays_wire_form() {
        assert_eq!(TrainStatus::RunningLate.to_string(), "Running Late");
    }

    #[test]
    fn terminal_set_is_arrived_and_departed() {
        assert!(TrainStatus::Arrived.is_terminal());
        assert!(TrainStatus::Departed.is_terminal());
        for s in TrainStatus::active_set() {
            assert!(!s.is_terminal());
        }
    }
}
