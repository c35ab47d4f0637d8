//! Enumerations from the CAP 1.2 `<info>` block. Values are validated on
//! ingest and stored in their canonical string form.

use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Display, EnumString)]
pub enum Category {
    Geo,
    Met,
    Safety,
    Security,
    Rescue,
    Fire,
    Health,
    Env,
    Transport,
    Infra,
    #[strum(serialize = "CBRNE")]
    Cbrne,
    Other,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Display, EnumString)]
pub enum Urgency {
    Immediate,
    Expected,
    Future,
    Past,
    Unknown,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Display, EnumString)]
pub enum Severity {
    Extreme,
    Severe,
    Moderate,
    Minor,
    Unknown,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Display, EnumString)]
pub enum Certainty {
    Observed,
    Likely,
    Possible,
    Unlikely,
    Unknown,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn parses_canonical_values() {
        assert_eq!(Category::from_str("Transport"), Ok(Category::Transport));
        assert_eq!(Category::from_str("CBRNE"), Ok(Category::Cbrne));
        assert_eq!(Urgency::from_str("Immediate"), Ok(Urgency::Immediate));
        assert_eq!(Severity::from_str("Extreme"), Ok(Severity::Extreme));
        assert_eq!(Certainty::from_str("Observed"), Ok(Certainty::Observed));
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(Severity::from_str("Catastrophic").is_err());
        assert!(Urgency::from_str("soon").is_err());
    }
}
