use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Pending,
    Active,
    Declined,
    Expired,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Declined => "declined",
            Self::Expired => "expired",
        }
    }
}

impl std::str::FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "declined" => Ok(Self::Declined),
            "expired" => Ok(Self::Expired),
            other => Err(format!("unknown match status: {other}")),
        }
    }
}

/// Expiry is evaluated lazily at read time: a pending match past its
/// expiry timestamp is expired, everything else keeps its stored status.
/// Accepting stops the clock.
pub fn effective_status(stored: MatchStatus, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> MatchStatus {
    if stored == MatchStatus::Pending && expires_at < now {
        MatchStatus::Expired
    } else {
        stored
    }
}

/// A respond transition is only valid from pending.
pub fn can_respond(status: MatchStatus) -> bool {
    status == MatchStatus::Pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            MatchStatus::Pending,
            MatchStatus::Active,
            MatchStatus::Declined,
            MatchStatus::Expired,
        ] {
            assert_eq!(MatchStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(MatchStatus::from_str("paused").is_err());
    }

    #[test]
    fn pending_past_expiry_reads_as_expired() {
        let now = Utc::now();
        let past = now - Duration::hours(1);
        let future = now + Duration::hours(1);

        assert_eq!(effective_status(MatchStatus::Pending, past, now), MatchStatus::Expired);
        assert_eq!(effective_status(MatchStatus::Pending, future, now), MatchStatus::Pending);
    }

    #[test]
    fn accepted_matches_do_not_expire() {
        let now = Utc::now();
        let past = now - Duration::hours(1);

        assert_eq!(effective_status(MatchStatus::Active, past, now), MatchStatus::Active);
        assert_eq!(effective_status(MatchStatus::Declined, past, now), MatchStatus::Declined);
    }

    #[test]
    fn only_pending_accepts_a_response() {
        assert!(can_respond(MatchStatus::Pending));
        assert!(!can_respond(MatchStatus::Active));
        assert!(!can_respond(MatchStatus::Declined));
        assert!(!can_respond(MatchStatus::Expired));
    }
}
