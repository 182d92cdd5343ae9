//! Pure decision logic for the playdate workflow: request and playdate
//! state machines plus proposed-time validation. Statuses are stored as
//! strings and round-trip through these types.

use chrono::{DateTime, Utc};

pub const MIN_PROPOSED_TIMES: usize = 1;
pub const MAX_PROPOSED_TIMES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            other => Err(format!("unknown request status: {other}")),
        }
    }
}

/// pending -> accepted | declined; resolved requests are final.
pub fn request_can_transition(from: RequestStatus, to: RequestStatus) -> bool {
    matches!(
        (from, to),
        (RequestStatus::Pending, RequestStatus::Accepted)
            | (RequestStatus::Pending, RequestStatus::Declined)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaydateStatus {
    Scheduled,
    Completed,
    Canceled,
}

impl PlaydateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }
}

impl std::str::FromStr for PlaydateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            other => Err(format!("unknown playdate status: {other}")),
        }
    }
}

/// scheduled -> completed | canceled; terminal states stay terminal.
pub fn playdate_can_transition(from: PlaydateStatus, to: PlaydateStatus) -> bool {
    matches!(
        (from, to),
        (PlaydateStatus::Scheduled, PlaydateStatus::Completed)
            | (PlaydateStatus::Scheduled, PlaydateStatus::Canceled)
    )
}

/// 1-5 distinct timeslots, all in the future.
pub fn validate_proposed_times(times: &[DateTime<Utc>], now: DateTime<Utc>) -> Result<(), String> {
    if times.len() < MIN_PROPOSED_TIMES || times.len() > MAX_PROPOSED_TIMES {
        return Err(format!(
            "propose between {MIN_PROPOSED_TIMES} and {MAX_PROPOSED_TIMES} timeslots"
        ));
    }
    if times.iter().any(|t| *t <= now) {
        return Err("all proposed times must be in the future".into());
    }
    for (i, t) in times.iter().enumerate() {
        if times[..i].contains(t) {
            return Err("proposed times must be distinct".into());
        }
    }
    Ok(())
}

/// Accepting requires picking one of the proposed slots.
pub fn validate_selected_time(
    selected: DateTime<Utc>,
    proposed: &[DateTime<Utc>],
) -> Result<(), String> {
    if proposed.contains(&selected) {
        Ok(())
    } else {
        Err("selected time is not one of the proposed times".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::str::FromStr;

    #[test]
    fn request_statuses_round_trip() {
        for status in [RequestStatus::Pending, RequestStatus::Accepted, RequestStatus::Declined] {
            assert_eq!(RequestStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(RequestStatus::from_str("none").is_err());
    }

    #[test]
    fn playdate_statuses_round_trip() {
        for status in [PlaydateStatus::Scheduled, PlaydateStatus::Completed, PlaydateStatus::Canceled] {
            assert_eq!(PlaydateStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(PlaydateStatus::from_str("none").is_err());
    }

    #[test]
    fn pending_requests_resolve_once() {
        assert!(request_can_transition(RequestStatus::Pending, RequestStatus::Accepted));
        assert!(request_can_transition(RequestStatus::Pending, RequestStatus::Declined));

        assert!(!request_can_transition(RequestStatus::Accepted, RequestStatus::Declined));
        assert!(!request_can_transition(RequestStatus::Accepted, RequestStatus::Pending));
        assert!(!request_can_transition(RequestStatus::Declined, RequestStatus::Accepted));
        assert!(!request_can_transition(RequestStatus::Pending, RequestStatus::Pending));
    }

    #[test]
    fn scheduled_playdates_finish_once() {
        assert!(playdate_can_transition(PlaydateStatus::Scheduled, PlaydateStatus::Completed));
        assert!(playdate_can_transition(PlaydateStatus::Scheduled, PlaydateStatus::Canceled));

        assert!(!playdate_can_transition(PlaydateStatus::Completed, PlaydateStatus::Canceled));
        assert!(!playdate_can_transition(PlaydateStatus::Canceled, PlaydateStatus::Scheduled));
        assert!(!playdate_can_transition(PlaydateStatus::Completed, PlaydateStatus::Scheduled));
    }

    #[test]
    fn proposed_times_bounds() {
        let now = Utc::now();
        let future = |h: i64| now + Duration::hours(h);

        assert!(validate_proposed_times(&[], now).is_err());
        assert!(validate_proposed_times(&[future(1)], now).is_ok());
        assert!(validate_proposed_times(
            &[future(1), future(2), future(3), future(4), future(5)],
            now
        )
        .is_ok());
        assert!(validate_proposed_times(
            &[future(1), future(2), future(3), future(4), future(5), future(6)],
            now
        )
        .is_err());
    }

    #[test]
    fn proposed_times_must_be_future_and_distinct() {
        let now = Utc::now();
        let past = now - Duration::hours(1);
        let future = now + Duration::hours(1);

        assert!(validate_proposed_times(&[past], now).is_err());
        assert!(validate_proposed_times(&[now], now).is_err());
        assert!(validate_proposed_times(&[future, future], now).is_err());
    }

    #[test]
    fn selected_time_must_be_proposed() {
        let now = Utc::now();
        let a = now + Duration::hours(1);
        let b = now + Duration::hours(2);
        let other = now + Duration::hours(3);

        assert!(validate_selected_time(a, &[a, b]).is_ok());
        assert!(validate_selected_time(other, &[a, b]).is_err());
    }
}
