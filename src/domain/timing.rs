//! Due-time computation and urgency classification.
//!
//! Everything here is a pure function of its arguments; in particular the
//! current time is always an explicit parameter, never read from the system
//! clock, so every rule is directly testable.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime};

use super::errors::DomainError;
use super::order::OrderStatus;

/// South African Standard Time (UTC+2). SAST observes no daylight saving,
/// so a fixed offset represents the zone exactly.
pub const STORE_TZ: FixedOffset = match FixedOffset::east_opt(2 * 60 * 60) {
    Some(offset) => offset,
    None => panic!("store offset out of range"),
};

/// Preparation time assumed when an order does not specify one.
pub const DEFAULT_PREP_MINUTES: i32 = 15;

/// Orders within this many minutes of their deadline count as due soon.
/// Both ends of the window are inclusive.
pub const DUE_SOON_WINDOW_MINUTES: f64 = 5.0;

/// Orders placed more than this many hours ago are eligible for archival.
pub const RETENTION_HOURS: i64 = 24;

/// A point in time that may or may not carry a UTC offset.
///
/// Orders arrive from two directions: user-submitted strings, which often
/// lack an offset, and values reloaded from storage, which carry one. Both
/// are accepted everywhere a timestamp is consumed and funnelled through
/// [`Timestamp::normalize`] before any arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestamp {
    /// Carries an explicit offset; converted to the store zone on use.
    Zoned(DateTime<FixedOffset>),
    /// A wall-clock reading with no offset; interpreted as store-local time.
    Wall(NaiveDateTime),
}

impl Timestamp {
    /// Express this timestamp in the store timezone.
    ///
    /// Zoned values keep their instant and change representation; wall-clock
    /// values are taken to already read store time and get the offset
    /// attached. Normalizing an already-store-zone value is a no-op.
    pub fn normalize(self) -> DateTime<FixedOffset> {
        match self {
            Timestamp::Zoned(dt) => dt.with_timezone(&STORE_TZ),
            // A fixed offset maps every wall-clock reading to exactly one
            // instant, so this cannot be ambiguous.
            Timestamp::Wall(wall) => wall
                .and_local_timezone(STORE_TZ)
                .single()
                .expect("fixed offset has no ambiguous local times"),
        }
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Timestamp::Zoned(dt)
    }
}

impl From<DateTime<chrono::Utc>> for Timestamp {
    fn from(dt: DateTime<chrono::Utc>) -> Self {
        Timestamp::Zoned(dt.fixed_offset())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(wall: NaiveDateTime) -> Self {
        Timestamp::Wall(wall)
    }
}

/// Accepted layouts for timestamps submitted without an offset.
const WALL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a user-submitted timestamp string.
///
/// RFC 3339 values keep their offset; the naive layouts above are read as
/// store-local wall time. Anything else is a validation failure.
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, DomainError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Timestamp::Zoned(dt));
    }
    for format in WALL_FORMATS {
        if let Ok(wall) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Timestamp::Wall(wall));
        }
    }
    Err(DomainError::InvalidInput(format!(
        "unrecognized timestamp '{raw}'"
    )))
}

/// Reject negative preparation times.
///
/// Policy: invalid durations are refused outright rather than clamped to
/// zero, so a bad value never reaches due-time arithmetic.
pub fn validate_prep_minutes(minutes: i32) -> Result<i32, DomainError> {
    if minutes < 0 {
        return Err(DomainError::InvalidInput(format!(
            "prep_time must be zero or more minutes, got {minutes}"
        )));
    }
    Ok(minutes)
}

/// Deadline for an order: placement time plus preparation minutes, in the
/// store timezone.
pub fn compute_due_time(placed_at: Timestamp, prep_minutes: i32) -> DateTime<FixedOffset> {
    placed_at.normalize() + Duration::minutes(i64::from(prep_minutes))
}

/// Classify an order's urgency at `now`.
///
/// A completed order is `Completed` no matter what the clock says. Otherwise
/// the remaining time decides: past due is `Late`, within the due-soon
/// window (inclusive at zero and at the window edge) is `DueSoon`, and
/// anything further out is `OnTime`.
pub fn classify_status(
    due_at: Timestamp,
    completed: bool,
    now: DateTime<FixedOffset>,
) -> OrderStatus {
    let due_at = due_at.normalize();
    if completed {
        return OrderStatus::Completed;
    }
    let minutes_remaining = due_at.signed_duration_since(now).num_milliseconds() as f64 / 60_000.0;
    if minutes_remaining < 0.0 {
        OrderStatus::Late
    } else if minutes_remaining <= DUE_SOON_WINDOW_MINUTES {
        OrderStatus::DueSoon
    } else {
        OrderStatus::OnTime
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    fn store_time(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        STORE_TZ
            .with_ymd_and_hms(2024, 1, 15, h, m, s)
            .single()
            .expect("valid test time")
    }

    fn wall(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .expect("valid test date")
            .and_hms_opt(h, m, s)
            .expect("valid test time")
    }

    #[test]
    fn normalize_attaches_store_zone_to_wall_time() {
        let normalized = Timestamp::Wall(wall(12, 0, 0)).normalize();
        assert_eq!(normalized, store_time(12, 0, 0));
        assert_eq!(normalized.offset(), &STORE_TZ);
    }

    #[test]
    fn normalize_converts_other_zones_to_store_zone() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let normalized = Timestamp::from(utc).normalize();
        // Same instant, store-zone representation.
        assert_eq!(normalized, utc);
        assert_eq!(normalized.to_rfc3339(), "2024-01-15T12:00:00+02:00");
    }

    #[test]
    fn normalize_is_a_no_op_on_store_zone_input() {
        let already = store_time(12, 0, 0);
        let normalized = Timestamp::Zoned(already).normalize();
        assert_eq!(normalized, already);
        assert_eq!(normalized.to_rfc3339(), already.to_rfc3339());
    }

    #[test]
    fn due_time_adds_prep_minutes() {
        let due = compute_due_time(Timestamp::Zoned(store_time(12, 0, 0)), 15);
        assert_eq!(due, store_time(12, 15, 0));

        let due = compute_due_time(Timestamp::Wall(wall(12, 0, 0)), 0);
        assert_eq!(due, store_time(12, 0, 0));
    }

    #[test]
    fn lunchtime_order_walkthrough() {
        let placed = DateTime::parse_from_rfc3339("2024-01-15T12:00:00+02:00").unwrap();
        let due = compute_due_time(Timestamp::Zoned(placed), 15);
        assert_eq!(due.to_rfc3339(), "2024-01-15T12:15:00+02:00");

        // Four minutes remaining.
        assert_eq!(
            classify_status(Timestamp::Zoned(due), false, store_time(12, 11, 0)),
            OrderStatus::DueSoon
        );
        // Five minutes past due.
        assert_eq!(
            classify_status(Timestamp::Zoned(due), false, store_time(12, 20, 0)),
            OrderStatus::Late
        );
    }

    #[test]
    fn status_boundaries_are_inclusive_on_the_due_soon_side() {
        let now = store_time(12, 0, 0);

        // Exactly due counts as due soon, not late.
        assert_eq!(
            classify_status(Timestamp::Zoned(now), false, now),
            OrderStatus::DueSoon
        );
        // Exactly at the window edge still counts as due soon.
        assert_eq!(
            classify_status(Timestamp::Zoned(now + Duration::minutes(5)), false, now),
            OrderStatus::DueSoon
        );
        // One second beyond the window is on time.
        assert_eq!(
            classify_status(
                Timestamp::Zoned(now + Duration::minutes(5) + Duration::seconds(1)),
                false,
                now
            ),
            OrderStatus::OnTime
        );
        // One second past due is late.
        assert_eq!(
            classify_status(Timestamp::Zoned(now - Duration::seconds(1)), false, now),
            OrderStatus::Late
        );
    }

    #[test]
    fn completed_overrides_any_deadline() {
        let now = store_time(12, 0, 0);
        let past = now - Duration::hours(3);
        let future = now + Duration::hours(3);

        assert_eq!(
            classify_status(Timestamp::Zoned(past), true, now),
            OrderStatus::Completed
        );
        assert_eq!(
            classify_status(Timestamp::Zoned(future), true, now),
            OrderStatus::Completed
        );
    }

    #[test]
    fn classify_accepts_wall_clock_deadlines() {
        // A deadline stored without an offset is read as store time.
        assert_eq!(
            classify_status(Timestamp::Wall(wall(12, 4, 0)), false, store_time(12, 0, 0)),
            OrderStatus::DueSoon
        );
    }

    #[test]
    fn parse_keeps_explicit_offsets() {
        let ts = parse_timestamp("2024-01-15T12:00:00+02:00").unwrap();
        assert_eq!(ts, Timestamp::Zoned(store_time(12, 0, 0)));

        let ts = parse_timestamp("2024-01-15T10:00:00Z").unwrap();
        assert_eq!(ts.normalize(), store_time(12, 0, 0));
    }

    #[test]
    fn parse_reads_naive_strings_as_wall_time() {
        assert_eq!(
            parse_timestamp("2024-01-15T12:00:00").unwrap(),
            Timestamp::Wall(wall(12, 0, 0))
        );
        // The minute-precision layout browsers submit.
        assert_eq!(
            parse_timestamp("2024-01-15T12:00").unwrap(),
            Timestamp::Wall(wall(12, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-15 12:00:00").unwrap(),
            Timestamp::Wall(wall(12, 0, 0))
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = parse_timestamp("half past noon").unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn negative_prep_minutes_are_rejected_not_clamped() {
        let err = validate_prep_minutes(-5).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        assert_eq!(validate_prep_minutes(0).unwrap(), 0);
        assert_eq!(validate_prep_minutes(45).unwrap(), 45);
    }
}
