use std::fmt;

use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use super::timing::{self, Timestamp};

/// Urgency of an order relative to its deadline.
///
/// Derived by [`timing::classify_status`]; the persisted value is only a
/// cache of the last computation and is refreshed before every external
/// read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    OnTime,
    DueSoon,
    Late,
    Completed,
}

impl OrderStatus {
    /// The label used on the wire and in storage.
    pub fn as_label(self) -> &'static str {
        match self {
            OrderStatus::OnTime => "On Time",
            OrderStatus::DueSoon => "Due Soon",
            OrderStatus::Late => "Late",
            OrderStatus::Completed => "Completed",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "On Time" => Some(OrderStatus::OnTime),
            "Due Soon" => Some(OrderStatus::DueSoon),
            "Late" => Some(OrderStatus::Late),
            "Completed" => Some(OrderStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// One customer order with its timing state.
///
/// `due_at` is always placement time plus prep minutes and `status` is
/// always a function of the deadline, the completion flag and the clock;
/// the refresh methods below keep both in step whenever an input changes.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub placed_at: DateTime<FixedOffset>,
    pub prep_minutes: i32,
    pub due_at: DateTime<FixedOffset>,
    pub status: OrderStatus,
    pub completed: bool,
    pub customer_name: String,
    pub order_details: String,
}

impl Order {
    /// Recompute the deadline from the placement time and prep duration.
    pub fn refresh_due_time(&mut self) {
        self.due_at = timing::compute_due_time(Timestamp::Zoned(self.placed_at), self.prep_minutes);
    }

    /// Recompute the urgency classification at `now`.
    pub fn refresh_status(&mut self, now: DateTime<FixedOffset>) {
        self.status = timing::classify_status(Timestamp::Zoned(self.due_at), self.completed, now);
    }
}

/// Caller-supplied fields for a new order.
#[derive(Debug, Clone)]
pub struct OrderInput {
    pub placed_at: Timestamp,
    pub prep_minutes: Option<i32>,
    pub customer_name: String,
    pub order_details: String,
}

/// Partial update to an existing order. Absent fields are left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderChanges {
    pub completed: Option<bool>,
    pub prep_minutes: Option<i32>,
}
