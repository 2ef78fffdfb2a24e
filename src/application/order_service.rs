use chrono::{DateTime, Duration, FixedOffset};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderChanges, OrderInput};
use crate::domain::ports::OrderRepository;
use crate::domain::timing::{self, Timestamp, DEFAULT_PREP_MINUTES, RETENTION_HOURS};

/// Sequences the timing engine and the repository for each order operation.
///
/// Every method takes the current time as a parameter so the service stays
/// as testable as the engine underneath it.
pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create an order: validate the prep duration, compute the deadline and
    /// initial status, persist, and return the stored record.
    pub fn create_order(
        &self,
        input: OrderInput,
        now: DateTime<FixedOffset>,
    ) -> Result<Order, DomainError> {
        let prep_minutes =
            timing::validate_prep_minutes(input.prep_minutes.unwrap_or(DEFAULT_PREP_MINUTES))?;
        let due_at = timing::compute_due_time(input.placed_at, prep_minutes);
        let status = timing::classify_status(Timestamp::Zoned(due_at), false, now);

        let order = Order {
            id: Uuid::new_v4(),
            placed_at: input.placed_at.normalize(),
            prep_minutes,
            due_at,
            status,
            completed: false,
            customer_name: input.customer_name,
            order_details: input.order_details,
        };
        self.repo.insert(&order)?;
        Ok(order)
    }

    /// Apply a partial update. The completion flag lands before the status
    /// recomputation; a prep-time change recomputes the deadline first.
    pub fn update_order(
        &self,
        id: Uuid,
        changes: OrderChanges,
        now: DateTime<FixedOffset>,
    ) -> Result<Order, DomainError> {
        let mut order = self.repo.find_by_id(id)?.ok_or(DomainError::NotFound)?;

        if let Some(completed) = changes.completed {
            order.completed = completed;
        }
        if let Some(prep_minutes) = changes.prep_minutes {
            order.prep_minutes = timing::validate_prep_minutes(prep_minutes)?;
            order.refresh_due_time();
        }
        order.refresh_status(now);

        self.repo.update(&order)?;
        Ok(order)
    }

    /// All orders ascending by deadline, each with its status freshly
    /// classified at `now`. The stored status is only a cache; it catches up
    /// on the next write.
    pub fn list_orders(&self, now: DateTime<FixedOffset>) -> Result<Vec<Order>, DomainError> {
        let mut orders = self.repo.list_by_due_time()?;
        for order in &mut orders {
            order.refresh_status(now);
        }
        Ok(orders)
    }

    /// Drop orders placed more than the retention window before `now`.
    /// The cutoff only moves forward, so an immediate re-run removes nothing.
    pub fn archive_older_than(&self, now: DateTime<FixedOffset>) -> Result<usize, DomainError> {
        let cutoff = now - Duration::hours(RETENTION_HOURS);
        self.repo.delete_placed_before(cutoff)
    }
}
