use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use super::errors::DomainError;
use super::order::Order;

/// Storage boundary for orders. The service computes all derived fields;
/// implementations only move fully-formed records in and out.
pub trait OrderRepository: Send + Sync + 'static {
    fn insert(&self, order: &Order) -> Result<(), DomainError>;

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;

    /// Overwrite the stored record. `NotFound` if the id does not exist.
    fn update(&self, order: &Order) -> Result<(), DomainError>;

    /// All orders, ascending by deadline.
    fn list_by_due_time(&self) -> Result<Vec<Order>, DomainError>;

    /// Delete orders placed strictly before `cutoff`; returns how many went.
    fn delete_placed_before(&self, cutoff: DateTime<FixedOffset>) -> Result<usize, DomainError>;
}
