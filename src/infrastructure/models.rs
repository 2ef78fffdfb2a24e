use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::timing::Timestamp;
use crate::schema::orders;

/// Storage shape of an order. Timestamps are persisted as instants (UTC on
/// the wire to Postgres) and re-expressed in the store zone on load.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub prep_minutes: i32,
    pub due_at: DateTime<Utc>,
    pub status: String,
    pub completed: bool,
    pub customer_name: String,
    pub order_details: String,
}

impl OrderRow {
    pub fn from_domain(order: &Order) -> Self {
        Self {
            id: order.id,
            placed_at: order.placed_at.with_timezone(&Utc),
            prep_minutes: order.prep_minutes,
            due_at: order.due_at.with_timezone(&Utc),
            status: order.status.as_label().to_owned(),
            completed: order.completed,
            customer_name: order.customer_name.clone(),
            order_details: order.order_details.clone(),
        }
    }

    pub fn into_domain(self) -> Result<Order, DomainError> {
        let status = OrderStatus::from_label(&self.status).ok_or_else(|| {
            DomainError::Internal(format!(
                "unknown status '{}' stored for order {}",
                self.status, self.id
            ))
        })?;
        Ok(Order {
            id: self.id,
            placed_at: Timestamp::from(self.placed_at).normalize(),
            prep_minutes: self.prep_minutes,
            due_at: Timestamp::from(self.due_at).normalize(),
            status,
            completed: self.completed,
            customer_name: self.customer_name,
            order_details: self.order_details,
        })
    }
}
