use chrono::{DateTime, FixedOffset, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::ports::OrderRepository;
use crate::schema::orders;

use super::models::OrderRow;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ───────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn insert(&self, order: &Order) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(orders::table)
            .values(OrderRow::from_domain(order))
            .execute(&mut conn)?;
        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(OrderRow::into_domain).transpose()
    }

    fn update(&self, order: &Order) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let row = OrderRow::from_domain(order);
        let affected = diesel::update(orders::table.find(order.id))
            .set(&row)
            .execute(&mut conn)?;
        if affected == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    fn list_by_due_time(&self) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = orders::table
            .select(OrderRow::as_select())
            .order(orders::due_at.asc())
            .load(&mut conn)?;
        rows.into_iter().map(OrderRow::into_domain).collect()
    }

    fn delete_placed_before(&self, cutoff: DateTime<FixedOffset>) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;
        let removed =
            diesel::delete(orders::table.filter(orders::placed_at.lt(cutoff.with_timezone(&Utc))))
                .execute(&mut conn)?;
        Ok(removed)
    }
}
