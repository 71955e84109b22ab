//! User-facing edits of recurring templates and their occurrences.

use chrono::NaiveDate;
use model::Frequency;
use model::entities::transaction;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder,
};
use tracing::{debug, info};

use crate::error::{RecurrenceError, Result};

/// Every row currently flagged recurring, by id.
pub async fn list_templates<C: ConnectionTrait>(conn: &C) -> Result<Vec<transaction::Model>> {
    Ok(transaction::Entity::find()
        .filter(transaction::Column::IsRecurrent.eq(true))
        .order_by_asc(transaction::Column::Id)
        .all(conn)
        .await?)
}

async fn find<C: ConnectionTrait>(conn: &C, id: i32) -> Result<transaction::Model> {
    transaction::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(RecurrenceError::NotFound(id))
}

/// Turns a transaction into a template repeating at `frequency`.
///
/// An existing watermark is kept, so a template that was stopped and is now
/// reactivated catches up on the periods it missed at the next tick.
pub async fn mark_recurring<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    frequency: Frequency,
) -> Result<transaction::Model> {
    let current = find(conn, id).await?;

    if current.is_recurrent {
        match current.parsed_frequency() {
            Some(existing) if existing == frequency => {
                debug!(template_id = id, %frequency, "Template already recurring");
                return Ok(current);
            }
            Some(existing) => {
                return Err(RecurrenceError::FrequencyLocked {
                    id,
                    current: existing.to_string(),
                });
            }
            // An inert template may be repaired in place.
            None => {}
        }
    }

    let mut active = current.into_active_model();
    active.is_recurrent = Set(true);
    active.frequency = Set(Some(frequency.as_str().to_string()));
    let updated = active.update(conn).await?;

    info!(template_id = id, %frequency, watermark = %updated.watermark(), "Marked transaction recurring");
    Ok(updated)
}

/// Stops a template. Occurrences it already produced stay as they are.
pub async fn stop_recurring<C: ConnectionTrait>(conn: &C, id: i32) -> Result<transaction::Model> {
    let current = find(conn, id).await?;
    if !current.is_recurrent && current.frequency.is_none() {
        return Ok(current);
    }

    let mut active = current.into_active_model();
    active.is_recurrent = Set(false);
    active.frequency = Set(None);
    let updated = active.update(conn).await?;

    info!(template_id = id, "Stopped recurring template");
    Ok(updated)
}

/// Marks a concrete transaction as paid on `paid_on`.
pub async fn settle<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    paid_on: NaiveDate,
) -> Result<transaction::Model> {
    let current = find(conn, id).await?;
    if current.is_recurrent {
        return Err(RecurrenceError::NotAnOccurrence(id));
    }

    let mut active = current.into_active_model();
    active.is_paid = Set(true);
    active.payment_date = Set(Some(paid_on));
    let updated = active.update(conn).await?;

    info!(transaction_id = id, %paid_on, "Settled transaction");
    Ok(updated)
}

/// Deletes a transaction, template or occurrence.
///
/// Deleting a template stops generation for good. The occurrences it already
/// produced are independent rows and stay.
pub async fn delete_transaction<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<transaction::Model> {
    let current = find(conn, id).await?;
    current.clone().delete(conn).await?;

    info!(
        transaction_id = id,
        was_template = current.is_recurrent,
        "Deleted transaction"
    );
    Ok(current)
}
