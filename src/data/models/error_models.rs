use diesel::result::Error as DieselError;
use thiserror::Error;

use super::ItemKey;

// Scheduler-level errors. Neither variant mutates the item.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("Quality must be between 0 and 5, got {0}")]
    InvalidQuality(i32),
    #[error("Invalid stored review state: {0}")]
    InvalidState(String),
}

// Errors surfaced by the review service and API
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error("Review item not found for learner {} and item {}", .0.learner_id, .0.item_id)]
    NotFound(ItemKey),
    #[error("Review item for learner {} and item {} was modified concurrently", .0.learner_id, .0.item_id)]
    Conflict(ItemKey),
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Database error")]
    DatabaseError(DieselError),
    #[error("Connection pool error: {0}")]
    PoolError(String),
}
