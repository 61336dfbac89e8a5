use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::data::models::{ItemKey, ReviewError, ReviewItem};
use crate::data::repositories::ReviewRepository;
use crate::features::scheduler::{select_due_items, Scheduler};

/// Ties the scheduler to the review store: load, update, save with a version check.
pub struct ReviewService;

impl ReviewService {
    /// Registers the learner's first encounter with an item. Existing state is left alone.
    pub fn enroll(
        conn: &mut SqliteConnection,
        scheduler: &Scheduler,
        key: ItemKey,
    ) -> Result<ReviewItem, ReviewError> {
        let record = ReviewRepository::insert_new(conn, &scheduler.new_item(key))?;
        Ok(record.to_item())
    }

    /// Applies one review event. Either the whole update is stored or nothing is.
    pub fn submit(
        conn: &mut SqliteConnection,
        scheduler: &Scheduler,
        key: ItemKey,
        quality: i32,
        now: DateTime<Utc>,
    ) -> Result<ReviewItem, ReviewError> {
        conn.transaction::<_, ReviewError, _>(|conn| {
            let record = ReviewRepository::find(conn, key)?.ok_or(ReviewError::NotFound(key))?;

            let updated = scheduler.record_review(&record.to_item(), quality, now)?;

            if ReviewRepository::save(conn, &updated, record.version)? == 0 {
                log::warn!(
                    "Version {} of review item {}/{} is stale",
                    record.version,
                    key.learner_id,
                    key.item_id
                );
                return Err(ReviewError::Conflict(key));
            }

            log::debug!(
                "Reviewed {}/{} with quality {}: interval {:.2}d, easiness {:.2}",
                key.learner_id,
                key.item_id,
                quality,
                updated.interval(),
                updated.easiness()
            );
            Ok(updated)
        })
    }

    pub fn due_items(
        conn: &mut SqliteConnection,
        learner_id: i32,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Result<Vec<ReviewItem>, ReviewError> {
        let candidates: Vec<ReviewItem> =
            ReviewRepository::find_due_candidates(conn, learner_id, now)?
                .iter()
                .map(|record| record.to_item())
                .collect();

        Ok(select_due_items(&candidates, now, limit))
    }
}
