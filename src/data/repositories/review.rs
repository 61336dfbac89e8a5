use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::data::models::{ItemKey, ReviewItem, ReviewRecord};
use crate::schema::review_items;

pub struct ReviewRepository;

impl ReviewRepository {
    pub fn find(
        conn: &mut SqliteConnection,
        key: ItemKey,
    ) -> Result<Option<ReviewRecord>, diesel::result::Error> {
        review_items::table
            .find((key.learner_id, key.item_id))
            .select(ReviewRecord::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_for_learner(
        conn: &mut SqliteConnection,
        learner_id: i32,
    ) -> Result<Vec<ReviewRecord>, diesel::result::Error> {
        review_items::table
            .filter(review_items::learner_id.eq(learner_id))
            .order_by(review_items::item_id.asc())
            .select(ReviewRecord::as_select())
            .load(conn)
    }

    /// Candidate set for a due query: never-reviewed rows plus rows due at or before `now`.
    /// Final ordering is left to the scheduler.
    pub fn find_due_candidates(
        conn: &mut SqliteConnection,
        learner_id: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReviewRecord>, diesel::result::Error> {
        review_items::table
            .filter(review_items::learner_id.eq(learner_id))
            .filter(
                review_items::due_at
                    .is_null()
                    .or(review_items::due_at.le(now.naive_utc())),
            )
            .order_by(review_items::item_id.asc())
            .select(ReviewRecord::as_select())
            .load(conn)
    }

    /// Stores a fresh item unless the learner already has one for this key.
    /// Returns the row as stored either way.
    pub fn insert_new(
        conn: &mut SqliteConnection,
        item: &ReviewItem,
    ) -> Result<ReviewRecord, diesel::result::Error> {
        diesel::insert_into(review_items::table)
            .values(&ReviewRecord::from_item(item, 0))
            .on_conflict((review_items::learner_id, review_items::item_id))
            .do_nothing()
            .execute(conn)?;

        let key = item.key();
        review_items::table
            .find((key.learner_id, key.item_id))
            .select(ReviewRecord::as_select())
            .first(conn)
    }

    /// Writes `item` only if the stored row still has `expected_version`.
    ///
    /// Returns the number of rows updated: 0 means the row changed underneath the caller
    /// (or no longer exists).
    pub fn save(
        conn: &mut SqliteConnection,
        item: &ReviewItem,
        expected_version: i32,
    ) -> Result<usize, diesel::result::Error> {
        let record = ReviewRecord::from_item(item, expected_version + 1);

        diesel::update(
            review_items::table
                .filter(review_items::learner_id.eq(record.learner_id))
                .filter(review_items::item_id.eq(record.item_id))
                .filter(review_items::version.eq(expected_version)),
        )
        .set((
            review_items::easiness.eq(record.easiness),
            review_items::interval_days.eq(record.interval_days),
            review_items::repetition.eq(record.repetition),
            review_items::last_reviewed_at.eq(record.last_reviewed_at),
            review_items::due_at.eq(record.due_at),
            review_items::version.eq(record.version),
        ))
        .execute(conn)
    }
}
