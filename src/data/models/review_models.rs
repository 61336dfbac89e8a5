use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::SchedulerConfig;
use crate::schema::review_items;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Identifies one item for one learner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    pub learner_id: i32,
    pub item_id: i32,
}

impl ItemKey {
    pub fn new(learner_id: i32, item_id: i32) -> Self {
        Self { learner_id, item_id }
    }
}

/// Where an item sits in the review lifecycle. Derived from the item state, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStage {
    New,
    Lapsed,
    Learning,
    Young,
    Mature,
}

/// Scheduling state of one memorized unit (character, word, sentence) for one learner.
///
/// Values are immutable: the scheduler returns a new item for every review. `due_at` is
/// computed from `last_reviewed_at` and `interval`, so the two can never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    key: ItemKey,
    easiness: f64,
    interval: f64,
    repetition: u32,
    last_reviewed_at: Option<DateTime<Utc>>,
}

impl ReviewItem {
    /// A never-reviewed item, as created on the learner's first encounter.
    pub fn new(key: ItemKey, config: &SchedulerConfig) -> Self {
        Self {
            key,
            easiness: config.initial_easiness,
            interval: 0.0,
            repetition: 0,
            last_reviewed_at: None,
        }
    }

    /// Rebuilds an item from stored fields. No checks are made here; the scheduler rejects
    /// inconsistent state before updating it.
    pub fn from_parts(
        key: ItemKey,
        easiness: f64,
        interval: f64,
        repetition: u32,
        last_reviewed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            key,
            easiness,
            interval,
            repetition,
            last_reviewed_at,
        }
    }

    pub fn key(&self) -> ItemKey {
        self.key
    }

    pub fn easiness(&self) -> f64 {
        self.easiness
    }

    /// Days until the next review.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn repetition(&self) -> u32 {
        self.repetition
    }

    pub fn last_reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.last_reviewed_at
    }

    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.last_reviewed_at
            .map(|reviewed| add_days(reviewed, self.interval))
    }

    pub fn stage(&self) -> ReviewStage {
        match (self.last_reviewed_at, self.repetition) {
            (None, _) => ReviewStage::New,
            (Some(_), 0) => ReviewStage::Lapsed,
            (Some(_), 1) => ReviewStage::Learning,
            (Some(_), 2) => ReviewStage::Young,
            (Some(_), _) => ReviewStage::Mature,
        }
    }

    /// Back to the initial state for the same key. Used to recover from corrupted rows.
    pub fn reset(&self, config: &SchedulerConfig) -> Self {
        Self::new(self.key, config)
    }

    pub(crate) fn with_review(
        &self,
        easiness: f64,
        interval: f64,
        repetition: u32,
        reviewed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: self.key,
            easiness,
            interval,
            repetition,
            last_reviewed_at: Some(reviewed_at),
        }
    }
}

/// `start + days`, saturating at the largest representable instant.
pub fn add_days(start: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    let millis = (days * MILLIS_PER_DAY).round();
    if !millis.is_finite() || millis >= i64::MAX as f64 {
        return DateTime::<Utc>::MAX_UTC;
    }
    Duration::try_milliseconds(millis as i64)
        .and_then(|delta| start.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Row in `review_items`
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = review_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReviewRecord {
    pub learner_id: i32,
    pub item_id: i32,
    pub easiness: f64,
    pub interval_days: f64,
    pub repetition: i32,
    pub last_reviewed_at: Option<NaiveDateTime>,
    pub due_at: Option<NaiveDateTime>, // denormalized for the due filter
    pub version: i32,
}

impl ReviewRecord {
    pub fn from_item(item: &ReviewItem, version: i32) -> Self {
        let key = item.key();
        Self {
            learner_id: key.learner_id,
            item_id: key.item_id,
            easiness: item.easiness(),
            interval_days: item.interval(),
            repetition: item.repetition() as i32,
            last_reviewed_at: item.last_reviewed_at().map(|t| t.naive_utc()),
            due_at: item.due_at().map(|t| t.naive_utc()),
            version,
        }
    }

    /// A negative stored repetition count is kept as `u32::MAX` so the scheduler's state
    /// check can flag it instead of silently reading it as zero.
    pub fn to_item(&self) -> ReviewItem {
        ReviewItem::from_parts(
            ItemKey::new(self.learner_id, self.item_id),
            self.easiness,
            self.interval_days,
            u32::try_from(self.repetition).unwrap_or(u32::MAX),
            self.last_reviewed_at.map(|t| t.and_utc()),
        )
    }
}

/// Request payload for a review submission
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewSubmit {
    #[validate(range(min = 1, message = "item_id must be positive"))]
    pub item_id: i32,
    #[validate(range(min = 0, max = 5, message = "Quality must be between 0 and 5"))]
    pub quality: i32,
}

/// Request payload for enrolling a learner in an item
#[derive(Debug, Deserialize, Validate)]
pub struct EnrollRequest {
    #[validate(range(min = 1, message = "item_id must be positive"))]
    pub item_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct DueParams {
    pub limit: Option<usize>,
}

/// Item state as returned by the API
#[derive(Debug, Serialize)]
pub struct ReviewView {
    pub learner_id: i32,
    pub item_id: i32,
    pub easiness: f64,
    pub interval: f64,
    pub repetition: u32,
    pub stage: ReviewStage,
    pub last_review: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
}

impl From<&ReviewItem> for ReviewView {
    fn from(item: &ReviewItem) -> Self {
        let key = item.key();
        Self {
            learner_id: key.learner_id,
            item_id: key.item_id,
            easiness: item.easiness(),
            interval: item.interval(),
            repetition: item.repetition(),
            stage: item.stage(),
            last_review: item.last_reviewed_at(),
            next_review: item.due_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DueReviews {
    pub reviews: Vec<ReviewView>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ReviewSubmitted {
    pub message: String,
    pub next_review: Option<DateTime<Utc>>,
    pub interval_days: f64,
    pub easiness_factor: f64,
    pub review: ReviewView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 8, 0, 0).unwrap()
    }

    #[test]
    fn new_item_has_no_due_date() {
        let item = ReviewItem::new(ItemKey::new(1, 7), &SchedulerConfig::default());
        assert_eq!(item.easiness(), 2.5);
        assert_eq!(item.interval(), 0.0);
        assert_eq!(item.repetition(), 0);
        assert_eq!(item.due_at(), None);
        assert_eq!(item.stage(), ReviewStage::New);
    }

    #[test]
    fn due_at_follows_last_review_and_interval() {
        let item = ReviewItem::from_parts(ItemKey::new(1, 7), 2.5, 6.0, 2, Some(at(1)));
        assert_eq!(item.due_at(), Some(at(7)));
        assert_eq!(item.stage(), ReviewStage::Young);
    }

    #[test]
    fn fractional_intervals_keep_subday_precision() {
        let due = add_days(at(1), 1.5);
        assert_eq!(due, at(2) + Duration::hours(12));
    }

    #[test]
    fn huge_interval_saturates() {
        assert_eq!(add_days(at(1), 1e300), DateTime::<Utc>::MAX_UTC);
        assert_eq!(add_days(at(1), f64::INFINITY), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn stages_follow_repetition() {
        let key = ItemKey::new(1, 1);
        let stage = |rep| ReviewItem::from_parts(key, 2.5, 1.0, rep, Some(at(1))).stage();
        assert_eq!(stage(0), ReviewStage::Lapsed);
        assert_eq!(stage(1), ReviewStage::Learning);
        assert_eq!(stage(2), ReviewStage::Young);
        assert_eq!(stage(9), ReviewStage::Mature);
    }

    #[test]
    fn record_round_trips_item() {
        let item = ReviewItem::from_parts(ItemKey::new(3, 4), 2.36, 15.0, 3, Some(at(2)));
        let record = ReviewRecord::from_item(&item, 5);
        assert_eq!(record.version, 5);
        assert_eq!(record.due_at, Some(at(17).naive_utc()));
        assert_eq!(record.to_item(), item);
    }

    #[test]
    fn negative_stored_repetition_is_not_hidden() {
        let mut record = ReviewRecord::from_item(
            &ReviewItem::new(ItemKey::new(1, 1), &SchedulerConfig::default()),
            0,
        );
        record.repetition = -1;
        assert_eq!(record.to_item().repetition(), u32::MAX);
    }

    #[test]
    fn reset_keeps_key() {
        let config = SchedulerConfig::default();
        let item = ReviewItem::from_parts(ItemKey::new(2, 9), 0.4, -3.0, 4, Some(at(1)));
        let fresh = item.reset(&config);
        assert_eq!(fresh.key(), ItemKey::new(2, 9));
        assert_eq!(fresh, ReviewItem::new(ItemKey::new(2, 9), &config));
    }
}
