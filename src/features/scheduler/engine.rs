//! SM-2 review scheduler.
//!
//! Quality ratings (0-5):
//! - 0: Complete blackout
//! - 1: Incorrect, but the answer was recognized
//! - 2: Incorrect, but the answer seemed easy to recall
//! - 3: Correct with serious difficulty
//! - 4: Correct after hesitation
//! - 5: Perfect recall
//!
//! Everything here is a pure function of its inputs. The caller supplies `now` and owns persistence.

use chrono::{DateTime, Utc};

use crate::config::SchedulerConfig;
use crate::data::models::{ItemKey, ReviewItem, SchedulerError};

pub const MIN_QUALITY: i32 = 0;
pub const MAX_QUALITY: i32 = 5;

/// The SM-2 update rule, parameterized by a [`SchedulerConfig`].
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// A fresh item for a learner's first encounter.
    pub fn new_item(&self, key: ItemKey) -> ReviewItem {
        ReviewItem::new(key, &self.config)
    }

    /// Applies one review event and returns the next state.
    ///
    /// Fails with `InvalidQuality` when `quality` is outside 0..=5 and with `InvalidState` when
    /// the stored item breaks an invariant. The input item is never modified.
    pub fn record_review(
        &self,
        item: &ReviewItem,
        quality: i32,
        now: DateTime<Utc>,
    ) -> Result<ReviewItem, SchedulerError> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(SchedulerError::InvalidQuality(quality));
        }
        self.check_state(item)?;

        // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
        let miss = f64::from(MAX_QUALITY - quality);
        let easiness = (item.easiness() + (0.1 - miss * (0.08 + miss * 0.02)))
            .max(self.config.min_easiness);

        let (repetition, interval) = if quality >= self.config.success_threshold {
            let repetition = item.repetition().saturating_add(1);
            let interval = match repetition {
                1 => self.config.first_interval,
                2 => self.config.second_interval,
                // grows by the new easiness, not the previous one
                _ => item.interval() * easiness,
            };
            (repetition, interval)
        } else {
            (0, self.config.first_interval)
        };

        Ok(item.with_review(easiness, interval, repetition, now))
    }

    /// Next interval for every quality rating, without committing anything.
    pub fn preview(
        &self,
        item: &ReviewItem,
        now: DateTime<Utc>,
    ) -> Result<[f64; 6], SchedulerError> {
        let mut intervals = [0.0; 6];
        for (quality, slot) in (MIN_QUALITY..=MAX_QUALITY).zip(intervals.iter_mut()) {
            *slot = self.record_review(item, quality, now)?.interval();
        }
        Ok(intervals)
    }

    /// Rejects stored state the update rule cannot safely build on.
    pub fn check_state(&self, item: &ReviewItem) -> Result<(), SchedulerError> {
        let easiness = item.easiness();
        if !easiness.is_finite() || easiness < self.config.min_easiness {
            return Err(SchedulerError::InvalidState(format!(
                "easiness {} is below the floor {}",
                easiness, self.config.min_easiness
            )));
        }
        let interval = item.interval();
        if !interval.is_finite() || interval < 0.0 {
            return Err(SchedulerError::InvalidState(format!(
                "interval {} is negative or not finite",
                interval
            )));
        }
        if item.repetition() >= 1 {
            if interval < 1.0 {
                return Err(SchedulerError::InvalidState(format!(
                    "interval {} is under a day with repetition {}",
                    interval,
                    item.repetition()
                )));
            }
            if item.last_reviewed_at().is_none() {
                return Err(SchedulerError::InvalidState(format!(
                    "repetition {} without a recorded review",
                    item.repetition()
                )));
            }
        }
        Ok(())
    }
}

/// True when the item was never reviewed or its due time has passed.
pub fn is_due(item: &ReviewItem, now: DateTime<Utc>) -> bool {
    match item.due_at() {
        None => true,
        Some(due) => now >= due,
    }
}

/// Due items ordered by ascending due time, never-reviewed items first.
///
/// Ties keep the input order. The input is left untouched, so the query can be rerun
/// against the same snapshot at any time.
pub fn select_due_items(
    items: &[ReviewItem],
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> Vec<ReviewItem> {
    let mut due: Vec<ReviewItem> = items
        .iter()
        .filter(|item| is_due(item, now))
        .cloned()
        .collect();

    // None sorts before Some, which puts new items first
    due.sort_by_key(|item| item.due_at());

    if let Some(limit) = limit {
        due.truncate(limit);
    }
    due
}
