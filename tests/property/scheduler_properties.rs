use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use zwcd_srs::{is_due, select_due_items, ItemKey, ReviewItem, Scheduler, SchedulerConfig, SchedulerError};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

/// Items in any state the scheduler accepts: never reviewed, lapsed or in progress.
fn arb_item() -> impl Strategy<Value = ReviewItem> {
    (
        1i32..10_000,
        1.3f64..4.0,
        0u32..20,
        1.0f64..400.0,
        proptest::option::of(0i64..50_000),
    )
        .prop_map(|(item_id, easiness, repetition, interval, minutes_ago)| {
            let key = ItemKey::new(1, item_id);
            match minutes_ago {
                None => ReviewItem::new(key, &SchedulerConfig::default()),
                Some(minutes) => ReviewItem::from_parts(
                    key,
                    easiness,
                    interval,
                    repetition,
                    Some(now() - Duration::minutes(minutes)),
                ),
            }
        })
}

fn sm2_easiness(easiness: f64, quality: i32) -> f64 {
    let miss = f64::from(5 - quality);
    (easiness + (0.1 - miss * (0.08 + miss * 0.02))).max(1.3)
}

// ── Easiness never drops below the floor ─────────────────────────────────

proptest! {
    #[test]
    fn easiness_never_below_floor(
        item in arb_item(),
        qualities in prop::collection::vec(0i32..=5, 1..60),
    ) {
        let scheduler = Scheduler::default();
        let mut item = item;
        for (day, quality) in qualities.into_iter().enumerate() {
            item = scheduler
                .record_review(&item, quality, now() + Duration::days(day as i64))
                .unwrap();
            prop_assert!(item.easiness() >= 1.3, "easiness {} fell below floor", item.easiness());
        }
    }
}

// ── A failed recall always resets progress ──────────────────────────────

proptest! {
    #[test]
    fn lapse_resets_repetition_and_interval(item in arb_item(), quality in 0i32..3) {
        let next = Scheduler::default().record_review(&item, quality, now()).unwrap();
        prop_assert_eq!(next.repetition(), 0);
        prop_assert_eq!(next.interval(), 1.0);
        prop_assert_eq!(next.due_at(), Some(now() + Duration::days(1)));
    }
}

// ── Successes from a fresh item climb 1, 6, 6e, 6e·e, … ─────────────────

proptest! {
    #[test]
    fn successes_follow_progression_ladder(
        qualities in prop::collection::vec(3i32..=5, 1..15),
    ) {
        let scheduler = Scheduler::default();
        let mut item = scheduler.new_item(ItemKey::new(7, 7));
        let mut easiness = 2.5;
        let mut expected = 0.0;

        for (step, quality) in qualities.into_iter().enumerate() {
            easiness = sm2_easiness(easiness, quality);
            expected = match step {
                0 => 1.0,
                1 => 6.0,
                _ => expected * easiness,
            };
            item = scheduler.record_review(&item, quality, now()).unwrap();

            prop_assert_eq!(item.repetition() as usize, step + 1);
            prop_assert!(
                (item.interval() - expected).abs() <= 1e-9 * expected,
                "step {}: interval {} != {}", step, item.interval(), expected
            );
            prop_assert!(item.interval() >= 1.0);
        }
    }
}

// ── Same inputs, same output ─────────────────────────────────────────────

proptest! {
    #[test]
    fn record_review_is_deterministic(item in arb_item(), quality in 0i32..=5) {
        let scheduler = Scheduler::default();
        let a = scheduler.record_review(&item, quality, now());
        let b = scheduler.record_review(&item, quality, now());
        prop_assert_eq!(a, b);
    }
}

// ── Out-of-range quality is rejected ─────────────────────────────────────

proptest! {
    #[test]
    fn invalid_quality_is_rejected(
        item in arb_item(),
        quality in prop_oneof![i32::MIN..0, 6..i32::MAX],
    ) {
        let before = item.clone();
        let result = Scheduler::default().record_review(&item, quality, now());
        prop_assert_eq!(result, Err(SchedulerError::InvalidQuality(quality)));
        prop_assert_eq!(item, before);
    }
}

// ── Perfect recall keeps raising easiness with no ceiling ──────────────

proptest! {
    #[test]
    fn perfect_recall_raises_easiness(reviews in 1usize..200) {
        let scheduler = Scheduler::default();
        let mut item = scheduler.new_item(ItemKey::new(1, 1));
        for _ in 0..reviews {
            let next = scheduler.record_review(&item, 5, now()).unwrap();
            prop_assert!(next.easiness() > item.easiness());
            item = next;
        }
    }
}

// ── Due selection is sorted, filtered and bounded ────────────────────────

proptest! {
    #[test]
    fn due_selection_is_ordered(
        items in prop::collection::vec(arb_item(), 0..40),
        limit in proptest::option::of(0usize..20),
    ) {
        let due = select_due_items(&items, now(), limit);
        let due_in_input = items.iter().filter(|item| is_due(item, now())).count();

        prop_assert_eq!(due.len(), limit.map_or(due_in_input, |l| l.min(due_in_input)));
        prop_assert!(due.iter().all(|item| is_due(item, now())));
        for pair in due.windows(2) {
            prop_assert!(pair[0].due_at() <= pair[1].due_at());
        }

        // restartable: the same snapshot gives the same answer
        prop_assert_eq!(select_due_items(&items, now(), limit), due);
    }
}
