// Kept in sync with the bootstrap DDL in `utils::db`.

diesel::table! {
    review_items (learner_id, item_id) {
        learner_id -> Integer,
        item_id -> Integer,
        easiness -> Double,
        interval_days -> Double,
        repetition -> Integer,
        last_reviewed_at -> Nullable<Timestamp>,
        due_at -> Nullable<Timestamp>,
        version -> Integer,
    }
}
