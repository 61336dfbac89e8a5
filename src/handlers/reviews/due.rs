use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    DbPool,
    data::models::{DueParams, DueReviews, ReviewError, ReviewView},
    features::{reviews::ReviewService, scheduler::Scheduler},
};

pub async fn get_due_reviews(
    State((pool, _scheduler)): State<(DbPool, Arc<Scheduler>)>,
    Path(learner_id): Path<i32>,
    Query(params): Query<DueParams>,
) -> Result<Json<DueReviews>, ReviewError> {
    let mut conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        ReviewError::from(e)
    })?;

    let items = ReviewService::due_items(&mut conn, learner_id, Utc::now(), params.limit)?;
    let reviews: Vec<ReviewView> = items.iter().map(ReviewView::from).collect();

    Ok(Json(DueReviews {
        count: reviews.len(),
        reviews,
    }))
}
