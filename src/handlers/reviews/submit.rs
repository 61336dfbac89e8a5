use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use crate::{
    DbPool,
    data::models::{
        EnrollRequest, ItemKey, ReviewError, ReviewSubmit, ReviewSubmitted, ReviewView,
    },
    features::{reviews::ReviewService, scheduler::Scheduler},
};

#[axum::debug_handler]
pub async fn submit_review(
    State((pool, scheduler)): State<(DbPool, Arc<Scheduler>)>,
    Path(learner_id): Path<i32>,
    Json(payload): Json<ReviewSubmit>,
) -> Result<Json<ReviewSubmitted>, ReviewError> {
    payload.validate().map_err(|e| {
        log::warn!("Rejected review submission from learner {}: {}", learner_id, e);
        ReviewError::from(e)
    })?;

    let mut conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        ReviewError::from(e)
    })?;

    let key = ItemKey::new(learner_id, payload.item_id);
    let item = ReviewService::submit(&mut conn, &scheduler, key, payload.quality, Utc::now())?;

    Ok(Json(ReviewSubmitted {
        message: "Review submitted successfully".to_string(),
        next_review: item.due_at(),
        interval_days: item.interval(),
        easiness_factor: item.easiness(),
        review: ReviewView::from(&item),
    }))
}

pub async fn enroll_item(
    State((pool, scheduler)): State<(DbPool, Arc<Scheduler>)>,
    Path(learner_id): Path<i32>,
    Json(payload): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<ReviewView>), ReviewError> {
    payload.validate()?;

    let mut conn = pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        ReviewError::from(e)
    })?;

    let key = ItemKey::new(learner_id, payload.item_id);
    let item = ReviewService::enroll(&mut conn, &scheduler, key)?;

    log::info!("Learner {} enrolled in item {}", learner_id, payload.item_id);
    Ok((StatusCode::CREATED, Json(ReviewView::from(&item))))
}
