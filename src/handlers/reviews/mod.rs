use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{DbPool, features::scheduler::Scheduler};

pub mod due;
pub mod submit;

pub use due::get_due_reviews;
pub use submit::{enroll_item, submit_review};

pub fn reviews_router(pool: DbPool, scheduler: Arc<Scheduler>) -> Router {
    Router::new()
        .route("/learners/{learner_id}/reviews/due", get(get_due_reviews))
        .route("/learners/{learner_id}/reviews/submit", post(submit_review))
        .route("/learners/{learner_id}/items", post(enroll_item))
        .with_state((pool, scheduler))
}
