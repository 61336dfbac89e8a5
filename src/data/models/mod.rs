pub mod error_models;
pub mod review_models;

pub use error_models::{ReviewError, SchedulerError};
pub use review_models::{
    DueParams, DueReviews, EnrollRequest, ItemKey, ReviewItem, ReviewRecord,
    ReviewStage, ReviewSubmit, ReviewSubmitted, ReviewView,
};
