mod error_conversions;
mod error_responses;
pub mod service;

pub use service::ReviewService;
