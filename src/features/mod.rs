pub mod reviews;
pub mod scheduler;
