pub mod engine;

pub use engine::{is_due, select_due_items, Scheduler, MAX_QUALITY, MIN_QUALITY};
