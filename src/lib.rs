use diesel::{
    r2d2::{ConnectionManager, Pool},
    SqliteConnection,
};

pub mod config;
pub mod data;
pub mod features;
pub mod handlers;
pub mod schema;
pub mod utils;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

pub use config::{AppConfig, ConfigError, SchedulerConfig};
pub use data::models::{ItemKey, ReviewError, ReviewItem, ReviewStage, SchedulerError};
pub use features::reviews::ReviewService;
pub use features::scheduler::{is_due, select_due_items, Scheduler};
