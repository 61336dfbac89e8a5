pub mod db;

pub use db::{build_memory_pool, build_pool, run_migrations};
