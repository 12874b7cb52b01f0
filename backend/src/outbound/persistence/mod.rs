//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain types and map
//! driver failures to the port error enums. Row structs (`models.rs`) and the
//! schema (`schema.rs`) stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use user_segmentation::outbound::persistence::{
//!     DbPool, DieselHistoryRepository, DieselSegmentRepository, PoolConfig,
//! };
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/segments")).await?;
//! let segments = DieselSegmentRepository::new(pool.clone());
//! let history = DieselHistoryRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_history_repository;
mod diesel_segment_repository;
mod models;
mod pool;
mod schema;

pub use diesel_history_repository::DieselHistoryRepository;
pub use diesel_segment_repository::DieselSegmentRepository;
pub use pool::{DEFAULT_MAX_SIZE, DbPool, PoolConfig, PoolError};
