//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each adapter implements one domain repository port on top of `diesel-async`
//! with a shared `bb8` pool. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) stay private to this module; adapters translate rows into
//! validated domain values and map Diesel failures onto the port's
//! `Connection`/`Query` error variants.
//!
//! # Example
//!
//! ```ignore
//! use ethaum::outbound::persistence::{DbPool, DieselStartupRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/ethaum")).await?;
//! let startups = DieselStartupRepository::new(pool);
//! ```

mod diesel_credibility_repository;
mod diesel_enterprise_repository;
mod diesel_error_mapping;
mod diesel_launch_repository;
mod diesel_match_repository;
mod diesel_profile_repository;
mod diesel_review_repository;
mod diesel_startup_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_credibility_repository::DieselCredibilityRepository;
pub use diesel_enterprise_repository::DieselEnterpriseRepository;
pub use diesel_launch_repository::DieselLaunchRepository;
pub use diesel_match_repository::DieselMatchRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_startup_repository::DieselStartupRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
