//! # catpoint-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `SecurityRepository` port defined in `catpoint-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Commit each state change in a single transaction
//!
//! ## Dependency rule
//! Depends on `catpoint-app` (for port traits) and `catpoint-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod pool;
pub mod security_repo;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use security_repo::SqliteSecurityRepository;
