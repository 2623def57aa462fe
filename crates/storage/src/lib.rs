//! PostgreSQL storage adapter for Segno.
//!
//! This crate provides a PostgreSQL implementation of the
//! [`segno_core::ports::DataSource`] trait. It handles connection
//! pooling and translates query plans into parameterized SQL against a
//! host-declared table binding.
//!
//! # Usage
//!
//! ```ignore
//! use segno_storage::{Database, DatabaseConfig, PgTableSource, TableBinding};
//!
//! // Connect to the database
//! let config = DatabaseConfig::for_queries(&database_url);
//! let db = Database::connect(&config).await?;
//!
//! // Declare the table shape once, at startup
//! let binding = TableBinding::new("users", "registered_at")?
//!     .with_column("user_role", "role")?;
//!
//! // The source yields one row type per binding
//! let source: PgTableSource<UserRow> = PgTableSource::new(&db, binding);
//! ```

pub mod postgres;

pub use postgres::{BindingError, Database, DatabaseConfig, PgTableSource, TableBinding};
