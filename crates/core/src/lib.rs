//! Core connection resolution layer for Segno.
//!
//! This crate turns Relay-style cursor pagination arguments into a
//! correctly sliced, ordered page of results against a pluggable data
//! source. It owns no I/O: the only blocking work in a resolution is
//! the data source call, and the only state is per-call.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     host application                        │
//! │            (GraphQL / REST / RPC transport layer)           │
//! ├─────────────────────────────────────────────────────────────┤
//! │          segno-storage (and other source adapters)          │
//! │                  implements DataSource                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  segno-core  ← YOU ARE HERE                 │
//! │              (models, ports, services, errors)              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`models`] - Pagination data model (Cursor, FilterBag, Connection, ...)
//! - [`ports`] - Interface traits for adapters to implement
//! - [`services`] - Resolution pipeline (validate, plan, assemble, resolve)
//! - [`error`] - Layered error types
//! - [`metrics`] - Metric definitions for the resolution pipeline
//!
//! # Key Concepts
//!
//! ## Ports
//!
//! Ports define interfaces that external adapters must implement:
//!
//! - [`ports::DataSource`] - Execute planned queries against a backing store
//! - [`ports::FilterTranslator`] - Map public filter keys to source keys
//!
//! ## Resolution Pipeline
//!
//! 1. Validate arguments (`first`/`last` and `before`/`after` exclusivity,
//!    page-size capping) into a normalized form
//! 2. Plan the query: decode the boundary cursor, derive offset and
//!    enumeration direction, translate filters
//! 3. Fetch one page from the data source (and count, only on request)
//! 4. Assemble edges with per-record cursors and page-info flags
//!
//! ## Cursor Stability
//!
//! Cursors encode positional offsets, so they are exactly as stable as
//! the ordering of the backing query. A record inserted between two
//! requests shifts every later offset; this is an accepted property of
//! the scheme, and sources are expected to keep their ordering
//! deterministic (tiebreaker columns) rather than the core papering
//! over it.

pub mod error;
pub mod metrics;
pub mod models;
pub mod ports;
pub mod services;
