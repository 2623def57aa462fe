//! Port trait for paginated data sources.
//!
//! This trait defines the storage interface consumed by the resolution
//! layer. Implementations live in adapter crates (e.g., `segno-storage`)
//! or in the host application.

use async_trait::async_trait;

use crate::error::SourceResult;
use crate::models::{FilterBag, OrderDirection};

// =============================================================================
// Query Plan
// =============================================================================

/// A concrete query against a data source.
///
/// Built fresh for every resolution, immutable once built, and never
/// persisted. The offset is a position in the `order` enumeration of
/// the filtered result set.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// Maximum number of records to return.
    pub limit: u32,
    /// Position of the first record to return.
    pub offset: u64,
    /// Enumeration direction. `Desc` is display order.
    pub order: OrderDirection,
    /// Source-specific filters, already translated.
    pub filters: FilterBag,
}

// =============================================================================
// Data Source Trait
// =============================================================================

/// A pluggable backing store for paginated queries.
///
/// The resolution layer never inspects record contents, only their
/// position in the returned sequence.
///
/// # Contract
///
/// - `fetch` returns at most `plan.limit` records, in `plan.order`
///   enumeration, starting at `plan.offset`. Short pages occur only at
///   the end of the result set. Backend failures must surface as
///   [`crate::error::DataSourceError`], never as a partial sequence.
/// - `count` must be consistent with `fetch` for the same filters at a
///   given point in time (best effort, no transactional guarantee).
/// - Enumeration must be deterministic for a fixed `(filters, order)`
///   pair within one resolution. Stability across separate requests
///   (e.g., via a tiebreaker column) is the implementation's concern.
/// - Implementations must be safe for concurrent reads.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// The record type returned by this source.
    type Record: Send;

    /// Total records matching the filters, ignoring pagination.
    async fn count(&self, filters: &FilterBag) -> SourceResult<u64>;

    /// Fetch one page of records according to the plan.
    async fn fetch(&self, plan: &QueryPlan) -> SourceResult<Vec<Self::Record>>;
}
