//! Argument validation and query planning.
//!
//! Validation enforces the Relay pagination argument contract and
//! reduces the four optional inputs to a normalized form; planning
//! turns that form plus a filter bag into a concrete [`QueryPlan`]
//! for a data source.

use tracing::debug;

use crate::error::{ValidationError, ValidationResult};
use crate::metrics;
use crate::models::{ConnectionArgs, Cursor, FilterBag, OrderDirection};
use crate::ports::{FilterTranslator, QueryPlan};

use super::resolver::{OversizePolicy, ResolverConfig};

// =============================================================================
// Normalized Arguments
// =============================================================================

/// Which end of the result set a request paginates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `first`/`after`: pages run from the head of display order.
    Forward,
    /// `last`/`before`: pages run from the tail of display order.
    Backward,
}

/// Validated, reduced pagination arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedArgs {
    /// Effective page size after defaulting and cap handling.
    pub limit: u32,
    /// Pagination direction.
    pub direction: Direction,
    /// Exclusive boundary cursor (`after` forward, `before` backward).
    pub boundary: Option<Cursor>,
}

// =============================================================================
// Validation
// =============================================================================

/// Validate pagination arguments and reduce them to a normalized form.
///
/// Backward mode is selected by the presence of `last` or `before`;
/// everything else paginates forward. A requested page size of zero is
/// honored (the page is empty but its metadata is still computed), which
/// is also why the conflict check only fires when both `first` and
/// `last` are nonzero.
pub fn validate(args: &ConnectionArgs, config: &ResolverConfig) -> ValidationResult<NormalizedArgs> {
    if let (Some(first), Some(last)) = (args.first, args.last) {
        if first > 0 && last > 0 {
            return Err(ValidationError::ConflictingPagination);
        }
    }

    if args.before.is_some() && args.after.is_some() {
        return Err(ValidationError::ConflictingCursors);
    }

    let direction = if args.last.is_some() || args.before.is_some() {
        Direction::Backward
    } else {
        Direction::Forward
    };

    let requested = match direction {
        Direction::Forward => args.first,
        Direction::Backward => args.last,
    };

    let limit = match requested {
        None => config.default_page_size,
        Some(n) if n > config.max_page_size => match config.oversize_policy {
            OversizePolicy::FallbackToDefault => config.default_page_size,
            OversizePolicy::ClampToMax => config.max_page_size,
        },
        Some(n) => n,
    };

    let boundary = match direction {
        Direction::Forward => args.after.clone(),
        Direction::Backward => args.before.clone(),
    };

    Ok(NormalizedArgs {
        limit,
        direction,
        boundary,
    })
}

// =============================================================================
// Planning
// =============================================================================

/// Build a concrete query plan from normalized arguments and filters.
///
/// The boundary cursor is exclusive: forward plans start one past the
/// `after` position, backward plans end one short of the `before`
/// position (querying `limit` records back from it, clamped at zero).
/// A boundary that fails to decode is treated as absent, never as an
/// error.
pub fn plan(
    normalized: &NormalizedArgs,
    filters: &FilterBag,
    translator: &dyn FilterTranslator,
) -> QueryPlan {
    let boundary_offset = normalized.boundary.as_ref().and_then(|cursor| {
        match cursor.offset() {
            Ok(offset) => Some(offset),
            Err(err) => {
                debug!(cursor = %cursor, error = %err, "Ignoring malformed boundary cursor");
                metrics::record_malformed_cursor();
                None
            }
        }
    });

    let (order, offset) = match normalized.direction {
        Direction::Forward => (
            OrderDirection::Desc,
            boundary_offset.map_or(0, |o| o.saturating_add(1)),
        ),
        Direction::Backward => (
            OrderDirection::Asc,
            boundary_offset.map_or(0, |o| o.saturating_sub(u64::from(normalized.limit))),
        ),
    };

    let mut translated = FilterBag::new();
    for (key, value) in filters.iter() {
        match translator.translate(key) {
            Some(mapped) => translated.insert(mapped, value.clone()),
            None => {
                debug!(key, "Dropping unrecognized filter key");
                metrics::record_dropped_filter(key);
            }
        }
    }

    QueryPlan {
        limit: normalized.limit,
        offset,
        order,
        filters: translated,
    }
}
