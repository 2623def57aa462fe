//! Connection resolution orchestration.
//!
//! The resolver composes validation, planning, fetching, and assembly
//! into the single public entry point of the crate. It is stateless:
//! every call is self-contained and safe to run concurrently against a
//! shared data source.

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::error::{ConnectionError, ConnectionResult};
use crate::metrics::{self, ResolveTimer};
use crate::models::{Connection, ConnectionArgs};
use crate::ports::{DataSource, FilterTranslator, IdentityTranslator};

use super::{assembler, planner};

// =============================================================================
// Configuration
// =============================================================================

/// Hard ceiling on requested page sizes.
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// Page size used when none is requested, and as the oversize fallback.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// How requests above the page-size cap are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OversizePolicy {
    /// Replace the request with the default page size.
    ///
    /// This is the long-standing upstream behavior that existing
    /// clients may depend on, so it stays the default.
    #[default]
    FallbackToDefault,
    /// Clamp the request to the cap. Recommended for new deployments.
    ClampToMax,
}

/// Configuration for the connection resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Maximum page size a client may request.
    pub max_page_size: u32,
    /// Page size used when none is requested.
    pub default_page_size: u32,
    /// Handling of requests above `max_page_size`.
    pub oversize_policy: OversizePolicy,
    /// Fail with [`ConnectionError::NoResults`] when a nonzero-limit
    /// page comes back empty, instead of returning an empty connection.
    pub strict_empty: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            default_page_size: DEFAULT_PAGE_SIZE,
            oversize_policy: OversizePolicy::default(),
            strict_empty: false,
        }
    }
}

// =============================================================================
// ConnectionResolver
// =============================================================================

/// Resolves Relay-style pagination arguments against a data source.
///
/// # Flow
///
/// 1. Validate arguments and reduce them to a normalized form
/// 2. Build a query plan (boundary decoding, filter translation)
/// 3. Fetch one page from the data source
/// 4. Count matching records, only when the caller asked for it
/// 5. Assemble edges, cursors, and page info
///
/// The pipeline is terminal on the first failure; no partial results
/// are ever returned, and nothing is retried.
pub struct ConnectionResolver {
    config: ResolverConfig,
    translator: Arc<dyn FilterTranslator>,
}

impl ConnectionResolver {
    /// Create a resolver with the identity filter translator.
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            translator: Arc::new(IdentityTranslator),
        }
    }

    /// Replace the filter translator.
    pub fn with_translator(mut self, translator: Arc<dyn FilterTranslator>) -> Self {
        self.translator = translator;
        self
    }

    /// Access the resolver configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a page without a total count.
    ///
    /// Use this when the caller did not select pagination totals: it
    /// never pays for a count query, and the "more pages" flags fall
    /// back to the full-page heuristic.
    #[instrument(skip_all)]
    pub async fn resolve<S>(
        &self,
        source: &S,
        args: ConnectionArgs,
    ) -> ConnectionResult<Connection<S::Record>>
    where
        S: DataSource + ?Sized,
    {
        self.run(source, args, false).await
    }

    /// Resolve a page and also count the full result set.
    ///
    /// The count uses the same translated filters as the fetch, making
    /// `total_count` and the page-info flags exact.
    #[instrument(skip_all)]
    pub async fn resolve_counted<S>(
        &self,
        source: &S,
        args: ConnectionArgs,
    ) -> ConnectionResult<Connection<S::Record>>
    where
        S: DataSource + ?Sized,
    {
        self.run(source, args, true).await
    }

    async fn run<S>(
        &self,
        source: &S,
        args: ConnectionArgs,
        with_count: bool,
    ) -> ConnectionResult<Connection<S::Record>>
    where
        S: DataSource + ?Sized,
    {
        let _timer = ResolveTimer::new();
        metrics::record_resolution();

        let normalized = planner::validate(&args, &self.config)?;
        let plan = planner::plan(&normalized, &args.filters, self.translator.as_ref());
        trace!(?plan, "Query plan built");

        let records = match source.fetch(&plan).await {
            Ok(records) => records,
            Err(err) => {
                metrics::record_upstream_error("fetch");
                return Err(err.into());
            }
        };

        let total_count = if with_count {
            match source.count(&plan.filters).await {
                Ok(total) => Some(total),
                Err(err) => {
                    metrics::record_upstream_error("count");
                    return Err(err.into());
                }
            }
        } else {
            None
        };

        let connection = assembler::assemble(records, &plan, &normalized, total_count);

        if self.config.strict_empty && normalized.limit > 0 && connection.edges.is_empty() {
            return Err(ConnectionError::NoResults);
        }

        debug!(
            edges = connection.edges.len(),
            has_next = connection.page_info.has_next_page,
            has_previous = connection.page_info.has_previous_page,
            "Connection resolved"
        );

        Ok(connection)
    }
}
