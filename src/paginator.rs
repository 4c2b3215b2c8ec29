use crate::collection::{FindSpec, PaginatedRead};
use crate::error::PaginateResult;
use crate::options::PaginationOptions;
use crate::page::{synthesize_ids, PageResult, Records};
use crate::params::ResolvedParams;
use async_trait::async_trait;
use bson::Document;
use log::debug;

/// Entry point for paginated queries.
///
/// Holds the default options every call merges under its own; pass them in
/// once at construction instead of mutating process-wide state. A
/// `Paginator` is cheap to clone and safe to share: calls never mutate it,
/// so concurrent calls with different filters and options are fully
/// independent.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    defaults: PaginationOptions,
}

impl Paginator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: PaginationOptions) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &PaginationOptions {
        &self.defaults
    }

    /// Run a paginated query against `collection`.
    ///
    /// A `None` filter matches everything. The count query and the page
    /// fetch are issued together and joined; the fetch is skipped entirely
    /// when the effective limit is 0. Fails with the first failing query's
    /// error and never produces a partial result.
    pub async fn paginate<C>(
        &self,
        collection: &C,
        filter: impl Into<Option<Document>> + Send,
        options: PaginationOptions,
    ) -> PaginateResult<PageResult<C::Record>>
    where
        C: PaginatedRead + Sync,
    {
        let filter = filter.into().unwrap_or_default();
        let resolved = ResolvedParams::resolve(options.merged_over(&self.defaults));
        execute(collection, &filter, &resolved).await
    }

    /// Completion-handler form of [`paginate`](Self::paginate).
    ///
    /// Runs the same future, hands the settled result to `on_complete`, then
    /// returns it, so both call styles observe identical outcomes.
    pub async fn paginate_then<C, F>(
        &self,
        collection: &C,
        filter: impl Into<Option<Document>> + Send,
        options: PaginationOptions,
        on_complete: F,
    ) -> PaginateResult<PageResult<C::Record>>
    where
        C: PaginatedRead + Sync,
        F: FnOnce(&PaginateResult<PageResult<C::Record>>) + Send,
    {
        let result = self.paginate(collection, filter, options).await;
        on_complete(&result);
        result
    }
}

/// Attaches `paginate` directly to any collection implementing
/// [`PaginatedRead`], with stock defaults. Use a [`Paginator`] instead when
/// the application wants injected defaults.
#[async_trait]
pub trait PaginateExt: PaginatedRead + Sync + Sized {
    async fn paginate(
        &self,
        filter: Option<Document>,
        options: PaginationOptions,
    ) -> PaginateResult<PageResult<Self::Record>> {
        Paginator::new().paginate(self, filter, options).await
    }
}

impl<C> PaginateExt for C where C: PaginatedRead + Sync + Sized {}

async fn execute<C>(
    collection: &C,
    filter: &Document,
    resolved: &ResolvedParams,
) -> PaginateResult<PageResult<C::Record>>
where
    C: PaginatedRead + Sync,
{
    let count_leg = collection.count_matching(filter);

    let fetch_leg = async {
        if resolved.limit == 0 {
            return Ok(Records::empty(resolved.lean));
        }
        let spec = FindSpec::from_resolved(resolved);
        debug!(
            "issuing page fetch: skip {} limit {} lean {}",
            spec.skip, spec.limit, spec.lean
        );
        collection.find_page(filter, &spec).await
    };

    let (total, mut docs) = tokio::try_join!(count_leg, fetch_leg)?;
    debug!("queries settled: total {}, fetched {}", total, docs.len());

    if resolved.lean && resolved.lean_with_id {
        if let Records::Lean(records) = &mut docs {
            synthesize_ids(records);
        }
    }

    Ok(PageResult::shape(docs, total, resolved))
}
