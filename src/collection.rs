use crate::error::PaginateResult;
use crate::options::PopulateSpec;
use crate::page::Records;
use crate::params::ResolvedParams;
use async_trait::async_trait;
use bson::Document;

/// The read-side contract a collection must expose to be paginated.
///
/// This is the sole seam between the pagination core and the store: a count
/// of documents matching a filter, and a single page fetch configured by a
/// [`FindSpec`]. An implementation is provided for `mongodb::Collection`;
/// in-memory implementations work just as well for tests.
#[async_trait]
pub trait PaginatedRead {
    /// The hydrated model type returned when lean mode is off.
    type Record: Send + Sync;

    async fn count_matching(&self, filter: &Document) -> PaginateResult<u64>;

    async fn find_page(
        &self,
        filter: &Document,
        spec: &FindSpec,
    ) -> PaginateResult<Records<Self::Record>>;
}

/// Everything a single page fetch needs beyond the filter.
#[derive(Debug, Clone)]
pub struct FindSpec {
    pub projection: Option<Document>,
    pub sort: Option<Document>,

    /// May be negative when page addressing resolved below page 1; the store
    /// decides how to react.
    pub skip: i64,

    /// Never zero: a zero limit means the fetch is skipped entirely and no
    /// spec is built.
    pub limit: i64,

    pub lean: bool,
    pub populate: Vec<PopulateSpec>,
}

impl FindSpec {
    pub(crate) fn from_resolved(resolved: &ResolvedParams) -> Self {
        Self {
            projection: resolved.select.clone(),
            sort: resolved.sort.clone(),
            skip: resolved.skip,
            limit: resolved.limit,
            lean: resolved.lean,
            populate: resolved.populate.clone(),
        }
    }
}
