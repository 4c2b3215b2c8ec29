use bson::Document;
use serde_derive::{Deserialize, Serialize};

/// Caller-supplied pagination options.
///
/// Every field is optional so that a value the caller actually set can be
/// told apart from one that should fall back to the [`Paginator`] defaults
/// during the merge. Effective defaults (`limit` 10, `lean` false,
/// `lean_with_id` true) are applied after merging, when the options are
/// resolved into query parameters.
///
/// [`Paginator`]: crate::Paginator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationOptions {
    /// Projection applied to fetched records. Passed through to the store
    /// unvalidated.
    pub select: Option<Document>,

    /// Sort order for fetched records. Passed through to the store
    /// unvalidated.
    pub sort: Option<Document>,

    /// Relation expansions to apply to fetched records.
    pub populate: Option<Vec<PopulateSpec>>,

    /// Return raw documents instead of hydrated models. Defaults to false.
    pub lean: Option<bool>,

    /// When lean, synthesize a string `id` field from each record's `_id`.
    /// Defaults to true.
    pub lean_with_id: Option<bool>,

    /// Absolute skip count. When set, page addressing is ignored.
    pub offset: Option<u64>,

    /// 1-based page index. A page of zero or below is not corrected here;
    /// the resulting negative skip is passed through for the store to judge.
    pub page: Option<i64>,

    /// Page size. Defaults to 10. Zero means count only, no fetch.
    pub limit: Option<i64>,
}

impl PaginationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, projection: impl Into<Option<Document>>) -> Self {
        self.select = projection.into();
        self
    }

    pub fn sort(mut self, sort: impl Into<Option<Document>>) -> Self {
        self.sort = sort.into();
        self
    }

    /// Register a relation expansion. May be called multiple times; a single
    /// registration is treated as a one-element sequence.
    pub fn populate(mut self, spec: PopulateSpec) -> Self {
        self.populate.get_or_insert_with(Vec::new).push(spec);
        self
    }

    pub fn lean(mut self, lean: bool) -> Self {
        self.lean = Some(lean);
        self
    }

    pub fn lean_with_id(mut self, lean_with_id: bool) -> Self {
        self.lean_with_id = Some(lean_with_id);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Shallow merge with `defaults`: a field the caller set wins, every
    /// other field is taken from the defaults.
    pub(crate) fn merged_over(self, defaults: &PaginationOptions) -> PaginationOptions {
        PaginationOptions {
            select: self.select.or_else(|| defaults.select.clone()),
            sort: self.sort.or_else(|| defaults.sort.clone()),
            populate: self.populate.or_else(|| defaults.populate.clone()),
            lean: self.lean.or(defaults.lean),
            lean_with_id: self.lean_with_id.or(defaults.lean_with_id),
            offset: self.offset.or(defaults.offset),
            page: self.page.or(defaults.page),
            limit: self.limit.or(defaults.limit),
        }
    }
}

/// One relation expansion: replaces the reference field at `path` with the
/// matching document(s) from the `from` collection.
///
/// Validity of the named fields and collection is the store's concern; the
/// spec is carried through unvalidated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulateSpec {
    /// Local field holding the reference, also used as the output field.
    pub path: String,

    /// Collection the referenced documents live in.
    pub from: String,

    /// Field matched against in the foreign collection.
    #[serde(default = "default_foreign_field")]
    pub foreign_field: String,
}

impl PopulateSpec {
    pub fn new(path: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            from: from.into(),
            foreign_field: default_foreign_field(),
        }
    }

    pub fn foreign_field(mut self, field: impl Into<String>) -> Self {
        self.foreign_field = field.into();
        self
    }
}

fn default_foreign_field() -> String {
    "_id".into()
}
