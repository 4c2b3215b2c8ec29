use crate::params::ResolvedParams;
use bson::{Bson, Document};
use serde_derive::Serialize;

/// Fetched records, in the shape the caller asked for: hydrated models, or
/// raw documents when lean mode was requested. Serializes as a plain array
/// either way.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Records<T> {
    Models(Vec<T>),
    Lean(Vec<Document>),
}

impl<T> Records<T> {
    pub(crate) fn empty(lean: bool) -> Self {
        if lean {
            Records::Lean(Vec::new())
        } else {
            Records::Models(Vec::new())
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Records::Models(models) => models.len(),
            Records::Lean(docs) => docs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_models(&self) -> Option<&[T]> {
        match self {
            Records::Models(models) => Some(models),
            Records::Lean(_) => None,
        }
    }

    pub fn as_lean(&self) -> Option<&[Document]> {
        match self {
            Records::Models(_) => None,
            Records::Lean(docs) => Some(docs),
        }
    }

    pub fn into_models(self) -> Option<Vec<T>> {
        match self {
            Records::Models(models) => Some(models),
            Records::Lean(_) => None,
        }
    }

    pub fn into_lean(self) -> Option<Vec<Document>> {
        match self {
            Records::Models(_) => None,
            Records::Lean(docs) => Some(docs),
        }
    }
}

/// One page of results.
///
/// `offset` is present when the call resolved through offset addressing and
/// `page`/`pages` when it resolved through page addressing. A call that set
/// neither resolves through the default mode and carries all three; that
/// redundancy matches the behavior callers of the original interface rely
/// on and is kept deliberately.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult<T> {
    pub docs: Records<T>,

    /// Total count of documents matching the filter, ignoring skip/limit.
    pub total: u64,

    /// Effective limit used for the fetch.
    pub limit: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    /// `ceil(total / limit)`, at least 1. When the limit is 0 this is 1
    /// regardless of the total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i64>,
}

impl<T> PageResult<T> {
    pub(crate) fn shape(docs: Records<T>, total: u64, resolved: &ResolvedParams) -> Self {
        Self {
            docs,
            total,
            limit: resolved.limit,
            offset: resolved.offset,
            page: resolved.page,
            pages: resolved.page.map(|_| pages_for(total, resolved.limit)),
        }
    }
}

pub(crate) fn pages_for(total: u64, limit: i64) -> i64 {
    if limit <= 0 {
        return 1;
    }
    (total.div_ceil(limit as u64)).max(1) as i64
}

/// Give every lean record a string `id` mirroring its `_id`. Records with no
/// `_id` are left untouched. The documents here are owned by the current
/// call, so the caller never observes data changing underneath it.
pub(crate) fn synthesize_ids(docs: &mut [Document]) {
    for doc in docs.iter_mut() {
        if let Some(id) = doc.get("_id").map(id_string) {
            doc.insert("id", id);
        }
    }
}

fn id_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PaginationOptions;
    use bson::{doc, oid::ObjectId};

    fn resolve(options: PaginationOptions) -> ResolvedParams {
        ResolvedParams::resolve(options)
    }

    #[test]
    fn test_pages_rounds_up_and_bottoms_out_at_one() {
        assert_eq!(pages_for(25, 10), 3);
        assert_eq!(pages_for(12, 5), 3);
        assert_eq!(pages_for(10, 10), 1);
        assert_eq!(pages_for(1, 10), 1);
        assert_eq!(pages_for(0, 10), 1, "an empty collection still has one page");
    }

    #[test]
    fn test_pages_with_zero_limit_is_one() {
        assert_eq!(pages_for(100, 0), 1);
        assert_eq!(pages_for(0, 0), 1);
    }

    #[test]
    fn test_shape_offset_mode_omits_page_fields() {
        let resolved = resolve(PaginationOptions::new().offset(7).limit(3));
        let result: PageResult<Document> = PageResult::shape(Records::empty(false), 9, &resolved);

        assert_eq!(result.total, 9);
        assert_eq!(result.limit, 3);
        assert_eq!(result.offset, Some(7));
        assert_eq!(result.page, None);
        assert_eq!(result.pages, None);
    }

    #[test]
    fn test_shape_page_mode_omits_offset() {
        let resolved = resolve(PaginationOptions::new().page(2).limit(5));
        let result: PageResult<Document> = PageResult::shape(Records::empty(false), 12, &resolved);

        assert_eq!(result.offset, None);
        assert_eq!(result.page, Some(2));
        assert_eq!(result.pages, Some(3));
    }

    #[test]
    fn test_shape_default_mode_carries_both_addressings() {
        let resolved = resolve(PaginationOptions::default());
        let result: PageResult<Document> = PageResult::shape(Records::empty(false), 25, &resolved);

        assert_eq!(result.offset, Some(0));
        assert_eq!(result.page, Some(1));
        assert_eq!(result.pages, Some(3));
    }

    #[test]
    fn test_serialized_page_descriptor_omits_absent_fields() {
        let resolved = resolve(PaginationOptions::new().page(2).limit(5));
        let result: PageResult<Document> = PageResult::shape(Records::empty(true), 12, &resolved);

        let value = serde_json::to_value(&result).expect("result should serialize");
        let object = value.as_object().expect("should be an object");

        assert!(object.contains_key("docs"));
        assert!(object.contains_key("total"));
        assert!(object.contains_key("limit"));
        assert!(object.contains_key("page"));
        assert!(object.contains_key("pages"));
        assert!(!object.contains_key("offset"), "offset is absent in page mode");
        assert!(object["docs"].is_array(), "records serialize as a plain array");
    }

    #[test]
    fn test_synthesize_ids_stringifies_object_ids() {
        let oid = ObjectId::new();
        let mut docs = vec![doc! { "_id": oid, "name": "first" }];

        synthesize_ids(&mut docs);

        assert_eq!(
            docs[0].get_str("id").expect("id should be a string"),
            oid.to_hex()
        );
    }

    #[test]
    fn test_synthesize_ids_handles_non_object_ids() {
        let mut docs = vec![
            doc! { "_id": "custom-key" },
            doc! { "_id": 42_i32 },
            doc! { "name": "no identity here" },
        ];

        synthesize_ids(&mut docs);

        assert_eq!(docs[0].get_str("id").unwrap(), "custom-key");
        assert_eq!(docs[1].get_str("id").unwrap(), "42");
        assert!(docs[2].get("id").is_none(), "records without _id are untouched");
    }
}
