use crate::options::{PaginationOptions, PopulateSpec};
use bson::Document;

pub(crate) const DEFAULT_LIMIT: i64 = 10;

/// Query parameters derived once per call from the merged options.
///
/// Addressing mode resolution: an explicit `offset` takes precedence and any
/// `page` is ignored; otherwise an explicit `page` is used; otherwise the
/// default mode reports both `offset = 0` and `page = 1`. The reporting
/// fields (`offset`, `page`) drive which fields the final page descriptor
/// carries.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedParams {
    pub(crate) select: Option<Document>,
    pub(crate) sort: Option<Document>,
    pub(crate) populate: Vec<PopulateSpec>,
    pub(crate) lean: bool,
    pub(crate) lean_with_id: bool,

    /// Signed on purpose: page mode with a page of zero or below yields a
    /// negative skip, which is passed through for the store to judge.
    pub(crate) skip: i64,
    pub(crate) limit: i64,

    pub(crate) offset: Option<u64>,
    pub(crate) page: Option<i64>,
}

impl ResolvedParams {
    pub(crate) fn resolve(options: PaginationOptions) -> Self {
        let limit = options.limit.unwrap_or(DEFAULT_LIMIT);

        let (skip, offset, page) = if let Some(offset) = options.offset {
            (offset as i64, Some(offset), None)
        } else if let Some(page) = options.page {
            ((page - 1) * limit, None, Some(page))
        } else {
            (0, Some(0), Some(1))
        };

        Self {
            select: options.select,
            sort: options.sort,
            populate: options.populate.unwrap_or_default(),
            lean: options.lean.unwrap_or(false),
            lean_with_id: options.lean_with_id.unwrap_or(true),
            skip,
            limit,
            offset,
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_reports_both_offset_and_page() {
        let resolved = ResolvedParams::resolve(PaginationOptions::default());

        assert_eq!(resolved.skip, 0);
        assert_eq!(resolved.limit, DEFAULT_LIMIT);
        assert_eq!(resolved.offset, Some(0), "default mode reports an offset");
        assert_eq!(resolved.page, Some(1), "default mode also reports a page");
        assert!(!resolved.lean);
        assert!(resolved.lean_with_id);
    }

    #[test]
    fn test_offset_mode_skips_by_offset() {
        let resolved = ResolvedParams::resolve(PaginationOptions::new().offset(7).limit(3));

        assert_eq!(resolved.skip, 7);
        assert_eq!(resolved.offset, Some(7));
        assert_eq!(resolved.page, None, "offset mode carries no page");
    }

    #[test]
    fn test_offset_takes_precedence_over_page() {
        let resolved = ResolvedParams::resolve(PaginationOptions::new().offset(4).page(9));

        assert_eq!(resolved.skip, 4);
        assert_eq!(resolved.offset, Some(4));
        assert_eq!(resolved.page, None, "page is ignored when offset is set");
    }

    #[test]
    fn test_page_mode_computes_skip() {
        let resolved = ResolvedParams::resolve(PaginationOptions::new().page(2).limit(5));

        assert_eq!(resolved.skip, 5);
        assert_eq!(resolved.page, Some(2));
        assert_eq!(resolved.offset, None, "page mode carries no offset");
    }

    #[test]
    fn test_page_below_one_yields_negative_skip_unclamped() {
        let resolved = ResolvedParams::resolve(PaginationOptions::new().page(0).limit(5));
        assert_eq!(resolved.skip, -5, "no lower bound clamp is applied");

        let resolved = ResolvedParams::resolve(PaginationOptions::new().page(-2).limit(10));
        assert_eq!(resolved.skip, -30);
    }

    #[test]
    fn test_limit_defaults_to_ten() {
        let resolved = ResolvedParams::resolve(PaginationOptions::new().page(3));
        assert_eq!(resolved.limit, 10);
        assert_eq!(resolved.skip, 20);
    }

    #[test]
    fn test_zero_limit_is_preserved() {
        let resolved = ResolvedParams::resolve(PaginationOptions::new().limit(0));
        assert_eq!(resolved.limit, 0);
        assert_eq!(resolved.skip, 0);
    }
}
