//! crates/opion_crm_core/src/view.rs
//!
//! The one pipeline every customer list goes through:
//! search, status filter, paginate, then attach status and permissions per row.

use crate::domain::{CustomerRecord, Viewer};
use crate::paginator::Paginator;
use crate::permissions::{permissions, Permission};
use crate::stats::{compute_stats, filter_records, search, CustomerStats};
use crate::status::{classify, StatusCategory, StatusFilter};
use std::num::NonZeroUsize;

/// What the caller asked to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub status: StatusFilter,
    pub search: Option<String>,
    pub page: usize,
    pub page_size: NonZeroUsize,
}

impl Default for ListQuery {
    fn default() -> Self {
        let paginator = Paginator::default();
        Self {
            status: StatusFilter::All,
            search: None,
            page: paginator.current_page(),
            page_size: paginator.page_size(),
        }
    }
}

/// A record together with everything derived from it for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow<'a> {
    pub record: &'a CustomerRecord,
    pub status: StatusCategory,
    pub permission: Permission,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerListPage<'a> {
    pub stats: CustomerStats,
    pub rows: Vec<CustomerRow<'a>>,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: NonZeroUsize,
    /// Records left after search and status filtering, across all pages.
    pub matching: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Builds one page of the customer list for `viewer`.
///
/// Stats are computed over the whole snapshot and are not affected by search.
/// The requested page is clamped against the filtered count.
pub fn build_list_view<'a>(
    records: &'a [CustomerRecord],
    viewer: &Viewer,
    query: &ListQuery,
) -> CustomerListPage<'a> {
    let stats = compute_stats(records, viewer);

    let searched = search(records, query.search.as_deref().unwrap_or_default());
    let filtered = filter_records(searched, query.status, viewer);

    let mut paginator = Paginator::new(query.page_size);
    paginator.set_item_count(filtered.len());
    paginator.go_to_page(query.page);

    let rows = paginator
        .page(&filtered)
        .iter()
        .map(|record| row_for(viewer, *record))
        .collect();

    CustomerListPage {
        stats,
        rows,
        current_page: paginator.current_page(),
        total_pages: paginator.total_pages(),
        page_size: paginator.page_size(),
        matching: paginator.item_count(),
        has_next: paginator.has_next(),
        has_previous: paginator.has_previous(),
    }
}

pub fn row_for<'a>(viewer: &Viewer, record: &'a CustomerRecord) -> CustomerRow<'a> {
    CustomerRow {
        record,
        status: classify(record),
        permission: permissions(viewer, record),
    }
}
