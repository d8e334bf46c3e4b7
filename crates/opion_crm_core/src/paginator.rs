//! crates/opion_crm_core/src/paginator.rs
//!
//! Fixed-size paging over an ordered, already filtered sequence.
//!
//! Page numbers are 1-based. Every navigation clamps silently instead of
//! failing, and the current page is re-clamped whenever the item count changes.

use std::num::NonZeroUsize;

pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(25) {
    Some(size) => size,
    None => unreachable!(),
};

/// Number of pages needed for `count` items. Always at least 1.
pub fn total_pages(count: usize, page_size: NonZeroUsize) -> usize {
    count.div_ceil(page_size.get()).max(1)
}

/// The items of page `current_page`; empty when the page lies past the end.
/// Page numbers below 1 are treated as page 1.
pub fn get_page<T>(ordered: &[T], current_page: usize, page_size: NonZeroUsize) -> &[T] {
    let size = page_size.get();
    let start = current_page.max(1).saturating_sub(1).saturating_mul(size);
    if start >= ordered.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(ordered.len());
    &ordered[start..end]
}

/// Navigation state of one list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    page_size: NonZeroUsize,
    item_count: usize,
}

impl Paginator {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            current_page: 1,
            page_size,
            item_count: 0,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.item_count, self.page_size)
    }

    /// Records a new item count (e.g. after a filter change) and re-clamps.
    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
        self.current_page = self.clamp(self.current_page);
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = self.clamp(page);
    }

    pub fn next(&mut self) {
        self.go_to_page(self.current_page.saturating_add(1));
    }

    pub fn previous(&mut self) {
        self.go_to_page(self.current_page.saturating_sub(1));
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Slices the current page out of `ordered`, whose length should match
    /// the last recorded item count.
    pub fn page<'a, T>(&self, ordered: &'a [T]) -> &'a [T] {
        get_page(ordered, self.current_page, self.page_size)
    }

    fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages())
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn empty_collection_still_has_one_page() {
        assert_eq!(total_pages(0, size(25)), 1);
        let empty: [u32; 0] = [];
        assert!(get_page(&empty, 1, size(25)).is_empty());
    }

    #[test]
    fn twenty_six_items_make_two_pages() {
        let items: Vec<u32> = (0..26).collect();
        assert_eq!(total_pages(items.len(), size(25)), 2);
        assert_eq!(get_page(&items, 1, size(25)).len(), 25);
        assert_eq!(get_page(&items, 2, size(25)), &[25]);
        assert!(get_page(&items, 3, size(25)).is_empty());
    }

    #[test]
    fn page_zero_reads_as_first_page() {
        let items = [1, 2, 3];
        assert_eq!(get_page(&items, 0, size(2)), &[1, 2]);
    }

    #[test]
    fn huge_page_number_does_not_overflow() {
        let items = [1, 2, 3];
        assert!(get_page(&items, usize::MAX, size(2)).is_empty());
    }

    #[test]
    fn go_to_page_clamps() {
        let mut paginator = Paginator::new(size(10));
        paginator.set_item_count(35);

        paginator.go_to_page(9);
        assert_eq!(paginator.current_page(), 4);

        paginator.go_to_page(0);
        assert_eq!(paginator.current_page(), 1);
    }

    #[test]
    fn next_and_previous_stop_at_boundaries() {
        let mut paginator = Paginator::new(size(10));
        paginator.set_item_count(20);

        paginator.previous();
        assert_eq!(paginator.current_page(), 1);
        assert!(!paginator.has_previous());

        paginator.next();
        assert_eq!(paginator.current_page(), 2);
        assert!(!paginator.has_next());

        paginator.next();
        assert_eq!(paginator.current_page(), 2);
    }

    #[test]
    fn shrinking_the_count_reclamps_current_page() {
        let mut paginator = Paginator::new(size(25));
        paginator.set_item_count(100);
        paginator.go_to_page(4);
        assert_eq!(paginator.current_page(), 4);

        paginator.set_item_count(30);
        assert_eq!(paginator.current_page(), 2);
        assert!(paginator.current_page() <= paginator.total_pages());

        paginator.set_item_count(0);
        assert_eq!(paginator.current_page(), 1);
        assert_eq!(paginator.total_pages(), 1);
    }

    #[test]
    fn page_slices_current_window() {
        let items: Vec<u32> = (1..=7).collect();
        let mut paginator = Paginator::new(size(3));
        paginator.set_item_count(items.len());
        paginator.go_to_page(3);
        assert_eq!(paginator.page(&items), &[7]);
    }
}
