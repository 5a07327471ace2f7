//! Pagination Engine
//!
//! Pure functions over `(results, current_page)`. Nothing here holds state:
//! the page count, the visible slice, and the navigation items are all
//! recomputed from the result set on every read, so they can never drift
//! out of step with it.
//!
//! Pages are 1-based. A result set of `n` records has `ceil(n / 20)` pages;
//! an empty result set has none, and surfaces hide pagination controls.

use std::fmt;
use std::ops::Range;

/// Number of records per page
pub const PAGE_SIZE: usize = 20;

/// Page counts up to this value are listed in full
const FULL_LISTING_MAX: usize = 10;

/// Numbered pages shown around the current page once the list is compressed
const WINDOW: usize = 5;

/// One navigation item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageItem {
    /// A clickable page number
    Page(usize),
    /// A gap marker; not clickable
    Ellipsis,
}

impl PageItem {
    /// The page number, if this item is clickable
    pub fn page(&self) -> Option<usize> {
        match self {
            Self::Page(n) => Some(*n),
            Self::Ellipsis => None,
        }
    }
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "{n}"),
            Self::Ellipsis => f.write_str("…"),
        }
    }
}

/// Total pages for a result set of `len` records
pub fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Whether `page` names an existing page of a result set of `len` records
pub fn is_valid_page(page: usize, len: usize) -> bool {
    (1..=total_pages(len)).contains(&page)
}

/// Index range of `page` within a result set of `len` records
///
/// Out-of-range pages yield an empty range.
pub fn page_range(page: usize, len: usize) -> Range<usize> {
    if page == 0 {
        return 0..0;
    }
    let start = ((page - 1) * PAGE_SIZE).min(len);
    let end = (page * PAGE_SIZE).min(len);
    start..end
}

/// The records visible on `page`
pub fn visible_slice<T>(results: &[T], page: usize) -> &[T] {
    &results[page_range(page, results.len())]
}

/// Compress the page list for navigation controls
///
/// Short lists are returned verbatim. Longer ones keep the first and last
/// page, a window of five numbered pages, and an ellipsis wherever the window
/// does not reach an edge.
pub fn compress_page_indices(total: usize, current: usize) -> Vec<PageItem> {
    if total <= FULL_LISTING_MAX {
        return (1..=total).map(PageItem::Page).collect();
    }

    let mut items = Vec::with_capacity(WINDOW + 4);
    if current <= 4 {
        items.extend((1..=WINDOW).map(PageItem::Page));
        items.push(PageItem::Ellipsis);
        items.push(PageItem::Page(total));
    } else if current >= total - 3 {
        items.push(PageItem::Page(1));
        items.push(PageItem::Ellipsis);
        items.extend((total - 4..=total).map(PageItem::Page));
    } else {
        items.push(PageItem::Page(1));
        items.push(PageItem::Ellipsis);
        items.extend((current - 2..=current + 2).map(PageItem::Page));
        items.push(PageItem::Ellipsis);
        items.push(PageItem::Page(total));
    }
    items
}

/// Snapshot of the pagination state for rendering
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageView {
    /// Current page (1-based)
    pub current: usize,
    /// Total number of pages (0 when there are no results)
    pub total: usize,
    /// Navigation items
    pub items: Vec<PageItem>,
    /// Index range of the visible records within the full result set
    pub range: Range<usize>,
}

impl PageView {
    /// Derive the view for a result set of `len` records on `current`
    pub fn new(len: usize, current: usize) -> Self {
        let total = total_pages(len);
        Self {
            current,
            total,
            items: compress_page_indices(total, current),
            range: page_range(current, len),
        }
    }

    /// Whether navigation controls should be shown at all
    pub fn has_pages(&self) -> bool {
        self.total > 0
    }

    /// The page after the current one, if any
    pub fn next(&self) -> Option<usize> {
        (self.current < self.total).then_some(self.current + 1)
    }

    /// The page before the current one, if any
    pub fn prev(&self) -> Option<usize> {
        (self.current > 1 && self.total > 0).then_some(self.current - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use PageItem::{Ellipsis, Page};

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(20), 1);
        assert_eq!(total_pages(21), 2);
        assert_eq!(total_pages(1000), 50);
        for n in 0..200 {
            assert_eq!(total_pages(n), (n as f64 / PAGE_SIZE as f64).ceil() as usize);
        }
    }

    #[test]
    fn test_compress_short_list_verbatim() {
        for current in 1..=7 {
            assert_eq!(
                compress_page_indices(7, current),
                (1..=7).map(Page).collect::<Vec<_>>()
            );
        }
        assert_eq!(compress_page_indices(10, 10).len(), 10);
        assert!(compress_page_indices(0, 1).is_empty());
    }

    #[test]
    fn test_compress_near_start() {
        assert_eq!(
            compress_page_indices(25, 1),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(25)]
        );
        assert_eq!(compress_page_indices(25, 4), compress_page_indices(25, 1));
    }

    #[test]
    fn test_compress_middle() {
        assert_eq!(
            compress_page_indices(25, 13),
            vec![
                Page(1),
                Ellipsis,
                Page(11),
                Page(12),
                Page(13),
                Page(14),
                Page(15),
                Ellipsis,
                Page(25)
            ]
        );
    }

    #[test]
    fn test_compress_near_end() {
        assert_eq!(
            compress_page_indices(25, 24),
            vec![Page(1), Ellipsis, Page(21), Page(22), Page(23), Page(24), Page(25)]
        );
        assert_eq!(compress_page_indices(25, 22), compress_page_indices(25, 25));
    }

    #[test]
    fn test_compress_boundaries_of_middle_window() {
        // Page 5 of 11 is the first page that gets the symmetric window
        assert_eq!(
            compress_page_indices(11, 5),
            vec![
                Page(1),
                Ellipsis,
                Page(3),
                Page(4),
                Page(5),
                Page(6),
                Page(7),
                Ellipsis,
                Page(11)
            ]
        );
        // and page 8 of 11 already belongs to the tail
        assert_eq!(compress_page_indices(11, 8)[2], Page(7));
    }

    #[test]
    fn test_compressed_items_always_anchor_edges() {
        for total in 11..40 {
            for current in 1..=total {
                let items = compress_page_indices(total, current);
                assert_eq!(items.first(), Some(&Page(1)));
                assert_eq!(items.last(), Some(&Page(total)));
                assert!(items.contains(&Page(current)));
                assert!(items.iter().filter(|i| i.page().is_some()).count() <= WINDOW + 2);
            }
        }
    }

    #[test]
    fn test_visible_slice() {
        let results: Vec<usize> = (0..45).collect();

        assert_eq!(visible_slice(&results, 1), &results[0..20]);
        assert_eq!(visible_slice(&results, 3), &results[40..45]);
        assert!(visible_slice(&results, 4).is_empty());
        assert!(visible_slice(&results, 0).is_empty());
        assert!(visible_slice::<usize>(&[], 1).is_empty());
    }

    #[test]
    fn test_valid_pages() {
        assert!(!is_valid_page(1, 0));
        assert!(is_valid_page(1, 1));
        assert!(is_valid_page(3, 41));
        assert!(!is_valid_page(0, 41));
        assert!(!is_valid_page(4, 41));
    }

    #[test]
    fn test_page_view() {
        let view = PageView::new(45, 2);
        assert!(view.has_pages());
        assert_eq!(view.total, 3);
        assert_eq!(view.range, 20..40);
        assert_eq!(view.next(), Some(3));
        assert_eq!(view.prev(), Some(1));

        let empty = PageView::new(0, 1);
        assert!(!empty.has_pages());
        assert!(empty.items.is_empty());
        assert_eq!(empty.next(), None);
        assert_eq!(empty.prev(), None);
    }

    #[test]
    fn test_ellipsis_display() {
        assert_eq!(Ellipsis.to_string(), "…");
        assert_eq!(Page(12).to_string(), "12");
    }
}
