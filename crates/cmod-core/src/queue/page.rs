//! Fixed-size pagination

use serde::Serialize;

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number as requested
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Slice `items` into the requested page.
    ///
    /// Pages past the end are empty but keep their number.
    pub fn paginate(items: Vec<T>, page: usize, per_page: usize) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total_items = items.len();
        let start = (page - 1).saturating_mul(per_page);

        let items = items.into_iter().skip(start).take(per_page).collect();

        Self {
            items,
            page,
            per_page,
            total_items,
        }
    }

    /// Number of pages, at least 1
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.per_page).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform the items, keeping page metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        let page = Page::paginate((1..=7).collect::<Vec<_>>(), 1, 3);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(!page.has_prev());
    }

    #[test]
    fn test_last_partial_page() {
        let page = Page::paginate((1..=7).collect::<Vec<_>>(), 3, 3);
        assert_eq!(page.items, vec![7]);
        assert!(!page.has_next());
        assert!(page.has_prev());
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = Page::paginate((1..=7).collect::<Vec<_>>(), 9, 3);
        assert!(page.is_empty());
        assert_eq!(page.page, 9);
        assert_eq!(page.total_items, 7);
    }

    #[test]
    fn test_empty_input_has_one_page() {
        let page = Page::paginate(Vec::<u8>::new(), 1, 25);
        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_next());
    }

    #[test]
    fn test_pages_cover_everything_once() {
        let items: Vec<_> = (1..=10).collect();
        let mut seen = Vec::new();
        for n in 1..=4 {
            seen.extend(Page::paginate(items.clone(), n, 3).items);
        }
        assert_eq!(seen, items);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::paginate(vec![1, 2, 3], 2, 2).map(|n| n * 10);
        assert_eq!(page.items, vec![30]);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_items, 3);
    }
}
