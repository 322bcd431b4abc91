use std::ops::Range;

/// Client-side pager over a fully loaded collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    per_page: usize,
}

impl Pager {
    pub fn new(per_page: usize) -> Self {
        Self {
            page: 0,
            per_page: per_page.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Never less than one, so an empty collection still shows "Page 1 of 1"
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.per_page).max(1)
    }

    /// Pull the page index back into range after the collection shrank
    pub fn clamp(&mut self, len: usize) {
        let last = self.total_pages(len) - 1;
        if self.page > last {
            self.page = last;
        }
    }

    /// Indices of the visible slice
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = (self.page * self.per_page).min(len);
        let end = (start + self.per_page).min(len);
        start..end
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.page + 1 < self.total_pages(len)
    }

    pub fn next(&mut self, len: usize) -> bool {
        if self.has_next(len) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.has_prev() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }

    /// "Page 2 of 5"
    pub fn label(&self, len: usize) -> String {
        format!("Page {} of {}", self.page + 1, self.total_pages(len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection_has_one_page() {
        let pager = Pager::new(9);
        assert_eq!(pager.total_pages(0), 1);
        assert_eq!(pager.range(0), 0..0);
        assert!(!pager.has_prev());
        assert!(!pager.has_next(0));
        assert_eq!(pager.label(0), "Page 1 of 1");
    }

    #[test]
    fn test_navigation_stops_at_bounds() {
        let mut pager = Pager::new(9);
        assert!(pager.next(10));
        assert_eq!(pager.range(10), 9..10);
        assert!(!pager.next(10));
        assert!(pager.prev());
        assert!(!pager.prev());
    }

    #[test]
    fn test_clamp_after_last_item_deleted() {
        let mut pager = Pager::new(9);
        pager.next(10);
        pager.clamp(9);
        assert_eq!(pager.page(), 0);
        assert_eq!(pager.range(9), 0..9);
    }
}
