//! Page navigation over a bounded page index

use serde::Serialize;

/// Current page within a paginated layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNavigator {
    current_page: u32,
    total_pages: u32,
    stride: u32,
}

impl Default for PageNavigator {
    fn default() -> Self {
        Self {
            current_page: 0,
            total_pages: 1,
            stride: 0,
        }
    }
}

impl PageNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    fn last_page(&self) -> u32 {
        self.total_pages - 1
    }

    pub fn is_first(&self) -> bool {
        self.current_page == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_page == self.last_page()
    }

    /// Advance one page. Returns false at the last page.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Go back one page. Returns false at the first page.
    pub fn prev(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Jump to a page, clamped into range. Returns whether the page changed.
    pub fn goto(&mut self, page: u32) -> bool {
        let target = page.min(self.last_page());
        let changed = target != self.current_page;
        self.current_page = target;
        changed
    }

    /// Apply a new layout; the current page is clamped if the book got shorter.
    pub fn set_layout(&mut self, total_pages: u32, stride: u32) {
        self.total_pages = total_pages.max(1);
        self.stride = stride;
        if self.current_page > self.last_page() {
            tracing::debug!(
                "Clamping page {} into {} pages",
                self.current_page,
                self.total_pages
            );
            self.current_page = self.last_page();
        }
    }

    /// Horizontal translation of the content track for the current page
    pub fn offset(&self) -> f64 {
        -(f64::from(self.current_page) * f64::from(self.stride))
    }

    /// Offset range the track may ever take: `(last page, first page)`
    pub fn offset_bounds(&self) -> (f64, f64) {
        (-(f64::from(self.last_page()) * f64::from(self.stride)), 0.0)
    }

    /// Fraction of the book read, counting the current page
    pub fn progress(&self) -> f64 {
        f64::from(self.current_page + 1) / f64::from(self.total_pages)
    }

    /// One-based page label, e.g. `"3 / 12"`
    pub fn label(&self) -> String {
        format!("{} / {}", self.current_page + 1, self.total_pages)
    }

    pub fn state(&self) -> PageState {
        PageState {
            current_page: self.current_page,
            total_pages: self.total_pages,
            stride: self.stride,
            offset: self.offset(),
            progress: self.progress(),
            label: self.label(),
        }
    }
}

/// Serializable view of the navigator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub current_page: u32,
    pub total_pages: u32,
    pub stride: u32,
    pub offset: f64,
    pub progress: f64,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigator(total: u32) -> PageNavigator {
        let mut nav = PageNavigator::new();
        nav.set_layout(total, 1040);
        nav
    }

    #[test]
    fn test_next_stops_at_last_page() {
        for start in 0..5 {
            let mut nav = navigator(5);
            nav.goto(start);
            for _ in 0..20 {
                nav.next();
                assert!(nav.current_page() <= 4);
            }
            assert!(nav.is_last());
            assert!(!nav.next());
        }
    }

    #[test]
    fn test_prev_stops_at_first_page() {
        let mut nav = navigator(5);
        nav.goto(3);
        for _ in 0..10 {
            nav.prev();
        }
        assert_eq!(nav.current_page(), 0);
        assert!(!nav.prev());
    }

    #[test]
    fn test_goto_clamps() {
        let mut nav = navigator(5);
        assert!(nav.goto(99));
        assert_eq!(nav.current_page(), 4);
        assert!(!nav.goto(4));
        assert!(nav.goto(0));
    }

    #[test]
    fn test_shrinking_layout_clamps_page() {
        let mut nav = navigator(5);
        nav.goto(4);
        nav.set_layout(2, 1040);
        assert_eq!(nav.current_page(), 1);

        // Growing leaves the page alone
        nav.set_layout(10, 1040);
        assert_eq!(nav.current_page(), 1);
    }

    #[test]
    fn test_zero_pages_treated_as_one() {
        let mut nav = navigator(0);
        assert_eq!(nav.total_pages(), 1);
        assert!(!nav.next());
        assert!(!nav.prev());
    }

    #[test]
    fn test_offset_and_progress() {
        let mut nav = navigator(4);
        nav.goto(2);
        assert_eq!(nav.offset(), -2080.0);
        assert_eq!(nav.offset_bounds(), (-3120.0, 0.0));
        assert_eq!(nav.progress(), 0.75);
        assert_eq!(nav.label(), "3 / 4");
    }
}
