//! Page bounds and slicing over the filtered result set.

/// Number of pages needed for `len` items. Never less than one.
pub fn total_pages(len: usize, rows_per_page: usize) -> usize {
    let rows = rows_per_page.max(1);
    len.div_ceil(rows).max(1)
}

/// Items for 1-based `page`. Out-of-range indices are simply omitted, so the
/// last page may be short and pages past the end are empty.
pub fn slice<T>(items: &[T], page: usize, rows_per_page: usize) -> &[T] {
    let rows = rows_per_page.max(1);
    let start = page.saturating_sub(1).saturating_mul(rows).min(items.len());
    let end = start.saturating_add(rows).min(items.len());
    &items[start..end]
}

/// Tracks the current page and keeps it inside `[1, total_pages]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationController {
    current_page: usize,
    total_items: usize,
    rows_per_page: usize,
}

impl PaginationController {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            current_page: 1,
            total_items: 0,
            rows_per_page: rows_per_page.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.rows_per_page)
    }

    /// Navigate to `page`, clamped into range. Returns the page actually set.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages());
        self.current_page
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Take new bounds, clamping the current page if it fell out of range.
    pub fn update_bounds(&mut self, total_items: usize, rows_per_page: usize) {
        self.total_items = total_items;
        self.rows_per_page = rows_per_page.max(1);
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        slice(items, self.current_page, self.rows_per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 9), 1);
        assert_eq!(total_pages(9, 9), 1);
        assert_eq!(total_pages(10, 9), 2);
        assert_eq!(total_pages(23, 9), 3);
    }

    #[test]
    fn test_last_page_is_short() {
        let items: Vec<usize> = (0..23).collect();
        let page = slice(&items, 3, 9);
        assert_eq!(page, &[18, 19, 20, 21, 22]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let items: Vec<usize> = (0..5).collect();
        assert!(slice(&items, 4, 5).is_empty());
        assert!(slice::<usize>(&[], 1, 5).is_empty());
    }

    #[test]
    fn test_pages_partition_items_in_order() {
        for len in 0..40 {
            let items: Vec<usize> = (0..len).collect();
            for rows in 1..13 {
                let pages = total_pages(len, rows);
                let mut joined = Vec::new();
                for page in 1..=pages {
                    let chunk = slice(&items, page, rows);
                    assert!(chunk.len() <= rows);
                    if page < pages {
                        assert_eq!(chunk.len(), rows);
                    }
                    joined.extend_from_slice(chunk);
                }
                assert_eq!(joined, items, "len={len} rows={rows}");
            }
        }
    }

    #[test]
    fn test_set_page_clamps() {
        let mut pagination = PaginationController::new(9);
        pagination.update_bounds(23, 9);
        assert_eq!(pagination.set_page(0), 1);
        assert_eq!(pagination.set_page(7), 3);
        assert_eq!(pagination.set_page(2), 2);
    }

    #[test]
    fn test_update_bounds_clamps_current_page() {
        let mut pagination = PaginationController::new(5);
        pagination.update_bounds(50, 5);
        pagination.set_page(10);

        pagination.update_bounds(12, 5);
        assert_eq!(pagination.current_page(), 3);

        pagination.update_bounds(0, 5);
        assert_eq!(pagination.current_page(), 1);
    }
}
