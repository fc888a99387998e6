//! Page slicing and the navigation window

use serde::{Serialize, Serializer};

/// Maximum slots shown by the navigation window
pub const VISIBLE_SLOTS: usize = 5;

/// Sentinel used for an ellipsis in the flat index form
pub const ELLIPSIS: i64 = -1;

/// One slot of the page navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(usize),
    Ellipsis,
}

impl PageSlot {
    /// Flat form: page index, or `-1` for an ellipsis
    pub fn as_index(&self) -> i64 {
        match self {
            PageSlot::Page(index) => *index as i64,
            PageSlot::Ellipsis => ELLIPSIS,
        }
    }
}

impl Serialize for PageSlot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.as_index())
    }
}

/// `ceil(count / page_size)`; a zero page size yields no pages
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    }
}

/// Items of page `page`; empty past the end
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Compact navigation window around `current`.
///
/// Always shows the first and last page once `total` exceeds the
/// visible slots.
pub fn pagination_range(total: usize, current: usize) -> Vec<PageSlot> {
    let half = VISIBLE_SLOTS / 2;

    if total <= VISIBLE_SLOTS {
        return (0..total).map(PageSlot::Page).collect();
    }

    let last = total - 1;
    let mut slots = Vec::with_capacity(VISIBLE_SLOTS + 2);

    if current <= half {
        slots.extend((0..=3).map(PageSlot::Page));
        slots.push(PageSlot::Ellipsis);
        slots.push(PageSlot::Page(last));
    } else if current >= total - half {
        slots.push(PageSlot::Page(0));
        slots.push(PageSlot::Ellipsis);
        slots.extend((total - 4..total).map(PageSlot::Page));
    } else {
        slots.push(PageSlot::Page(0));
        slots.push(PageSlot::Ellipsis);
        slots.extend((current - 1..=current + 1).map(PageSlot::Page));
        slots.push(PageSlot::Ellipsis);
        slots.push(PageSlot::Page(last));
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(slots: &[PageSlot]) -> Vec<i64> {
        slots.iter().map(PageSlot::as_index).collect()
    }

    #[test]
    fn test_pagination_range_near_start() {
        assert_eq!(flat(&pagination_range(10, 0)), vec![0, 1, 2, 3, -1, 9]);
        assert_eq!(flat(&pagination_range(10, 2)), vec![0, 1, 2, 3, -1, 9]);
    }

    #[test]
    fn test_pagination_range_middle() {
        assert_eq!(flat(&pagination_range(10, 5)), vec![0, -1, 4, 5, 6, -1, 9]);
        assert_eq!(flat(&pagination_range(10, 3)), vec![0, -1, 2, 3, 4, -1, 9]);
    }

    #[test]
    fn test_pagination_range_near_end() {
        assert_eq!(flat(&pagination_range(10, 8)), vec![0, -1, 6, 7, 8, 9]);
        assert_eq!(flat(&pagination_range(10, 9)), vec![0, -1, 6, 7, 8, 9]);
    }

    #[test]
    fn test_pagination_range_small_totals() {
        assert_eq!(flat(&pagination_range(3, 1)), vec![0, 1, 2]);
        assert_eq!(flat(&pagination_range(5, 4)), vec![0, 1, 2, 3, 4]);
        assert!(pagination_range(0, 0).is_empty());
    }

    #[test]
    fn test_slots_serialize_flat() {
        let json = serde_json::to_string(&pagination_range(7, 3)).unwrap();
        assert_eq!(json, "[0,-1,2,3,4,-1,6]");
    }

    #[test]
    fn test_page_slice_and_totals() {
        let items: Vec<u32> = (0..7).collect();
        assert_eq!(total_pages(items.len(), 3), 3);
        assert_eq!(page_slice(&items, 0, 3), &[0, 1, 2]);
        assert_eq!(page_slice(&items, 2, 3), &[6]);
        assert!(page_slice(&items, 5, 3).is_empty());
        assert_eq!(total_pages(0, 3), 0);
    }
}
