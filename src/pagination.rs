//! Page arithmetic over an already filtered result set

/// Highest valid page for `count` items. Never zero: an empty result still
/// has one (empty) page.
pub fn last_page(count: usize, page_size: usize) -> usize {
    if count == 0 || page_size == 0 {
        return 1;
    }
    count.div_ceil(page_size).max(1)
}

/// Index of the first item on `page` (1-based).
pub fn offset(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1).saturating_mul(page_size)
}

pub fn clamp_page(page: usize, last_page: usize) -> usize {
    page.clamp(1, last_page.max(1))
}

/// Items on `page`. Out-of-range pages, including page 0, yield an empty slice.
pub fn slice<T>(results: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = offset(page, page_size);
    if start >= results.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(results.len());
    &results[start..end]
}
