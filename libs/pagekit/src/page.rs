//! Page arithmetic. All functions saturate instead of overflowing.

/// Page actually served for a requested page: `maxPageNumber` is a hard ceiling.
#[must_use]
pub fn clamp_page(page: u64, max_page_number: u64) -> u64 {
    page.min(max_page_number)
}

/// Zero-based index of the first item on `page`.
///
/// The page is clamped again here, so a page that bypassed extraction still
/// lands inside the window.
#[must_use]
pub fn item_offset(page: u64, items_per_page: u64, max_page_number: u64) -> u64 {
    if page < 2 {
        return 0;
    }
    items_per_page.saturating_mul(clamp_page(page, max_page_number).saturating_sub(1))
}

/// Number of pages needed for `total_items`: 0 for an empty result, the
/// integer ceiling otherwise.
#[must_use]
pub fn total_pages(total_items: u64, items_per_page: u64) -> u64 {
    if total_items == 0 {
        return 0;
    }
    total_items.div_ceil(items_per_page.max(1))
}
