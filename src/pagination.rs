// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

/// Number of pages needed to show `total` items, `page_size` per page.
///
/// Returns 1 when either argument is zero so that an empty listing still
/// reports a single (empty) page.
pub fn total_page_number(total: usize, page_size: usize) -> usize {
    if total == 0 || page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size)
}
