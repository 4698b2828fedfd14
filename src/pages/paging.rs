//! Local paging state: carousels slice an already-fetched list, pagers walk
//! server-side pages.

use std::ops::Range;

/// Zero-based client-side paging over `len` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    pub page: usize,
    pub per_page: usize,
    pub len: usize,
}

impl Carousel {
    pub fn new(per_page: usize, len: usize) -> Self {
        Self {
            page: 0,
            per_page: per_page.max(1),
            len,
        }
    }

    pub fn pages(&self) -> usize {
        self.len.div_ceil(self.per_page)
    }

    pub fn visible(&self) -> Range<usize> {
        let start = (self.page * self.per_page).min(self.len);
        start..(start + self.per_page).min(self.len)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.pages()
    }

    pub fn prev(&mut self) {
        if self.has_prev() {
            self.page -= 1;
        }
    }

    pub fn next(&mut self) {
        if self.has_next() {
            self.page += 1;
        }
    }

    /// `● ○ ○` style dots for the current position.
    pub fn dots(&self) -> String {
        (0..self.pages())
            .map(|i| if i == self.page { "●" } else { "○" })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One-based server-side pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub current: u32,
    pub per_page: u32,
    pub last_page: u32,
    pub total: usize,
}

/// At most this many page numbers are offered.
const MAX_PAGE_BUTTONS: u32 = 8;

impl Pager {
    pub fn new(current: u32, per_page: u32) -> Self {
        Self {
            current: current.max(1),
            per_page: per_page.max(1),
            last_page: 1,
            total: 0,
        }
    }

    pub fn start_item(&self) -> usize {
        (self.current as usize - 1) * self.per_page as usize + 1
    }

    pub fn end_item(&self) -> usize {
        (self.current as usize * self.per_page as usize).min(self.total)
    }

    /// `Showing 11 - 20 of 27`
    pub fn summary(&self) -> String {
        format!(
            "Showing {} - {} of {}",
            self.start_item(),
            self.end_item(),
            self.total
        )
    }

    pub fn page_numbers(&self) -> Range<u32> {
        1..self.last_page.min(MAX_PAGE_BUTTONS) + 1
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.last_page
    }
}
