use crate::common::constants::PAGE_SIZE;
use crate::common::types::TenderRecord;

/// Current result set and a 1-based page window over it
#[derive(Debug, Clone)]
pub struct ResultPager<T = TenderRecord> {
    records: Vec<T>,
    page: usize,
    page_size: usize,
}

impl<T> Default for ResultPager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResultPager<T> {
    pub fn new() -> Self {
        Self::with_page_size(PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Replaces the whole set and returns to page 1
    pub fn set_records(&mut self, records: Vec<T>) {
        self.records = records;
        self.page = 1;
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.records.len().div_ceil(self.page_size).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page * self.page_size < self.records.len()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Moves to `page`, clamped to the available pages
    pub fn seek(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
    }

    pub fn current_slice(&self) -> &[T] {
        let start = ((self.page - 1) * self.page_size).min(self.records.len());
        let end = (self.page * self.page_size).min(self.records.len());
        &self.records[start..end]
    }
}
