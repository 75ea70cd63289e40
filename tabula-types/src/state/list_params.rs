use serde::{Deserialize, Serialize};

use crate::{Filter, Pagination, ReduceError, Sort, SortOrder};

/// Pagination, sort and filter of a resource's list view, plus the total
/// reported by the last GET_LIST.
///
/// Invariant: `1 <= page <= max_page()`. Navigation outside that range is
/// rejected with a `ReduceError` rather than clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListParams {
    pub page: u32,
    pub per_page: u32,
    pub sort: Sort,
    pub filter: Filter,
    pub total: u64,
}

impl ListParams {
    pub fn new(per_page: u32, sort: Sort) -> Self {
        Self { page: 1, per_page: per_page.max(1), sort, filter: Filter::new(), total: 0 }
    }

    /// `ceil(total / per_page)`, never less than 1.
    pub fn max_page(&self) -> u32 {
        let per_page = u64::from(self.per_page.max(1));
        let pages = self.total.div_ceil(per_page).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }

    pub fn next_page(&mut self) -> Result<(), ReduceError> {
        let max = self.max_page();
        if self.page >= max {
            return Err(ReduceError::PageOutFromEnd { max });
        }
        self.page += 1;
        Ok(())
    }

    pub fn prev_page(&mut self) -> Result<(), ReduceError> {
        if self.page <= 1 {
            return Err(ReduceError::PageOutFromBegin);
        }
        self.page -= 1;
        Ok(())
    }

    pub fn goto_page(&mut self, page: u32) -> Result<(), ReduceError> {
        let max = self.max_page();
        if page < 1 || page > max {
            return Err(ReduceError::PageOutOfBoundaries { page, max });
        }
        self.page = page;
        Ok(())
    }

    /// Sorting by the current field flips the order; a new field starts
    /// ascending. Either way the page resets to 1.
    pub fn set_sort(&mut self, field: &str) {
        if self.sort.field == field {
            self.sort.order = self.sort.order.toggled();
        } else {
            self.sort = Sort::new(field, SortOrder::Asc);
        }
        self.page = 1;
    }

    pub fn set_per_page(&mut self, per_page: u32) -> Result<(), ReduceError> {
        if per_page == 0 {
            return Err(ReduceError::InvalidPerPage);
        }
        self.per_page = per_page;
        self.page = 1;
        Ok(())
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.page = 1;
    }

    pub fn set_total(&mut self, total: u64) {
        self.total = total;
    }
}
