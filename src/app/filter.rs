//! Filter state: the committed query, the pending search text, the current
//! result page and the in-flight request flags.
//!
//! Every change of the committed [`QueryFilter`] schedules one fetch. The
//! event loop drains the schedule with [`FilterState::take_scheduled_fetch`],
//! runs the request elsewhere, and hands the outcome back through
//! [`FilterState::finish_fetch`]. Each ticket carries a sequence number so a
//! slow response for an older filter can never overwrite newer rows.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::api::{ApiResult, DocumentType, QueryFilter, ResultPage};
use crate::error::DynError;

/// Page sizes offered by the paginator.
pub const PAGE_SIZE_OPTIONS: [u32; 3] = [10, 25, 30];

/// A listing request to run: the filter snapshot and its sequence number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub filter: QueryFilter,
}

/// An export request to run against the filter captured when it was issued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadTicket {
    pub format: DocumentType,
    pub filter: QueryFilter,
}

/// What [`FilterState::finish_fetch`] did with a completed request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    /// A newer request was issued after this one; the result was dropped.
    Stale,
}

#[derive(Clone, Debug)]
pub struct FilterState {
    filter: QueryFilter,
    pending_search: String,
    page: ResultPage,
    loading: bool,
    downloads_in_flight: usize,
    fetch_scheduled: bool,
    last_issued: u64,
    issued_per_page: u32,
    size_options: Vec<u32>,
}

impl FilterState {
    /// Start on the first page with `per_page` rows and no search.
    ///
    /// The initial load is scheduled immediately, like a freshly mounted view.
    pub fn new(per_page: u32) -> Self {
        let filter = QueryFilter::with_per_page(per_page);
        let mut size_options = PAGE_SIZE_OPTIONS.to_vec();
        if !size_options.contains(&filter.per_page) {
            size_options.push(filter.per_page);
            size_options.sort_unstable();
        }
        Self {
            issued_per_page: filter.per_page,
            filter,
            pending_search: String::new(),
            page: ResultPage::default(),
            loading: false,
            downloads_in_flight: 0,
            fetch_scheduled: true,
            last_issued: 0,
            size_options,
        }
    }

    pub fn filter(&self) -> &QueryFilter {
        &self.filter
    }

    pub fn pending_search(&self) -> &str {
        &self.pending_search
    }

    pub fn page(&self) -> &ResultPage {
        &self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_downloading(&self) -> bool {
        self.downloads_in_flight > 0
    }

    pub fn size_options(&self) -> &[u32] {
        &self.size_options
    }

    /// Number of pages for the current total; an empty result still has one page.
    pub fn total_pages(&self) -> u32 {
        let per_page = u64::from(self.filter.per_page.max(1));
        let pages = self.page.total.div_ceil(per_page).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Replace the uncommitted search text. Nothing is fetched.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.pending_search = text.into();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.pending_search.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.pending_search.pop();
    }

    /// Commit the pending text, go back to the first page and keep the page size.
    pub fn submit_search(&mut self) {
        let next = QueryFilter {
            page: 1,
            per_page: self.filter.per_page,
            search: self.pending_search.clone(),
        };
        debug!(search = %next.search, "search submitted");
        self.replace_filter(next);
    }

    /// Replace page and page size; the search text is left as is.
    pub fn set_page(&mut self, page: u32, per_page: u32) {
        let next = QueryFilter {
            page: page.max(1),
            per_page: per_page.max(1),
            search: self.filter.search.clone(),
        };
        self.replace_filter(next);
    }

    /// Advance one page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.filter.page >= self.total_pages() {
            return false;
        }
        self.set_page(self.filter.page + 1, self.filter.per_page);
        true
    }

    /// Go back one page. Returns `false` on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.filter.page <= 1 {
            return false;
        }
        self.set_page(self.filter.page - 1, self.filter.per_page);
        true
    }

    pub fn first_page(&mut self) -> bool {
        if self.filter.page == 1 {
            return false;
        }
        self.set_page(1, self.filter.per_page);
        true
    }

    pub fn last_page(&mut self) -> bool {
        let last = self.total_pages();
        if self.filter.page == last {
            return false;
        }
        self.set_page(last, self.filter.per_page);
        true
    }

    /// Switch to the next page size, keeping the first visible record on screen.
    pub fn cycle_page_size(&mut self) {
        let current = self.filter.per_page;
        let next = self
            .size_options
            .iter()
            .copied()
            .find(|&s| s > current)
            .or_else(|| self.size_options.first().copied())
            .unwrap_or(current);
        let first_index = u64::from(self.filter.page - 1) * u64::from(current);
        let page = u32::try_from(first_index / u64::from(next) + 1).unwrap_or(u32::MAX);
        self.set_page(page, next);
    }

    /// Re-run the current query without changing it.
    pub fn refresh(&mut self) {
        self.fetch_scheduled = true;
    }

    fn replace_filter(&mut self, next: QueryFilter) {
        self.filter = next;
        self.fetch_scheduled = true;
    }

    pub fn is_fetch_scheduled(&self) -> bool {
        self.fetch_scheduled
    }

    /// Hand out the scheduled fetch, if any. Several filter changes between two
    /// calls collapse into one ticket carrying the latest filter.
    pub fn take_scheduled_fetch(&mut self) -> Option<FetchTicket> {
        if !self.fetch_scheduled {
            return None;
        }
        self.fetch_scheduled = false;
        Some(self.begin_fetch())
    }

    /// Issue a fetch for the current filter now, regardless of the schedule.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.last_issued += 1;
        self.issued_per_page = self.filter.per_page;
        self.loading = true;
        FetchTicket {
            seq: self.last_issued,
            filter: self.filter.clone(),
        }
    }

    /// Apply the outcome of fetch `seq`.
    ///
    /// Only the latest issued fetch may change the rows or clear `loading`.
    /// Failures are logged and leave the previous rows in place.
    pub fn finish_fetch(&mut self, seq: u64, result: ApiResult<ResultPage>) -> FetchOutcome {
        if seq != self.last_issued {
            debug!(seq, latest = self.last_issued, "dropping stale users page");
            return FetchOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(mut page) => {
                let limit = usize::try_from(self.issued_per_page).unwrap_or(usize::MAX);
                if page.data.len() > limit {
                    warn!(rows = page.data.len(), limit, "users page larger than perPage, truncating");
                    page.data.truncate(limit);
                }
                debug!(rows = page.data.len(), total = page.total, "users page loaded");
                self.page = page;
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "users error");
                FetchOutcome::Failed
            }
        }
    }

    /// Mark a download as running and capture the filter it exports.
    pub fn begin_download(&mut self, format: DocumentType) -> DownloadTicket {
        self.downloads_in_flight += 1;
        DownloadTicket {
            format,
            filter: self.filter.clone(),
        }
    }

    /// Record a finished download; returns the saved path on success.
    pub fn finish_download(
        &mut self,
        format: DocumentType,
        result: std::result::Result<PathBuf, DynError>,
    ) -> Option<PathBuf> {
        self.downloads_in_flight = self.downloads_in_flight.saturating_sub(1);
        match result {
            Ok(path) => {
                info!(format = format.as_param(), path = %path.display(), "users report saved");
                Some(path)
            }
            Err(e) => {
                warn!(format = format.as_param(), error = %e, "users report download failed");
                None
            }
        }
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(QueryFilter::DEFAULT_PER_PAGE)
    }
}
