//! Report store

use common::ApiClient;

use crate::models::{
    GroupedTotals, LedgerEntry, Pagination, Report, ReportFilters, ReportSummary,
};

/// Store for report summaries, entry listings, and grouped totals
pub struct ReportStore {
    api: ApiClient,
    pub summary: Option<ReportSummary>,
    pub entries: Vec<LedgerEntry>,
    pub grouped: Vec<GroupedTotals>,
    pub loading: bool,
    pub last_error: Option<String>,
    pub pagination: Pagination,
}

impl ReportStore {
    pub fn new(api: ApiClient) -> Self {
        ReportStore {
            api,
            summary: None,
            entries: Vec::new(),
            grouped: Vec::new(),
            loading: false,
            last_error: None,
            pagination: Pagination::default(),
        }
    }

    /// Fetch a full report for the given filters
    pub async fn fetch_report(&mut self, filters: &ReportFilters) {
        self.loading = true;
        self.last_error = None;
        self.entries = Vec::new();
        self.grouped = Vec::new();

        let pairs = filters.to_query_pairs();
        let result = self.api.get_pairs::<Report>("/reports", &pairs).await;
        self.loading = false;

        match result {
            Ok(report) => {
                self.summary = Some(report.summary);

                match report.entries {
                    Some(page) => {
                        self.pagination = Pagination::from_page(&page);
                        self.entries = page.data;
                    }
                    None => self.pagination = Pagination::default(),
                }

                self.grouped = report.grouped.unwrap_or_default();
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    /// Fetch only the summary totals for the given filters
    pub async fn fetch_summary(&mut self, filters: &ReportFilters) {
        self.loading = true;
        self.last_error = None;

        let pairs = filters.to_query_pairs();
        let result = self
            .api
            .get_pairs::<ReportSummary>("/reports/summary", &pairs)
            .await;
        self.loading = false;

        match result {
            Ok(summary) => self.summary = Some(summary),
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }
}
