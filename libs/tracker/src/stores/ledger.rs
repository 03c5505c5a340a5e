//! Ledger entry store

use common::{ApiClient, ApiResult};

use crate::models::{CreatedEntry, LedgerEntry, NewLedgerEntry};

/// Store for creating and fetching individual ledger entries
pub struct LedgerStore {
    api: ApiClient,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl LedgerStore {
    pub fn new(api: ApiClient) -> Self {
        LedgerStore {
            api,
            loading: false,
            last_error: None,
        }
    }

    /// Create a ledger entry, returning both the entry and the new balance
    pub async fn create_entry(&mut self, form: &NewLedgerEntry) -> ApiResult<CreatedEntry> {
        self.loading = true;
        self.last_error = None;

        let result = self.api.post::<CreatedEntry, _>("/ledger-entries", form).await;
        self.loading = false;

        match result {
            Ok(created) => Ok(created),
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch one ledger entry
    pub async fn fetch_entry(&mut self, id: i64) -> ApiResult<LedgerEntry> {
        self.loading = true;
        self.last_error = None;

        let result = self
            .api
            .get::<LedgerEntry>(&format!("/ledger-entries/{id}"))
            .await;
        self.loading = false;

        match result {
            Ok(entry) => Ok(entry),
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
