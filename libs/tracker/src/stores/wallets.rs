//! Wallet CRUD store

use common::{ApiClient, ApiResult};

use crate::models::{
    LedgerEntry, NewWallet, Paginated, Pagination, UpdateWallet, WalletWithBalance,
};

/// Store for wallets, the selected wallet, and its ledger entries
pub struct WalletStore {
    api: ApiClient,
    pub wallets: Vec<WalletWithBalance>,
    pub wallet: Option<WalletWithBalance>,
    pub entries: Vec<LedgerEntry>,
    pub loading: bool,
    pub last_error: Option<String>,
    pub pagination: Pagination,
}

impl WalletStore {
    pub fn new(api: ApiClient) -> Self {
        WalletStore {
            api,
            wallets: Vec::new(),
            wallet: None,
            entries: Vec::new(),
            loading: false,
            last_error: None,
            pagination: Pagination::default(),
        }
    }

    /// Fetch a page of wallets, optionally restricted to one client
    pub async fn fetch_all(&mut self, client_id: Option<i64>, page: u32) {
        self.loading = true;
        self.last_error = None;

        let mut pairs = vec![("page".to_string(), page.to_string())];

        if let Some(client_id) = client_id {
            pairs.push(("client_id".to_string(), client_id.to_string()));
        }

        let result = self
            .api
            .get_pairs::<Paginated<WalletWithBalance>>("/wallets", &pairs)
            .await;
        self.loading = false;

        match result {
            Ok(page) => {
                self.pagination = Pagination::from_page(&page);
                self.wallets = page.data;
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    /// Fetch one wallet into the current selection
    pub async fn fetch(&mut self, id: i64) {
        self.loading = true;
        self.last_error = None;

        let result = self
            .api
            .get::<WalletWithBalance>(&format!("/wallets/{id}"))
            .await;
        self.loading = false;

        match result {
            Ok(wallet) => self.wallet = Some(wallet),
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    /// Fetch a page of the wallet's ledger entries
    pub async fn fetch_entries(&mut self, wallet_id: i64, page: u32) {
        self.loading = true;
        self.last_error = None;

        let pairs = vec![("page".to_string(), page.to_string())];
        let result = self
            .api
            .get_pairs::<Paginated<LedgerEntry>>(&format!("/wallets/{wallet_id}/entries"), &pairs)
            .await;
        self.loading = false;

        match result {
            Ok(page) => {
                self.pagination = Pagination::from_page(&page);
                self.entries = page.data;
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    /// Create a wallet
    pub async fn create(&mut self, form: &NewWallet) -> ApiResult<WalletWithBalance> {
        self.loading = true;
        self.last_error = None;

        let result = self.api.post::<WalletWithBalance, _>("/wallets", form).await;
        self.loading = false;

        match result {
            Ok(wallet) => Ok(wallet),
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Update a wallet, refreshing the current selection when it matches
    pub async fn update(&mut self, id: i64, form: &UpdateWallet) -> ApiResult<WalletWithBalance> {
        self.loading = true;
        self.last_error = None;

        let result = self
            .api
            .put::<WalletWithBalance, _>(&format!("/wallets/{id}"), form)
            .await;
        self.loading = false;

        match result {
            Ok(updated) => {
                if let Some(existing) = self.wallets.iter_mut().find(|w| w.wallet.id == id) {
                    *existing = updated.clone();
                }

                if self.wallet.as_ref().map(|w| w.wallet.id) == Some(id) {
                    self.wallet = Some(updated.clone());
                }

                Ok(updated)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
