//! Client CRUD store

use common::{ApiClient, ApiResult};

use crate::models::{Client, NewClient, Paginated, Pagination, UpdateClient};

/// Store for the client list and the selected client
pub struct ClientStore {
    api: ApiClient,
    pub clients: Vec<Client>,
    pub client: Option<Client>,
    pub loading: bool,
    pub last_error: Option<String>,
    pub pagination: Pagination,
}

impl ClientStore {
    pub fn new(api: ApiClient) -> Self {
        ClientStore {
            api,
            clients: Vec::new(),
            client: None,
            loading: false,
            last_error: None,
            pagination: Pagination::default(),
        }
    }

    /// Fetch a page of clients, optionally filtered by a search term
    pub async fn fetch_all(&mut self, page: u32, search: &str) {
        self.loading = true;
        self.last_error = None;

        let mut pairs = vec![("page".to_string(), page.to_string())];

        if !search.is_empty() {
            pairs.push(("search".to_string(), search.to_string()));
        }

        let result = self.api.get_pairs::<Paginated<Client>>("/clients", &pairs).await;
        self.loading = false;

        match result {
            Ok(page) => {
                self.pagination = Pagination::from_page(&page);
                self.clients = page.data;
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    /// Fetch one client into the current selection
    pub async fn fetch(&mut self, id: i64) {
        self.loading = true;
        self.last_error = None;

        let result = self.api.get::<Client>(&format!("/clients/{id}")).await;
        self.loading = false;

        match result {
            Ok(client) => self.client = Some(client),
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    /// Create a client and append it to the collection
    pub async fn create(&mut self, form: &NewClient) -> ApiResult<Client> {
        self.loading = true;
        self.last_error = None;

        let result = self.api.post::<Client, _>("/clients", form).await;
        self.loading = false;

        match result {
            Ok(client) => {
                self.clients.push(client.clone());
                Ok(client)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Update a client, splicing the new version into the collection
    pub async fn update(&mut self, id: i64, form: &UpdateClient) -> ApiResult<Client> {
        self.loading = true;
        self.last_error = None;

        let result = self.api.put::<Client, _>(&format!("/clients/{id}"), form).await;
        self.loading = false;

        match result {
            Ok(updated) => {
                if let Some(existing) = self.clients.iter_mut().find(|c| c.id == id) {
                    *existing = updated.clone();
                }

                if self.client.as_ref().map(|c| c.id) == Some(id) {
                    self.client = Some(updated.clone());
                }

                Ok(updated)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Delete a client and drop it from the collection
    pub async fn remove(&mut self, id: i64) -> ApiResult<()> {
        self.loading = true;
        self.last_error = None;

        let result = self.api.delete::<()>(&format!("/clients/{id}")).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.clients.retain(|c| c.id != id);
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
