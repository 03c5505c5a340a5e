//! Tag CRUD store

use common::{ApiClient, ApiResult};

use crate::models::{NewTag, Tag};

/// Store for the tag list
pub struct TagStore {
    api: ApiClient,
    pub tags: Vec<Tag>,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl TagStore {
    pub fn new(api: ApiClient) -> Self {
        TagStore {
            api,
            tags: Vec::new(),
            loading: false,
            last_error: None,
        }
    }

    /// Fetch all tags, optionally filtered by a search term
    pub async fn fetch_all(&mut self, search: &str) {
        self.loading = true;
        self.last_error = None;

        let mut pairs = Vec::new();

        if !search.is_empty() {
            pairs.push(("search".to_string(), search.to_string()));
        }

        let result = self.api.get_pairs::<Vec<Tag>>("/tags", &pairs).await;
        self.loading = false;

        match result {
            Ok(tags) => self.tags = tags,
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    /// Create a tag and append it to the collection
    pub async fn create(&mut self, name: &str) -> ApiResult<Tag> {
        self.loading = true;
        self.last_error = None;

        let form = NewTag {
            name: name.to_string(),
        };
        let result = self.api.post::<Tag, _>("/tags", &form).await;
        self.loading = false;

        match result {
            Ok(tag) => {
                self.tags.push(tag.clone());
                Ok(tag)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Delete a tag and drop it from the collection
    pub async fn remove(&mut self, id: i64) -> ApiResult<()> {
        self.loading = true;
        self.last_error = None;

        let result = self.api.delete::<()>(&format!("/tags/{id}")).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.tags.retain(|t| t.id != id);
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
