//! Import plan store
//!
//! Unlike the other stores, every action here propagates its error to the
//! caller in addition to recording it, because import flows drive multi-step
//! UIs that must stop on the first failure.

use std::path::{Path, PathBuf};

use common::{ApiClient, ApiError, ApiResult};
use reqwest::multipart::{Form, Part};

use crate::models::{
    ImportFilters, ImportPlan, ImportPlanRow, ImportRowForm, Paginated, Pagination,
    TemplateFormat,
};

/// Store for staged import plans and their rows
pub struct ImportStore {
    api: ApiClient,
    pub plans: Vec<ImportPlan>,
    pub current: Option<ImportPlan>,
    pub loading: bool,
    pub last_error: Option<String>,
    pub pagination: Pagination,
}

impl ImportStore {
    pub fn new(api: ApiClient) -> Self {
        ImportStore {
            api,
            plans: Vec::new(),
            current: None,
            loading: false,
            last_error: None,
            pagination: Pagination::default(),
        }
    }

    fn record<T>(&mut self, result: ApiResult<T>) -> ApiResult<T> {
        self.loading = false;

        if let Err(e) = &result {
            self.last_error = Some(e.to_string());
        }

        result
    }

    /// Fetch a page of import plans
    pub async fn fetch_all(&mut self, page: u32, filters: &ImportFilters) -> ApiResult<()> {
        self.loading = true;
        self.last_error = None;

        let mut pairs = vec![("page".to_string(), page.to_string())];

        if let Some(status) = filters.status {
            pairs.push(("status".to_string(), status.as_str().to_string()));
        }

        if let Some(wallet_id) = filters.wallet_id {
            pairs.push(("wallet_id".to_string(), wallet_id.to_string()));
        }

        let result = self
            .api
            .get_pairs::<Paginated<ImportPlan>>("/import-plans", &pairs)
            .await;
        let page = self.record(result)?;

        self.pagination = Pagination::from_page(&page);
        self.plans = page.data;
        Ok(())
    }

    /// Fetch one plan with its rows into the current selection
    pub async fn fetch(&mut self, id: i64) -> ApiResult<ImportPlan> {
        self.loading = true;
        self.last_error = None;

        let result = self
            .api
            .get::<ImportPlan>(&format!("/import-plans/{id}"))
            .await;
        let plan = self.record(result)?;

        self.current = Some(plan.clone());
        Ok(plan)
    }

    /// Upload a CSV/XLSX file to stage a new import plan for a wallet
    pub async fn upload(&mut self, wallet_id: i64, file_path: &Path) -> ApiResult<ImportPlan> {
        self.loading = true;
        self.last_error = None;

        let result = self.upload_inner(wallet_id, file_path).await;
        let plan = self.record(result)?;

        self.current = Some(plan.clone());
        Ok(plan)
    }

    async fn upload_inner(&self, wallet_id: i64, file_path: &Path) -> ApiResult<ImportPlan> {
        let bytes = tokio::fs::read(file_path).await?;
        let filename = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ApiError::InvalidState(format!("Invalid upload path: {}", file_path.display()))
            })?
            .to_string();

        let form = Form::new()
            .text("wallet_id", wallet_id.to_string())
            .part("file", Part::bytes(bytes).file_name(filename));

        self.api.post_multipart("/import-plans", form).await
    }

    /// Confirm a plan, posting its rows to the ledger
    pub async fn confirm(&mut self, id: i64) -> ApiResult<ImportPlan> {
        self.transition(id, "confirm").await
    }

    /// Cancel a plan, discarding its rows
    pub async fn cancel(&mut self, id: i64) -> ApiResult<ImportPlan> {
        self.transition(id, "cancel").await
    }

    async fn transition(&mut self, id: i64, action: &str) -> ApiResult<ImportPlan> {
        self.loading = true;
        self.last_error = None;

        let result = self
            .api
            .post::<ImportPlan, _>(
                &format!("/import-plans/{id}/{action}"),
                &serde_json::json!({}),
            )
            .await;
        let plan = self.record(result)?;

        if self.current.as_ref().is_some_and(|c| c.id == plan.id) {
            self.current = Some(plan.clone());
        }

        self.splice(plan.clone());
        Ok(plan)
    }

    fn splice(&mut self, plan: ImportPlan) {
        if let Some(existing) = self.plans.iter_mut().find(|p| p.id == plan.id) {
            *existing = plan;
        }
    }

    /// Add a row to a pending plan, refreshing the current selection
    pub async fn add_row(&mut self, plan_id: i64, form: &ImportRowForm) -> ApiResult<ImportPlanRow> {
        self.loading = true;
        self.last_error = None;

        let result = self
            .api
            .post::<ImportPlanRow, _>(&format!("/import-plans/{plan_id}/rows"), form)
            .await;
        let row = self.record(result)?;

        self.refresh_current(plan_id).await?;
        Ok(row)
    }

    /// Update a row of a pending plan, refreshing the current selection
    ///
    /// Rows are addressed globally once created; only creation nests under
    /// the plan.
    pub async fn update_row(
        &mut self,
        plan_id: i64,
        row_id: i64,
        form: &ImportRowForm,
    ) -> ApiResult<ImportPlanRow> {
        self.loading = true;
        self.last_error = None;

        let result = self
            .api
            .put::<ImportPlanRow, _>(&format!("/import-plans/rows/{row_id}"), form)
            .await;
        let row = self.record(result)?;

        self.refresh_current(plan_id).await?;
        Ok(row)
    }

    /// Delete a row of a pending plan, refreshing the current selection
    pub async fn delete_row(&mut self, plan_id: i64, row_id: i64) -> ApiResult<()> {
        self.loading = true;
        self.last_error = None;

        let result = self
            .api
            .delete::<()>(&format!("/import-plans/rows/{row_id}"))
            .await;
        self.record(result)?;

        self.refresh_current(plan_id).await
    }

    async fn refresh_current(&mut self, plan_id: i64) -> ApiResult<()> {
        if self.current.as_ref().is_some_and(|c| c.id == plan_id) {
            self.fetch(plan_id).await?;
        }

        Ok(())
    }

    /// Download the import template in the given format
    pub async fn download_template(
        &mut self,
        format: TemplateFormat,
        dest_dir: &Path,
    ) -> ApiResult<PathBuf> {
        self.loading = true;
        self.last_error = None;

        let path = format!("/import-plans/template/download?format={}", format.as_str());
        let result = self.api.download(&path, dest_dir, None).await;
        self.record(result)
    }
}
