//! Timer store and active-timer poller
//!
//! Client-side mirror of the server-tracked timer. Every transition is a
//! server round trip whose response replaces the local snapshot — elapsed
//! time accounting is server-authoritative, so the client never transitions
//! optimistically. While a timer is running or paused a recurring job
//! re-fetches the active-timer endpoint to reconcile drift (e.g. a
//! server-side auto-stop).

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{info, warn};

use common::{ApiClient, ApiError, ApiResult, Notifier};

use crate::models::{
    CycleEdit, NewTimer, Paginated, Pagination, Timer, TimerStatus, UpdateTimer,
};

const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Default)]
struct TimerState {
    active: Option<Timer>,
    timers: Vec<Timer>,
    current: Option<Timer>,
    pagination: Pagination,
    last_error: Option<String>,
}

/// Store for the single active timer plus the timer list
#[derive(Clone)]
pub struct TimerStore {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    state: Arc<RwLock<TimerState>>,
    // Live scheduler while polling; None otherwise. Taking the slot under
    // the lock is what makes start/stop idempotent.
    scheduler: Arc<Mutex<Option<JobScheduler>>>,
    poll_interval: Duration,
}

impl TimerStore {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        TimerStore {
            api,
            notifier,
            state: Arc::new(RwLock::new(TimerState::default())),
            scheduler: Arc::new(Mutex::new(None)),
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Override the poll interval (tests, embedders with other needs)
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, TimerState> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, TimerState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn active_id(&self) -> ApiResult<i64> {
        self.read()
            .active
            .as_ref()
            .map(|t| t.id)
            .ok_or_else(|| ApiError::InvalidState("no active timer".to_string()))
    }

    fn record_error(&self, e: &ApiError) {
        self.write().last_error = Some(e.to_string());
    }

    /// Snapshot of the active timer, if any
    pub fn active_timer(&self) -> Option<Timer> {
        self.read().active.clone()
    }

    pub fn has_active_timer(&self) -> bool {
        self.read().active.is_some()
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.read().active.as_ref().map(|t| t.status),
            Some(TimerStatus::Running)
        )
    }

    pub fn is_paused(&self) -> bool {
        matches!(
            self.read().active.as_ref().map(|t| t.status),
            Some(TimerStatus::Paused)
        )
    }

    /// Last-fetched timer list
    pub fn timers(&self) -> Vec<Timer> {
        self.read().timers.clone()
    }

    /// Currently selected timer, if any
    pub fn current(&self) -> Option<Timer> {
        self.read().current.clone()
    }

    pub fn pagination(&self) -> Pagination {
        self.read().pagination.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.read().last_error.clone()
    }

    /// Whether the recurring poll is live
    pub async fn is_polling(&self) -> bool {
        self.scheduler.lock().await.is_some()
    }

    /// Re-fetch the server's active timer, replacing the local snapshot
    pub async fn fetch_active(&self) -> ApiResult<()> {
        match self.api.get::<Option<Timer>>("/timers/active").await {
            Ok(active) => {
                self.write().active = active;
                Ok(())
            }
            Err(e) => {
                self.record_error(&e);
                self.write().active = None;
                Err(e)
            }
        }
    }

    /// Start a new timer; only valid when no active timer is tracked
    pub async fn start(&self, form: &NewTimer) -> ApiResult<Timer> {
        if self.has_active_timer() {
            return Err(ApiError::InvalidState(
                "a timer is already active".to_string(),
            ));
        }

        self.write().last_error = None;

        match self.api.post::<Timer, _>("/timers", form).await {
            Ok(timer) => {
                info!("Timer {} started", timer.id);
                self.write().active = Some(timer.clone());
                self.start_polling().await?;
                Ok(timer)
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Pause the active timer
    pub async fn pause(&self) -> ApiResult<Timer> {
        self.transition("pause").await
    }

    /// Resume the paused active timer
    pub async fn resume(&self) -> ApiResult<Timer> {
        self.transition("resume").await
    }

    /// Stop the active timer; the snapshot is retained for review and
    /// confirmation, but polling ends
    pub async fn stop(&self) -> ApiResult<Timer> {
        let timer = self.transition("stop").await?;
        self.stop_polling().await?;
        Ok(timer)
    }

    async fn transition(&self, action: &str) -> ApiResult<Timer> {
        let id = self.active_id()?;
        self.write().last_error = None;

        match self
            .api
            .post::<Timer, _>(&format!("/timers/{id}/{action}"), &serde_json::json!({}))
            .await
        {
            Ok(timer) => {
                self.write().active = Some(timer.clone());
                Ok(timer)
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Convert the stopped timer into a ledger entry server-side, optionally
    /// with edited cycle boundaries; clears the active reference
    pub async fn confirm(&self, cycles: Option<&[CycleEdit]>) -> ApiResult<Timer> {
        let id = self.active_id()?;
        self.write().last_error = None;

        let payload = match cycles {
            Some(cycles) => serde_json::json!({ "cycles": cycles }),
            None => serde_json::json!({}),
        };

        match self
            .api
            .post::<Timer, _>(&format!("/timers/{id}/confirm"), &payload)
            .await
        {
            Ok(timer) => {
                info!("Timer {id} confirmed");
                self.write().active = None;
                self.stop_polling().await?;
                Ok(timer)
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Cancel the active timer; clears the local reference immediately
    pub async fn cancel(&self) -> ApiResult<()> {
        let id = self.active_id()?;
        self.write().last_error = None;

        match self
            .api
            .post::<Timer, _>(&format!("/timers/{id}/cancel"), &serde_json::json!({}))
            .await
        {
            Ok(_) => {
                info!("Timer {id} cancelled");
                self.write().active = None;
                self.stop_polling().await?;
                Ok(())
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Fetch the timer list, optionally filtered by status
    pub async fn fetch_all(&self, status: Option<TimerStatus>) -> ApiResult<()> {
        self.write().last_error = None;

        let mut pairs = Vec::new();

        if let Some(status) = status {
            let value = serde_json::to_value(status).map_err(ApiError::Decode)?;
            if let serde_json::Value::String(s) = value {
                pairs.push(("status".to_string(), s));
            }
        }

        match self
            .api
            .get_pairs::<Paginated<Timer>>("/timers", &pairs)
            .await
        {
            Ok(page) => {
                let mut state = self.write();
                state.pagination = Pagination::from_page(&page);
                state.timers = page.data;
                Ok(())
            }
            Err(e) => {
                self.record_error(&e);
                self.write().timers = Vec::new();
                Err(e)
            }
        }
    }

    /// Fetch one timer into the current selection
    pub async fn fetch(&self, id: i64) -> ApiResult<Timer> {
        self.write().last_error = None;

        match self.api.get::<Timer>(&format!("/timers/{id}")).await {
            Ok(timer) => {
                self.write().current = Some(timer.clone());
                Ok(timer)
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Update a timer's metadata
    pub async fn update(&self, id: i64, form: &UpdateTimer) -> ApiResult<Timer> {
        self.write().last_error = None;

        match self.api.put::<Timer, _>(&format!("/timers/{id}"), form).await {
            Ok(timer) => {
                let mut state = self.write();

                if state.active.as_ref().map(|t| t.id) == Some(id) {
                    state.active = Some(timer.clone());
                }

                state.current = Some(timer.clone());
                Ok(timer)
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Replace a timer's cycle boundaries
    pub async fn update_cycles(&self, id: i64, cycles: &[CycleEdit]) -> ApiResult<Timer> {
        self.write().last_error = None;

        let payload = serde_json::json!({ "cycles": cycles });

        match self
            .api
            .put::<Timer, _>(&format!("/timers/{id}/cycles"), &payload)
            .await
        {
            Ok(timer) => {
                let mut state = self.write();

                if state.active.as_ref().map(|t| t.id) == Some(id) {
                    state.active = Some(timer.clone());
                }

                state.current = Some(timer.clone());
                Ok(timer)
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Delete a timer from the list
    pub async fn remove(&self, id: i64) -> ApiResult<()> {
        self.write().last_error = None;

        match self.api.delete::<()>(&format!("/timers/{id}")).await {
            Ok(()) => {
                self.write().timers.retain(|t| t.id != id);
                Ok(())
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Fetch the active timer and begin polling when it is running or paused
    pub async fn initialize(&self) -> ApiResult<()> {
        self.fetch_active().await?;

        if self.is_running() || self.is_paused() {
            self.start_polling().await?;
        }

        Ok(())
    }

    /// Stop polling and drop all local timer state (e.g. on logout)
    pub async fn cleanup(&self) {
        if let Err(e) = self.stop_polling().await {
            warn!("Failed to stop timer polling during cleanup: {e}");
        }

        *self.write() = TimerState::default();
    }

    /// Begin the recurring active-timer refresh; a no-op when already polling
    pub async fn start_polling(&self) -> ApiResult<()> {
        let mut slot = self.scheduler.lock().await;

        if slot.is_some() {
            return Ok(());
        }

        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| ApiError::Scheduler(e.to_string()))?;

        let store = self.clone();
        let job = Job::new_repeated_async(self.poll_interval, move |_, _| {
            let store = store.clone();
            Box::pin(async move {
                if let Err(e) = store.fetch_active().await {
                    store
                        .notifier
                        .error(&format!("Active timer refresh failed: {e}"));
                }
            })
        })
        .map_err(|e| ApiError::Scheduler(e.to_string()))?;

        scheduler
            .add(job)
            .await
            .map_err(|e| ApiError::Scheduler(e.to_string()))?;
        scheduler
            .start()
            .await
            .map_err(|e| ApiError::Scheduler(e.to_string()))?;

        info!("Started active-timer polling");
        *slot = Some(scheduler);
        Ok(())
    }

    /// Cancel the recurring refresh and clear its handle; safe to call twice
    pub async fn stop_polling(&self) -> ApiResult<()> {
        let mut slot = self.scheduler.lock().await;

        if let Some(mut scheduler) = slot.take() {
            scheduler
                .shutdown()
                .await
                .map_err(|e| ApiError::Scheduler(e.to_string()))?;
            info!("Stopped active-timer polling");
        }

        Ok(())
    }
}
