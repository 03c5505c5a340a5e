//! Integration tests for the CRUD stores
//!
//! One loopback axum server backs all stores. It captures the raw query
//! string of report requests and the content type of import uploads so the
//! tests can assert the wire shape, not just the decoded result.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use serde_json::{Value, json};

use common::{ApiClient, ApiConfig, MemoryStorage, Storage};
use tracker::models::{
    EntryKind, GroupBy, ImportFilters, ImportRowForm, NewClient, NewLedgerEntry, ReportFilters,
    TemplateFormat, UpdateClient,
};
use tracker::{ClientStore, ImportStore, LedgerStore, ReportStore, TagStore, WalletStore};

#[derive(Clone)]
struct BackendState {
    fail_clients: Arc<AtomicBool>,
    report_query: Arc<Mutex<Option<String>>>,
    upload_content_type: Arc<Mutex<Option<String>>>,
    plan_fetches: Arc<AtomicUsize>,
}

fn client_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "notes": null,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
    })
}

fn tag_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
    })
}

fn wallet_json(id: i64, balance: &str) -> Value {
    json!({
        "id": id,
        "client_id": 3,
        "name": "Retainer",
        "description": null,
        "hourly_rate_reference": "120.00",
        "balance": balance,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
    })
}

fn entry_json(id: i64, hours: &str) -> Value {
    json!({
        "id": id,
        "wallet_id": 4,
        "hours": hours,
        "title": "Sprint work",
        "description": null,
        "reference_date": "2024-03-05",
        "created_at": "2024-03-05T10:00:00Z",
        "updated_at": "2024-03-05T10:00:00Z",
    })
}

fn plan_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "wallet_id": 4,
        "status": status,
        "filename": "entries.csv",
        "rows": [],
        "created_at": "2024-04-01T00:00:00Z",
        "updated_at": "2024-04-01T00:00:00Z",
    })
}

fn paginated(data: Vec<Value>, current_page: u32, last_page: u32, total: u64) -> Value {
    json!({
        "data": data,
        "current_page": current_page,
        "last_page": last_page,
        "per_page": 15,
        "total": total,
    })
}

async fn list_clients(
    State(state): State<BackendState>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    if state.fail_clients.load(Ordering::SeqCst) {
        return (
            StatusCode::FORBIDDEN,
            axum::Json(json!({ "message": "No access to clients" })),
        )
            .into_response();
    }

    let query = query.unwrap_or_default();
    let data = if query.contains("search=acme") {
        vec![client_json(1, "Acme")]
    } else {
        vec![client_json(1, "Acme"), client_json(2, "Globex")]
    };
    let total = data.len() as u64;

    axum::Json(paginated(data, 2, 5, total)).into_response()
}

async fn create_client(axum::Json(body): axum::Json<Value>) -> impl IntoResponse {
    let name = body.get("name").and_then(Value::as_str).unwrap_or_default();
    axum::Json(client_json(10, name))
}

async fn update_client(
    Path(id): Path<i64>,
    axum::Json(body): axum::Json<Value>,
) -> impl IntoResponse {
    let name = body.get("name").and_then(Value::as_str).unwrap_or("Acme");
    axum::Json(client_json(id, name))
}

async fn delete_client() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

async fn list_tags() -> impl IntoResponse {
    axum::Json(json!([tag_json(1, "billing"), tag_json(2, "support")]))
}

async fn create_tag(axum::Json(body): axum::Json<Value>) -> impl IntoResponse {
    let name = body.get("name").and_then(Value::as_str).unwrap_or_default();
    axum::Json(tag_json(9, name))
}

async fn delete_tag() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

async fn list_wallets(RawQuery(query): RawQuery) -> impl IntoResponse {
    let query = query.unwrap_or_default();
    let data = if query.contains("client_id=3") {
        vec![wallet_json(4, "10.00")]
    } else {
        vec![wallet_json(4, "10.00"), wallet_json(8, "-2.00")]
    };
    let total = data.len() as u64;

    axum::Json(paginated(data, 1, 1, total))
}

async fn wallet_entries() -> impl IntoResponse {
    axum::Json(paginated(
        vec![entry_json(1, "2.50"), entry_json(2, "-1.00")],
        1,
        3,
        2,
    ))
}

async fn create_ledger_entry(axum::Json(body): axum::Json<Value>) -> impl IntoResponse {
    if body.get("wallet_id").is_none() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            axum::Json(json!({ "message": "Wallet is required" })),
        )
            .into_response();
    }

    if body.get("hours").and_then(Value::as_str) == Some("0") {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            axum::Json(json!({ "message": "Hours must be non-zero" })),
        )
            .into_response();
    }

    axum::Json(json!({
        "entry": entry_json(77, "2.50"),
        "new_balance": "12.50",
    }))
    .into_response()
}

async fn report(
    State(state): State<BackendState>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    *state.report_query.lock().unwrap() = query;

    axum::Json(json!({
        "summary": {
            "total_credits": "10.00",
            "total_debits": "4.00",
            "net_balance": "6.00",
            "entry_count": 3,
        },
        "entries": paginated(vec![entry_json(1, "2.50")], 1, 1, 1),
        "grouped": [{
            "wallet_id": 4,
            "wallet_name": "Retainer",
            "total_credits": "10.00",
            "total_debits": "4.00",
            "net_balance": "6.00",
            "entry_count": 3,
        }],
    }))
}

async fn upload_plan(State(state): State<BackendState>, headers: HeaderMap) -> impl IntoResponse {
    *state.upload_content_type.lock().unwrap() = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    axum::Json(plan_json(5, "pending"))
}

async fn list_plans(RawQuery(query): RawQuery) -> impl IntoResponse {
    let query = query.unwrap_or_default();
    let data = if query.contains("status=pending") {
        vec![plan_json(5, "pending")]
    } else {
        vec![plan_json(5, "pending"), plan_json(6, "confirmed")]
    };
    let total = data.len() as u64;

    axum::Json(paginated(data, 1, 1, total))
}

async fn show_plan(State(state): State<BackendState>, Path(id): Path<i64>) -> impl IntoResponse {
    state.plan_fetches.fetch_add(1, Ordering::SeqCst);
    axum::Json(plan_json(id, "pending"))
}

fn row_json(id: i64, hours: &str) -> Value {
    json!({
        "id": id,
        "import_plan_id": 5,
        "type": "credit",
        "hours": hours,
        "title": "Imported work",
        "description": null,
        "reference_date": "2024-04-01",
    })
}

async fn create_row(Path(_plan_id): Path<i64>) -> impl IntoResponse {
    axum::Json(row_json(42, "1.00"))
}

async fn update_row(
    Path(id): Path<i64>,
    axum::Json(body): axum::Json<Value>,
) -> impl IntoResponse {
    let hours = body.get("hours").and_then(Value::as_str).unwrap_or("1.00");
    axum::Json(row_json(id, hours))
}

async fn delete_row() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

async fn confirm_plan(Path(id): Path<i64>) -> impl IntoResponse {
    axum::Json(plan_json(id, "confirmed"))
}

async fn template_download() -> impl IntoResponse {
    (
        [(header::CONTENT_DISPOSITION, "attachment; filename=\"import_template.csv\"")],
        "type,hours,title\n",
    )
}

async fn spawn_backend() -> anyhow::Result<(String, BackendState)> {
    let state = BackendState {
        fail_clients: Arc::new(AtomicBool::new(false)),
        report_query: Arc::new(Mutex::new(None)),
        upload_content_type: Arc::new(Mutex::new(None)),
        plan_fetches: Arc::new(AtomicUsize::new(0)),
    };

    let router = Router::new()
        .route("/api/clients", get(list_clients).post(create_client))
        .route("/api/clients/:id", put(update_client).delete(delete_client))
        .route("/api/tags", get(list_tags).post(create_tag))
        .route("/api/tags/:id", delete(delete_tag))
        .route("/api/wallets", get(list_wallets))
        .route("/api/wallets/:id/entries", get(wallet_entries))
        .route("/api/ledger-entries", post(create_ledger_entry))
        .route("/api/reports", get(report))
        .route("/api/import-plans", get(list_plans).post(upload_plan))
        .route("/api/import-plans/:id", get(show_plan))
        .route("/api/import-plans/:id/confirm", post(confirm_plan))
        .route("/api/import-plans/:id/rows", post(create_row))
        .route("/api/import-plans/rows/:id", put(update_row).delete(delete_row))
        .route("/api/import-plans/template/download", get(template_download))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server failed");
    });

    Ok((format!("http://{addr}/api"), state))
}

fn api_for(base_url: &str) -> anyhow::Result<ApiClient> {
    Ok(ApiClient::new(
        &ApiConfig::with_base_url(base_url),
        Arc::new(MemoryStorage::new()) as Arc<dyn Storage>,
    )?)
}

#[tokio::test]
async fn client_list_tracks_pagination_and_search() -> anyhow::Result<()> {
    let (base_url, _) = spawn_backend().await?;
    let mut store = ClientStore::new(api_for(&base_url)?);

    store.fetch_all(2, "").await;
    assert_eq!(store.clients.len(), 2);
    assert_eq!(store.pagination.current_page, 2);
    assert_eq!(store.pagination.last_page, 5);
    assert!(!store.loading);
    assert!(store.last_error.is_none());

    store.fetch_all(1, "acme").await;
    assert_eq!(store.clients.len(), 1);
    assert_eq!(store.clients[0].name, "Acme");

    Ok(())
}

#[tokio::test]
async fn client_list_failure_is_recorded_not_raised() -> anyhow::Result<()> {
    let (base_url, backend) = spawn_backend().await?;
    let mut store = ClientStore::new(api_for(&base_url)?);
    backend.fail_clients.store(true, Ordering::SeqCst);

    store.fetch_all(1, "").await;

    assert_eq!(store.last_error.as_deref(), Some("No access to clients"));
    assert!(store.clients.is_empty());
    assert!(!store.loading);

    Ok(())
}

#[tokio::test]
async fn client_mutations_keep_the_collection_in_sync() -> anyhow::Result<()> {
    let (base_url, _) = spawn_backend().await?;
    let mut store = ClientStore::new(api_for(&base_url)?);

    store.fetch_all(1, "").await;

    let created = store
        .create(&NewClient {
            name: "Initech".to_string(),
            notes: None,
        })
        .await?;
    assert_eq!(created.name, "Initech");
    assert_eq!(store.clients.len(), 3);

    let form = UpdateClient {
        name: Some("Acme Corp".to_string()),
        ..Default::default()
    };
    store.update(1, &form).await?;
    assert_eq!(store.clients[0].name, "Acme Corp");

    store.remove(1).await?;
    assert!(store.clients.iter().all(|c| c.id != 1));

    Ok(())
}

#[tokio::test]
async fn tag_create_and_remove_mutate_the_collection() -> anyhow::Result<()> {
    let (base_url, _) = spawn_backend().await?;
    let mut store = TagStore::new(api_for(&base_url)?);

    store.fetch_all("").await;
    assert_eq!(store.tags.len(), 2);

    let tag = store.create("urgent").await?;
    assert_eq!(tag.name, "urgent");
    assert_eq!(store.tags.len(), 3);

    store.remove(1).await?;
    assert!(store.tags.iter().all(|t| t.id != 1));

    Ok(())
}

#[tokio::test]
async fn wallet_list_filters_by_client() -> anyhow::Result<()> {
    let (base_url, _) = spawn_backend().await?;
    let mut store = WalletStore::new(api_for(&base_url)?);

    store.fetch_all(None, 1).await;
    assert_eq!(store.wallets.len(), 2);
    assert_eq!(store.wallets[0].balance, "10.00");

    store.fetch_all(Some(3), 1).await;
    assert_eq!(store.wallets.len(), 1);
    assert_eq!(store.wallets[0].wallet.id, 4);

    Ok(())
}

#[tokio::test]
async fn wallet_entries_populate_with_pagination() -> anyhow::Result<()> {
    let (base_url, _) = spawn_backend().await?;
    let mut store = WalletStore::new(api_for(&base_url)?);

    store.fetch_entries(4, 1).await;

    assert_eq!(store.entries.len(), 2);
    assert_eq!(store.entries[0].hours, "2.50");
    assert_eq!(store.pagination.last_page, 3);
    assert!(store.last_error.is_none());

    Ok(())
}

#[tokio::test]
async fn ledger_entry_creation_returns_the_new_balance() -> anyhow::Result<()> {
    let (base_url, _) = spawn_backend().await?;
    let mut store = LedgerStore::new(api_for(&base_url)?);

    let created = store
        .create_entry(&NewLedgerEntry {
            wallet_id: 4,
            kind: EntryKind::Credit,
            hours: "2.50".to_string(),
            title: Some("Sprint work".to_string()),
            description: None,
            reference_date: None,
            tags: Some(vec![1]),
        })
        .await?;

    assert_eq!(created.entry.id, 77);
    assert_eq!(created.new_balance, "12.50");

    Ok(())
}

#[tokio::test]
async fn ledger_entry_validation_failure_propagates_the_server_message() -> anyhow::Result<()> {
    let (base_url, _) = spawn_backend().await?;
    let mut store = LedgerStore::new(api_for(&base_url)?);

    let err = store
        .create_entry(&NewLedgerEntry {
            wallet_id: 4,
            kind: EntryKind::Debit,
            hours: "0".to_string(),
            title: None,
            description: None,
            reference_date: None,
            tags: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Hours must be non-zero");
    assert_eq!(store.last_error.as_deref(), Some("Hours must be non-zero"));

    Ok(())
}

#[tokio::test]
async fn report_filters_reach_the_wire_with_repeated_tag_keys() -> anyhow::Result<()> {
    let (base_url, backend) = spawn_backend().await?;
    let mut store = ReportStore::new(api_for(&base_url)?);

    let filters = ReportFilters {
        client_id: Some(3),
        tags: vec![5, 9],
        kind: Some(EntryKind::Credit),
        group_by: Some(GroupBy::Wallet),
        ..Default::default()
    };
    store.fetch_report(&filters).await;

    let query = backend.report_query.lock().unwrap().clone().unwrap_or_default();
    assert!(query.contains("client_id=3"), "query was {query}");
    assert!(query.contains("tags%5B%5D=5"), "query was {query}");
    assert!(query.contains("tags%5B%5D=9"), "query was {query}");
    assert!(query.contains("type=credit"), "query was {query}");
    assert!(query.contains("group_by=wallet"), "query was {query}");

    assert_eq!(
        store.summary.as_ref().map(|s| s.net_balance.as_str()),
        Some("6.00")
    );
    assert_eq!(store.entries.len(), 1);
    assert_eq!(store.grouped.len(), 1);
    assert!(store.last_error.is_none());

    Ok(())
}

#[tokio::test]
async fn import_upload_is_multipart_and_selects_the_plan() -> anyhow::Result<()> {
    let (base_url, backend) = spawn_backend().await?;
    let mut store = ImportStore::new(api_for(&base_url)?);

    let dir = std::env::temp_dir().join(format!("hourbank-upload-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await?;
    let file = dir.join("entries.csv");
    tokio::fs::write(&file, b"type,hours\ncredit,2.5\n").await?;

    let plan = store.upload(4, &file).await?;

    assert_eq!(plan.id, 5);
    assert_eq!(store.current.as_ref().map(|p| p.id), Some(5));

    let content_type = backend
        .upload_content_type
        .lock()
        .unwrap()
        .clone()
        .unwrap_or_default();
    assert!(
        content_type.starts_with("multipart/form-data; boundary="),
        "content type was {content_type}"
    );

    tokio::fs::remove_dir_all(&dir).await?;
    Ok(())
}

#[tokio::test]
async fn import_confirm_updates_the_current_plan() -> anyhow::Result<()> {
    let (base_url, _) = spawn_backend().await?;
    let mut store = ImportStore::new(api_for(&base_url)?);

    store
        .fetch_all(1, &ImportFilters::default())
        .await?;
    assert_eq!(store.plans.len(), 2);

    store.fetch(5).await?;
    let plan = store.confirm(5).await?;

    assert_eq!(plan.status.as_str(), "confirmed");
    assert_eq!(
        store.current.as_ref().map(|p| p.status.as_str()),
        Some("confirmed")
    );
    assert_eq!(store.plans[0].status.as_str(), "confirmed");

    Ok(())
}

#[tokio::test]
async fn import_row_mutations_address_rows_globally() -> anyhow::Result<()> {
    let (base_url, backend) = spawn_backend().await?;
    let mut store = ImportStore::new(api_for(&base_url)?);

    store.fetch(5).await?;
    let fetched_before = backend.plan_fetches.load(Ordering::SeqCst);

    let row = store
        .add_row(
            5,
            &ImportRowForm {
                kind: Some(EntryKind::Credit),
                hours: Some("1.00".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(row.id, 42);

    // Update and delete address the row without a plan segment; the backend
    // only routes them at /import-plans/rows/:id.
    let updated = store
        .update_row(
            5,
            42,
            &ImportRowForm {
                hours: Some("3.25".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.hours, "3.25");

    store.delete_row(5, 42).await?;

    // Each row mutation re-fetches the selected plan.
    assert_eq!(
        backend.plan_fetches.load(Ordering::SeqCst),
        fetched_before + 3
    );

    Ok(())
}

#[tokio::test]
async fn template_download_negotiates_its_filename() -> anyhow::Result<()> {
    let (base_url, _) = spawn_backend().await?;
    let mut store = ImportStore::new(api_for(&base_url)?);

    let dir = std::env::temp_dir().join(format!("hourbank-template-{}", std::process::id()));
    let path = store.download_template(TemplateFormat::Csv, &dir).await?;

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("import_template.csv")
    );
    assert_eq!(tokio::fs::read_to_string(&path).await?, "type,hours,title\n");

    tokio::fs::remove_dir_all(&dir).await?;
    Ok(())
}
