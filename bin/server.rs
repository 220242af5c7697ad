// Money Manager - Web Server
// REST API over the same ledger store the terminal app uses

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use money_manager::{open_store, init_logging, AppConfig, Change, LedgerStore, Person, SqliteStore, Transaction};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<Mutex<LedgerStore<SqliteStore>>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Response {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                data: Some(data),
                error: None,
            }),
        )
            .into_response()
    }

    fn fail(status: StatusCode, message: String) -> Response {
        (
            status,
            Json(Self {
                success: false,
                data: None,
                error: Some(message),
            }),
        )
            .into_response()
    }
}

#[derive(Deserialize)]
struct AddPersonRequest {
    name: String,
}

/// Amount is taken as text, exactly like the input field of the app
#[derive(Deserialize)]
struct AmountRequest {
    amount: serde_json::Value,
}

impl AmountRequest {
    fn raw(&self) -> String {
        match &self.amount {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Serialize)]
struct TotalResponse {
    total_balance: i128,
    persons: usize,
}

#[derive(Serialize)]
struct HistoryResponse {
    person: Person,
    transactions: Vec<Transaction>,
}

/// Map a store result onto the response; ignored changes are 422
fn respond(result: anyhow::Result<Change>, persons: Vec<Person>) -> Response {
    match result {
        Ok(Change::Applied) => ApiResponse::ok(persons),
        Ok(Change::Ignored(reason)) => {
            ApiResponse::<Vec<Person>>::fail(StatusCode::UNPROCESSABLE_ENTITY, reason.to_string())
        }
        Err(e) => {
            error!("Error persisting ledger: {:#}", e);
            ApiResponse::<Vec<Person>>::fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> Response {
    ApiResponse::ok("OK")
}

/// GET /api/persons
async fn list_persons(State(state): State<AppState>) -> Response {
    let store = state.store.lock().unwrap();
    ApiResponse::ok(store.persons().to_vec())
}

/// POST /api/persons - {"name": "Alice"}
async fn add_person(
    State(state): State<AppState>,
    Json(req): Json<AddPersonRequest>,
) -> Response {
    let mut store = state.store.lock().unwrap();
    let result = store.add_person(&req.name);
    respond(result, store.persons().to_vec())
}

/// DELETE /api/persons/:name
async fn delete_person(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let mut store = state.store.lock().unwrap();

    if store.ledger().person(&name).is_none() {
        return ApiResponse::<()>::fail(StatusCode::NOT_FOUND, format!("no person named '{}'", name));
    }
    let result = store.delete_person(&name);
    respond(result, store.persons().to_vec())
}

/// POST /api/persons/:name/money-in - {"amount": 500}
async fn money_in(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<AmountRequest>,
) -> Response {
    let mut store = state.store.lock().unwrap();
    let result = store.money_in(&name, &req.raw());
    respond(result, store.persons().to_vec())
}

/// POST /api/persons/:name/money-out - {"amount": 200}
async fn money_out(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<AmountRequest>,
) -> Response {
    let mut store = state.store.lock().unwrap();
    let result = store.money_out(&name, &req.raw());
    respond(result, store.persons().to_vec())
}

/// GET /api/persons/:name/transactions
async fn person_transactions(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let store = state.store.lock().unwrap();

    match store.ledger().person(&name) {
        Some(person) => ApiResponse::ok(HistoryResponse {
            person: person.clone(),
            transactions: store.transactions_for(&name).into_iter().cloned().collect(),
        }),
        None => ApiResponse::<()>::fail(StatusCode::NOT_FOUND, format!("no person named '{}'", name)),
    }
}

/// GET /api/total
async fn total(State(state): State<AppState>) -> Response {
    let store = state.store.lock().unwrap();
    ApiResponse::ok(TotalResponse {
        total_balance: store.total_balance(),
        persons: store.persons().len(),
    })
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/persons", get(list_persons).post(add_person))
        .route("/persons/:name", axum::routing::delete(delete_person))
        .route("/persons/:name/money-in", post(money_in))
        .route("/persons/:name/money-out", post(money_out))
        .route("/persons/:name/transactions", get(person_transactions))
        .route("/total", get(total))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(None)?;
    let config = AppConfig::load()?;

    let store = open_store(&config)?;
    info!(db = ?config.db_path, namespace = %config.namespace, "ledger opened");

    let state = AppState {
        store: Arc::new(Mutex::new(store)),
    };

    let listener = tokio::net::TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server_addr))?;
    info!(addr = %config.server_addr, "server running");

    axum::serve(listener, router(state))
        .await
        .context("Server stopped with an error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use money_manager::{FixedClock, StorageKeys};

    fn state() -> AppState {
        let storage = SqliteStore::open_in_memory("test").unwrap();
        let clock = FixedClock(chrono::NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        let store = LedgerStore::open(storage, Box::new(clock), StorageKeys::default()).unwrap();
        AppState {
            store: Arc::new(Mutex::new(store)),
        }
    }

    fn amount(value: serde_json::Value) -> Json<AmountRequest> {
        Json(AmountRequest { amount: value })
    }

    #[tokio::test]
    async fn test_add_and_adjust() {
        let state = state();

        let resp = add_person(
            State(state.clone()),
            Json(AddPersonRequest { name: "Alice".to_string() }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = money_in(State(state.clone()), Path("Alice".to_string()), amount(500.into())).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = money_out(State(state.clone()), Path("Alice".to_string()), amount("200".into())).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let store = state.store.lock().unwrap();
        assert_eq!(store.total_balance(), 300);
        assert_eq!(store.transactions_for("Alice").len(), 2);
    }

    #[tokio::test]
    async fn test_ignored_change_is_unprocessable() {
        let state = state();
        add_person(State(state.clone()), Json(AddPersonRequest { name: "Bob".to_string() })).await;

        let dup = add_person(State(state.clone()), Json(AddPersonRequest { name: "Bob".to_string() })).await;
        let bad = money_in(State(state.clone()), Path("Bob".to_string()), amount((-5).into())).await;
        let float = money_in(State(state.clone()), Path("Bob".to_string()), amount(1.5.into())).await;

        assert_eq!(dup.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(bad.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(float.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(state.store.lock().unwrap().persons().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_person_is_not_found() {
        let state = state();

        let delete = delete_person(State(state.clone()), Path("Nobody".to_string())).await;
        let history = person_transactions(State(state.clone()), Path("Nobody".to_string())).await;

        assert_eq!(delete.status(), StatusCode::NOT_FOUND);
        assert_eq!(history.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_percent_in_name_is_kept() {
        let state = state();
        add_person(State(state.clone()), Json(AddPersonRequest { name: "A%20B".to_string() })).await;

        // Path already holds the decoded segment; the literal name must match as-is
        let resp = money_in(State(state.clone()), Path("A%20B".to_string()), amount(7.into())).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let history = person_transactions(State(state.clone()), Path("A%20B".to_string())).await;
        assert_eq!(history.status(), StatusCode::OK);

        let store = state.store.lock().unwrap();
        assert_eq!(store.transactions_for("A%20B").len(), 1);
        assert!(store.ledger().person("A B").is_none());
    }

    #[tokio::test]
    async fn test_router_decodes_path_once() {
        use axum::body::Body;
        use axum::http::{Method, Request};
        use tower::ServiceExt;

        let state = state();
        add_person(State(state.clone()), Json(AddPersonRequest { name: "A%20B".to_string() })).await;
        add_person(State(state.clone()), Json(AddPersonRequest { name: "A B".to_string() })).await;

        // %25 is '%', so the wire form of "A%20B" is "A%2520B"
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/persons/A%2520B/money-in")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"amount": 9}"#))
            .unwrap();
        let resp = router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/api/persons/A%20B")
            .body(Body::empty())
            .unwrap();
        let resp = router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let store = state.store.lock().unwrap();
        assert_eq!(store.persons(), &[Person::new("A%20B", 9)]);
    }
}
