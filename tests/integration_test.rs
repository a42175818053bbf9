// Integration tests for fleet-admin against an in-process API server

use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, put},
};
use fleet_admin::api::backend::{ApiCommand, ApiEvent, SaveKind, spawn_backend};
use fleet_admin::api::{ApiClient, ApiError};
use fleet_admin::model::VehiclePayload;
use reqwest::Url;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct ServerState {
    vehicles: Arc<Mutex<Vec<Value>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<Option<String>>>>,
    wrap_list: bool,
}

async fn record_auth(state: &ServerState, headers: &HeaderMap) {
    let value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.auth.lock().await.push(value);
}

async fn list_vehicles(State(state): State<ServerState>, headers: HeaderMap) -> Json<Value> {
    record_auth(&state, &headers).await;
    let vehicles = state.vehicles.lock().await.clone();
    if state.wrap_list {
        Json(json!({ "data": vehicles }))
    } else {
        Json(Value::Array(vehicles))
    }
}

async fn create_vehicle(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record_auth(&state, &headers).await;
    if body["regNumber"] == "DUP-1" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Registration number already exists" })),
        );
    }
    state.bodies.lock().await.push(body.clone());
    let mut vehicles = state.vehicles.lock().await;
    let mut stored = body;
    stored["_id"] = json!(format!("v{}", vehicles.len() + 1));
    stored["paymentStatus"] = json!(1);
    vehicles.push(stored.clone());
    (StatusCode::CREATED, Json(stored))
}

async fn update_vehicle(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.bodies.lock().await.push(body.clone());
    let mut vehicles = state.vehicles.lock().await;
    match vehicles.iter_mut().find(|v| v["_id"] == id.as_str()) {
        Some(v) => {
            v["ownerName"] = body["ownerName"].clone();
            (StatusCode::OK, Json(v.clone()))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "External vehicle not found" })),
        ),
    }
}

async fn delete_vehicle(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let mut vehicles = state.vehicles.lock().await;
    let before = vehicles.len();
    vehicles.retain(|v| v["_id"] != id.as_str());
    if vehicles.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({})));
    }
    (StatusCode::OK, Json(json!({ "message": "deleted" })))
}

async fn spawn_api_server(state: ServerState) -> Result<Url> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route(
            "/api/external-vehicles",
            get(list_vehicles).post(create_vehicle),
        )
        .route(
            "/api/external-vehicles/:id",
            put(update_vehicle).delete(delete_vehicle),
        )
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(Url::parse(&format!("http://{addr}/api"))?)
}

fn client(base: Url, token: Option<&str>) -> ApiClient {
    let http = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("http client");
    ApiClient::with_client(http, base, "external-vehicles", token.map(str::to_string))
}

fn seed() -> Vec<Value> {
    vec![
        json!({
            "_id": "v1",
            "regNumber": "CAB-1234",
            "ownerName": "Nimal Perera",
            "ownerContact": "0771234567",
            "hireRate": 5000,
            "vehicleUsage": 10,
            "advance": 10000,
            "balance": 40000,
            "totalCost": 50000,
            "paymentStatus": 2,
            "createdAt": "2024-03-01T08:30:00Z"
        }),
        json!({
            "_id": "v2",
            "regNumber": "WP-9988",
            "ownerName": "Sunil Silva",
            "ownerContact": "0719876543",
            "hireRate": 3500,
            "vehicleUsage": 2
        }),
    ]
}

fn payload(reg: &str) -> VehiclePayload {
    VehiclePayload {
        id: None,
        reg_number: reg.into(),
        owner_name: "Kamal".into(),
        owner_contact: "0701112223".into(),
        hire_rate: 4000.0,
        vehicle_usage: 5.0,
        advance: 0.0,
    }
}

// 1) Listing decodes full and partial records and sends the bearer token
#[tokio::test]
async fn list_decodes_records_with_defaults() {
    let state = ServerState {
        vehicles: Arc::new(Mutex::new(seed())),
        ..Default::default()
    };
    let base = spawn_api_server(state.clone()).await.expect("spawn server");

    let vehicles = client(base, Some("secret"))
        .list()
        .await
        .expect("list");
    assert_eq!(vehicles.len(), 2);
    assert_eq!(vehicles[0].id, "v1");
    assert_eq!(vehicles[0].total_cost, 50000.0);
    assert!(vehicles[0].created_at.is_some());
    assert_eq!(vehicles[1].advance, 0.0);
    assert_eq!(vehicles[1].payment_status, 0);
    assert_eq!(
        *state.auth.lock().await,
        vec![Some("Bearer secret".to_string())]
    );
}

// 2) A `{ "data": [...] }` wrapper is accepted as well as a bare array
#[tokio::test]
async fn list_accepts_wrapped_body() {
    let state = ServerState {
        vehicles: Arc::new(Mutex::new(seed())),
        wrap_list: true,
        ..Default::default()
    };
    let base = spawn_api_server(state.clone()).await.expect("spawn server");

    let vehicles = client(base, None).list().await.expect("list");
    assert_eq!(vehicles.len(), 2);
    assert_eq!(*state.auth.lock().await, vec![None::<String>]);
}

// 3) Create, update and delete hit the right routes with camelCase bodies
#[tokio::test]
async fn mutations_round_trip_through_server() {
    let state = ServerState {
        vehicles: Arc::new(Mutex::new(seed())),
        ..Default::default()
    };
    let base = spawn_api_server(state.clone()).await.expect("spawn server");
    let api = client(base, None);

    api.create(&payload("NEW-1")).await.expect("create");
    {
        let bodies = state.bodies.lock().await;
        assert_eq!(bodies[0]["regNumber"], "NEW-1");
        assert_eq!(bodies[0]["hireRate"], 4000.0);
        assert!(bodies[0].get("id").is_none());
    }

    let mut edit = payload("CAB-1234");
    edit.id = Some("v1".into());
    edit.owner_name = "Nimal P.".into();
    api.update("v1", &edit).await.expect("update");

    api.delete("v2").await.expect("delete");

    let after = api.list().await.expect("list");
    let regs: Vec<&str> = after.iter().map(|v| v.reg_number.as_str()).collect();
    assert_eq!(regs, vec!["CAB-1234", "NEW-1"]);
    assert_eq!(after[0].owner_name, "Nimal P.");
}

// 4) Server messages pass through; bodies without one fall back
#[tokio::test]
async fn error_messages_pass_through_or_fall_back() {
    let state = ServerState::default();
    let base = spawn_api_server(state).await.expect("spawn server");
    let api = client(base, None);

    let err = api.create(&payload("DUP-1")).await.expect_err("conflict");
    assert_eq!(
        err,
        ApiError::Status {
            status: 409,
            message: Some("Registration number already exists".into())
        }
    );
    assert_eq!(
        err.user_message("Failed to add external vehicle"),
        "Registration number already exists"
    );

    let err = api.delete("missing").await.expect_err("not found");
    assert_eq!(
        err,
        ApiError::Status {
            status: 404,
            message: None
        }
    );
    assert_eq!(
        err.user_message("Failed to delete external vehicle"),
        "Failed to delete external vehicle"
    );
}

// 5) Nothing listening: a transport error, not a panic
#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let base = Url::parse(&format!("http://{addr}/api")).expect("url");

    let err = client(base, None).list().await.expect_err("no server");
    assert!(matches!(err, ApiError::Transport(_)));
}

// 6) The background worker executes commands and reports events
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn backend_worker_reports_completions() {
    let state = ServerState {
        vehicles: Arc::new(Mutex::new(seed())),
        ..Default::default()
    };
    let base = spawn_api_server(state).await.expect("spawn server");
    let mut backend = spawn_backend(client(base, None)).expect("spawn backend");

    backend.commands.send(ApiCommand::FetchAll).expect("send");
    match backend.events.recv().await {
        Some(ApiEvent::Fetched(Ok(vehicles))) => assert_eq!(vehicles.len(), 2),
        other => panic!("unexpected event: {other:?}"),
    }

    backend
        .commands
        .send(ApiCommand::Create {
            payload: payload("NEW-2"),
        })
        .expect("send");
    assert_eq!(
        backend.events.recv().await,
        Some(ApiEvent::Saved {
            kind: SaveKind::Create,
            result: Ok(())
        })
    );

    backend
        .commands
        .send(ApiCommand::Delete { id: "nope".into() })
        .expect("send");
    match backend.events.recv().await {
        Some(ApiEvent::Deleted { id, result }) => {
            assert_eq!(id, "nope");
            assert!(matches!(result, Err(ApiError::Status { status: 404, .. })));
        }
        other => panic!("unexpected event: {other:?}"),
    }

    tokio::task::spawn_blocking(move || backend.shutdown())
        .await
        .expect("shutdown");
}
