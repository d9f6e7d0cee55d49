//! End-to-end tests for the plugin router.
//!
//! The router is served on an ephemeral port with a mock gateway and an
//! in-memory ledger, then driven over HTTP with reqwest.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use std::time::Duration;

use axum::routing::post;
use axum::{middleware, Router};
use ledger::{transaction, Database};
use lightning_btc::mock::{GatewayCall, MockGateway};
use lightning_btc::{
    attach_identity, router, CreateInvoiceRequest, Identity, IdentityDefaults, InvoiceWorkflow,
    PluginError, PluginState, Tenancy,
};
use lnbits_client::{GatewayError, LnbitsClient, LnbitsConfig};
use reqwest::StatusCode;
use serde_json::{json, Value};

const BOLT11: &str = "lnbc10u1pjqxyzqpp5qqqsyqcyq5rqwzqfqqqsyqcyq5rqwzqf";

struct TestPlugin {
    base: String,
    db: Database,
    gateway: MockGateway,
    http: reqwest::Client,
}

impl TestPlugin {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn row_count(&self) -> i64 {
        transaction::count_transactions(self.db.pool()).await.unwrap()
    }
}

async fn test_db() -> Database {
    let db = Database::connect_with_pool_size("sqlite::memory:", 1)
        .await
        .unwrap();
    db.migrate().await.unwrap();
    db
}

fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Start the plugin behind the header identity middleware.
async fn start(gateway: MockGateway, defaults: IdentityDefaults, tenancy: Tenancy) -> TestPlugin {
    let db = test_db().await;
    let state = PluginState::new(db.clone(), Arc::new(gateway.clone()))
        .with_tenancy(tenancy)
        .with_static_dir(static_dir());

    let app = Router::new()
        .nest("/lightning-btc", router(state))
        .layer(middleware::from_fn_with_state(defaults, attach_identity));
    let addr = serve(app).await;

    TestPlugin {
        base: format!("http://{}/lightning-btc", addr),
        db,
        gateway,
        http: reqwest::Client::new(),
    }
}

fn no_defaults() -> IdentityDefaults {
    IdentityDefaults {
        user_id: "default".to_string(),
        wallet_id: "default".to_string(),
        invoice_key: None,
    }
}

#[tokio::test]
async fn test_create_invoice_scenario() {
    let plugin = start(
        MockGateway::new().with_hashes(["abc123"]),
        no_defaults(),
        Tenancy::PerUser,
    )
    .await;

    let resp = plugin
        .http
        .post(plugin.url("/create-invoice"))
        .header("X-User-Id", "u1")
        .header("X-Wallet-Id", "w1")
        .header("X-Api-Key", "k1")
        .json(&json!({ "amount": 1000, "memo": "coffee" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "payment_request": "lnbc1000n1mockabc123", "payment_hash": "abc123" })
    );

    let row = transaction::get_transaction(plugin.db.pool(), "abc123")
        .await
        .unwrap();
    assert_eq!(row.user_id, "u1");
    assert_eq!(row.wallet_id, "w1");
    assert_eq!(row.amount, Some(1000));
    assert_eq!(row.description.as_deref(), Some("coffee"));
    assert_eq!(row.invoice_key_used, "k1");
}

#[tokio::test]
async fn test_pay_invoice() {
    let plugin = start(
        MockGateway::new().with_hashes(["paid"]),
        no_defaults(),
        Tenancy::PerUser,
    )
    .await;

    let resp = plugin
        .http
        .post(plugin.url("/pay-invoice"))
        .header("X-User-Id", "u1")
        .header("X-Api-Key", "k1")
        .json(&json!({ "bolt11": BOLT11 }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "payment_hash": "paid" }));

    let row = transaction::get_transaction(plugin.db.pool(), "paid")
        .await
        .unwrap();
    assert_eq!(row.amount, None);
    assert_eq!(row.description.as_deref(), Some("Payment made"));
    assert_eq!(row.wallet_id, "default");
}

#[tokio::test]
async fn test_missing_invoice_key_is_400() {
    let plugin = start(MockGateway::new(), no_defaults(), Tenancy::PerUser).await;

    let create = plugin
        .http
        .post(plugin.url("/create-invoice"))
        .json(&json!({ "amount": 1, "memo": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(create.status(), StatusCode::BAD_REQUEST);
    let body: Value = create.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Missing invoice key." }));

    let balance = plugin.http.get(plugin.url("/balance")).send().await.unwrap();
    assert_eq!(balance.status(), StatusCode::BAD_REQUEST);

    assert_eq!(plugin.gateway.call_count(), 0);
    assert_eq!(plugin.row_count().await, 0);
}

#[tokio::test]
async fn test_default_invoice_key_fallback() {
    let defaults = IdentityDefaults {
        invoice_key: Some("global-key".to_string()),
        ..no_defaults()
    };
    let plugin = start(MockGateway::new(), defaults, Tenancy::PerUser).await;

    let resp = plugin
        .http
        .post(plugin.url("/create-invoice"))
        .json(&json!({ "amount": 21, "memo": "tip" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(
        plugin.gateway.calls(),
        vec![GatewayCall::CreateInvoice {
            invoice_key: "global-key".to_string(),
            amount: 21,
            memo: "tip".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_gateway_failure_is_500_without_detail() {
    let plugin = start(
        MockGateway::new().failing(400, "Insufficient balance."),
        no_defaults(),
        Tenancy::PerUser,
    )
    .await;

    let resp = plugin
        .http
        .post(plugin.url("/pay-invoice"))
        .header("X-Api-Key", "k1")
        .json(&json!({ "bolt11": BOLT11 }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Error paying invoice." }));
    assert_eq!(plugin.row_count().await, 0);
}

#[tokio::test]
async fn test_duplicate_hash_is_500() {
    let plugin = start(
        MockGateway::new().with_hashes(["same", "same"]),
        no_defaults(),
        Tenancy::PerUser,
    )
    .await;

    for expected in [StatusCode::OK, StatusCode::INTERNAL_SERVER_ERROR] {
        let resp = plugin
            .http
            .post(plugin.url("/create-invoice"))
            .header("X-Api-Key", "k1")
            .json(&json!({ "amount": 5, "memo": "dup" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), expected);
    }

    assert_eq!(plugin.row_count().await, 1);
}

#[tokio::test]
async fn test_invalid_bolt11_is_400() {
    let plugin = start(MockGateway::new(), no_defaults(), Tenancy::PerUser).await;

    let resp = plugin
        .http
        .post(plugin.url("/pay-invoice"))
        .header("X-Api-Key", "k1")
        .json(&json!({ "bolt11": "hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid request." }));
    assert_eq!(plugin.gateway.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let plugin = start(MockGateway::new(), no_defaults(), Tenancy::PerUser).await;

    let wrong_type = plugin
        .http
        .post(plugin.url("/create-invoice"))
        .header("X-Api-Key", "k1")
        .json(&json!({ "amount": "lots" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_type.status(), StatusCode::BAD_REQUEST);
    let body: Value = wrong_type.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid request." }));

    let missing_field = plugin
        .http
        .post(plugin.url("/pay-invoice"))
        .header("X-Api-Key", "k1")
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_field.status(), StatusCode::BAD_REQUEST);
    let body: Value = missing_field.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid request." }));

    assert_eq!(plugin.gateway.call_count(), 0);
    assert_eq!(plugin.row_count().await, 0);
}

#[tokio::test]
async fn test_missing_key_wins_over_malformed_body() {
    let plugin = start(MockGateway::new(), no_defaults(), Tenancy::PerUser).await;

    let resp = plugin
        .http
        .post(plugin.url("/create-invoice"))
        .json(&json!({ "amount": "lots" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Missing invoice key." }));

    let resp = plugin
        .http
        .post(plugin.url("/pay-invoice"))
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Missing invoice key." }));
}

#[tokio::test]
async fn test_transactions_scoped_to_caller() {
    let plugin = start(MockGateway::new(), no_defaults(), Tenancy::PerUser).await;

    for user in ["alice", "bob", "alice"] {
        let resp = plugin
            .http
            .post(plugin.url("/create-invoice"))
            .header("X-User-Id", user)
            .header("X-Api-Key", format!("key-{}", user))
            .json(&json!({ "amount": 10, "memo": user }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = plugin
        .http
        .get(plugin.url("/transactions"))
        .header("X-User-Id", "alice")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let rows: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row["userId"], "alice");
        assert_eq!(row["invoiceKeyUsed"], "key-alice");
        assert_eq!(row["amount"], 10);
        assert!(row["createdAt"].is_string());
    }
}

#[tokio::test]
async fn test_transactions_shared() {
    let plugin = start(MockGateway::new(), no_defaults(), Tenancy::Shared).await;

    for user in ["alice", "bob"] {
        plugin
            .http
            .post(plugin.url("/create-invoice"))
            .header("X-User-Id", user)
            .header("X-Api-Key", "k")
            .json(&json!({ "amount": 1 }))
            .send()
            .await
            .unwrap();
    }

    let rows: Vec<Value> = plugin
        .http
        .get(plugin.url("/transactions"))
        .header("X-User-Id", "carol")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_balance() {
    let plugin = start(
        MockGateway::new().with_balance(5_000),
        no_defaults(),
        Tenancy::PerUser,
    )
    .await;

    let resp = plugin
        .http
        .get(plugin.url("/balance"))
        .header("X-Api-Key", "k1")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "balance": 5000 }));
}

#[tokio::test]
async fn test_index_page_and_health() {
    let plugin = start(MockGateway::new(), no_defaults(), Tenancy::PerUser).await;

    let page = plugin.http.get(plugin.url("")).send().await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.text().await.unwrap().contains("Lightning BTC"));

    let health: Value = plugin
        .http
        .get(plugin.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["gateway"], "MockGateway");
    assert_eq!(health["transactions"], 0);
}

#[tokio::test]
async fn test_missing_identity_is_401() {
    // No identity middleware: the host forgot to authenticate.
    let db = test_db().await;
    let gateway = MockGateway::new();
    let state = PluginState::new(db, Arc::new(gateway.clone())).with_static_dir(static_dir());
    let addr = serve(Router::new().nest("/lightning-btc", router(state))).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/lightning-btc/create-invoice", addr))
        .json(&json!({ "amount": 1, "memo": "x" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_gateway_timeout_records_nothing() {
    let slow_lnbits = Router::new().route(
        "/api/v1/payments",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            axum::Json(json!({ "payment_request": "lnbc1late", "payment_hash": "late" }))
        }),
    );
    let addr = serve(slow_lnbits).await;

    let client = LnbitsClient::new(
        LnbitsConfig::new(format!("http://{}", addr)).with_timeout(Duration::from_millis(200)),
    )
    .unwrap();
    let db = test_db().await;
    let workflow = InvoiceWorkflow::new(db.clone(), Arc::new(client), Tenancy::PerUser);

    let err = workflow
        .create_invoice(
            &Identity::new("u1", "w1", "k1"),
            CreateInvoiceRequest {
                amount: 10,
                memo: "slow".to_string(),
            },
        )
        .await
        .unwrap_err();

    match err {
        PluginError::Gateway {
            source: GatewayError::Http(e),
            ..
        } => assert!(e.is_timeout()),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(transaction::count_transactions(db.pool()).await.unwrap(), 0);
}
