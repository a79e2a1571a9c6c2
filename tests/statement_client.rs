//! StatementClient against an in-process account/statement service

use axum::extract::Path;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use bytebank_dashboard::*;
use serde_json::json;
use std::sync::Arc;

const GOOD_TOKEN: &str = "good-token";
const NO_ACCOUNT_TOKEN: &str = "no-account";

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn accounts(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(GOOD_TOKEN) => Json(json!({
            "message": "Conta encontrada",
            "result": {
                "account": [
                    { "id": "acc-1", "type": "Debit", "userId": "u1" },
                    { "id": "acc-2", "type": "Credit", "userId": "u1" }
                ]
            }
        }))
        .into_response(),
        Some(NO_ACCOUNT_TOKEN) => Json(json!({
            "message": "Nenhuma conta",
            "result": { "account": [] }
        }))
        .into_response(),
        _ => (StatusCode::UNAUTHORIZED, "invalid token").into_response(),
    }
}

async fn statement(Path(account_id): Path<String>, headers: HeaderMap) -> Response {
    if bearer(&headers) != Some(GOOD_TOKEN) {
        return (StatusCode::UNAUTHORIZED, "invalid token").into_response();
    }

    match account_id.as_str() {
        "acc-1" => Json(json!({
            "message": "Extrato",
            "result": {
                "transactions": [
                    { "id": "t1", "accountId": "acc-1", "type": "Credit", "value": 2500.0,
                      "date": "2024-05-05T12:00:00.000Z", "category": "salario" },
                    { "id": "t2", "accountId": "acc-1", "type": "Debit", "value": -120.5,
                      "date": "2024-05-06T09:30:00.000Z", "category": "alimentacao" },
                    { "id": "t3", "accountId": "acc-1", "type": "Debit", "value": "not-a-number",
                      "date": "2024-05-07" },
                    { "id": "t4", "accountId": "acc-1", "type": "Debit", "value": -30.0 },
                    "corrupted entry"
                ]
            }
        }))
        .into_response(),
        "acc-2" => Json(json!({ "message": "Extrato", "result": {} })).into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "database down").into_response(),
        _ => (StatusCode::NOT_FOUND, "account not found").into_response(),
    }
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/account", get(accounts))
        .route("/account/:id/statement", get(statement));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client(base_url: String) -> StatementClient {
    StatementClient::new(StatementClientConfig {
        base_url,
        request_timeout_ms: 2000,
    })
    .unwrap()
}

#[tokio::test]
async fn test_discovers_first_account() {
    let client = client(spawn_server().await);

    let transactions = client
        .fetch_transactions(&Session::with_token(GOOD_TOKEN))
        .await
        .unwrap();

    // t3 keeps its place with no value; the non-object entry is dropped
    let ids: Vec<_> = transactions.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2", "t3", "t4"]);
    assert_eq!(transactions[1].direction, Some(Direction::Debit));
    assert_eq!(transactions[2].value, None);
    assert_eq!(transactions[2].date, "2024-05-07");
    assert_eq!(transactions[3].date, "");
}

#[tokio::test]
async fn test_uses_selected_account() {
    let client = client(spawn_server().await);

    let transactions = client
        .fetch_transactions(&Session::with_token(GOOD_TOKEN).account("acc-2"))
        .await
        .unwrap();
    assert!(transactions.is_empty());
}

#[tokio::test]
async fn test_lists_accounts() {
    let client = client(spawn_server().await);

    let accounts = client.accounts(GOOD_TOKEN).await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].id, "acc-1");
    assert_eq!(accounts[1].kind, Some(Direction::Credit));
}

#[tokio::test]
async fn test_rejected_token() {
    let client = client(spawn_server().await);

    let result = client.fetch_transactions(&Session::with_token("stolen")).await;
    assert!(matches!(result, Err(ClientError::Unauthorized(401))));
}

#[tokio::test]
async fn test_user_without_account() {
    let client = client(spawn_server().await);

    let result = client
        .fetch_transactions(&Session::with_token(NO_ACCOUNT_TOKEN))
        .await;
    assert!(matches!(result, Err(ClientError::NoAccount)));
}

#[tokio::test]
async fn test_server_error() {
    let client = client(spawn_server().await);

    let result = client.statement(GOOD_TOKEN, "broken").await;
    match result {
        Err(ClientError::ApiError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database down");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_service_down() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(format!("http://{}", addr));
    let result = client
        .fetch_transactions(&Session::with_token(GOOD_TOKEN).account("acc-1"))
        .await;
    assert!(matches!(result, Err(ClientError::Unavailable)));
}

#[tokio::test]
async fn test_dashboard_end_to_end() {
    let client = client(spawn_server().await);
    let session = Arc::new(SessionContext::new(Session::with_token(GOOD_TOKEN)));
    let dashboard = Dashboard::new(Arc::new(client), Arc::clone(&session), ViewModelBuilder::default());

    let outcome = dashboard.refresh().await;
    assert_eq!(outcome, RefreshOutcome::Applied { request_id: 1 });

    let state = dashboard.snapshot();
    let summary = state.view_model.summary;
    assert_eq!(summary.count, 4);
    assert_eq!(summary.income, 2500.0);
    assert_eq!(summary.expenses, 150.5);
    assert_eq!(summary.balance, 2349.5);

    let categories: Vec<_> = state
        .view_model
        .categories
        .iter()
        .map(|c| (c.category.as_str(), c.total))
        .collect();
    assert_eq!(categories, vec![("alimentacao", 120.5), ("outros", 30.0)]);

    // Session dropped: no data available, zero view-model
    session.sign_out();
    dashboard.refresh().await;
    let state = dashboard.snapshot();
    assert_eq!(state.view_model.summary, Summary::default());
    assert_eq!(state.error.as_deref(), Some("Not authenticated"));
}
