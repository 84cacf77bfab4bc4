use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use library_lending::adapters::FixedClock;
use library_lending::api::handlers::AppState;
use library_lending::api::router::create_router;
use library_lending::api::types::*;
use library_lending::domain::LoanStatus;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

mod common;

// ============================================================================
// E2Eテスト用のヘルパー関数
// ============================================================================

/// E2Eテスト用のアプリケーションセットアップ
///
/// 会員2名・書籍2冊を登録済みのインメモリ図書館と、実際のAPIルーターを使用します。
/// 時計はテスト側から進められるように一緒に返します。
async fn setup_e2e_app() -> (axum::Router, Arc<FixedClock>) {
    let (library, clock) = common::seeded_library().await;
    let app_state = Arc::new(AppState { library });
    (create_router(app_state), clock)
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn error_of(body: &[u8]) -> ErrorResponse {
    serde_json::from_slice(body).unwrap()
}

// ============================================================================
// E2Eテスト: 正常系フロー
// ============================================================================

#[tokio::test]
async fn test_e2e_full_loan_flow() {
    let (app, _clock) = setup_e2e_app().await;

    // Step 1: 貸出作成（POST /loans）
    let (status, body) = send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "member_id": "M1", "item_id": "B1", "days": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: LoanResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(created.member_id, "M1");
    assert_eq!(created.item_title, "Dune");
    assert_eq!(created.status, LoanStatus::Active);
    assert_eq!(created.due_at, created.created_at + Duration::days(7));

    // Step 2: 書籍が貸出中になっている（GET /items/:id）
    let (status, body) = send(&app, "GET", "/items/B1", None).await;
    assert_eq!(status, StatusCode::OK);
    let item: ItemResponse = serde_json::from_slice(&body).unwrap();
    assert!(!item.available);

    // Step 3: 会員詳細に有効な貸出が含まれる（GET /members/:id）
    let (status, body) = send(&app, "GET", "/members/M1", None).await;
    assert_eq!(status, StatusCode::OK);
    let member: MemberResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(member.total_loans, 1);
    assert_eq!(member.active_loans.unwrap().len(), 1);

    // Step 4: 返却（POST /loans/:id/return）
    let (status, body) = send(
        &app,
        "POST",
        &format!("/loans/{}/return", created.loan_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let returned: LoanResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(returned.status, LoanStatus::Returned);
    assert!(returned.returned_at.is_some());

    // Step 5: 返却後の状態確認（GET /loans/:id）
    let uri = format!("/loans/{}", created.loan_id);
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let loan: LoanResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(loan.status, LoanStatus::Returned);

    let (_, body) = send(&app, "GET", "/items?available=true", None).await;
    let items: Vec<ItemResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_e2e_register_member_and_item() {
    let (app, _clock) = setup_e2e_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/members",
        Some(json!({ "id": "M3", "name": "Marta" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let member: MemberResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(member.id, "M3");
    assert!(member.active_loans.is_none());

    let (status, body) = send(
        &app,
        "POST",
        "/items",
        Some(json!({
            "id": "B3",
            "title": "Ficciones",
            "author": "Jorge Luis Borges",
            "catalog_code": "ISBN-3",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let item: ItemResponse = serde_json::from_slice(&body).unwrap();
    assert!(item.available);

    let (_, body) = send(&app, "GET", "/members", None).await;
    let members: Vec<MemberResponse> = serde_json::from_slice(&body).unwrap();
    let ids: Vec<_> = members.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["M1", "M2", "M3"]);
}

#[tokio::test]
async fn test_e2e_overdue_filter_and_summary() {
    let (app, clock) = setup_e2e_app().await;

    send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "member_id": "M1", "item_id": "B1", "days": 3 })),
    )
    .await;
    send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "member_id": "M2", "item_id": "B2", "days": 30 })),
    )
    .await;

    clock.advance(Duration::days(5));

    let (status, body) = send(&app, "GET", "/loans?status=overdue", None).await;
    assert_eq!(status, StatusCode::OK);
    let overdue: Vec<LoanResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].member_id, "M1");
    assert_eq!(overdue[0].days_late, 2);

    // ACTIVEフィルタは延滞中も含む
    let (_, body) = send(&app, "GET", "/loans?status=active", None).await;
    let active: Vec<LoanResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(active.len(), 2);

    let (_, body) = send(&app, "GET", "/loans?member_id=M2", None).await;
    let for_member: Vec<LoanResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(for_member.len(), 1);
    assert_eq!(for_member[0].item_id, "B2");

    // 会員指定とステータス指定の組み合わせ
    let uri = "/loans?member_id=M2&status=overdue";
    let (_, body) = send(&app, "GET", uri, None).await;
    let none_overdue: Vec<LoanResponse> = serde_json::from_slice(&body).unwrap();
    assert!(none_overdue.is_empty());

    let uri = "/loans?member_id=m1&status=overdue";
    let (_, body) = send(&app, "GET", uri, None).await;
    let m1_overdue: Vec<LoanResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(m1_overdue.len(), 1);
    assert_eq!(m1_overdue[0].item_id, "B1");

    let (status, body) = send(&app, "GET", "/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    let summary: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(summary["total_members"], 2);
    assert_eq!(summary["available_items"], 0);
    assert_eq!(summary["active_loans"], 2);
    assert_eq!(summary["overdue_loans"], 1);

    let (status, body) = send(&app, "GET", "/consistency", None).await;
    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["violations"], json!([]));
}

// ============================================================================
// E2Eテスト: エラーケース
// ============================================================================

#[tokio::test]
async fn test_e2e_error_status_mapping() {
    let (app, _clock) = setup_e2e_app().await;

    // 404: 存在しない会員
    let (status, body) = send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "member_id": "NOBODY", "item_id": "B1", "days": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error = error_of(&body);
    assert_eq!(error.error, "NOT_FOUND");
    assert!(error.message.starts_with("Failed to request loan: "));

    // 400: 貸出日数が0
    let (status, body) = send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "member_id": "M1", "item_id": "B1", "days": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body).error, "INVALID_ARGUMENT");

    // 409: IDの重複
    let (status, body) = send(
        &app,
        "POST",
        "/items",
        Some(json!({
            "id": "B1",
            "title": "Dune",
            "author": "Frank Herbert",
            "catalog_code": "ISBN-1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_of(&body).error, "CONFLICT");

    // 422: 貸出中の書籍
    send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "member_id": "M1", "item_id": "B1", "days": 7 })),
    )
    .await;
    let (status, body) = send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "member_id": "M2", "item_id": "B1", "days": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_of(&body).error, "INVALID_STATE");

    // 404: 検索結果なし
    let (status, _) = send(&app, "GET", "/loans/P20240110090000-00000000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 400: 不正なステータスフィルタ
    let (status, body) = send(&app, "GET", "/loans?status=lost", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body).error, "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_e2e_double_return_is_unprocessable() {
    let (app, _clock) = setup_e2e_app().await;

    let (_, body) = send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "member_id": "M1", "item_id": "B2", "days": 7 })),
    )
    .await;
    let created: LoanResponse = serde_json::from_slice(&body).unwrap();
    let uri = format!("/loans/{}/return", created.loan_id);

    let (status, _) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(error_of(&body).message.contains("already been returned"));
}

#[tokio::test]
async fn test_e2e_health_check() {
    let (app, _clock) = setup_e2e_app().await;

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_e2e_returned_filter() {
    let (app, _clock) = setup_e2e_app().await;

    let (_, body) = send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "member_id": "M1", "item_id": "B1", "days": 7 })),
    )
    .await;
    let first: LoanResponse = serde_json::from_slice(&body).unwrap();
    send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "member_id": "M1", "item_id": "B2", "days": 7 })),
    )
    .await;
    let uri = format!("/loans/{}/return", first.loan_id);
    send(&app, "POST", &uri, None).await;

    let (status, body) = send(&app, "GET", "/loans?status=returned", None).await;
    assert_eq!(status, StatusCode::OK);
    let returned: Vec<LoanResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(returned.len(), 1);
    assert_eq!(returned[0].loan_id, first.loan_id);
    assert_eq!(returned[0].status, LoanStatus::Returned);

    let uri = "/loans?member_id=M1&status=active";
    let (_, body) = send(&app, "GET", uri, None).await;
    let active: Vec<LoanResponse> = serde_json::from_slice(&body).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].item_id, "B2");
}

#[tokio::test]
async fn test_e2e_malformed_requests_use_error_body() {
    let (app, _clock) = setup_e2e_app().await;

    // 型違いのフィールド
    let (status, body) = send(
        &app,
        "POST",
        "/loans",
        Some(json!({ "member_id": "M1", "item_id": "B1", "days": "abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body).error, "INVALID_ARGUMENT");

    // 必須フィールドの欠落
    let body = json!({ "id": "M9" });
    let (status, body) = send(&app, "POST", "/members", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body).error, "INVALID_ARGUMENT");

    // 不正なクエリパラメータ
    let (status, body) = send(&app, "GET", "/items?available=maybe", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body).error, "INVALID_ARGUMENT");

    // 貸出は作成されていない
    let (_, body) = send(&app, "GET", "/loans", None).await;
    let loans: Vec<LoanResponse> = serde_json::from_slice(&body).unwrap();
    assert!(loans.is_empty());
}
