use crate::application::{ConsistencyReport, Library, LibrarySummary};
use crate::domain::{
    LoanStatus,
    commands::{AddItem, RegisterMember, RequestLoan},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{
        ItemResponse, ListItemsQuery, ListLoansQuery, LoanResponse, MemberResponse,
        parse_status_filter,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub library: Library,
}

impl AppState {
    /// ステータス導出に使う現在時刻
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.library.dependencies().clock.now()
    }
}

// ============================================================================
// Members
// ============================================================================

/// POST /members - 会員を登録
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterMember>, JsonRejection>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let Json(req) = payload?;
    let member = state.library.register_member(&req.id, &req.name).await?;
    Ok((StatusCode::CREATED, Json(MemberResponse::from(member))))
}

/// GET /members - 会員一覧（登録順）
pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = state.library.all_members().await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// GET /members/:id - 会員詳細
///
/// 有効な貸出（未返却）を含めて返す。
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<String>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member = state
        .library
        .find_member(&member_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Member not found: {}", member_id)))?;

    let now = state.now();
    let active = state.library.active_loans_for_member(&member_id).await?;

    let mut response = MemberResponse::from(member);
    response.active_loans = Some(
        active
            .iter()
            .map(|loan| LoanResponse::from_loan(loan, now))
            .collect(),
    );

    Ok(Json(response))
}

// ============================================================================
// Items
// ============================================================================

/// POST /items - 書籍を目録に追加
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddItem>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let Json(req) = payload?;
    let item = state
        .library
        .add_item(&req.id, &req.title, &req.author, &req.catalog_code)
        .await?;
    Ok((StatusCode::CREATED, Json(ItemResponse::from(item))))
}

/// GET /items?available=true - 書籍一覧
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListItemsQuery>, QueryRejection>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let Query(query) = query?;
    let items = if query.available.unwrap_or(false) {
        state.library.available_items().await?
    } else {
        state.library.all_items().await?
    };
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// GET /items/:id - 書籍詳細
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = state
        .library
        .find_item(&item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Item not found: {}", item_id)))?;
    Ok(Json(ItemResponse::from(item)))
}

// ============================================================================
// Loans
// ============================================================================

/// POST /loans - 新しい貸出を作成
///
/// 強制されるビジネスルール:
/// - 会員と書籍が存在すること
/// - 書籍が貸出可能であること
/// - 貸出日数が1以上であること
pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RequestLoan>, JsonRejection>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    let Json(req) = payload?;
    let loan = state
        .library
        .request_loan(&req.member_id, &req.item_id, req.days)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(LoanResponse::from_loan(&loan, state.now())),
    ))
}

/// POST /loans/:id/return - 書籍を返却
///
/// 返却済みの貸出は422。延滞中の貸出も返却できる。
pub async fn return_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<String>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = state.library.register_return(&loan_id).await?;
    Ok(Json(LoanResponse::from_loan(&loan, state.now())))
}

/// GET /loans/:id - 貸出詳細
pub async fn get_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<String>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = state
        .library
        .find_loan(&loan_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Loan not found: {}", loan_id)))?;
    Ok(Json(LoanResponse::from_loan(&loan, state.now())))
}

/// GET /loans?status=&member_id= - 貸出一覧
///
/// フィルタなしの場合は全件（作成順）を返す。
/// `status` と `member_id` は組み合わせられる。
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListLoansQuery>, QueryRejection>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let Query(query) = query?;
    let status = query
        .status
        .as_deref()
        .map(parse_status_filter)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let loans = match (&query.member_id, status) {
        (Some(member_id), _) => state.library.loans_for_member(member_id).await?,
        (None, Some(LoanStatus::Active)) => state.library.active_loans().await?,
        (None, Some(LoanStatus::Overdue)) => state.library.overdue_loans().await?,
        (None, _) => state.library.all_loans().await?,
    };

    let now = state.now();
    let response = loans
        .iter()
        .map(|loan| LoanResponse::from_loan(loan, now))
        // 会員指定・返却済み指定の場合はここで絞り込む
        .filter(|loan| match status {
            // ACTIVEフィルタは延滞中も含む（未返却のすべて）
            Some(LoanStatus::Active) => loan.returned_at.is_none(),
            Some(other) => loan.status == other,
            None => true,
        })
        .collect();

    Ok(Json(response))
}

// ============================================================================
// Reports
// ============================================================================

/// GET /summary - 図書館全体の集計
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LibrarySummary>, ApiError> {
    Ok(Json(state.library.summary().await?))
}

/// GET /consistency - 貸出可否と有効な貸出の整合性チェック
pub async fn get_consistency(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConsistencyReport>, ApiError> {
    Ok(Json(state.library.check_consistency().await?))
}
