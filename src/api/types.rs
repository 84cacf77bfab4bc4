use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Item, Lendable, Loan, LoanStatus, Member,
    loan::{days_late, is_overdue},
};

/// 貸出一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListLoansQuery {
    /// 会員IDでフィルタリング
    pub member_id: Option<String>,
    /// ステータスでフィルタリング（active, overdue, returned）
    pub status: Option<String>,
}

/// 書籍一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    /// trueの場合は貸出可能な書籍のみ
    pub available: Option<bool>,
}

/// 書籍レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub catalog_code: String,
    pub available: bool,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id().to_string(),
            title: item.title().to_string(),
            author: item.author().to_string(),
            catalog_code: item.catalog_code().to_string(),
            available: item.is_available(),
        }
    }
}

/// 会員レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct MemberResponse {
    pub id: String,
    pub name: String,
    pub total_loans: usize,
    /// 会員詳細（GET /members/:id）でのみ設定される
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_loans: Option<Vec<LoanResponse>>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id().to_string(),
            name: member.name().to_string(),
            total_loans: member.loan_count(),
            active_loans: None,
        }
    }
}

/// 貸出レスポンス
///
/// ステータスと延滞日数は、レスポンス作成時点の時刻で導出する。
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanResponse {
    pub loan_id: String,
    pub member_id: String,
    pub member_name: String,
    pub item_id: String,
    pub item_title: String,
    pub created_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub overdue: bool,
    pub days_late: u32,
}

impl LoanResponse {
    pub fn from_loan(loan: &Loan, now: DateTime<Utc>) -> Self {
        let core = loan.core();
        Self {
            loan_id: loan.id().to_string(),
            member_id: core.member_id.to_string(),
            member_name: core.member_name.clone(),
            item_id: core.item_id.to_string(),
            item_title: core.item_title.clone(),
            created_at: loan.created_at(),
            due_at: loan.due_at(),
            returned_at: loan.returned_at(),
            status: LoanStatus::of(loan, now),
            overdue: is_overdue(loan, now),
            days_late: days_late(loan, now),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// ステータスクエリパラメータのパースとバリデーション
pub fn parse_status_filter(status: &str) -> Result<LoanStatus, String> {
    status.parse::<LoanStatus>()
}
