use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{DomainError, ItemId, Lendable, LoanDays, LoanId, Member, MemberId};

// ============================================================================
// 取引レコード（共通の形）
// ============================================================================

/// 取引の共通レコード
///
/// ID、作成日時、妥当性チェックだけを持つ小さな形。
/// 貸出はこれを継承ではなく合成で保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: LoanId,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(id: LoanId, created_at: DateTime<Utc>) -> Self {
        Self { id, created_at }
    }

    /// IDが空でなく、作成日時が未来でないこと
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.id.value().trim().is_empty() && self.created_at <= now
    }
}

// ============================================================================
// 型安全な状態パターン
// ============================================================================

/// Loan集約の共通フィールド
///
/// Open/Closedの両状態で共有されるコアデータ。
/// 会員と資料は所有せず、IDと表示用のスナップショットだけを持つ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanCore {
    #[serde(flatten)]
    pub record: TransactionRecord,

    // 他の集約への参照（ID + 表示名）
    pub member_id: MemberId,
    pub member_name: String,
    pub item_id: ItemId,
    pub item_title: String,

    pub due_at: DateTime<Utc>,
}

/// 貸出中状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenLoan {
    #[serde(flatten)]
    pub core: LoanCore,
}

impl std::ops::Deref for OpenLoan {
    type Target = LoanCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

/// 返却済み状態（終端）
///
/// ビジネスルール：
/// - returned_atが必須（型で保証）
/// - 操作不可（読み取り専用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedLoan {
    #[serde(flatten)]
    pub core: LoanCore,
    pub returned_at: DateTime<Utc>,
}

impl std::ops::Deref for ClosedLoan {
    type Target = LoanCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

/// Loan集約 - 1冊の資料の1回の貸出
///
/// 状態遷移は Open → Closed のみ。延滞は状態ではなく、
/// Open状態と現在時刻から導出する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum Loan {
    Open(OpenLoan),
    Closed(ClosedLoan),
}

impl Loan {
    pub fn core(&self) -> &LoanCore {
        match self {
            Loan::Open(open) => &open.core,
            Loan::Closed(closed) => &closed.core,
        }
    }

    pub fn id(&self) -> &LoanId {
        &self.core().record.id
    }

    pub fn member_id(&self) -> &MemberId {
        &self.core().member_id
    }

    pub fn item_id(&self) -> &ItemId {
        &self.core().item_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.core().record.created_at
    }

    pub fn due_at(&self) -> DateTime<Utc> {
        self.core().due_at
    }

    pub fn returned_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Loan::Open(_) => None,
            Loan::Closed(closed) => Some(closed.returned_at),
        }
    }

    /// 返却されていなければtrue
    pub fn is_active(&self) -> bool {
        matches!(self, Loan::Open(_))
    }

    /// 返却期限を過ぎてから返却されたか（Open状態ではfalse）
    pub fn returned_late(&self) -> bool {
        match self {
            Loan::Open(_) => false,
            Loan::Closed(closed) => closed.returned_at > closed.due_at,
        }
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.core().record.is_valid(now)
    }
}

/// 表示用の貸出ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    /// 貸出中
    Active,
    /// 延滞中
    Overdue,
    /// 返却済み
    Returned,
}

impl LoanStatus {
    /// 貸出の状態と現在時刻から導出する
    pub fn of(loan: &Loan, now: DateTime<Utc>) -> Self {
        match loan {
            Loan::Closed(_) => LoanStatus::Returned,
            Loan::Open(_) if is_overdue(loan, now) => LoanStatus::Overdue,
            Loan::Open(_) => LoanStatus::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Overdue => "OVERDUE",
            LoanStatus::Returned => "RETURNED",
        }
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(LoanStatus::Active),
            "overdue" => Ok(LoanStatus::Overdue),
            "returned" => Ok(LoanStatus::Returned),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

// ============================================================================
// 純粋関数
// ============================================================================

/// 貸出を開始する
///
/// ビジネスルール：
/// - 貸出日数は1日以上
/// - 資料が貸出可能であること
/// - 返却期限 = 作成日時 + 貸出日数
///
/// 成功時のみ、資料を貸出中にし、会員の貸出履歴に追記する。
/// 失敗時は会員・資料ともに呼び出し前の状態のまま。
///
/// # エラー
/// - `InvalidArgument`: 日数が0以下
/// - `InvalidState`: 資料が貸出中
pub fn open_loan<I: Lendable>(
    loan_id: LoanId,
    member: &mut Member,
    item: &mut I,
    days: i64,
    now: DateTime<Utc>,
) -> Result<Loan, DomainError> {
    // バリデーション：副作用の前にすべて確認する
    let days = LoanDays::try_from(days)?;
    let due_at = now
        .checked_add_signed(Duration::days(i64::from(days.value())))
        .ok_or_else(|| {
            DomainError::InvalidArgument(format!("loan days out of range: {}", days.value()))
        })?;

    if !item.is_available() {
        return Err(DomainError::InvalidState(format!(
            "Item '{}' is not available for loan",
            item.item_id()
        )));
    }

    let loan = Loan::Open(OpenLoan {
        core: LoanCore {
            record: TransactionRecord::new(loan_id, now),
            member_id: member.id().clone(),
            member_name: member.name().to_string(),
            item_id: item.item_id().clone(),
            item_title: item.title().to_string(),
            due_at,
        },
    });

    item.mark_loaned()?;
    if let Err(e) = member.record_loan(&loan) {
        // 資料の状態を戻してから失敗を返す
        item.mark_available();
        return Err(e);
    }

    Ok(loan)
}

/// 貸出を返却する
///
/// ビジネスルール：
/// - 延滞していても返却は受け付ける
/// - 返却済みの貸出は再返却できない
///
/// 成功時は資料を貸出可能に戻し、Closed状態の貸出を返す。
///
/// # エラー
/// - `InvalidState`: 既に返却済み
/// - `InvalidArgument`: 渡された資料がこの貸出の資料ではない
pub fn return_loan<I: Lendable>(
    loan: &Loan,
    item: &mut I,
    returned_at: DateTime<Utc>,
) -> Result<Loan, DomainError> {
    let open = match loan {
        Loan::Open(open) => open,
        Loan::Closed(_) => {
            return Err(DomainError::InvalidState(format!(
                "Loan '{}' has already been returned",
                loan.id()
            )));
        }
    };

    if item.item_id() != &open.item_id {
        return Err(DomainError::InvalidArgument(format!(
            "Item '{}' does not belong to loan '{}'",
            item.item_id(),
            open.record.id
        )));
    }

    item.mark_available();

    Ok(Loan::Closed(ClosedLoan {
        core: open.core.clone(),
        returned_at,
    }))
}

/// 延滞判定：返却されておらず、返却期限を過ぎている
pub fn is_overdue(loan: &Loan, now: DateTime<Utc>) -> bool {
    match loan {
        Loan::Open(open) => now > open.due_at,
        Loan::Closed(_) => false,
    }
}

/// 延滞日数
///
/// 延滞していなければ0。延滞中は経過した日数の切り捨て値だが、
/// 1日未満の延滞も1日として数える。
pub fn days_late(loan: &Loan, now: DateTime<Utc>) -> u32 {
    if !is_overdue(loan, now) {
        return 0;
    }
    let whole_days = (now - loan.due_at()).num_days();
    u32::try_from(whole_days.max(1)).unwrap_or(u32::MAX)
}

/// 表示用の1行サマリー
pub fn describe(loan: &Loan, now: DateTime<Utc>) -> String {
    let core = loan.core();
    format!(
        "Loan {}: {} - {} - {} - Due: {}",
        core.record.id,
        core.item_title,
        core.member_name,
        LoanStatus::of(loan, now).as_str(),
        core.due_at.format("%d/%m/%Y")
    )
}
