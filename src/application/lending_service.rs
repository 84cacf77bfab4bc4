use crate::domain::{
    self, ItemId, Loan, LoanDays, LoanId, MemberId,
    commands::{RegisterReturn, RequestLoan},
};

use super::dependencies::ServiceDependencies;
use super::errors::{LibraryError, Operation, OperationContext, Result};

/// 資料を貸し出す
///
/// ビジネスルール：
/// - 会員IDと資料IDは空白不可、貸出日数は1日以上
/// - 会員と資料が存在すること
/// - 資料が貸出可能であること
/// - 返却期限 = 現在時刻 + 貸出日数
///
/// すべての依存が引数として明示的に渡される。
///
/// # 一貫性保証
///
/// 成功時は、貸出1件の追加・資料1件の貸出中化・会員の履歴1件の追記が
/// そろって保存される。保存の途中で失敗した場合は、それまでの書き込みを
/// 取り消してから失敗を返す（呼び出し前の状態に戻る）。
///
/// 複数の呼び出し元からの同時実行は想定していない。
///
/// # 戻り値
/// 作成された貸出（Open状態）
pub async fn request_loan(deps: &ServiceDependencies, cmd: RequestLoan) -> Result<Loan> {
    let result = try_request_loan(deps, &cmd).await;
    match &result {
        Ok(loan) => tracing::info!(
            loan_id = %loan.id(),
            member_id = %loan.member_id(),
            item_id = %loan.item_id(),
            "Loan opened: {}",
            domain::loan::describe(loan, loan.created_at())
        ),
        Err(e) => tracing::warn!(
            member_id = %cmd.member_id,
            item_id = %cmd.item_id,
            "Loan rejected: {}",
            e
        ),
    }
    result.during(Operation::RequestLoan)
}

async fn try_request_loan(
    deps: &ServiceDependencies,
    cmd: &RequestLoan,
) -> std::result::Result<Loan, LibraryError> {
    // 1. 入力の検証
    let member_id = MemberId::parse(&cmd.member_id)?;
    let item_id = ItemId::parse(&cmd.item_id)?;
    LoanDays::try_from(cmd.days)?;

    // 2. 会員と資料の存在確認
    let mut member = deps
        .member_directory
        .find(&member_id)
        .await?
        .ok_or_else(|| LibraryError::NotFound(format!("Member '{}' not found", member_id)))?;

    let mut item = deps
        .item_directory
        .find(&item_id)
        .await?
        .ok_or_else(|| LibraryError::NotFound(format!("Item '{}' not found", item_id)))?;

    let original_item = item.clone();
    let original_member = member.clone();

    // 3. ドメイン層の純粋関数を呼び出し（貸出可否もここで判定）
    let now = deps.clock.now();
    let loan =
        domain::loan::open_loan(LoanId::generate(now), &mut member, &mut item, cmd.days, now)?;

    // 4. 保存（貸出 → 資料 → 会員の順。失敗時は逆順に取り消す）
    deps.loan_directory.add(loan.clone()).await?;

    if let Err(e) = deps.item_directory.update(item).await {
        undo_loan(deps, loan.id()).await;
        return Err(e.into());
    }

    if let Err(e) = deps.member_directory.update(member).await {
        // 会員の書き込みは失敗しているので、元の値で上書きしておく
        if let Err(undo) = deps.member_directory.update(original_member).await {
            tracing::error!(member_id = %member_id, "Failed to restore member: {}", undo);
        }
        if let Err(undo) = deps.item_directory.update(original_item).await {
            tracing::error!(item_id = %item_id, "Failed to restore item: {}", undo);
        }
        undo_loan(deps, loan.id()).await;
        return Err(e.into());
    }

    Ok(loan)
}

async fn undo_loan(deps: &ServiceDependencies, loan_id: &LoanId) {
    if let Err(e) = deps.loan_directory.remove(loan_id).await {
        tracing::error!(loan_id = %loan_id, "Failed to remove partially created loan: {}", e);
    }
}

/// 返却を登録する
///
/// ビジネスルール：
/// - 貸出が存在すること
/// - 返却済みでないこと
/// - 延滞していても返却は受け付ける
///
/// # 一貫性保証
///
/// 貸出のClosed化と資料の貸出可能化はそろって保存される。
/// 資料の保存に失敗した場合は貸出を元に戻す。
pub async fn register_return(deps: &ServiceDependencies, cmd: RegisterReturn) -> Result<Loan> {
    let result = try_register_return(deps, &cmd).await;
    match &result {
        Ok(loan) => tracing::info!(
            loan_id = %loan.id(),
            item_id = %loan.item_id(),
            was_overdue = loan.returned_late(),
            "Return registered: {}",
            domain::loan::describe(loan, deps.clock.now())
        ),
        Err(e) => tracing::warn!(loan_id = %cmd.loan_id, "Return rejected: {}", e),
    }
    result.during(Operation::RegisterReturn)
}

async fn try_register_return(
    deps: &ServiceDependencies,
    cmd: &RegisterReturn,
) -> std::result::Result<Loan, LibraryError> {
    // 1. 入力の検証
    let loan_id = LoanId::parse(&cmd.loan_id)?;

    // 2. 貸出と資料を取得
    let loan = deps
        .loan_directory
        .find(&loan_id)
        .await?
        .ok_or_else(|| LibraryError::NotFound(format!("Loan '{}' not found", loan_id)))?;

    if !loan.is_active() {
        return Err(LibraryError::InvalidState(format!(
            "Loan '{}' has already been returned",
            loan.id()
        )));
    }

    let mut item = deps
        .item_directory
        .find(loan.item_id())
        .await?
        .ok_or_else(|| {
            LibraryError::NotFound(format!(
                "Item '{}' referenced by loan '{}' not found",
                loan.item_id(),
                loan.id()
            ))
        })?;

    // 3. ドメイン層の純粋関数を呼び出し
    let closed = domain::loan::return_loan(&loan, &mut item, deps.clock.now())?;

    // 4. 保存
    deps.loan_directory.update(closed.clone()).await?;

    if let Err(e) = deps.item_directory.update(item).await {
        if let Err(undo) = deps.loan_directory.update(loan).await {
            tracing::error!(loan_id = %loan_id, "Failed to restore loan: {}", undo);
        }
        return Err(e.into());
    }

    Ok(closed)
}

/// IDで貸出を取得する
pub async fn find_loan(deps: &ServiceDependencies, loan_id: &str) -> Result<Option<Loan>> {
    let lookup = async {
        let id = LoanId::parse(loan_id)?;
        Ok::<_, LibraryError>(deps.loan_directory.find(&id).await?)
    };
    lookup.await.during(Operation::Query("loan"))
}

/// 返却されていない貸出
pub async fn active_loans(deps: &ServiceDependencies) -> Result<Vec<Loan>> {
    deps.loan_directory
        .active()
        .await
        .during(Operation::Query("active loans"))
}

/// 現在時刻（注入された時計）で延滞している貸出
pub async fn overdue_loans(deps: &ServiceDependencies) -> Result<Vec<Loan>> {
    deps.loan_directory
        .overdue(deps.clock.now())
        .await
        .during(Operation::Query("overdue loans"))
}

/// 会員の全貸出（返却済みを含む）
pub async fn loans_for_member(deps: &ServiceDependencies, member_id: &str) -> Result<Vec<Loan>> {
    let lookup = async {
        let id = MemberId::parse(member_id)?;
        Ok::<_, LibraryError>(deps.loan_directory.by_member(&id).await?)
    };
    lookup.await.during(Operation::Query("member loans"))
}

pub async fn all_loans(deps: &ServiceDependencies) -> Result<Vec<Loan>> {
    deps.loan_directory
        .all()
        .await
        .during(Operation::Query("loans"))
}
