use serde::Serialize;

use crate::domain::{Item, ItemId, Lendable, Loan, LoanId};

use super::dependencies::ServiceDependencies;
use super::errors::{LibraryError, Operation, OperationContext, Result};

/// 貸出可否と有効な貸出の不一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    /// 貸出中なのに、参照する有効な貸出がない
    UnavailableWithoutLoan { item_id: ItemId },
    /// 貸出可能なのに、有効な貸出が参照している
    AvailableWhileLoaned { item_id: ItemId, loan_id: LoanId },
    /// 1冊に有効な貸出が2件以上ある
    MultipleActiveLoans { item_id: ItemId, loan_ids: Vec<LoanId> },
    /// 有効な貸出が存在しない資料を参照している
    UnknownItem { loan_id: LoanId, item_id: ItemId },
}

/// 整合性チェックの結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub checked_items: usize,
    pub checked_loans: usize,
    pub violations: Vec<Violation>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }
}

/// 不変条件を評価する純粋関数
///
/// すべての資料について `available == false` ⇔ 参照する有効な貸出がちょうど1件
/// であることを確認する。IDの照合は大文字小文字を区別しない。
pub fn evaluate(items: &[Item], loans: &[Loan]) -> ConsistencyReport {
    let active: Vec<&Loan> = loans.iter().filter(|l| l.is_active()).collect();
    let mut violations = Vec::new();

    for item in items {
        let key = item.id().key();
        let referencing: Vec<&Loan> = active
            .iter()
            .copied()
            .filter(|l| l.item_id().key() == key)
            .collect();

        match (item.is_available(), referencing.as_slice()) {
            (true, []) | (false, [_]) => {}
            (false, []) => violations.push(Violation::UnavailableWithoutLoan {
                item_id: item.id().clone(),
            }),
            (true, [loan]) => violations.push(Violation::AvailableWhileLoaned {
                item_id: item.id().clone(),
                loan_id: loan.id().clone(),
            }),
            (_, many) => violations.push(Violation::MultipleActiveLoans {
                item_id: item.id().clone(),
                loan_ids: many.iter().map(|l| l.id().clone()).collect(),
            }),
        }
    }

    for loan in &active {
        let key = loan.item_id().key();
        if !items.iter().any(|i| i.id().key() == key) {
            violations.push(Violation::UnknownItem {
                loan_id: loan.id().clone(),
                item_id: loan.item_id().clone(),
            });
        }
    }

    ConsistencyReport {
        checked_items: items.len(),
        checked_loans: loans.len(),
        violations,
    }
}

/// ディレクトリの現在の内容で不変条件を確認する
///
/// 不一致は警告としてログに出す。
pub async fn check_consistency(deps: &ServiceDependencies) -> Result<ConsistencyReport> {
    let load = async {
        let items = deps.item_directory.all().await?;
        let loans = deps.loan_directory.all().await?;
        Ok::<_, LibraryError>(evaluate(&items, &loans))
    };
    let report = load.await.during(Operation::Query("consistency report"))?;

    for violation in &report.violations {
        tracing::warn!(?violation, "Lending invariant violated");
    }

    Ok(report)
}
