use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{DomainError, LoanId, MemberId, loan::Loan};

/// Member集約 - 図書館の利用者
///
/// 貸出そのものは保持せず、貸出IDを時系列順に保持する。
/// 貸出の実体は貸出ディレクトリにあり、IDで引く。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    name: String,
    loan_ids: Vec<LoanId>,
}

impl Member {
    /// # エラー
    /// IDまたは名前が空白の場合は`DomainError::InvalidArgument`を返す
    pub fn new(id: &str, name: &str) -> Result<Self, DomainError> {
        let id = MemberId::parse(id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidArgument(
                "name must not be blank".to_string(),
            ));
        }

        Ok(Self {
            id,
            name: name.to_string(),
            loan_ids: Vec::new(),
        })
    }

    pub fn id(&self) -> &MemberId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// これまでの貸出ID（古い順）
    pub fn loan_ids(&self) -> &[LoanId] {
        &self.loan_ids
    }

    pub fn loan_count(&self) -> usize {
        self.loan_ids.len()
    }

    /// 有効な貸出を時系列順に返す
    ///
    /// `loans`は貸出ディレクトリの行。この会員が記録した貸出のうち
    /// 返却されていないものだけを、記録順で新しいVecにして返す。
    pub fn active_loans<'a, I>(&self, loans: I) -> Vec<Loan>
    where
        I: IntoIterator<Item = &'a Loan>,
    {
        let rows: Vec<&Loan> = loans.into_iter().collect();
        self.loan_ids
            .iter()
            .filter_map(|id| rows.iter().find(|loan| loan.id() == id))
            .filter(|loan| loan.is_active())
            .map(|loan| (*loan).clone())
            .collect()
    }

    /// 貸出を記録する（追記のみ）
    ///
    /// 貸出の作成経路（`loan::open_loan`）からのみ呼ばれる。
    ///
    /// # エラー
    /// 他の会員の貸出の場合は`DomainError::InvalidArgument`を返す
    pub(crate) fn record_loan(&mut self, loan: &Loan) -> Result<(), DomainError> {
        if loan.member_id() != &self.id {
            return Err(DomainError::InvalidArgument(format!(
                "Loan '{}' belongs to member '{}', not '{}'",
                loan.id(),
                loan.member_id(),
                self.id
            )));
        }
        self.loan_ids.push(loan.id().clone());
        Ok(())
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}
