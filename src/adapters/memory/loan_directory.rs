use crate::domain::{Loan, LoanId, MemberId, loan::is_overdue};
use crate::ports::{
    DirectoryError,
    error::Result,
    loan_directory::LoanDirectory as LoanDirectoryTrait,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

use super::lock;

/// LoanDirectoryのインメモリ実装
///
/// 貸出の登録順を保持する。更新はID一致での置き換え。
pub struct LoanDirectory {
    loans: Mutex<Vec<Loan>>,
}

impl LoanDirectory {
    pub fn new() -> Self {
        Self {
            loans: Mutex::new(Vec::new()),
        }
    }

    fn select<F>(&self, predicate: F) -> Result<Vec<Loan>>
    where
        F: Fn(&Loan) -> bool,
    {
        let loans = lock(&self.loans, "loan directory")?;
        Ok(loans.iter().filter(|&l| predicate(l)).cloned().collect())
    }
}

impl Default for LoanDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanDirectoryTrait for LoanDirectory {
    async fn find(&self, id: &LoanId) -> Result<Option<Loan>> {
        let key = id.key();
        let loans = lock(&self.loans, "loan directory")?;
        Ok(loans.iter().find(|l| l.id().key() == key).cloned())
    }

    async fn add(&self, loan: Loan) -> Result<()> {
        let mut loans = lock(&self.loans, "loan directory")?;
        let key = loan.id().key();
        if loans.iter().any(|l| l.id().key() == key) {
            return Err(DirectoryError::Conflict(format!(
                "A loan with ID '{}' already exists",
                loan.id()
            )));
        }
        loans.push(loan);
        Ok(())
    }

    async fn update(&self, loan: Loan) -> Result<()> {
        let key = loan.id().key();
        let mut loans = lock(&self.loans, "loan directory")?;
        match loans.iter_mut().find(|l| l.id().key() == key) {
            Some(slot) => {
                *slot = loan;
                Ok(())
            }
            None => Err(DirectoryError::NotFound(format!(
                "Loan '{}' not found",
                loan.id()
            ))),
        }
    }

    async fn remove(&self, id: &LoanId) -> Result<()> {
        let key = id.key();
        let mut loans = lock(&self.loans, "loan directory")?;
        loans.retain(|l| l.id().key() != key);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Loan>> {
        Ok(lock(&self.loans, "loan directory")?.clone())
    }

    async fn active(&self) -> Result<Vec<Loan>> {
        self.select(Loan::is_active)
    }

    async fn overdue(&self, now: DateTime<Utc>) -> Result<Vec<Loan>> {
        self.select(|l| is_overdue(l, now))
    }

    async fn by_member(&self, member_id: &MemberId) -> Result<Vec<Loan>> {
        let key = member_id.key();
        self.select(|l| l.member_id().key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Item, Member,
        loan::{open_loan, return_loan},
    };
    use chrono::Duration;

    /// 会員U1に2件、U2に1件の貸出を作り、2件目を返却済みにする
    fn sample_loans(now: DateTime<Utc>) -> Vec<Loan> {
        let mut ana = Member::new("U1", "Ana").unwrap();
        let mut luis = Member::new("U2", "Luis").unwrap();
        let mut dune = Item::new("L1", "Dune", "Herbert", "c1").unwrap();
        let mut emma = Item::new("L2", "Emma", "Austen", "c2").unwrap();
        let mut odyssey = Item::new("L3", "Odyssey", "Homer", "c3").unwrap();

        let first = open_loan(LoanId::parse("P1").unwrap(), &mut ana, &mut dune, 3, now).unwrap();
        let second =
            open_loan(LoanId::parse("P2").unwrap(), &mut ana, &mut emma, 3, now).unwrap();
        let second = return_loan(&second, &mut emma, now).unwrap();
        let third =
            open_loan(LoanId::parse("P3").unwrap(), &mut luis, &mut odyssey, 30, now).unwrap();

        vec![first, second, third]
    }

    async fn seeded(now: DateTime<Utc>) -> LoanDirectory {
        let directory = LoanDirectory::new();
        for loan in sample_loans(now) {
            directory.add(loan).await.unwrap();
        }
        directory
    }

    #[tokio::test]
    async fn test_queries_keep_insertion_order() {
        let now = Utc::now();
        let directory = seeded(now).await;

        let ids: Vec<String> = directory
            .all()
            .await
            .unwrap()
            .iter()
            .map(|l| l.id().to_string())
            .collect();
        assert_eq!(ids, vec!["P1", "P2", "P3"]);

        let active = directory.active().await.unwrap();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].id().value(), "P1");
        assert_eq!(active[1].id().value(), "P3");
    }

    #[tokio::test]
    async fn test_overdue_uses_given_time() {
        let now = Utc::now();
        let directory = seeded(now).await;

        assert!(directory.overdue(now).await.unwrap().is_empty());

        let later = directory.overdue(now + Duration::days(5)).await.unwrap();
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].id().value(), "P1");
    }

    #[tokio::test]
    async fn test_by_member_includes_returned_loans() {
        let now = Utc::now();
        let directory = seeded(now).await;

        let loans = directory
            .by_member(&MemberId::parse("u1").unwrap())
            .await
            .unwrap();
        assert_eq!(loans.len(), 2);
    }

    #[tokio::test]
    async fn test_add_duplicate_and_update_missing() {
        let now = Utc::now();
        let directory = seeded(now).await;
        let loans = sample_loans(now);

        let duplicate = directory.add(loans[0].clone()).await;
        assert!(matches!(duplicate, Err(DirectoryError::Conflict(_))));

        directory.remove(loans[0].id()).await.unwrap();
        let missing = directory.update(loans[0].clone()).await;
        assert!(matches!(missing, Err(DirectoryError::NotFound(_))));
        assert_eq!(directory.all().await.unwrap().len(), 2);
    }
}
