use crate::domain::{Loan, LoanId, MemberId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::Result;

/// 貸出ディレクトリポート
///
/// 貸出の唯一の保管場所。会員の貸出一覧もここへのクエリで得る。
/// 一覧系の戻り値はすべて新しいVecで、順序はストアの定義による
/// （インメモリ実装では登録順）。
#[async_trait]
pub trait LoanDirectory: Send + Sync {
    async fn find(&self, id: &LoanId) -> Result<Option<Loan>>;

    /// 貸出を追加する。IDが重複する場合は`DirectoryError::Conflict`。
    async fn add(&self, loan: Loan) -> Result<()>;

    /// IDが一致する貸出を置き換える
    async fn update(&self, loan: Loan) -> Result<()>;

    /// 貸出を削除する
    ///
    /// 貸出作成の途中で失敗した場合の補償にのみ使用される。
    async fn remove(&self, id: &LoanId) -> Result<()>;

    async fn all(&self) -> Result<Vec<Loan>>;

    /// 返却されていない貸出
    async fn active(&self) -> Result<Vec<Loan>>;

    /// `now`時点で返却期限を過ぎている有効な貸出
    async fn overdue(&self, now: DateTime<Utc>) -> Result<Vec<Loan>>;

    /// 会員の全貸出（返却済みを含む）
    async fn by_member(&self, member_id: &MemberId) -> Result<Vec<Loan>>;
}
