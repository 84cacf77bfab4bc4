use crate::domain::{Member, MemberId};
use async_trait::async_trait;

use super::error::Result;

/// 会員ディレクトリポート
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// IDで会員を検索する（大文字小文字を区別しない）
    async fn find(&self, id: &MemberId) -> Result<Option<Member>>;

    async fn exists_by_id(&self, id: &MemberId) -> Result<bool>;

    /// 会員を追加する。IDが重複する場合は`DirectoryError::Conflict`。
    async fn add(&self, member: Member) -> Result<()>;

    /// IDが一致する会員を置き換える（貸出履歴の追記を書き戻す）
    async fn update(&self, member: Member) -> Result<()>;

    async fn all(&self) -> Result<Vec<Member>>;
}
