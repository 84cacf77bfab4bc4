use crate::domain::{CatalogCode, Item, ItemId};
use async_trait::async_trait;

use super::error::Result;

/// 資料ディレクトリポート
///
/// IDと目録コードの一意性を保証する。
/// 検索はどちらも大文字小文字を区別しない。
#[async_trait]
pub trait ItemDirectory: Send + Sync {
    async fn find(&self, id: &ItemId) -> Result<Option<Item>>;

    async fn exists_by_id(&self, id: &ItemId) -> Result<bool>;

    async fn exists_by_catalog_code(&self, code: &CatalogCode) -> Result<bool>;

    /// 資料を追加する
    ///
    /// IDまたは目録コードが既に存在する場合は`DirectoryError::Conflict`。
    async fn add(&self, item: Item) -> Result<()>;

    /// IDが一致する資料を置き換える
    ///
    /// 貸出・返却で変わった貸出可否を書き戻すために使用される。
    async fn update(&self, item: Item) -> Result<()>;

    /// 登録順のすべての資料
    async fn all(&self) -> Result<Vec<Item>>;

    /// 貸出可能な資料のみ
    async fn available(&self) -> Result<Vec<Item>>;
}
