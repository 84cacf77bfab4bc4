use crate::domain::{CatalogCode, Item, ItemId, Lendable};
use crate::ports::{
    DirectoryError,
    error::Result,
    item_directory::ItemDirectory as ItemDirectoryTrait,
};
use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;

/// ItemDirectoryのインメモリ実装
///
/// 登録順を保持するVecで資料を管理する。
/// IDと目録コードは大文字小文字を区別せずに照合する。
pub struct ItemDirectory {
    items: Mutex<Vec<Item>>,
}

impl ItemDirectory {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }
}

impl Default for ItemDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemDirectoryTrait for ItemDirectory {
    async fn find(&self, id: &ItemId) -> Result<Option<Item>> {
        let key = id.key();
        let items = lock(&self.items, "item directory")?;
        Ok(items.iter().find(|i| i.id().key() == key).cloned())
    }

    async fn exists_by_id(&self, id: &ItemId) -> Result<bool> {
        let key = id.key();
        let items = lock(&self.items, "item directory")?;
        Ok(items.iter().any(|i| i.id().key() == key))
    }

    async fn exists_by_catalog_code(&self, code: &CatalogCode) -> Result<bool> {
        let key = code.key();
        let items = lock(&self.items, "item directory")?;
        Ok(items.iter().any(|i| i.catalog_code().key() == key))
    }

    /// 重複チェックと追加を同じロックの中で行う
    async fn add(&self, item: Item) -> Result<()> {
        let mut items = lock(&self.items, "item directory")?;

        let id_key = item.id().key();
        if items.iter().any(|i| i.id().key() == id_key) {
            return Err(DirectoryError::Conflict(format!(
                "An item with ID '{}' already exists",
                item.id()
            )));
        }

        let code_key = item.catalog_code().key();
        if items.iter().any(|i| i.catalog_code().key() == code_key) {
            return Err(DirectoryError::Conflict(format!(
                "An item with catalog code '{}' already exists",
                item.catalog_code()
            )));
        }

        items.push(item);
        Ok(())
    }

    async fn update(&self, item: Item) -> Result<()> {
        let key = item.id().key();
        let mut items = lock(&self.items, "item directory")?;
        match items.iter_mut().find(|i| i.id().key() == key) {
            Some(slot) => {
                *slot = item;
                Ok(())
            }
            None => Err(DirectoryError::NotFound(format!(
                "Item '{}' not found",
                item.id()
            ))),
        }
    }

    async fn all(&self) -> Result<Vec<Item>> {
        Ok(lock(&self.items, "item directory")?.clone())
    }

    async fn available(&self) -> Result<Vec<Item>> {
        let items = lock(&self.items, "item directory")?;
        Ok(items.iter().filter(|i| i.is_available()).cloned().collect())
    }
}
