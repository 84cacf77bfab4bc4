use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CatalogCode, DomainError, ItemId};

/// 貸出可能なものの能力
///
/// 資料の種類（書籍、雑誌など）を差し替えても、貸出ロジックは
/// ジェネリクス経由の静的ディスパッチでこの契約だけに依存する。
pub trait Lendable {
    fn item_id(&self) -> &ItemId;

    /// 表示用のタイトル
    fn title(&self) -> &str;

    fn is_available(&self) -> bool;

    /// 貸出中にする
    ///
    /// # エラー
    /// 既に貸出中の場合は`DomainError::InvalidState`を返す
    fn mark_loaned(&mut self) -> Result<(), DomainError>;

    /// 貸出可能に戻す（前提条件なし、返却処理からのみ呼ばれる）
    fn mark_available(&mut self);
}

/// Item集約 - 書籍1冊
///
/// 不変条件：`available == false` ⇔ この資料を参照する有効な貸出がちょうど1件ある
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    title: String,
    author: String,
    catalog_code: CatalogCode,
    available: bool,
}

impl Item {
    /// 新しい書籍を登録する（初期状態は貸出可能）
    ///
    /// すべての文字列は前後の空白を除去して保持する。
    ///
    /// # エラー
    /// いずれかの項目が空白の場合は`DomainError::InvalidArgument`を返す
    pub fn new(
        id: &str,
        title: &str,
        author: &str,
        catalog_code: &str,
    ) -> Result<Self, DomainError> {
        let id = ItemId::parse(id)?;
        let title = required(title, "title")?;
        let author = required(author, "author")?;
        let catalog_code = CatalogCode::parse(catalog_code)?;

        Ok(Self {
            id,
            title,
            author,
            catalog_code,
            available: true,
        })
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn catalog_code(&self) -> &CatalogCode {
        &self.catalog_code
    }

    /// 一覧表示用の詳細文字列
    pub fn describe(&self) -> String {
        format!(
            "Book: {} - Author: {} - ISBN: {} - Available: {}",
            self.title,
            self.author,
            self.catalog_code,
            if self.available { "Yes" } else { "No" }
        )
    }
}

fn required(value: &str, field: &'static str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidArgument(format!(
            "{} must not be blank",
            field
        )));
    }
    Ok(trimmed.to_string())
}

impl Lendable for Item {
    fn item_id(&self) -> &ItemId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn mark_loaned(&mut self) -> Result<(), DomainError> {
        if !self.available {
            return Err(DomainError::InvalidState(format!(
                "Item '{}' is already on loan",
                self.id
            )));
        }
        self.available = false;
        Ok(())
    }

    fn mark_available(&mut self) {
        self.available = true;
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.author)
    }
}
