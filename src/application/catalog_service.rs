use crate::domain::{CatalogCode, Item, ItemId, commands::AddItem};

use super::dependencies::ServiceDependencies;
use super::errors::{LibraryError, Operation, OperationContext, Result};

/// 書籍を目録に追加する
///
/// ビジネスルール：
/// - ID、タイトル、著者、目録コードはいずれも空白不可
/// - IDと目録コードは大文字小文字を区別せず一意
///
/// # 戻り値
/// 追加された書籍（貸出可能な状態）
pub async fn add_item(deps: &ServiceDependencies, cmd: AddItem) -> Result<Item> {
    let result = try_add_item(deps, &cmd).await;
    match &result {
        Ok(item) => tracing::info!(item_id = %item.id(), "Item added: {}", item),
        Err(e) => tracing::warn!(item_id = %cmd.id, "Item rejected: {}", e),
    }
    result.during(Operation::AddItem)
}

async fn try_add_item(
    deps: &ServiceDependencies,
    cmd: &AddItem,
) -> std::result::Result<Item, LibraryError> {
    // 1. 項目の検証
    let item = Item::new(&cmd.id, &cmd.title, &cmd.author, &cmd.catalog_code)?;

    // 2. 一意性の確認（ディレクトリ側でも再確認される）
    if deps.item_directory.exists_by_id(item.id()).await? {
        return Err(LibraryError::Conflict(format!(
            "An item with ID '{}' already exists",
            item.id()
        )));
    }
    if deps
        .item_directory
        .exists_by_catalog_code(item.catalog_code())
        .await?
    {
        return Err(LibraryError::Conflict(format!(
            "An item with catalog code '{}' already exists",
            item.catalog_code()
        )));
    }

    // 3. 保存
    deps.item_directory.add(item.clone()).await?;

    Ok(item)
}

/// IDで書籍を取得する（大文字小文字を区別しない）
pub async fn find_item(deps: &ServiceDependencies, item_id: &str) -> Result<Option<Item>> {
    let lookup = async {
        let id = ItemId::parse(item_id)?;
        Ok::<_, LibraryError>(deps.item_directory.find(&id).await?)
    };
    lookup.await.during(Operation::Query("item"))
}

pub async fn item_exists(deps: &ServiceDependencies, item_id: &str) -> Result<bool> {
    let lookup = async {
        let id = ItemId::parse(item_id)?;
        Ok::<_, LibraryError>(deps.item_directory.exists_by_id(&id).await?)
    };
    lookup.await.during(Operation::Query("item"))
}

pub async fn catalog_code_exists(deps: &ServiceDependencies, code: &str) -> Result<bool> {
    let lookup = async {
        let code = CatalogCode::parse(code)?;
        Ok::<_, LibraryError>(deps.item_directory.exists_by_catalog_code(&code).await?)
    };
    lookup.await.during(Operation::Query("item"))
}

pub async fn all_items(deps: &ServiceDependencies) -> Result<Vec<Item>> {
    deps.item_directory
        .all()
        .await
        .during(Operation::Query("items"))
}

pub async fn available_items(deps: &ServiceDependencies) -> Result<Vec<Item>> {
    deps.item_directory
        .available()
        .await
        .during(Operation::Query("available items"))
}
