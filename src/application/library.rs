use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{
    Item, Loan, Member,
    commands::{AddItem, RegisterMember, RegisterReturn, RequestLoan},
};

use super::consistency::{self, ConsistencyReport};
use super::dependencies::ServiceDependencies;
use super::errors::Result;
use super::{catalog_service, lending_service, member_service};

/// 図書館全体の集計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LibrarySummary {
    pub total_members: usize,
    pub total_items: usize,
    pub available_items: usize,
    pub active_loans: usize,
    pub overdue_loans: usize,
}

/// 起動時に読み込むデモデータ（会員）
const DEMO_MEMBERS: &[(&str, &str)] = &[
    ("U001", "María González"),
    ("U002", "Carlos Rodríguez"),
    ("U003", "Ana Martínez"),
];

/// 起動時に読み込むデモデータ（書籍）
const DEMO_ITEMS: &[(&str, &str, &str, &str)] = &[
    (
        "L001",
        "Cien Años de Soledad",
        "Gabriel García Márquez",
        "978-84-376-0494-7",
    ),
    ("L002", "Don Quijote", "Miguel de Cervantes", "978-84-376-0495-4"),
    (
        "L003",
        "El Principito",
        "Antoine de Saint-Exupéry",
        "978-84-376-0496-1",
    ),
];

/// 図書館ファサード
///
/// 目録・会員・貸出の各サービスを1つのAPIにまとめる。
/// 処理はすべて各サービス関数への委譲で、状態は`ServiceDependencies`だけが持つ。
///
/// 複数の実体を書き換える貸出と返却は、クローン間で共有するロックで直列化する。
#[derive(Clone)]
pub struct Library {
    deps: ServiceDependencies,
    lending: Arc<Mutex<()>>,
}

impl Library {
    pub fn new(deps: ServiceDependencies) -> Self {
        Self {
            deps,
            lending: Arc::new(Mutex::new(())),
        }
    }

    pub fn dependencies(&self) -> &ServiceDependencies {
        &self.deps
    }

    // ------------------------------------------------------------------
    // 会員
    // ------------------------------------------------------------------

    pub async fn register_member(&self, id: &str, name: &str) -> Result<Member> {
        let cmd = RegisterMember {
            id: id.to_string(),
            name: name.to_string(),
        };
        member_service::register_member(&self.deps, cmd).await
    }

    pub async fn find_member(&self, id: &str) -> Result<Option<Member>> {
        member_service::find_member(&self.deps, id).await
    }

    pub async fn member_exists(&self, id: &str) -> Result<bool> {
        member_service::member_exists(&self.deps, id).await
    }

    pub async fn all_members(&self) -> Result<Vec<Member>> {
        member_service::all_members(&self.deps).await
    }

    pub async fn active_loans_for_member(&self, member_id: &str) -> Result<Vec<Loan>> {
        member_service::active_loans_for_member(&self.deps, member_id).await
    }

    // ------------------------------------------------------------------
    // 書籍
    // ------------------------------------------------------------------

    pub async fn add_item(
        &self,
        id: &str,
        title: &str,
        author: &str,
        catalog_code: &str,
    ) -> Result<Item> {
        let cmd = AddItem {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            catalog_code: catalog_code.to_string(),
        };
        catalog_service::add_item(&self.deps, cmd).await
    }

    pub async fn find_item(&self, id: &str) -> Result<Option<Item>> {
        catalog_service::find_item(&self.deps, id).await
    }

    pub async fn item_exists(&self, id: &str) -> Result<bool> {
        catalog_service::item_exists(&self.deps, id).await
    }

    pub async fn catalog_code_exists(&self, catalog_code: &str) -> Result<bool> {
        catalog_service::catalog_code_exists(&self.deps, catalog_code).await
    }

    pub async fn all_items(&self) -> Result<Vec<Item>> {
        catalog_service::all_items(&self.deps).await
    }

    pub async fn available_items(&self) -> Result<Vec<Item>> {
        catalog_service::available_items(&self.deps).await
    }

    // ------------------------------------------------------------------
    // 貸出
    // ------------------------------------------------------------------

    pub async fn request_loan(&self, member_id: &str, item_id: &str, days: i64) -> Result<Loan> {
        let cmd = RequestLoan {
            member_id: member_id.to_string(),
            item_id: item_id.to_string(),
            days,
        };
        let _guard = self.lending.lock().await;
        lending_service::request_loan(&self.deps, cmd).await
    }

    pub async fn register_return(&self, loan_id: &str) -> Result<Loan> {
        let cmd = RegisterReturn {
            loan_id: loan_id.to_string(),
        };
        let _guard = self.lending.lock().await;
        lending_service::register_return(&self.deps, cmd).await
    }

    pub async fn find_loan(&self, loan_id: &str) -> Result<Option<Loan>> {
        lending_service::find_loan(&self.deps, loan_id).await
    }

    pub async fn active_loans(&self) -> Result<Vec<Loan>> {
        lending_service::active_loans(&self.deps).await
    }

    pub async fn overdue_loans(&self) -> Result<Vec<Loan>> {
        lending_service::overdue_loans(&self.deps).await
    }

    pub async fn loans_for_member(&self, member_id: &str) -> Result<Vec<Loan>> {
        lending_service::loans_for_member(&self.deps, member_id).await
    }

    pub async fn all_loans(&self) -> Result<Vec<Loan>> {
        lending_service::all_loans(&self.deps).await
    }

    // ------------------------------------------------------------------
    // 集計・検査
    // ------------------------------------------------------------------

    /// 会員数・書籍数・貸出可能数・有効な貸出数・延滞数
    pub async fn summary(&self) -> Result<LibrarySummary> {
        Ok(LibrarySummary {
            total_members: self.all_members().await?.len(),
            total_items: self.all_items().await?.len(),
            available_items: self.available_items().await?.len(),
            active_loans: self.active_loans().await?.len(),
            overdue_loans: self.overdue_loans().await?.len(),
        })
    }

    pub async fn check_consistency(&self) -> Result<ConsistencyReport> {
        consistency::check_consistency(&self.deps).await
    }

    /// デモ用の会員3名と書籍3冊を登録する
    ///
    /// 失敗した登録（重複など）はログに残して読み飛ばす。
    ///
    /// # 戻り値
    /// 実際に登録できた件数
    pub async fn seed_demo_data(&self) -> usize {
        let mut loaded = 0;

        for (id, name) in DEMO_MEMBERS {
            match self.register_member(id, name).await {
                Ok(_) => loaded += 1,
                Err(e) => tracing::warn!("Skipping demo member: {}", e),
            }
        }

        for (id, title, author, code) in DEMO_ITEMS {
            match self.add_item(id, title, author, code).await {
                Ok(_) => loaded += 1,
                Err(e) => tracing::warn!("Skipping demo item: {}", e),
            }
        }

        tracing::info!(loaded, "Demo data loaded");
        loaded
    }
}
