use serde::{Deserialize, Serialize};

// コマンドは生の識別子（文字列）を運ぶ。検証はアプリケーション層で行う。

/// コマンド：書籍を目録に追加する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub id: String,
    pub title: String,
    pub author: String,
    pub catalog_code: String,
}

/// コマンド：会員を登録する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterMember {
    pub id: String,
    pub name: String,
}

/// コマンド：資料を貸し出す
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestLoan {
    pub member_id: String,
    pub item_id: String,
    pub days: i64,
}

/// コマンド：返却を登録する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterReturn {
    pub loan_id: String,
}
