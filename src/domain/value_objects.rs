use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainError;

/// 空白のみの入力を拒否し、前後の空白を除去する
fn non_blank(value: &str, field: &'static str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidArgument(format!(
            "{} must not be blank",
            field
        )));
    }
    Ok(trimmed.to_string())
}

/// 資料ID - 貸出対象（書籍）の識別子
///
/// 比較は大文字小文字を区別するが、ディレクトリでの検索は`key()`で行う。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        non_blank(value, "item id").map(Self)
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// 大文字小文字を区別しない検索キー
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 会員ID
///
/// 会員の同一性はこのIDのみで決まる（大文字小文字を区別）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(String);

impl MemberId {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        non_blank(value, "member id").map(Self)
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 貸出ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(String);

impl LoanId {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        non_blank(value, "loan id").map(Self)
    }

    /// 新しい貸出IDを採番する
    ///
    /// 形式: `P<yyyyMMddHHmmss>-<uuid v4の先頭8桁>`
    /// 同一秒内に複数採番しても衝突しないよう、UUIDの一部を付与する。
    pub fn generate(now: DateTime<Utc>) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "P{}-{}",
            now.format("%Y%m%d%H%M%S"),
            suffix.get(..8).unwrap_or(&suffix)
        ))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 目録コード（ISBNなど）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogCode(String);

impl CatalogCode {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        non_blank(value, "catalog code").map(Self)
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for CatalogCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 貸出日数
///
/// 不変条件：1日以上
/// 型システムでこの制約を強制し、0以下の期間で貸出を作成できないようにする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDays(u32);

impl LoanDays {
    /// 現在の日数
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for LoanDays {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(DomainError::InvalidArgument(format!(
                "loan days must be greater than 0 (got {})",
                value
            )));
        }
        u32::try_from(value).map(Self).map_err(|_| {
            DomainError::InvalidArgument(format!("loan days out of range: {}", value))
        })
    }
}
