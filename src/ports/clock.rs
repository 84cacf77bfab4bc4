use chrono::{DateTime, Utc};

/// 時計ポート
///
/// 延滞判定や返却期限の計算で使う「現在時刻」を注入する。
/// テストでは固定の時計を差し込む。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
