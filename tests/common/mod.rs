#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use library_lending::adapters::FixedClock;
use library_lending::application::{Library, ServiceDependencies};
use std::sync::Arc;

/// テストの基準時刻（2024-01-10 09:00:00 UTC）
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap()
}

/// 固定時計とインメモリディレクトリで組み立てた図書館
///
/// 時計はテスト側から進められるように一緒に返す。
pub fn library_with_clock() -> (Library, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(start_time()));
    let deps = ServiceDependencies::in_memory(clock.clone());
    (Library::new(deps), clock)
}

/// 会員2名と書籍2冊を登録済みの図書館
///
/// - 会員: M1 (Ana), M2 (Luis)
/// - 書籍: B1 (Dune), B2 (Emma)
pub async fn seeded_library() -> (Library, Arc<FixedClock>) {
    let (library, clock) = library_with_clock();

    library.register_member("M1", "Ana").await.unwrap();
    library.register_member("M2", "Luis").await.unwrap();
    library
        .add_item("B1", "Dune", "Frank Herbert", "ISBN-1")
        .await
        .unwrap();
    library
        .add_item("B2", "Emma", "Jane Austen", "ISBN-2")
        .await
        .unwrap();

    (library, clock)
}
