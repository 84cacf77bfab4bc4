pub mod item_directory;
pub mod loan_directory;
pub mod member_directory;

pub use item_directory::ItemDirectory;
pub use loan_directory::LoanDirectory;
pub use member_directory::MemberDirectory;

use crate::ports::{DirectoryError, error::Result};
use std::sync::{Mutex, MutexGuard};

/// ロックを取得する。汚染されたロックはバックエンド障害として扱う。
fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| DirectoryError::Backend(format!("{} lock poisoned", name).into()))
}
