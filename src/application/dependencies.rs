use crate::adapters::{SystemClock, memory};
use crate::ports::*;
use std::sync::Arc;

/// サービスの依存関係
///
/// 振る舞いは持たず、各サービス関数に引数として渡すデータ構造。
/// 起動時に一度だけ組み立て、表示層にはこれ（またはLibrary）を渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub item_directory: Arc<dyn ItemDirectory>,
    pub member_directory: Arc<dyn MemberDirectory>,
    pub loan_directory: Arc<dyn LoanDirectory>,
    pub clock: Arc<dyn Clock>,
}

impl ServiceDependencies {
    /// インメモリのディレクトリ3つと、指定された時計で組み立てる
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self {
            item_directory: Arc::new(memory::ItemDirectory::new()),
            member_directory: Arc::new(memory::MemberDirectory::new()),
            loan_directory: Arc::new(memory::LoanDirectory::new()),
            clock,
        }
    }
}

impl Default for ServiceDependencies {
    fn default() -> Self {
        Self::in_memory(Arc::new(SystemClock))
    }
}
