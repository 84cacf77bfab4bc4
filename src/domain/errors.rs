use thiserror::Error;

/// ドメイン層のエラー
///
/// エンティティのメソッドと純粋関数は、失敗の種類を正確に返す。
/// 包括的なラップはアプリケーション層で行う。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 入力値が不正（空白、範囲外、参照の不一致）
    #[error("{0}")]
    InvalidArgument(String),

    /// 現在の状態では実行できない操作（貸出中の資料、返却済みの貸出）
    #[error("{0}")]
    InvalidState(String),
}
