use std::fmt;

use thiserror::Error;

use crate::domain::DomainError;
use crate::ports::DirectoryError;

/// 失敗の根本原因
///
/// ドメイン層とポート層のエラーをここに集約し、種類を保ったまま運ぶ。
#[derive(Debug, Error)]
pub enum LibraryError {
    /// 入力値が不正（空白のID、0以下の日数など）
    #[error("{0}")]
    InvalidArgument(String),

    /// 参照されたIDがディレクトリに存在しない
    #[error("{0}")]
    NotFound(String),

    /// 現在の状態では実行できない（貸出中の資料、返却済みの貸出）
    #[error("{0}")]
    InvalidState(String),

    /// IDまたは目録コードの重複
    #[error("{0}")]
    Conflict(String),

    /// ディレクトリのバックエンド障害
    #[error("directory failure: {0}")]
    DirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LibraryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LibraryError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            LibraryError::NotFound(_) => ErrorKind::NotFound,
            LibraryError::InvalidState(_) => ErrorKind::InvalidState,
            LibraryError::Conflict(_) => ErrorKind::Conflict,
            LibraryError::DirectoryError(_) => ErrorKind::Directory,
        }
    }
}

impl From<DomainError> for LibraryError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidArgument(msg) => LibraryError::InvalidArgument(msg),
            DomainError::InvalidState(msg) => LibraryError::InvalidState(msg),
        }
    }
}

impl From<DirectoryError> for LibraryError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Conflict(msg) => LibraryError::Conflict(msg),
            DirectoryError::NotFound(msg) => LibraryError::NotFound(msg),
            DirectoryError::Backend(e) => LibraryError::DirectoryError(e),
        }
    }
}

/// エラーの種類（表示層でのマッピング用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    InvalidState,
    Conflict,
    Directory,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::InvalidState => "INVALID_STATE",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Directory => "DIRECTORY_ERROR",
        }
    }
}

/// 失敗した操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddItem,
    RegisterMember,
    RequestLoan,
    RegisterReturn,
    /// 参照系（対象の名前を持つ）
    Query(&'static str),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::AddItem => f.write_str("add item"),
            Operation::RegisterMember => f.write_str("register member"),
            Operation::RequestLoan => f.write_str("request loan"),
            Operation::RegisterReturn => f.write_str("register return"),
            Operation::Query(what) => write!(f, "load {}", what),
        }
    }
}

/// アプリケーション層が返す唯一のエラー
///
/// 表示層が一貫した形式でエラーを出せるよう、操作名と根本原因を持つ。
/// 根本原因は`source()`からも辿れる。
#[derive(Debug, Error)]
#[error("Failed to {operation}: {cause}")]
pub struct OperationFailed {
    pub operation: Operation,
    #[source]
    pub cause: LibraryError,
}

impl OperationFailed {
    pub fn new(operation: Operation, cause: LibraryError) -> Self {
        Self { operation, cause }
    }

    pub fn kind(&self) -> ErrorKind {
        self.cause.kind()
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, OperationFailed>;

/// 根本原因を操作名付きでラップする
pub(crate) trait OperationContext<T> {
    fn during(self, operation: Operation) -> Result<T>;
}

impl<T, E> OperationContext<T> for std::result::Result<T, E>
where
    E: Into<LibraryError>,
{
    fn during(self, operation: Operation) -> Result<T> {
        self.map_err(|e| OperationFailed::new(operation, e.into()))
    }
}
