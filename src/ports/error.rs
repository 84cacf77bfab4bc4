use thiserror::Error;

/// ディレクトリ（ストア）ポートのエラー
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// IDまたは目録コードの重複
    #[error("{0}")]
    Conflict(String),

    /// 更新対象が存在しない
    #[error("{0}")]
    NotFound(String),

    /// バックエンドの障害（接続断、ロック汚染など）
    #[error("directory backend failure")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
