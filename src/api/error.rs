use crate::application::{ErrorKind, OperationFailed};
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    /// サービス呼び出しの失敗
    Operation(OperationFailed),
    /// 参照したリソースが存在しない（検索結果がNone）
    NotFound(String),
    /// リクエストボディまたはクエリパラメータが不正
    BadRequest(String),
}

impl From<OperationFailed> for ApiError {
    fn from(err: OperationFailed) -> Self {
        ApiError::Operation(err)
    }
}

// axumの抽出エラー（平文の422/400）を共通のエラーボディに揃える
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", msg),
            ApiError::Operation(err) => {
                let kind = err.kind();
                let status = match kind {
                    // 400 Bad Request - 入力値の不正
                    ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
                    // 404 Not Found - 参照先が存在しない
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    // 409 Conflict - IDまたは目録コードの重複
                    ErrorKind::Conflict => StatusCode::CONFLICT,
                    // 422 Unprocessable Entity - 状態の不整合（貸出中、返却済み）
                    ErrorKind::InvalidState => StatusCode::UNPROCESSABLE_ENTITY,
                    // 500 Internal Server Error - ディレクトリ障害
                    ErrorKind::Directory => StatusCode::INTERNAL_SERVER_ERROR,
                };

                // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                let message = if kind == ErrorKind::Directory {
                    tracing::error!("Directory error: {:?}", err);
                    format!("Failed to {}: internal error", err.operation)
                } else {
                    err.to_string()
                };

                (status, kind.as_str(), message)
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
