use crate::application::{
    catalog::CatalogApplicationError, import::ImportApplicationError,
    lending::LendingApplicationError,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    Lending(LendingApplicationError),
    Import(ImportApplicationError),
    Catalog(CatalogApplicationError),
    /// リクエスト本文の値が不正
    BadRequest(String),
}

impl From<LendingApplicationError> for ApiError {
    fn from(err: LendingApplicationError) -> Self {
        ApiError::Lending(err)
    }
}

impl From<ImportApplicationError> for ApiError {
    fn from(err: ImportApplicationError) -> Self {
        ApiError::Import(err)
    }
}

impl From<CatalogApplicationError> for ApiError {
    fn from(err: CatalogApplicationError) -> Self {
        ApiError::Catalog(err)
    }
}

/// システム障害: 詳細はログに記録し、クライアントには一般的なメッセージのみを返す
fn internal(
    error_type: &'static str,
    err: &(dyn std::error::Error + Send + Sync),
) -> (StatusCode, &'static str, String) {
    tracing::error!("{}: {}", error_type, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        error_type,
        "An unexpected error occurred".to_string(),
    )
}

fn lending_response(err: &LendingApplicationError) -> (StatusCode, &'static str, String) {
    use LendingApplicationError::*;

    match err {
        // 404 Not Found
        MemberNotFound => (StatusCode::NOT_FOUND, "MEMBER_NOT_FOUND", err.to_string()),
        BookNotFound => (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND", err.to_string()),
        TransactionNotFound => (
            StatusCode::NOT_FOUND,
            "TRANSACTION_NOT_FOUND",
            err.to_string(),
        ),

        // 422 / 409 ビジネスルール違反
        DebtLimitExceeded => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "DEBT_LIMIT_EXCEEDED",
            "Cannot issue book! Member has exceeded the debt limit of 500.".to_string(),
        ),
        OutOfStock => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "OUT_OF_STOCK",
            "Book out of stock!".to_string(),
        ),
        AlreadyReturned => (
            StatusCode::CONFLICT,
            "ALREADY_RETURNED",
            "Book already returned!".to_string(),
        ),
        DebtOverflow => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "DEBT_OVERFLOW",
            err.to_string(),
        ),

        // 500
        BookRepositoryError(e) | MemberRepositoryError(e) | TransactionRepositoryError(e) => {
            internal("PERSISTENCE_FAILURE", e.as_ref())
        }
    }
}

fn catalog_response(err: &CatalogApplicationError) -> (StatusCode, &'static str, String) {
    use CatalogApplicationError::*;

    match err {
        BookNotFound => (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND", err.to_string()),
        MemberNotFound => (StatusCode::NOT_FOUND, "MEMBER_NOT_FOUND", err.to_string()),
        BookHasTransactions => (StatusCode::CONFLICT, "BOOK_IN_USE", err.to_string()),
        MemberHasTransactions => (StatusCode::CONFLICT, "MEMBER_IN_USE", err.to_string()),
        InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone()),
        BookRepositoryError(e) | MemberRepositoryError(e) | TransactionRepositoryError(e) => {
            internal("PERSISTENCE_FAILURE", e.as_ref())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::Lending(err) => lending_response(err),
            ApiError::Catalog(err) => catalog_response(err),
            ApiError::Import(ImportApplicationError::PersistenceFailure { imported, source }) => {
                tracing::error!(imported, "Import aborted: {}", source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_FAILURE",
                    format!(
                        "Failed to save imported books; {} were saved before the failure",
                        imported
                    ),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone()),
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
