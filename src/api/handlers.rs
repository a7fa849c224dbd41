use crate::application::{
    ServiceDependencies, catalog,
    import::import_books as execute_import_books,
    lending::{issue_book as execute_issue_book, return_book as execute_return_book},
};
use crate::domain::{BookId, MemberId, TransactionId, commands::ReturnBook};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        AddBookRequest, AddMemberRequest, BookResponse, ImportBooksRequest, ImportResponse,
        IssueBookRequest, IssueFormResponse, IssueResponse, MemberResponse, MessageResponse,
        ReturnResponse, TransactionResponse, UpdateBookRequest, UpdateMemberRequest,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

fn message<T>(message: &str, data: T) -> Json<MessageResponse<T>> {
    Json(MessageResponse {
        message: message.to_string(),
        data,
    })
}

// ============================================================================
// Books
// ============================================================================

/// GET /books - 書籍一覧
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = catalog::list_books(&state.service_deps).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// POST /books - 書籍を登録
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddBookRequest>,
) -> Result<(StatusCode, Json<MessageResponse<BookResponse>>), ApiError> {
    let cmd = req.to_command().map_err(ApiError::BadRequest)?;
    let book = catalog::add_book(&state.service_deps, cmd).await?;
    Ok((
        StatusCode::CREATED,
        message("Book added successfully!", BookResponse::from(book)),
    ))
}

/// GET /books/:id - 書籍詳細
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = catalog::get_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(Json(BookResponse::from(book)))
}

/// PUT /books/:id - 書籍を更新（評価は変更しない）
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
    Json(req): Json<UpdateBookRequest>,
) -> Result<Json<MessageResponse<BookResponse>>, ApiError> {
    let cmd = req
        .to_command(BookId::from_uuid(book_id))
        .map_err(ApiError::BadRequest)?;
    let book = catalog::update_book(&state.service_deps, cmd).await?;
    Ok(message("Book updated successfully", BookResponse::from(book)))
}

/// DELETE /books/:id - 書籍を削除
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    catalog::delete_book(&state.service_deps, BookId::from_uuid(book_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Members
// ============================================================================

/// GET /members - 会員一覧
pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = catalog::list_members(&state.service_deps).await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// POST /members - 会員を登録
pub async fn add_member(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<MessageResponse<MemberResponse>>), ApiError> {
    let member = catalog::add_member(&state.service_deps, req.to_command()).await?;
    Ok((
        StatusCode::CREATED,
        message("Member added successfully", MemberResponse::from(member)),
    ))
}

/// GET /members/:id - 会員詳細
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member = catalog::get_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;
    Ok(Json(MemberResponse::from(member)))
}

/// PUT /members/:id - 会員を更新
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
    Json(req): Json<UpdateMemberRequest>,
) -> Result<Json<MessageResponse<MemberResponse>>, ApiError> {
    let cmd = req
        .to_command(MemberId::from_uuid(member_id))
        .map_err(ApiError::BadRequest)?;
    let member = catalog::update_member(&state.service_deps, cmd).await?;
    Ok(message("Member updated successfully", MemberResponse::from(member)))
}

/// DELETE /members/:id - 会員を削除
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    catalog::delete_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Lending
// ============================================================================

/// GET /issue - 貸出フォーム用の会員・書籍一覧
pub async fn issue_form(
    State(state): State<Arc<AppState>>,
) -> Result<Json<IssueFormResponse>, ApiError> {
    let form = catalog::issue_form(&state.service_deps).await?;
    Ok(Json(IssueFormResponse {
        members: form.members.into_iter().map(MemberResponse::from).collect(),
        books: form.books.into_iter().map(BookResponse::from).collect(),
    }))
}

/// POST /issue - 書籍を貸し出す
///
/// 強制されるビジネスルール:
/// - 会員と書籍が存在すること
/// - 会員の債務が500を超えていないこと
/// - 在庫があること
pub async fn issue_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IssueBookRequest>,
) -> Result<(StatusCode, Json<IssueResponse>), ApiError> {
    let transaction = execute_issue_book(&state.service_deps, req.to_command(today())).await?;

    Ok((
        StatusCode::CREATED,
        Json(IssueResponse {
            message: "Book issued successfully".to_string(),
            transaction: TransactionResponse::from(transaction),
        }),
    ))
}

/// POST /transactions/:id/return - 書籍を返却
///
/// 返却後に債務が上限を超えた場合も200を返し、status を "warning" にする。
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<ReturnResponse>, ApiError> {
    let cmd = ReturnBook {
        transaction_id: TransactionId::from_uuid(transaction_id),
        returned_on: today(),
    };

    let receipt = execute_return_book(&state.service_deps, cmd).await?;
    Ok(Json(ReturnResponse::from(receipt)))
}

/// GET /transactions - 会員名・書籍タイトル付きの取引一覧
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let views = catalog::list_transactions(&state.service_deps).await?;
    Ok(Json(views.into_iter().map(TransactionResponse::from).collect()))
}

// ============================================================================
// Import
// ============================================================================

/// POST /import - 外部カタログから書籍を一括取り込み
///
/// 外部APIの失敗は部分的成功として200で返す（status = "partial"）。
pub async fn import_books(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImportBooksRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    let report = execute_import_books(&state.service_deps, req.to_command()).await?;
    Ok(Json(ImportResponse::from(report)))
}
