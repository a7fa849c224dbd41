use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, add_book, add_member, delete_book, delete_member, get_book, get_member,
    import_books, issue_book, issue_form, list_books, list_members, list_transactions,
    return_book, update_book, update_member,
};

/// 全エンドポイントを持つAPIルーターを作成
///
/// - /books, /members: CRUD
/// - GET /issue: 貸出フォーム用の会員・書籍一覧
/// - POST /issue: 書籍を貸し出す
/// - POST /transactions/:id/return: 書籍を返却
/// - GET /transactions: 会員・書籍を結合した取引一覧
/// - POST /import: 外部カタログからの一括取り込み
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // ヘルスチェック
        .route("/health", get(health_check))
        .route("/books", get(list_books).post(add_book))
        .route(
            "/books/:id",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/members", get(list_members).post(add_member))
        .route(
            "/members/:id",
            get(get_member).put(update_member).delete(delete_member),
        )
        .route("/issue", get(issue_form).post(issue_book))
        .route("/transactions", get(list_transactions))
        .route("/transactions/:id/return", post(return_book))
        .route("/import", post(import_books))
        // トレーシングミドルウェア
        .layer(TraceLayer::new_for_http())
        // アプリケーション状態
        .with_state(state)
}

/// ヘルスチェック
async fn health_check() -> &'static str {
    "OK"
}
