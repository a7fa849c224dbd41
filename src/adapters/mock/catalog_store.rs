use crate::domain::{
    Book, BookId, Member, MemberId, Transaction, TransactionId, TransactionView,
};
use crate::ports::book_repository::{BookRepository, DeleteOutcome};
use crate::ports::member_repository::MemberRepository;
use crate::ports::transaction_repository::TransactionRepository;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書き込み失敗が有効な間、すべての書き込みが返すエラー
#[derive(Debug, Error)]
#[error("simulated store write failure")]
pub struct SimulatedWriteFailure;

#[derive(Default)]
struct Tables {
    books: HashMap<BookId, Book>,
    members: HashMap<MemberId, Member>,
    transactions: HashMap<TransactionId, Transaction>,
    /// 取引の作成順（一覧の並び順の決定に使う）
    transaction_order: Vec<TransactionId>,
}

/// カタログストアポートのインメモリ実装
///
/// 1つのインスタンスで BookRepository・MemberRepository・TransactionRepository を
/// 実装する。テーブルは単一のMutexで保護され、各書き込みは全件成功か全件失敗となる。
/// 永続化失敗の経路をテストするため、書き込みを失敗させることができる。
pub struct CatalogStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// 以降の書き込みを失敗させる（false で元に戻す）
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// テスト用に書籍を登録
    pub fn add_book(&self, book: Book) {
        self.tables.lock().unwrap().books.insert(book.book_id, book);
    }

    /// テスト用に会員を登録
    pub fn add_member(&self, member: Member) {
        self.tables
            .lock()
            .unwrap()
            .members
            .insert(member.member_id, member);
    }

    pub fn book(&self, book_id: BookId) -> Option<Book> {
        self.tables.lock().unwrap().books.get(&book_id).cloned()
    }

    pub fn member(&self, member_id: MemberId) -> Option<Member> {
        self.tables.lock().unwrap().members.get(&member_id).cloned()
    }

    pub fn all_books(&self) -> Vec<Book> {
        self.tables.lock().unwrap().books.values().cloned().collect()
    }

    /// 作成順の全取引
    pub fn all_transactions(&self) -> Vec<Transaction> {
        let tables = self.tables.lock().unwrap();
        tables
            .transaction_order
            .iter()
            .filter_map(|id| tables.transactions.get(id).cloned())
            .collect()
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Box::new(SimulatedWriteFailure));
        }
        Ok(())
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookRepository for CatalogStore {
    async fn insert(&self, book: Book) -> Result<()> {
        self.check_writable()?;
        self.add_book(book);
        Ok(())
    }

    async fn insert_many(&self, books: Vec<Book>) -> Result<()> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        for book in books {
            tables.books.insert(book.book_id, book);
        }
        Ok(())
    }

    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        Ok(self.book(book_id))
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let mut books = self.all_books();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn update(&self, book: Book) -> Result<bool> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        match tables.books.get_mut(&book.book_id) {
            Some(existing) => {
                *existing = book;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, book_id: BookId) -> Result<DeleteOutcome> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.transactions.values().any(|t| t.book_id == book_id) {
            return Ok(DeleteOutcome::Referenced);
        }
        Ok(match tables.books.remove(&book_id) {
            Some(_) => DeleteOutcome::Deleted,
            None => DeleteOutcome::NotFound,
        })
    }
}

#[async_trait]
impl MemberRepository for CatalogStore {
    async fn insert(&self, member: Member) -> Result<()> {
        self.check_writable()?;
        self.add_member(member);
        Ok(())
    }

    async fn get_by_id(&self, member_id: MemberId) -> Result<Option<Member>> {
        Ok(self.member(member_id))
    }

    async fn list(&self) -> Result<Vec<Member>> {
        let mut members: Vec<Member> = self
            .tables
            .lock()
            .unwrap()
            .members
            .values()
            .cloned()
            .collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(members)
    }

    async fn update(&self, member: Member) -> Result<bool> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        match tables.members.get_mut(&member.member_id) {
            Some(existing) => {
                *existing = member;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, member_id: MemberId) -> Result<DeleteOutcome> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.transactions.values().any(|t| t.member_id == member_id) {
            return Ok(DeleteOutcome::Referenced);
        }
        Ok(match tables.members.remove(&member_id) {
            Some(_) => DeleteOutcome::Deleted,
            None => DeleteOutcome::NotFound,
        })
    }
}

#[async_trait]
impl TransactionRepository for CatalogStore {
    async fn get_by_id(&self, transaction_id: TransactionId) -> Result<Option<Transaction>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .transactions
            .get(&transaction_id)
            .cloned())
    }

    async fn list_views(&self) -> Result<Vec<TransactionView>> {
        let tables = self.tables.lock().unwrap();
        let mut views: Vec<TransactionView> = tables
            .transaction_order
            .iter()
            .rev()
            .filter_map(|id| tables.transactions.get(id))
            .filter_map(|transaction| {
                let member = tables.members.get(&transaction.member_id)?;
                let book = tables.books.get(&transaction.book_id)?;
                Some(TransactionView {
                    transaction: transaction.clone(),
                    member_name: member.name.clone(),
                    book_title: book.title.clone(),
                })
            })
            .collect();
        // 安定ソートのため、同じ貸出日では新しく作成された取引が先になる
        views.sort_by(|a, b| b.transaction.issue_date.cmp(&a.transaction.issue_date));
        Ok(views)
    }

    async fn commit_issue(&self, book: &Book, transaction: &Transaction) -> Result<()> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        if !tables.books.contains_key(&book.book_id) {
            return Err(format!("book {} disappeared while issuing", book.book_id.value()).into());
        }
        tables.books.insert(book.book_id, book.clone());
        tables
            .transactions
            .insert(transaction.transaction_id, transaction.clone());
        tables.transaction_order.push(transaction.transaction_id);
        Ok(())
    }

    async fn commit_return(&self, transaction: &Transaction, member: &Member) -> Result<bool> {
        self.check_writable()?;
        let mut tables = self.tables.lock().unwrap();
        let is_open = tables
            .transactions
            .get(&transaction.transaction_id)
            .is_some_and(Transaction::is_open);
        if !is_open {
            return Ok(false);
        }
        tables
            .transactions
            .insert(transaction.transaction_id, transaction.clone());
        tables.members.insert(member.member_id, member.clone());
        Ok(true)
    }
}
