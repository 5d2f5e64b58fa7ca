use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use error_stack::Report;
use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, IssueQuery, RequestQuery};
use kernel::interface::update::{BookModifier, IssueModifier, RequestModifier};
use kernel::prelude::entity::{
    Book, CopyCount, ExpectedReturnAt, Isbn, Issue, IssueId, IssueRequest, LibraryId, RequestId,
    RequestState, SelectLimit, SelectOffset, UserId,
};
use kernel::KernelError;

/// Process-local store with the same transaction semantics as Postgres.
/// Transactions are serialized: each one holds the whole store until it ends.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Clone, Default)]
pub struct Tables {
    books: HashMap<(LibraryId, Isbn), Book>,
    issues: HashMap<IssueId, Issue>,
    // insertion ordered, so requests raised within the same instant keep their order
    requests: Vec<IssueRequest>,
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = self.tables.clone().lock_owned().await;
        let snapshot = guard.clone();
        Ok(InMemoryTransaction {
            guard,
            snapshot: Some(snapshot),
        })
    }
}

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    snapshot: Option<Tables>,
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(mut self) -> error_stack::Result<(), KernelError> {
        self.snapshot = None;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.guard = snapshot;
        }
    }
}

impl Deref for InMemoryTransaction {
    type Target = Tables;
    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl DerefMut for InMemoryTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

pub struct InMemoryBookRepository;

#[async_trait::async_trait]
impl BookQuery for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_isbn(
        &self,
        con: &mut InMemoryTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.books.get(&(*lib_id, isbn.clone())).cloned())
    }

    async fn find_by_isbn_for_update(
        &self,
        con: &mut InMemoryTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        self.find_by_isbn(con, lib_id, isbn).await
    }
}

fn book_not_found(isbn: &Isbn) -> Report<KernelError> {
    Report::new(KernelError::NotFound)
        .attach_printable(format!("book {} is not in the catalog", isbn.as_ref()))
}

#[async_trait::async_trait]
impl BookModifier for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<Book, KernelError> {
        let key = (*book.lib_id(), book.isbn().clone());
        let stored = match con.books.get(&key) {
            Some(stored) => stored
                .clone()
                .add_copies(CopyCount::new(*book.total_copies().as_ref())?)?,
            None => book.clone(),
        };
        con.books.insert(key, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        let stored = con
            .books
            .get_mut(&(*book.lib_id(), book.isbn().clone()))
            .ok_or_else(|| book_not_found(book.isbn()))?;
        *stored = book.clone();
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<(), KernelError> {
        con.books
            .remove(&(*lib_id, isbn.clone()))
            .map(|_| ())
            .ok_or_else(|| book_not_found(isbn))
    }

    async fn reserve_copy(
        &self,
        con: &mut InMemoryTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let Some(stored) = con.books.get_mut(&(*lib_id, isbn.clone())) else {
            return Ok(None);
        };
        match stored.clone().reserve_copy() {
            Ok(book) => {
                *stored = book.clone();
                Ok(Some(book))
            }
            Err(_) => Ok(None),
        }
    }

    async fn release_copy(
        &self,
        con: &mut InMemoryTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let Some(stored) = con.books.get_mut(&(*lib_id, isbn.clone())) else {
            return Ok(None);
        };
        match stored.clone().release_copy() {
            Ok(book) => {
                *stored = book.clone();
                Ok(Some(book))
            }
            Err(_) => Ok(None),
        }
    }
}

pub struct InMemoryIssueRepository;

impl InMemoryIssueRepository {
    fn outstanding<'a>(
        tables: &'a Tables,
        lib_id: &'a LibraryId,
        isbn: &'a Isbn,
    ) -> impl Iterator<Item = &'a Issue> + 'a {
        tables.issues.values().filter(move |issue| {
            issue.is_outstanding() && issue.lib_id() == lib_id && issue.isbn() == isbn
        })
    }
}

#[async_trait::async_trait]
impl IssueQuery for InMemoryIssueRepository {
    type Transaction = InMemoryTransaction;

    async fn find_outstanding(
        &self,
        con: &mut InMemoryTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
        reader_id: &UserId,
    ) -> error_stack::Result<Option<Issue>, KernelError> {
        Ok(Self::outstanding(con, lib_id, isbn)
            .find(|issue| issue.reader_id() == reader_id)
            .cloned())
    }

    async fn find_outstanding_for_update(
        &self,
        con: &mut InMemoryTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
        reader_id: &UserId,
    ) -> error_stack::Result<Option<Issue>, KernelError> {
        self.find_outstanding(con, lib_id, isbn, reader_id).await
    }

    async fn find_by_reader(
        &self,
        con: &mut InMemoryTransaction,
        lib_id: &LibraryId,
        reader_id: &UserId,
    ) -> error_stack::Result<Vec<Issue>, KernelError> {
        let mut issues = con
            .issues
            .values()
            .filter(|issue| issue.lib_id() == lib_id && issue.reader_id() == reader_id)
            .cloned()
            .collect::<Vec<_>>();
        issues.sort_by_key(|issue| std::cmp::Reverse(*issue.issued_at().as_ref()));
        Ok(issues)
    }

    async fn find_earliest_return(
        &self,
        con: &mut InMemoryTransaction,
        lib_id: &LibraryId,
        isbn: &Isbn,
    ) -> error_stack::Result<Option<ExpectedReturnAt>, KernelError> {
        Ok(Self::outstanding(con, lib_id, isbn)
            .map(|issue| *issue.expected_return_at())
            .min_by_key(|at| *at.as_ref()))
    }
}

#[async_trait::async_trait]
impl IssueModifier for InMemoryIssueRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        issue: &Issue,
    ) -> error_stack::Result<(), KernelError> {
        let duplicated = issue.is_outstanding()
            && Self::outstanding(con, issue.lib_id(), issue.isbn())
                .any(|other| other.reader_id() == issue.reader_id());
        if duplicated || con.issues.contains_key(issue.id()) {
            return Err(Report::new(KernelError::Conflict).attach_printable(format!(
                "reader {} already holds {}",
                issue.reader_id().as_ref(),
                issue.isbn().as_ref()
            )));
        }
        con.issues.insert(*issue.id(), issue.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        issue: &Issue,
    ) -> error_stack::Result<(), KernelError> {
        let stored = con.issues.get_mut(issue.id()).ok_or_else(|| {
            Report::new(KernelError::NotFound)
                .attach_printable(format!("issue {} does not exist", issue.id().as_ref()))
        })?;
        *stored = issue.clone();
        Ok(())
    }
}

pub struct InMemoryRequestRepository;

#[async_trait::async_trait]
impl RequestQuery for InMemoryRequestRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id_for_update(
        &self,
        con: &mut InMemoryTransaction,
        id: &RequestId,
    ) -> error_stack::Result<Option<IssueRequest>, KernelError> {
        Ok(con
            .requests
            .iter()
            .find(|request| request.id() == id)
            .cloned())
    }

    async fn find_pending(
        &self,
        con: &mut InMemoryTransaction,
        lib_id: &LibraryId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<IssueRequest>, KernelError> {
        let mut pending = con
            .requests
            .iter()
            .filter(|request| {
                request.lib_id() == lib_id && request.state() == &RequestState::Pending
            })
            .cloned()
            .collect::<Vec<_>>();
        pending.sort_by_key(|request| *request.requested_at().as_ref());
        Ok(pending
            .into_iter()
            .skip(usize::try_from(*offset.as_ref()).unwrap_or_default())
            .take(usize::try_from(*limit.as_ref()).unwrap_or_default())
            .collect())
    }
}

#[async_trait::async_trait]
impl RequestModifier for InMemoryRequestRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        request: &IssueRequest,
    ) -> error_stack::Result<(), KernelError> {
        if con.requests.iter().any(|stored| stored.id() == request.id()) {
            return Err(Report::new(KernelError::Conflict)
                .attach_printable(format!("request {} already exists", request.id().as_ref())));
        }
        con.requests.push(request.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        request: &IssueRequest,
    ) -> error_stack::Result<(), KernelError> {
        let stored = con
            .requests
            .iter_mut()
            .find(|stored| stored.id() == request.id())
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("request {} does not exist", request.id().as_ref()))
            })?;
        *stored = request.clone();
        Ok(())
    }
}
