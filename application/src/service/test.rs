use error_stack::Report;
use time::Duration;

use driver::database::{
    InMemoryBookRepository, InMemoryDatabase, InMemoryIssueRepository, InMemoryRequestRepository,
    InMemoryTransaction,
};
use kernel::interface::config::DependOnLoanPolicy;
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnBookQuery, DependOnIssueQuery, DependOnRequestQuery};
use kernel::interface::update::{
    BookModifier, DependOnBookModifier, DependOnIssueModifier, DependOnRequestModifier,
    IssueModifier,
};
use kernel::prelude::entity::{Actor, Isbn, Issue, LibraryId, LoanPolicy, Role, UserId};
use kernel::KernelError;

use crate::service::{
    AddCopiesService, ApproveRequestService, GetBookService, ListIssuesService,
    ListRequestsService, RaiseRequestService, RejectRequestService, RemoveCopiesService,
    ReturnBookService, UpdateBookService,
};
use crate::transfer::{
    AddCopiesDto, BookDto, DecideRequestDto, GetBookDto, ListIssuesDto, ListRequestsDto,
    RaiseRequestDto, RemoveCopiesDto, RequestDto, ReturnBookDto, UpdateBookDto,
};

#[derive(Clone, Default)]
struct TestModule {
    db: InMemoryDatabase,
    policy: LoanPolicy,
    issues: LedgerStore,
}

/// Issue store that can be told to refuse new loans.
#[derive(Clone, Default)]
struct LedgerStore {
    refuse_loans: bool,
}

#[async_trait::async_trait]
impl IssueModifier for LedgerStore {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        issue: &Issue,
    ) -> error_stack::Result<(), KernelError> {
        if self.refuse_loans {
            return Err(Report::new(KernelError::Persistence).attach_printable("disk is full"));
        }
        InMemoryIssueRepository.create(con, issue).await
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        issue: &Issue,
    ) -> error_stack::Result<(), KernelError> {
        InMemoryIssueRepository.update(con, issue).await
    }
}

impl DependOnDatabaseConnection for TestModule {
    type DatabaseConnection = InMemoryDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.db
    }
}

impl DependOnLoanPolicy for TestModule {
    fn loan_policy(&self) -> &LoanPolicy {
        &self.policy
    }
}

impl DependOnBookQuery for TestModule {
    type BookQuery = InMemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &InMemoryBookRepository
    }
}

impl DependOnBookModifier for TestModule {
    type BookModifier = InMemoryBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &InMemoryBookRepository
    }
}

impl DependOnIssueQuery for TestModule {
    type IssueQuery = InMemoryIssueRepository;
    fn issue_query(&self) -> &Self::IssueQuery {
        &InMemoryIssueRepository
    }
}

impl DependOnIssueModifier for TestModule {
    type IssueModifier = LedgerStore;
    fn issue_modifier(&self) -> &Self::IssueModifier {
        &self.issues
    }
}

impl DependOnRequestQuery for TestModule {
    type RequestQuery = InMemoryRequestRepository;
    fn request_query(&self) -> &Self::RequestQuery {
        &InMemoryRequestRepository
    }
}

impl DependOnRequestModifier for TestModule {
    type RequestModifier = InMemoryRequestRepository;
    fn request_modifier(&self) -> &Self::RequestModifier {
        &InMemoryRequestRepository
    }
}

const LIBRARY: i64 = 1;

fn admin() -> Actor {
    Actor::new(UserId::new(100), Role::LibraryAdmin, LibraryId::new(LIBRARY))
}

fn reader(id: i64) -> Actor {
    Actor::new(UserId::new(id), Role::Reader, LibraryId::new(LIBRARY))
}

fn add(isbn: &str, copies: i32) -> AddCopiesDto {
    AddCopiesDto {
        isbn: isbn.to_string(),
        copies,
        title: Some(format!("title of {isbn}")),
        authors: Some("author".to_string()),
        publisher: Some("publisher".to_string()),
        version: Some("1st".to_string()),
    }
}

async fn get(module: &TestModule, isbn: &str) -> Option<BookDto> {
    module
        .get_book(
            &admin(),
            GetBookDto {
                isbn: isbn.to_string(),
            },
        )
        .await
        .unwrap()
}

async fn raise(module: &TestModule, reader_id: i64, isbn: &str) -> RequestDto {
    module
        .raise_request(
            &reader(reader_id),
            RaiseRequestDto {
                isbn: isbn.to_string(),
            },
        )
        .await
        .unwrap()
}

fn decide(request: &RequestDto) -> DecideRequestDto {
    DecideRequestDto { id: request.id }
}

#[tokio::test]
async fn adding_copies_to_a_new_book_catalogs_it() {
    let module = TestModule::default();
    let book = module.add_copies(&admin(), add("X", 3)).await.unwrap();
    assert_eq!(book.total_copies, 3);
    assert_eq!(book.available_copies, 3);
    assert_eq!(get(&module, "X").await, Some(book));
}

#[tokio::test]
async fn adding_copies_to_a_known_book_keeps_its_metadata() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 3)).await.unwrap();

    let mut more = add("X", 2);
    more.title = Some("ignored".to_string());
    let book = module.add_copies(&admin(), more).await.unwrap();
    assert_eq!(book.title, "title of X");
    assert_eq!(book.total_copies, 5);
    assert_eq!(book.available_copies, 5);
}

#[tokio::test]
async fn catalog_input_is_validated() {
    let module = TestModule::default();

    let report = module.add_copies(&admin(), add("X", 0)).await.unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Validation);

    let mut untitled = add("X", 1);
    untitled.title = Some("  ".to_string());
    let report = module.add_copies(&admin(), untitled).await.unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Validation);
    assert_eq!(get(&module, "X").await, None);

    let report = module
        .update_book(
            &admin(),
            UpdateBookDto {
                isbn: "X".to_string(),
                title: None,
                authors: None,
                publisher: None,
                version: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Validation);

    let report = module
        .update_book(
            &admin(),
            UpdateBookDto {
                isbn: "X".to_string(),
                title: Some("new".to_string()),
                authors: None,
                publisher: None,
                version: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::NotFound);
}

#[tokio::test]
async fn metadata_update_leaves_counters_alone() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 2)).await.unwrap();
    let book = module
        .update_book(
            &admin(),
            UpdateBookDto {
                isbn: "X".to_string(),
                title: None,
                authors: Some("someone else".to_string()),
                publisher: None,
                version: Some("2nd".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(book.title, "title of X");
    assert_eq!(book.authors, "someone else");
    assert_eq!(book.version, "2nd");
    assert_eq!(book.total_copies, 2);
    assert_eq!(book.available_copies, 2);
}

#[tokio::test]
async fn removing_more_than_available_is_refused() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 3)).await.unwrap();

    let report = module
        .remove_copies(
            &admin(),
            RemoveCopiesDto {
                isbn: "X".to_string(),
                copies: 5,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Validation);
    assert_eq!(get(&module, "X").await.unwrap().available_copies, 3);

    let report = module
        .remove_copies(
            &admin(),
            RemoveCopiesDto {
                isbn: "Y".to_string(),
                copies: 1,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::NotFound);
}

#[tokio::test]
async fn removing_every_copy_drops_the_book() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 3)).await.unwrap();

    let left = module
        .remove_copies(
            &admin(),
            RemoveCopiesDto {
                isbn: "X".to_string(),
                copies: 1,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(left.total_copies, 2);

    let left = module
        .remove_copies(
            &admin(),
            RemoveCopiesDto {
                isbn: "X".to_string(),
                copies: 2,
            },
        )
        .await
        .unwrap();
    assert_eq!(left, None);
    assert_eq!(get(&module, "X").await, None);
}

#[tokio::test]
async fn copies_on_loan_cannot_be_removed() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 1)).await.unwrap();
    let request = raise(&module, 7, "X").await;
    module
        .approve_request(&admin(), decide(&request))
        .await
        .unwrap();

    let report = module
        .remove_copies(
            &admin(),
            RemoveCopiesDto {
                isbn: "X".to_string(),
                copies: 1,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Validation);
}

#[tokio::test]
async fn request_for_an_exhausted_book_is_unavailable() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 1)).await.unwrap();
    let request = raise(&module, 7, "X").await;
    module
        .approve_request(&admin(), decide(&request))
        .await
        .unwrap();

    let report = module
        .raise_request(
            &reader(8),
            RaiseRequestDto {
                isbn: "X".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Unavailable);
}

#[tokio::test]
async fn request_for_a_held_book_is_a_conflict() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 2)).await.unwrap();
    let request = raise(&module, 7, "X").await;
    module
        .approve_request(&admin(), decide(&request))
        .await
        .unwrap();

    let report = module
        .raise_request(
            &reader(7),
            RaiseRequestDto {
                isbn: "X".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Conflict);
}

#[tokio::test]
async fn request_for_an_unknown_book_is_not_found() {
    let module = TestModule::default();
    let report = module
        .raise_request(
            &reader(7),
            RaiseRequestDto {
                isbn: "nothing".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::NotFound);
}

#[tokio::test]
async fn approve_then_return_restores_the_shelf() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 1)).await.unwrap();
    let request = raise(&module, 7, "X").await;
    assert_eq!(request.status, "Pending");

    let issue = module
        .approve_request(&admin(), decide(&request))
        .await
        .unwrap();
    assert_eq!(issue.status, "Issued");
    assert_eq!(issue.reader_id, 7);
    assert_eq!(issue.expected_return_at - issue.issued_at, Duration::days(14));

    let book = get(&module, "X").await.unwrap();
    assert_eq!(book.available_copies, 0);
    assert_eq!(book.earliest_return, Some(issue.expected_return_at));

    let pending = module
        .list_requests(&admin(), ListRequestsDto::default())
        .await
        .unwrap();
    assert!(pending.is_empty());

    let returned = module
        .return_book(
            &reader(7),
            ReturnBookDto {
                isbn: "X".to_string(),
                reader_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(returned.id, issue.id);
    assert_eq!(returned.status, "Returned");
    assert!(returned.returned_at.is_some());

    let book = get(&module, "X").await.unwrap();
    assert_eq!(book.available_copies, 1);
    assert_eq!(book.earliest_return, None);

    let history = module
        .list_issues(&reader(7), ListIssuesDto { reader_id: None })
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, "Returned");
}

#[tokio::test]
async fn returning_twice_is_not_found() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 1)).await.unwrap();
    let request = raise(&module, 7, "X").await;
    module
        .approve_request(&admin(), decide(&request))
        .await
        .unwrap();

    let dto = || ReturnBookDto {
        isbn: "X".to_string(),
        reader_id: Some(7),
    };
    module.return_book(&admin(), dto()).await.unwrap();
    let report = module.return_book(&admin(), dto()).await.unwrap_err();
    assert_eq!(report.current_context(), &KernelError::NotFound);
    assert_eq!(get(&module, "X").await.unwrap().available_copies, 1);
}

#[tokio::test]
async fn failed_lending_keeps_the_copy_and_the_request() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 1)).await.unwrap();
    let request = raise(&module, 7, "X").await;

    let broken = TestModule {
        issues: LedgerStore { refuse_loans: true },
        ..module.clone()
    };
    let report = broken
        .approve_request(&admin(), decide(&request))
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Persistence);

    assert_eq!(get(&module, "X").await.unwrap().available_copies, 1);
    let pending = module
        .list_requests(&admin(), ListRequestsDto::default())
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, "Pending");
    let issues = module
        .list_issues(&admin(), ListIssuesDto { reader_id: Some(7) })
        .await
        .unwrap();
    assert!(issues.is_empty());

    module
        .approve_request(&admin(), decide(&request))
        .await
        .unwrap();
    assert_eq!(get(&module, "X").await.unwrap().available_copies, 0);
}

#[tokio::test]
async fn return_onto_a_full_shelf_is_undone() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 1)).await.unwrap();
    let request = raise(&module, 7, "X").await;
    module
        .approve_request(&admin(), decide(&request))
        .await
        .unwrap();

    // the counter drifted: the copy is already back on the shelf
    let mut con = module.db.transact().await.unwrap();
    InMemoryBookRepository
        .release_copy(&mut con, &LibraryId::new(LIBRARY), &Isbn::new("X"))
        .await
        .unwrap()
        .unwrap();
    con.commit().await.unwrap();

    let report = module
        .return_book(
            &admin(),
            ReturnBookDto {
                isbn: "X".to_string(),
                reader_id: Some(7),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Conflict);

    assert_eq!(get(&module, "X").await.unwrap().available_copies, 1);
    let issues = module
        .list_issues(&admin(), ListIssuesDto { reader_id: Some(7) })
        .await
        .unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].status, "Issued");
    assert!(issues[0].returned_at.is_none());
}

#[tokio::test]
async fn decided_requests_never_change_again() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 3)).await.unwrap();

    let approved = raise(&module, 7, "X").await;
    module
        .approve_request(&admin(), decide(&approved))
        .await
        .unwrap();
    let report = module
        .approve_request(&admin(), decide(&approved))
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Conflict);
    let report = module
        .reject_request(&admin(), decide(&approved))
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Conflict);
    assert_eq!(get(&module, "X").await.unwrap().available_copies, 2);

    let rejected = raise(&module, 8, "X").await;
    let decided = module
        .reject_request(&admin(), decide(&rejected))
        .await
        .unwrap();
    assert_eq!(decided.status, "Rejected");
    assert!(decided.decided_at.is_some());
    let report = module
        .approve_request(&admin(), decide(&rejected))
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Conflict);
    assert_eq!(get(&module, "X").await.unwrap().available_copies, 2);
}

#[tokio::test]
async fn unknown_request_is_not_found() {
    let module = TestModule::default();
    let report = module
        .approve_request(
            &admin(),
            DecideRequestDto {
                id: uuid::Uuid::new_v4(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::NotFound);
}

#[tokio::test]
async fn concurrent_approvals_share_the_last_copy() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 1)).await.unwrap();
    let first = raise(&module, 7, "X").await;
    let second = raise(&module, 8, "X").await;

    let admin = admin();
    let (a, b) = tokio::join!(
        module.approve_request(&admin, decide(&first)),
        module.approve_request(&admin, decide(&second)),
    );
    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    let refused = outcomes
        .iter()
        .find_map(|outcome| outcome.as_ref().err())
        .unwrap();
    assert_eq!(refused.current_context(), &KernelError::Unavailable);
    assert_eq!(get(&module, "X").await.unwrap().available_copies, 0);

    let pending = module
        .list_requests(&admin, ListRequestsDto::default())
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn duplicate_pending_requests_are_accepted_but_approved_once() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 2)).await.unwrap();
    let first = raise(&module, 7, "X").await;
    let second = raise(&module, 7, "X").await;

    let pending = module
        .list_requests(&admin(), ListRequestsDto::default())
        .await
        .unwrap();
    assert_eq!(
        pending.iter().map(|request| request.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );

    module
        .approve_request(&admin(), decide(&first))
        .await
        .unwrap();
    let report = module
        .approve_request(&admin(), decide(&second))
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Conflict);
    assert_eq!(get(&module, "X").await.unwrap().available_copies, 1);
}

#[tokio::test]
async fn pending_requests_are_paged() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 1)).await.unwrap();
    for reader_id in 1..=3 {
        raise(&module, reader_id, "X").await;
    }
    let page = module
        .list_requests(
            &admin(),
            ListRequestsDto {
                limit: Some(2),
                offset: Some(1),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        page.iter().map(|request| request.reader_id).collect::<Vec<_>>(),
        vec![2, 3]
    );
}

#[tokio::test]
async fn actors_stay_within_their_role_and_library() {
    let module = TestModule::default();
    module.add_copies(&admin(), add("X", 1)).await.unwrap();
    let request = raise(&module, 7, "X").await;

    let report = module.add_copies(&reader(7), add("X", 1)).await.unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Forbidden);

    let report = module
        .approve_request(&reader(7), decide(&request))
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Forbidden);

    let stranger = Actor::new(UserId::new(200), Role::LibraryAdmin, LibraryId::new(2));
    let report = module
        .approve_request(&stranger, decide(&request))
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Forbidden);

    let owner = Actor::new(UserId::new(300), Role::Owner, LibraryId::new(LIBRARY));
    let report = module
        .raise_request(
            &owner,
            RaiseRequestDto {
                isbn: "X".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Forbidden);

    module
        .approve_request(&admin(), decide(&request))
        .await
        .unwrap();
    let report = module
        .return_book(
            &reader(8),
            ReturnBookDto {
                isbn: "X".to_string(),
                reader_id: Some(7),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Forbidden);

    let report = module
        .list_issues(&reader(8), ListIssuesDto { reader_id: Some(7) })
        .await
        .unwrap_err();
    assert_eq!(report.current_context(), &KernelError::Forbidden);

    let history = module
        .list_issues(&admin(), ListIssuesDto { reader_id: Some(7) })
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}
