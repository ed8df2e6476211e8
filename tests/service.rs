use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bookstack::{
    Book, BookPatch, Catalog, CatalogService, ConfirmationGateway, MutationError,
    MutationPayload, Rejection,
};

// --- Deterministic gateway stubs ---

struct AlwaysConfirm;

#[async_trait]
impl ConfirmationGateway for AlwaysConfirm {
    async fn confirm(&self, _payload: &MutationPayload) -> Result<(), Rejection> {
        Ok(())
    }
}

struct AlwaysReject;

#[async_trait]
impl ConfirmationGateway for AlwaysReject {
    async fn confirm(&self, _payload: &MutationPayload) -> Result<(), Rejection> {
        Err(Rejection::new("Server Error: Failed to process request."))
    }
}

/// Counts calls so tests can assert which operations are gated.
struct CountingGateway {
    calls: AtomicUsize,
}

impl CountingGateway {
    fn new() -> Self {
        CountingGateway {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ConfirmationGateway for CountingGateway {
    async fn confirm(&self, _payload: &MutationPayload) -> Result<(), Rejection> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// --- Confirmed path ---

#[tokio::test]
async fn confirmed_adds_all_land_in_the_catalog() {
    let service = CatalogService::new(AlwaysConfirm);
    let books: Vec<Book> = (0..4)
        .map(|i| Book::new(format!("B{}", i), "A", "G", 2000 + i, 3.0))
        .collect();

    for book in &books {
        service.add_book(book.clone()).await.unwrap();
    }

    assert_eq!(service.catalog().len().unwrap(), 4);
    for book in &books {
        assert_eq!(service.catalog().get(book.id).unwrap().as_ref(), Some(book));
    }
}

#[tokio::test]
async fn confirmed_update_patches_the_target() {
    let service = CatalogService::new(AlwaysConfirm);
    let book = Book::new("Dune", "Frank Herbert", "Sci-Fi", 1965, 4.5);
    let id = book.id;
    service.add_book(book).await.unwrap();

    service
        .update_book(id, BookPatch::new().title("Dune Messiah").rating(4.1))
        .await
        .unwrap();

    let updated = service.catalog().get(id).unwrap().unwrap();
    assert_eq!(updated.title, "Dune Messiah");
    assert_eq!(updated.rating, 4.1);
    assert_eq!(updated.author, "Frank Herbert");
}

#[tokio::test]
async fn confirmed_update_against_a_vanished_id_is_a_noop() {
    let service = CatalogService::new(AlwaysConfirm);
    let stranger = Book::new("X", "Y", "Z", 2020, 1.0);

    service
        .update_book(stranger.id, BookPatch::new().title("Nope"))
        .await
        .unwrap();
    assert!(service.catalog().is_empty().unwrap());
}

// --- Rejected path ---

#[tokio::test]
async fn rejected_add_leaves_the_catalog_unchanged() {
    let service = CatalogService::new(AlwaysReject);
    let result = service
        .add_book(Book::new("Dune", "Frank Herbert", "Sci-Fi", 1965, 4.5))
        .await;

    match result {
        Err(MutationError::Rejected(rejection)) => {
            assert_eq!(rejection.reason, "Server Error: Failed to process request.");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(service.catalog().is_empty().unwrap());
}

#[tokio::test]
async fn rejected_update_leaves_the_target_fields_identical() {
    let catalog = Catalog::new();
    let book = Book::new("Dune", "Frank Herbert", "Sci-Fi", 1965, 4.5);
    let id = book.id;
    catalog.add(book.clone()).unwrap();

    let service = CatalogService::with_catalog(catalog, AlwaysReject);
    let result = service
        .update_book(id, BookPatch::new().title("Changed").rating(1.0))
        .await;

    assert!(matches!(result, Err(MutationError::Rejected(_))));
    assert_eq!(service.catalog().get(id).unwrap(), Some(book));
}

// --- Gating ---

#[tokio::test]
async fn delete_bypasses_the_gateway() {
    let gateway = Arc::new(CountingGateway::new());
    let catalog = Catalog::new();
    let book = Book::new("Dune", "Frank Herbert", "Sci-Fi", 1965, 4.5);
    let id = book.id;
    catalog.add(book).unwrap();

    let service = CatalogService::with_catalog(catalog, Arc::clone(&gateway));
    service.delete_book(id).unwrap();

    assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    assert!(service.catalog().is_empty().unwrap());
}

#[tokio::test]
async fn add_and_update_are_each_gated_exactly_once() {
    let gateway = Arc::new(CountingGateway::new());
    let service = CatalogService::new(Arc::clone(&gateway));

    let book = Book::new("Dune", "Frank Herbert", "Sci-Fi", 1965, 4.5);
    let id = book.id;
    service.add_book(book).await.unwrap();
    service
        .update_book(id, BookPatch::new().rating(5.0))
        .await
        .unwrap();

    assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn queries_bypass_the_gateway() {
    let gateway = Arc::new(CountingGateway::new());
    let service = CatalogService::new(Arc::clone(&gateway));
    service
        .add_book(Book::new("Dune", "Frank Herbert", "Sci-Fi", 1965, 4.5))
        .await
        .unwrap();

    service.catalog().find_by_genre("sci-fi").unwrap();
    service.catalog().search("dune").unwrap();
    service.catalog().average_rating().unwrap();
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
}

// --- Notifications ---

#[tokio::test]
async fn listeners_hear_the_added_book_summary() {
    let heard: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let service = CatalogService::new(AlwaysConfirm);
    let sink = Arc::clone(&heard);
    service.on("book_added", move |summary| {
        sink.lock().unwrap().push(summary);
    });
    service
        .add_book(Book::new("Dune", "Frank Herbert", "Sci-Fi", 1965, 4.5))
        .await
        .unwrap();

    // Listener dispatch may run off-thread.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(
        heard.lock().unwrap().as_slice(),
        ["Dune by Frank Herbert, Genre: Sci-Fi, Published: 1965"]
    );
}

#[tokio::test]
async fn listeners_hear_the_rejection_reason() {
    let heard: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let service = CatalogService::new(AlwaysReject);
    let sink = Arc::clone(&heard);
    service.on("mutation_rejected", move |reason| {
        sink.lock().unwrap().push(reason);
    });
    let _ = service.add_book(Book::new("X", "Y", "Z", 2020, 1.0)).await;

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(
        heard.lock().unwrap().as_slice(),
        ["Server Error: Failed to process request."]
    );
}
