use std::sync::Arc;

use async_trait::async_trait;
use library_app::modules::catalog::error::CatalogError;
use library_app::modules::catalog::forms::RawFields;
use library_app::modules::catalog::models::{Book, BookStatus, BOOKS, GENRES};
use library_app::modules::catalog::pages::Outcome;
use library_app::modules::catalog::service::CatalogService;
use library_db::{Document, DocumentStore, Filter, MemoryStore, Sort, StoreError};

fn service() -> CatalogService {
    CatalogService::new(Arc::new(MemoryStore::new()))
}

fn fields(pairs: &[(&str, &str)]) -> RawFields {
    RawFields::from_pairs(pairs.iter().copied())
}

/// Id at the end of a redirect such as `/catalog/genre/{id}`.
fn redirected_id<T>(outcome: &Outcome<T>) -> String {
    let target = outcome.redirect_target().expect("expected a redirect");
    target.rsplit('/').next().unwrap().to_string()
}

async fn create_author(service: &CatalogService, first: &str, family: &str) -> String {
    let outcome = service
        .author_create(&fields(&[("first_name", first), ("family_name", family)]))
        .await
        .unwrap();
    redirected_id(&outcome)
}

async fn create_genre(service: &CatalogService, name: &str) -> String {
    let outcome = service.genre_create(&fields(&[("name", name)])).await.unwrap();
    redirected_id(&outcome)
}

async fn create_book(
    service: &CatalogService,
    title: &str,
    author: &str,
    genres: &[&str],
) -> String {
    let mut pairs = vec![
        ("title", title),
        ("author", author),
        ("summary", "A summary."),
        ("isbn", "9780000000000"),
    ];
    pairs.extend(genres.iter().map(|g| ("genre", *g)));
    let outcome = service.book_create(&fields(&pairs)).await.unwrap();
    redirected_id(&outcome)
}

#[tokio::test]
async fn unreferenced_author_and_genre_are_deleted() {
    let service = service();
    let author = create_author(&service, "Jane", "Austen").await;
    let genre = create_genre(&service, "Romance").await;

    let outcome = service.author_delete(&author).await.unwrap();
    assert_eq!(outcome.redirect_target(), Some("/catalog/authors"));
    assert!(matches!(
        service.author_detail(&author).await,
        Err(CatalogError::NotFound(_))
    ));

    let outcome = service.genre_delete(&genre).await.unwrap();
    assert_eq!(outcome.redirect_target(), Some("/catalog/genres"));
    assert!(matches!(
        service.genre_detail(&genre).await,
        Err(CatalogError::NotFound(_))
    ));
}

#[tokio::test]
async fn referenced_author_and_genre_are_kept_with_blocking_books() {
    let service = service();
    let author = create_author(&service, "Isaac", "Asimov").await;
    let genre = create_genre(&service, "Science Fiction").await;
    create_book(&service, "Foundation", &author, &[genre.as_str()]).await;

    let outcome = service.author_delete(&author).await.unwrap();
    let page = outcome.page().expect("blocked delete re-renders");
    assert_eq!(page.author_books.len(), 1);
    assert_eq!(page.author_books[0].title, "Foundation");
    assert!(service.author_detail(&author).await.is_ok());

    let outcome = service.genre_delete(&genre).await.unwrap();
    let page = outcome.page().expect("blocked delete re-renders");
    assert_eq!(page.genre_books.len(), 1);
    assert!(service.genre_detail(&genre).await.is_ok());
}

#[tokio::test]
async fn created_copy_reads_back_unchanged() {
    let service = service();
    let author = create_author(&service, "Frank", "Herbert").await;
    let book = create_book(&service, "Dune", &author, &[]).await;

    let outcome = service
        .book_instance_create(&fields(&[
            ("book", book.as_str()),
            ("imprint", "Chilton Books, 1965"),
            ("status", "Loaned"),
            ("due_back", "2026-10-15"),
        ]))
        .await
        .unwrap();
    let copy_id = redirected_id(&outcome);

    let page = service.book_instance_detail(&copy_id).await.unwrap();
    assert_eq!(page.title, "Copy: Dune");
    assert_eq!(page.bookinstance.imprint, "Chilton Books, 1965");
    assert_eq!(page.bookinstance.status, BookStatus::Loaned);
    assert_eq!(page.bookinstance.due_back_input, "2026-10-15");
    assert_eq!(page.bookinstance.due_back_formatted, "Oct 15, 2026");
    assert_eq!(page.bookinstance.book_id, book);
}

#[tokio::test]
async fn duplicate_genre_redirects_to_the_first() {
    let service = service();
    let first = service
        .genre_create(&fields(&[("name", "Fantasy")]))
        .await
        .unwrap();
    let second = service
        .genre_create(&fields(&[("name", "  Fantasy ")]))
        .await
        .unwrap();

    assert_eq!(first.redirect_target(), second.redirect_target());
    let count = service
        .repository()
        .count(GENRES, Filter::eq("name", "Fantasy"))
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn book_update_keeps_its_id() {
    let service = service();
    let author = create_author(&service, "Ursula", "Le Guin").await;
    let book = create_book(&service, "A Wizard of Earthsea", &author, &[]).await;

    let outcome = service
        .book_update(
            &book,
            &fields(&[
                ("title", "The Tombs of Atuan"),
                ("author", author.as_str()),
                ("summary", "Second book."),
                ("isbn", "9780689206807"),
            ]),
        )
        .await
        .unwrap();
    assert_eq!(outcome.redirect_target(), Some(format!("/catalog/book/{book}").as_str()));

    let page = service.book_detail(&book).await.unwrap();
    assert_eq!(page.book.id, book);
    assert_eq!(page.book.title, "The Tombs of Atuan");
}

#[tokio::test]
async fn empty_genre_name_is_not_persisted() {
    let service = service();
    let outcome = service.genre_create(&fields(&[("name", "   ")])).await.unwrap();

    let page = outcome.page().expect("invalid form re-renders");
    assert_eq!(page.errors[0].message, "Genre name required");
    assert_eq!(page.genre.name, "");
    let count = service.repository().count(GENRES, Filter::All).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn unknown_ids_are_not_found_for_every_type() {
    let service = service();
    let unused = "0192f1a4-7b3c-7d2e-8f10-1234567890ab";

    assert!(matches!(service.book_detail(unused).await, Err(CatalogError::NotFound(_))));
    assert!(matches!(service.author_detail(unused).await, Err(CatalogError::NotFound(_))));
    assert!(matches!(service.genre_detail(unused).await, Err(CatalogError::NotFound(_))));
    assert!(matches!(
        service.book_instance_detail(unused).await,
        Err(CatalogError::NotFound(_))
    ));
    assert!(matches!(service.genre_delete_form(unused).await, Err(CatalogError::NotFound(_))));
    assert!(matches!(service.author_delete(unused).await, Err(CatalogError::NotFound(_))));
    assert!(matches!(service.book_update_form(unused).await, Err(CatalogError::NotFound(_))));
}

#[tokio::test]
async fn writes_to_unknown_ids_are_not_found() {
    let service = service();
    let unused = "0192f1a4-7b3c-7d2e-8f10-1234567890ab";
    let author = create_author(&service, "Mary", "Shelley").await;
    let book = create_book(&service, "Frankenstein", &author, &[]).await;

    let genre = fields(&[("name", "Gothic")]);
    assert!(matches!(
        service.genre_update(unused, &genre).await,
        Err(CatalogError::NotFound(_))
    ));

    let person = fields(&[("first_name", "Percy"), ("family_name", "Shelley")]);
    assert!(matches!(
        service.author_update(unused, &person).await,
        Err(CatalogError::NotFound(_))
    ));
    assert!(matches!(
        service.author_update_form(unused).await,
        Err(CatalogError::NotFound(_))
    ));

    let copy = fields(&[("book", book.as_str()), ("imprint", "Colburn")]);
    assert!(matches!(
        service.book_instance_update(unused, &copy).await,
        Err(CatalogError::NotFound(_))
    ));
    assert!(matches!(
        service.book_instance_delete_form(unused).await,
        Err(CatalogError::NotFound(_))
    ));
    assert!(matches!(
        service.book_instance_delete(unused).await,
        Err(CatalogError::NotFound(_))
    ));
    assert!(matches!(service.book_delete(unused).await, Err(CatalogError::NotFound(_))));

    // Nothing was written under the unknown id.
    assert_eq!(service.genre_list().await.unwrap().genre_list.len(), 0);
    assert_eq!(service.author_list().await.unwrap().author_list.len(), 1);
    assert!(service.book_instance_list().await.unwrap().bookinstance_list.is_empty());
}

#[tokio::test]
async fn book_whose_author_is_gone_is_not_found() {
    let service = service();
    let book = Book {
        id: "b1".to_string(),
        title: "Anonymous Work".to_string(),
        author: "gone".to_string(),
        summary: "No author on record.".to_string(),
        isbn: "1".to_string(),
        genre: Vec::new(),
    };
    service.repository().insert(BOOKS, &book).await.unwrap();

    assert!(matches!(
        service.book_detail("b1").await,
        Err(CatalogError::NotFound("Author not found"))
    ));
    assert!(matches!(
        service.book_delete_form("b1").await,
        Err(CatalogError::NotFound("Author not found"))
    ));

    // The book itself can still be deleted.
    let outcome = service.book_delete("b1").await.unwrap();
    assert_eq!(outcome.redirect_target(), Some("/catalog/books"));
}

#[tokio::test]
async fn author_with_only_first_name_has_empty_name() {
    let service = service();
    let id = {
        let author = library_app::modules::catalog::models::Author {
            id: "a1".to_string(),
            first_name: "Plato".to_string(),
            family_name: String::new(),
            date_of_birth: None,
            date_of_death: None,
        };
        service
            .repository()
            .insert(library_app::modules::catalog::models::AUTHORS, &author)
            .await
            .unwrap();
        author.id
    };

    let page = service.author_detail(&id).await.unwrap();
    assert_eq!(page.author.name, "");
    assert_eq!(page.author.first_name, "Plato");
}

#[tokio::test]
async fn genre_list_is_sorted_by_name() {
    let service = service();
    for name in ["Poetry", "Fantasy", "Horror"] {
        create_genre(&service, name).await;
    }
    let names: Vec<_> = service
        .genre_list()
        .await
        .unwrap()
        .genre_list
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, ["Fantasy", "Horror", "Poetry"]);
}

#[tokio::test]
async fn book_detail_resolves_author_genres_and_copies() {
    let service = service();
    let author = create_author(&service, "Terry", "Pratchett").await;
    let fantasy = create_genre(&service, "Fantasy").await;
    let humour = create_genre(&service, "Humour").await;
    let genres = [fantasy.as_str(), humour.as_str(), fantasy.as_str()];
    let book = create_book(&service, "Mort", &author, &genres).await;
    service
        .book_instance_create(&fields(&[("book", book.as_str()), ("imprint", "Gollancz")]))
        .await
        .unwrap();

    let page = service.book_detail(&book).await.unwrap();
    assert_eq!(page.book.author.name, "Pratchett, Terry");
    let genres: Vec<_> = page.book.genre.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(genres.len(), 2);
    assert!(genres.contains(&"Fantasy") && genres.contains(&"Humour"));
    assert_eq!(page.book_instances.len(), 1);
    assert_eq!(page.book_instances[0].status, BookStatus::Maintenance);
}

#[tokio::test]
async fn book_form_requires_an_existing_author() {
    let service = service();
    let outcome = service
        .book_create(&fields(&[
            ("title", "Orphan"),
            ("author", "missing"),
            ("summary", "s"),
            ("isbn", "1"),
        ]))
        .await
        .unwrap();
    let page = outcome.page().expect("re-rendered");
    assert_eq!(page.errors[0].message, "Author must exist.");
    assert_eq!(page.book.title, "Orphan");
}

#[tokio::test]
async fn book_form_checks_selected_genres() {
    let service = service();
    let author = create_author(&service, "Mary", "Shelley").await;
    let horror = create_genre(&service, "Horror").await;
    create_genre(&service, "Romance").await;
    let book = create_book(&service, "Frankenstein", &author, &[horror.as_str()]).await;

    let page = service.book_update_form(&book).await.unwrap();
    assert_eq!(page.authors.len(), 1);
    let checked: Vec<_> = page
        .genres
        .iter()
        .filter(|g| g.checked)
        .map(|g| g.name.as_str())
        .collect();
    assert_eq!(checked, ["Horror"]);
}

#[tokio::test]
async fn book_delete_removes_its_copies() {
    let service = service();
    let author = create_author(&service, "Mary", "Shelley").await;
    let book = create_book(&service, "Frankenstein", &author, &[]).await;
    for imprint in ["Lackington, 1818", "Colburn, 1831"] {
        service
            .book_instance_create(&fields(&[("book", book.as_str()), ("imprint", imprint)]))
            .await
            .unwrap();
    }

    let outcome = service.book_delete(&book).await.unwrap();
    assert_eq!(outcome.redirect_target(), Some("/catalog/books"));
    assert!(service.book_instance_list().await.unwrap().bookinstance_list.is_empty());
    assert!(matches!(service.book_detail(&book).await, Err(CatalogError::NotFound(_))));
}

#[tokio::test]
async fn copy_delete_redirects_to_its_book() {
    let service = service();
    let author = create_author(&service, "Mary", "Shelley").await;
    let book = create_book(&service, "Frankenstein", &author, &[]).await;
    let outcome = service
        .book_instance_create(&fields(&[("book", book.as_str()), ("imprint", "Colburn")]))
        .await
        .unwrap();
    let copy = redirected_id(&outcome);

    let outcome = service.book_instance_delete(&copy).await.unwrap();
    assert_eq!(
        outcome.redirect_target(),
        Some(format!("/catalog/book/{book}").as_str())
    );
}

#[tokio::test]
async fn genre_rename_to_taken_name_is_rejected() {
    let service = service();
    create_genre(&service, "Fantasy").await;
    let horror = create_genre(&service, "Horror").await;

    let outcome = service
        .genre_update(&horror, &fields(&[("name", "Fantasy")]))
        .await
        .unwrap();
    let page = outcome.page().expect("re-rendered");
    assert_eq!(page.errors[0].message, "Genre name already exists");
    assert_eq!(service.genre_detail(&horror).await.unwrap().genre.name, "Horror");

    let outcome = service
        .genre_update(&horror, &fields(&[("name", "Horror")]))
        .await
        .unwrap();
    assert!(outcome.redirect_target().is_some());
}

#[tokio::test]
async fn home_counts_available_copies() {
    let service = service();
    let author = create_author(&service, "Mary", "Shelley").await;
    let book = create_book(&service, "Frankenstein", &author, &[]).await;
    for status in ["Available", "Loaned", "Available"] {
        service
            .book_instance_create(&fields(&[
                ("book", book.as_str()),
                ("imprint", "Colburn"),
                ("status", status),
            ]))
            .await
            .unwrap();
    }

    let home = service.home().await.unwrap();
    assert_eq!(home.book_count, 1);
    assert_eq!(home.book_instance_count, 3);
    assert_eq!(home.book_instance_available_count, 2);
    assert_eq!(home.author_count, 1);
    assert_eq!(home.genre_count, 0);
}

/// Store whose every call fails.
struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    fn backend(&self) -> &'static str {
        "failing"
    }

    async fn find(&self, _: &str, _: Filter, _: Option<Sort>) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    async fn find_one(&self, _: &str, _: Filter) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    async fn count(&self, _: &str, _: Filter) -> Result<u64, StoreError> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    async fn insert(&self, _: &str, _: Document) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    async fn update_by_id(
        &self,
        _: &str,
        _: &str,
        _: Document,
    ) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    async fn remove_by_id(&self, _: &str, _: &str) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    async fn remove_many(&self, _: &str, _: Filter) -> Result<u64, StoreError> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    async fn ensure_unique_index(&self, _: &str, _: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn store_failures_propagate_from_fan_out_reads() {
    let service = CatalogService::new(Arc::new(FailingStore));
    assert!(matches!(service.home().await, Err(CatalogError::Store(_))));
    assert!(matches!(service.genre_detail("g1").await, Err(CatalogError::Store(_))));
    assert!(matches!(service.book_list().await, Err(CatalogError::Store(_))));
    assert!(matches!(
        service.genre_create(&fields(&[("name", "Fantasy")])).await,
        Err(CatalogError::Store(_))
    ));
}
