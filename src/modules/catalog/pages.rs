//! Payloads handed to the renderer, one type per view.

use serde::Serialize;

use super::forms::{AuthorForm, BookForm, BookInstanceForm, FieldError, GenreForm};
use super::models::{
    AuthorView, BookDetailView, BookInstanceView, BookStatus, BookView, GenreView,
};

/// A payload bound to the view that renders it.
pub trait Template: Serialize {
    const VIEW: &'static str;
}

/// Result of a catalog operation that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Render(T),
    Redirect(String),
}

impl<T> Outcome<T> {
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Outcome::Redirect(url) => Some(url),
            Outcome::Render(_) => None,
        }
    }

    pub fn page(&self) -> Option<&T> {
        match self {
            Outcome::Render(page) => Some(page),
            Outcome::Redirect(_) => None,
        }
    }
}

macro_rules! template {
    ($ty:ty, $view:literal) => {
        impl Template for $ty {
            const VIEW: &'static str = $view;
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomePage {
    pub title: String,
    pub book_count: u64,
    pub book_instance_count: u64,
    pub book_instance_available_count: u64,
    pub author_count: u64,
    pub genre_count: u64,
}
template!(HomePage, "index");

// Books

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookListPage {
    pub title: String,
    pub book_list: Vec<BookView>,
}
template!(BookListPage, "book_list");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDetailPage {
    pub title: String,
    pub book: BookDetailView,
    pub book_instances: Vec<BookInstanceView>,
}
template!(BookDetailPage, "book_detail");

/// A genre checkbox on the book form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreOption {
    pub id: String,
    pub name: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookFormPage {
    pub title: String,
    pub book: BookForm,
    pub authors: Vec<AuthorView>,
    pub genres: Vec<GenreOption>,
    pub errors: Vec<FieldError>,
}
template!(BookFormPage, "book_form");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDeletePage {
    pub title: String,
    pub book: BookDetailView,
    pub book_instances: Vec<BookInstanceView>,
}
template!(BookDeletePage, "book_delete");

// Authors

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorListPage {
    pub title: String,
    pub author_list: Vec<AuthorView>,
}
template!(AuthorListPage, "author_list");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorDetailPage {
    pub title: String,
    pub author: AuthorView,
    pub author_books: Vec<BookView>,
}
template!(AuthorDetailPage, "author_detail");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorFormPage {
    pub title: String,
    pub author: AuthorForm,
    pub errors: Vec<FieldError>,
}
template!(AuthorFormPage, "author_form");

/// Delete confirmation; also the page shown when books still block the delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorDeletePage {
    pub title: String,
    pub author: AuthorView,
    pub author_books: Vec<BookView>,
}
template!(AuthorDeletePage, "author_delete");

// Genres

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreListPage {
    pub title: String,
    pub genre_list: Vec<GenreView>,
}
template!(GenreListPage, "genre_list");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreDetailPage {
    pub title: String,
    pub genre: GenreView,
    pub genre_books: Vec<BookView>,
}
template!(GenreDetailPage, "genre_detail");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreFormPage {
    pub title: String,
    pub genre: GenreForm,
    pub errors: Vec<FieldError>,
}
template!(GenreFormPage, "genre_form");

/// Delete confirmation; also the page shown when books still block the delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreDeletePage {
    pub title: String,
    pub genre: GenreView,
    pub genre_books: Vec<BookView>,
}
template!(GenreDeletePage, "genre_delete");

// Book instances

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstanceListPage {
    pub title: String,
    pub bookinstance_list: Vec<BookInstanceView>,
}
template!(BookInstanceListPage, "bookinstance_list");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstanceDetailPage {
    pub title: String,
    pub bookinstance: BookInstanceView,
}
template!(BookInstanceDetailPage, "bookinstance_detail");

/// A selectable book on the copy form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookOption {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstanceFormPage {
    pub title: String,
    pub bookinstance: BookInstanceForm,
    pub book_list: Vec<BookOption>,
    pub selected_book: String,
    pub statuses: Vec<BookStatus>,
    pub errors: Vec<FieldError>,
}
template!(BookInstanceFormPage, "bookinstance_form");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstanceDeletePage {
    pub title: String,
    pub bookinstance: BookInstanceView,
}
template!(BookInstanceDeletePage, "bookinstance_delete");
