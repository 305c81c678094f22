//! Stored catalog entities and the values derived from them on read.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::{format_date_input, format_date_med};

pub const AUTHORS: &str = "authors";
pub const BOOKS: &str = "books";
pub const GENRES: &str = "genres";
pub const BOOK_INSTANCES: &str = "bookinstances";

/// Maximum length of author name parts and genre names.
pub const NAME_MAX_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub family_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "Family, First", or empty when either part is missing.
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }

    pub fn date_of_birth_formatted(&self) -> String {
        self.date_of_birth.map(format_date_med).unwrap_or_default()
    }

    pub fn date_of_death_formatted(&self) -> String {
        self.date_of_death.map(format_date_med).unwrap_or_default()
    }

    /// "birth - death" with either side blank when unknown; empty when both are.
    pub fn lifespan(&self) -> String {
        if self.date_of_birth.is_none() && self.date_of_death.is_none() {
            return String::new();
        }
        format!(
            "{} - {}",
            self.date_of_birth_formatted(),
            self.date_of_death_formatted()
        )
        .trim()
        .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// Id of the owning author.
    pub author: String,
    pub summary: String,
    pub isbn: String,
    /// Ids of the book's genres.
    #[serde(default)]
    pub genre: Vec<String>,
}

impl Book {
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

/// Availability of a single copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BookStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookStatus {
    pub const ALL: [BookStatus; 4] = [
        BookStatus::Available,
        BookStatus::Maintenance,
        BookStatus::Loaned,
        BookStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Maintenance => "Maintenance",
            BookStatus::Loaned => "Loaned",
            BookStatus::Reserved => "Reserved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical copy of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInstance {
    #[serde(rename = "_id")]
    pub id: String,
    /// Id of the owning book.
    pub book: String,
    pub imprint: String,
    #[serde(default)]
    pub status: BookStatus,
    #[serde(default)]
    pub due_back: Option<NaiveDate>,
}

impl BookInstance {
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    pub fn due_back_formatted(&self) -> String {
        self.due_back.map(format_date_med).unwrap_or_default()
    }
}

// View records: stored fields plus derived values, as handed to the renderer.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorView {
    pub id: String,
    pub first_name: String,
    pub family_name: String,
    pub name: String,
    pub url: String,
    pub date_of_birth_formatted: String,
    pub date_of_death_formatted: String,
    pub date_of_birth_input: String,
    pub date_of_death_input: String,
    pub lifespan: String,
}

impl From<&Author> for AuthorView {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id.clone(),
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            name: author.name(),
            url: author.url(),
            date_of_birth_formatted: author.date_of_birth_formatted(),
            date_of_death_formatted: author.date_of_death_formatted(),
            date_of_birth_input: author.date_of_birth.map(format_date_input).unwrap_or_default(),
            date_of_death_input: author.date_of_death.map(format_date_input).unwrap_or_default(),
            lifespan: author.lifespan(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreView {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl From<&Genre> for GenreView {
    fn from(genre: &Genre) -> Self {
        Self {
            id: genre.id.clone(),
            name: genre.name.clone(),
            url: genre.url(),
        }
    }
}

/// Book row for lists, with its author when known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookView {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub url: String,
    pub author: Option<AuthorView>,
}

impl BookView {
    pub fn new(book: &Book, author: Option<&Author>) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            url: book.url(),
            author: author.map(AuthorView::from),
        }
    }
}

impl From<&Book> for BookView {
    fn from(book: &Book) -> Self {
        Self::new(book, None)
    }
}

/// Book with its author and genres resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDetailView {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub url: String,
    pub author: AuthorView,
    pub genre: Vec<GenreView>,
}

impl BookDetailView {
    pub fn new(book: &Book, author: &Author, genres: &[Genre]) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            url: book.url(),
            author: AuthorView::from(author),
            genre: genres.iter().map(GenreView::from).collect(),
        }
    }
}

/// Copy with the owning book's title and link resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstanceView {
    pub id: String,
    pub imprint: String,
    pub status: BookStatus,
    pub due_back: Option<NaiveDate>,
    pub due_back_formatted: String,
    pub due_back_input: String,
    pub url: String,
    pub book_id: String,
    pub book_title: String,
    pub book_url: String,
}

impl BookInstanceView {
    pub fn new(instance: &BookInstance, book: Option<&Book>) -> Self {
        Self {
            id: instance.id.clone(),
            imprint: instance.imprint.clone(),
            status: instance.status,
            due_back: instance.due_back,
            due_back_formatted: instance.due_back_formatted(),
            due_back_input: instance.due_back.map(format_date_input).unwrap_or_default(),
            url: instance.url(),
            book_id: instance.book.clone(),
            book_title: book.map(|b| b.title.clone()).unwrap_or_default(),
            book_url: book.map(Book::url).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(first: &str, family: &str) -> Author {
        Author {
            id: "a1".to_string(),
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    #[test]
    fn full_name_requires_both_parts() {
        assert_eq!(author("Ursula", "Le Guin").name(), "Le Guin, Ursula");
        assert_eq!(author("Ursula", "").name(), "");
        assert_eq!(author("", "Le Guin").name(), "");
    }

    #[test]
    fn urls_derive_from_ids() {
        assert_eq!(author("a", "b").url(), "/catalog/author/a1");
        let genre = Genre {
            id: "g1".to_string(),
            name: "Fantasy".to_string(),
        };
        assert_eq!(genre.url(), "/catalog/genre/g1");
    }

    #[test]
    fn lifespan_uses_known_dates() {
        let mut a = author("Ursula", "Le Guin");
        assert_eq!(a.lifespan(), "");

        a.date_of_birth = NaiveDate::from_ymd_opt(1929, 10, 21);
        assert_eq!(a.lifespan(), "Oct 21, 1929 -");

        a.date_of_death = NaiveDate::from_ymd_opt(2018, 1, 22);
        assert_eq!(a.lifespan(), "Oct 21, 1929 - Jan 22, 2018");
        assert_eq!(a.date_of_death_formatted(), "Jan 22, 2018");

        let view = AuthorView::from(&a);
        assert_eq!(view.date_of_birth_input, "1929-10-21");
        assert_eq!(view.date_of_death_input, "2018-01-22");
    }

    #[test]
    fn status_parses_known_values_only() {
        assert_eq!(BookStatus::parse("Loaned"), Some(BookStatus::Loaned));
        assert_eq!(BookStatus::parse("loaned"), None);
        assert_eq!(BookStatus::default(), BookStatus::Maintenance);
    }

    #[test]
    fn stored_shape_uses_underscore_id() {
        let genre = Genre {
            id: "g1".to_string(),
            name: "Poetry".to_string(),
        };
        let value = serde_json::to_value(&genre).unwrap();
        assert_eq!(value, serde_json::json!({"_id": "g1", "name": "Poetry"}));
    }
}
