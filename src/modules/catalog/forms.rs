//! Sanitization and validation of submitted catalog forms.
//!
//! Every form is parsed from [`RawFields`] with all values trimmed, then
//! validated into an entity carrying the id it should be stored under. A form
//! that fails validation is kept as the draft shown back to the user.

use chrono::NaiveDate;
use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use super::models::{Author, Book, BookInstance, BookStatus, Genre, NAME_MAX_LEN};
use crate::utils::parse_iso_date;

/// Submitted form fields in submission order. Repeated keys are kept, and a
/// trailing `[]` on a key is dropped (`genre[]` reads as `genre`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pairs: Vec<(String, String)>,
}

impl RawFields {
    pub fn from_urlencoded(body: &[u8]) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(body).into_owned())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(key, value)| {
                let key: String = key.into();
                let key = key.strip_suffix("[]").map(str::to_string).unwrap_or(key);
                (key, value.into())
            })
            .collect();
        Self { pairs }
    }

    /// First value for `key`, trimmed; empty when absent.
    pub fn get(&self, key: &str) -> String {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .unwrap_or_default()
    }

    /// Every non-empty value for `key`, trimmed.
    pub fn get_all(&self, key: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    }
}

/// One failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Flatten validator output into `order`, the form's field order.
fn field_errors(errors: &ValidationErrors, order: &[&'static str]) -> Vec<FieldError> {
    let by_field = errors.field_errors();
    order
        .iter()
        .filter_map(|&field| by_field.get(field).map(|failed| (field, failed)))
        .flat_map(|(field, failed)| {
            failed.iter().map(move |error| FieldError {
                field,
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
            })
        })
        .collect()
}

fn within_name_limit(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > NAME_MAX_LEN {
        return Err(ValidationError::new("length"));
    }
    Ok(())
}

/// Empty means absent; anything else must be an ISO-8601 date.
fn optional_iso_date(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_iso_date(value).is_some() {
        return Ok(());
    }
    Err(ValidationError::new("date"))
}

/// Empty falls back to the default status.
fn known_status(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || BookStatus::parse(value).is_some() {
        return Ok(());
    }
    Err(ValidationError::new("status"))
}

fn optional_date(value: &str) -> Option<NaiveDate> {
    if value.is_empty() {
        return None;
    }
    parse_iso_date(value)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct GenreForm {
    #[validate(
        length(min = 1, message = "Genre name required"),
        custom(
            function = "within_name_limit",
            message = "Genre name must be at most 100 characters"
        )
    )]
    pub name: String,
}

impl GenreForm {
    const FIELDS: &'static [&'static str] = &["name"];

    pub fn parse(raw: &RawFields) -> Self {
        Self {
            name: raw.get("name"),
        }
    }

    pub fn from_genre(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
        }
    }

    /// The genre this form describes, stored under `id`.
    pub fn validated(&self, id: String) -> Result<Genre, Vec<FieldError>> {
        self.validate()
            .map_err(|errors| field_errors(&errors, Self::FIELDS))?;
        Ok(Genre {
            id,
            name: self.name.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct AuthorForm {
    #[validate(
        length(min = 1, message = "First name must be specified."),
        custom(
            function = "within_name_limit",
            message = "First name must be at most 100 characters."
        )
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, message = "Family name must be specified."),
        custom(
            function = "within_name_limit",
            message = "Family name must be at most 100 characters."
        )
    )]
    pub family_name: String,
    #[validate(custom(function = "optional_iso_date", message = "Invalid date of birth"))]
    pub date_of_birth: String,
    #[validate(custom(function = "optional_iso_date", message = "Invalid date of death"))]
    pub date_of_death: String,
}

impl AuthorForm {
    const FIELDS: &'static [&'static str] =
        &["first_name", "family_name", "date_of_birth", "date_of_death"];

    pub fn parse(raw: &RawFields) -> Self {
        Self {
            first_name: raw.get("first_name"),
            family_name: raw.get("family_name"),
            date_of_birth: raw.get("date_of_birth"),
            date_of_death: raw.get("date_of_death"),
        }
    }

    pub fn from_author(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: author
                .date_of_birth
                .map(crate::utils::format_date_input)
                .unwrap_or_default(),
            date_of_death: author
                .date_of_death
                .map(crate::utils::format_date_input)
                .unwrap_or_default(),
        }
    }

    pub fn validated(&self, id: String) -> Result<Author, Vec<FieldError>> {
        self.validate()
            .map_err(|errors| field_errors(&errors, Self::FIELDS))?;
        Ok(Author {
            id,
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth: optional_date(&self.date_of_birth),
            date_of_death: optional_date(&self.date_of_death),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct BookForm {
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty."))]
    pub author: String,
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[validate(length(min = 1, message = "ISBN must not be empty."))]
    pub isbn: String,
    pub genre: Vec<String>,
}

impl BookForm {
    const FIELDS: &'static [&'static str] = &["title", "author", "summary", "isbn"];

    pub fn parse(raw: &RawFields) -> Self {
        Self {
            title: raw.get("title"),
            author: raw.get("author"),
            summary: raw.get("summary"),
            isbn: raw.get("isbn"),
            genre: raw.get_all("genre"),
        }
    }

    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre.clone(),
        }
    }

    /// The book this form describes, with repeated genre ids collapsed.
    pub fn validated(&self, id: String) -> Result<Book, Vec<FieldError>> {
        self.validate()
            .map_err(|errors| field_errors(&errors, Self::FIELDS))?;

        let mut genre: Vec<String> = Vec::with_capacity(self.genre.len());
        for id in &self.genre {
            if !genre.contains(id) {
                genre.push(id.clone());
            }
        }
        Ok(Book {
            id,
            title: self.title.clone(),
            author: self.author.clone(),
            summary: self.summary.clone(),
            isbn: self.isbn.clone(),
            genre,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct BookInstanceForm {
    #[validate(length(min = 1, message = "Book must be specified"))]
    pub book: String,
    #[validate(length(min = 1, message = "Imprint must be specified"))]
    pub imprint: String,
    #[validate(custom(function = "known_status", message = "Invalid status"))]
    pub status: String,
    #[validate(custom(function = "optional_iso_date", message = "Invalid date"))]
    pub due_back: String,
}

impl BookInstanceForm {
    const FIELDS: &'static [&'static str] = &["book", "imprint", "status", "due_back"];

    pub fn parse(raw: &RawFields) -> Self {
        Self {
            book: raw.get("book"),
            imprint: raw.get("imprint"),
            status: raw.get("status"),
            due_back: raw.get("due_back"),
        }
    }

    pub fn from_instance(instance: &BookInstance) -> Self {
        Self {
            book: instance.book.clone(),
            imprint: instance.imprint.clone(),
            status: instance.status.to_string(),
            due_back: instance
                .due_back
                .map(crate::utils::format_date_input)
                .unwrap_or_default(),
        }
    }

    pub fn validated(&self, id: String) -> Result<BookInstance, Vec<FieldError>> {
        self.validate()
            .map_err(|errors| field_errors(&errors, Self::FIELDS))?;
        Ok(BookInstance {
            id,
            book: self.book.clone(),
            imprint: self.imprint.clone(),
            status: BookStatus::parse(&self.status).unwrap_or_default(),
            due_back: optional_date(&self.due_back),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencoded_fields_are_trimmed_and_repeated_keys_kept() {
        let raw = RawFields::from_urlencoded(b"name=+Fantasy+&genre%5B%5D=g1&genre=g2&genre=");
        assert_eq!(raw.get("name"), "Fantasy");
        assert_eq!(raw.get_all("genre"), ["g1", "g2"]);
        assert_eq!(raw.get("missing"), "");
    }

    #[test]
    fn empty_genre_name_is_rejected() {
        let form = GenreForm::parse(&RawFields::from_pairs([("name", "   ")]));
        let errors = form.validated("g1".to_string()).unwrap_err();
        assert_eq!(
            errors,
            [FieldError {
                field: "name",
                message: "Genre name required".to_string(),
            }]
        );
    }

    #[test]
    fn long_genre_name_is_rejected() {
        let form = GenreForm {
            name: "x".repeat(101),
        };
        let errors = form.validated("g1".to_string()).unwrap_err();
        assert_eq!(errors[0].message, "Genre name must be at most 100 characters");
    }

    #[test]
    fn name_limit_counts_characters() {
        let mut form = AuthorForm {
            first_name: "é".repeat(100),
            family_name: "Brontë".to_string(),
            ..AuthorForm::default()
        };
        assert!(form.validated("a1".to_string()).is_ok());

        form.family_name = "x".repeat(101);
        let errors = form.validated("a1".to_string()).unwrap_err();
        assert_eq!(
            errors,
            [FieldError {
                field: "family_name",
                message: "Family name must be at most 100 characters.".to_string(),
            }]
        );
    }

    #[test]
    fn author_errors_are_reported_in_field_order() {
        let form = AuthorForm::parse(&RawFields::from_pairs([
            ("first_name", ""),
            ("family_name", ""),
            ("date_of_birth", "yesterday"),
            ("date_of_death", ""),
        ]));
        let errors = form.validated("a1".to_string()).unwrap_err();
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "First name must be specified.",
                "Family name must be specified.",
                "Invalid date of birth",
            ]
        );
    }

    #[test]
    fn valid_author_keeps_the_given_id() {
        let form = AuthorForm::parse(&RawFields::from_pairs([
            ("first_name", "Isaac"),
            ("family_name", "Asimov"),
            ("date_of_birth", "1920-01-02"),
            ("date_of_death", "1992-04-06"),
        ]));
        let author = form.validated("a42".to_string()).unwrap();
        assert_eq!(author.id, "a42");
        assert_eq!(author.date_of_birth, NaiveDate::from_ymd_opt(1920, 1, 2));
        assert_eq!(AuthorForm::from_author(&author), form);
    }

    #[test]
    fn book_requires_every_text_field() {
        let errors = BookForm::default().validated("b1".to_string()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["title", "author", "summary", "isbn"]);
    }

    #[test]
    fn book_instance_status_defaults_and_rejects_unknown_values() {
        let mut form = BookInstanceForm {
            book: "b1".to_string(),
            imprint: "Gollancz, 2011".to_string(),
            status: String::new(),
            due_back: String::new(),
        };
        let copy = form.validated("c1".to_string()).unwrap();
        assert_eq!(copy.status, BookStatus::Maintenance);
        assert_eq!(copy.due_back, None);

        form.status = "Lost".to_string();
        form.due_back = "2026-13-01".to_string();
        let errors = form.validated("c1".to_string()).unwrap_err();
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["Invalid status", "Invalid date"]);
    }
}
