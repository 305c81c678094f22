//! Server-rendered HTML for every catalog view.
//!
//! Views read the JSON payload produced by the catalog pages. Every value taken
//! from the payload is escaped here, at output time.

mod author;
mod book;
mod book_instance;
mod genre;

use std::borrow::Cow;

use library_http::ViewRenderer;
use serde_json::Value;

/// [`ViewRenderer`] producing complete HTML documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlViews;

impl HtmlViews {
    pub fn new() -> Self {
        Self
    }
}

impl ViewRenderer for HtmlViews {
    fn render(&self, view: &str, data: &Value) -> anyhow::Result<String> {
        let body = match view {
            "index" => index(data),
            "error" => error(data),
            "book_list" => book::list(data),
            "book_detail" => book::detail(data),
            "book_form" => book::form(data),
            "book_delete" => book::delete(data),
            "author_list" => author::list(data),
            "author_detail" => author::detail(data),
            "author_form" => author::form(data),
            "author_delete" => author::delete(data),
            "genre_list" => genre::list(data),
            "genre_detail" => genre::detail(data),
            "genre_form" => genre::form(data),
            "genre_delete" => genre::delete(data),
            "bookinstance_list" => book_instance::list(data),
            "bookinstance_detail" => book_instance::detail(data),
            "bookinstance_form" => book_instance::form(data),
            "bookinstance_delete" => book_instance::delete(data),
            other => anyhow::bail!("unknown view '{other}'"),
        };
        Ok(layout(&data["title"], &body))
    }
}

const NAV: &[(&str, &str)] = &[
    ("/catalog", "Home"),
    ("/catalog/books", "All books"),
    ("/catalog/authors", "All authors"),
    ("/catalog/genres", "All genres"),
    ("/catalog/bookinstances", "All book-instances"),
    ("/catalog/author/create", "Create new author"),
    ("/catalog/genre/create", "Create new genre"),
    ("/catalog/book/create", "Create new book"),
    ("/catalog/bookinstance/create", "Create new book instance (copy)"),
];

fn layout(title: &Value, body: &str) -> String {
    let nav: String = NAV
        .iter()
        .map(|(href, label)| format!("<li><a href=\"{href}\">{label}</a></li>"))
        .collect();
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n</head>\n<body>\n<nav><ul>{nav}</ul></nav>\n\
         <main>\n<h1>{title}</h1>\n{body}</main>\n</body>\n</html>\n",
        title = text(title),
    )
}

/// Scalar payload value as a string; empty for null, arrays and objects.
fn raw(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        _ => Cow::Borrowed(""),
    }
}

/// Escaped for element content.
fn text(value: &Value) -> String {
    html_escape::encode_text(&raw(value)).into_owned()
}

/// Escaped for a double-quoted attribute.
fn attr(value: &Value) -> String {
    html_escape::encode_double_quoted_attribute(&raw(value)).into_owned()
}

fn items(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or_default()
}

fn link(url: &Value, label: &Value) -> String {
    format!("<a href=\"{}\">{}</a>", attr(url), text(label))
}

/// `<ul>` of `render(item)`, or `<p>{empty}</p>` when there are no items.
fn list_or(value: &Value, empty: &str, render: impl Fn(&Value) -> String) -> String {
    let items = items(value);
    if items.is_empty() {
        return format!("<p>{empty}</p>\n");
    }
    let rows: String = items
        .iter()
        .map(|item| format!("<li>{}</li>\n", render(item)))
        .collect();
    format!("<ul>\n{rows}</ul>\n")
}

fn form_errors(data: &Value) -> String {
    let errors = items(&data["errors"]);
    if errors.is_empty() {
        return String::new();
    }
    let rows: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", text(&e["message"])))
        .collect();
    format!("<ul class=\"errors\">{rows}</ul>\n")
}

fn input(label: &str, name: &str, kind: &str, value: &Value, required: bool) -> String {
    format!(
        "<div class=\"form-group\"><label for=\"{name}\">{label}</label>\
         <input id=\"{name}\" type=\"{kind}\" name=\"{name}\" value=\"{}\"{}></div>\n",
        attr(value),
        if required { " required" } else { "" },
    )
}

fn submit(label: &str) -> String {
    format!("<button type=\"submit\">{label}</button>\n")
}

fn confirm_delete(question: &str) -> String {
    format!(
        "<p>{question}</p>\n<form method=\"POST\" action=\"\">\n{}</form>\n",
        submit("Delete")
    )
}

fn admin_links(url: &Value) -> String {
    let url = attr(url);
    format!(
        "<hr>\n<p><a href=\"{url}/delete\">Delete</a> | <a href=\"{url}/update\">Update</a></p>\n"
    )
}

fn index(data: &Value) -> String {
    let count = |key: &str| text(&data[key]);
    format!(
        "<p>Welcome to <em>LocalLibrary</em>.</p>\n<h2>Dynamic content</h2>\n\
         <p>The library has the following record counts:</p>\n<ul>\n\
         <li><strong>Books:</strong> {}</li>\n\
         <li><strong>Copies:</strong> {}</li>\n\
         <li><strong>Copies available:</strong> {}</li>\n\
         <li><strong>Authors:</strong> {}</li>\n\
         <li><strong>Genres:</strong> {}</li>\n</ul>\n",
        count("book_count"),
        count("book_instance_count"),
        count("book_instance_available_count"),
        count("author_count"),
        count("genre_count"),
    )
}

fn error(data: &Value) -> String {
    let mut body = format!("<p>{}</p>\n", text(&data["message"]));
    let detail = &data["detail"];
    if detail.is_object() {
        body.push_str(&format!(
            "<pre>code: {}\ntrace: {}\nat: {}</pre>\n",
            text(&detail["code"]),
            text(&detail["trace_id"]),
            text(&detail["timestamp"]),
        ));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(view: &str, data: Value) -> String {
        HtmlViews::new().render(view, &data).unwrap()
    }

    #[test]
    fn unknown_view_is_an_error() {
        assert!(HtmlViews::new().render("nope", &json!({})).is_err());
    }

    #[test]
    fn layout_escapes_the_title() {
        let html = render("genre_list", json!({"title": "<script>", "genre_list": []}));
        assert!(html.contains("<title>&lt;script&gt;</title>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("There are no genres."));
    }

    #[test]
    fn stored_markup_is_escaped_in_lists() {
        let html = render(
            "genre_list",
            json!({
                "title": "Genre List",
                "genre_list": [{"id": "g1", "name": "<b>Horror</b>", "url": "/catalog/genre/g1"}]
            }),
        );
        assert!(html.contains("<a href=\"/catalog/genre/g1\">&lt;b&gt;Horror&lt;/b&gt;</a>"));
    }

    #[test]
    fn home_page_lists_counts() {
        let html = render(
            "index",
            json!({
                "title": "Local Library Home",
                "book_count": 3,
                "book_instance_count": 5,
                "book_instance_available_count": 2,
                "author_count": 1,
                "genre_count": 0
            }),
        );
        assert!(html.contains("<strong>Copies available:</strong> 2"));
        assert!(html.contains("<strong>Genres:</strong> 0"));
    }

    #[test]
    fn error_page_shows_detail_only_when_present() {
        let hidden = render(
            "error",
            json!({"title": "Not Found", "status": 404, "message": "Not Found", "detail": null}),
        );
        assert!(!hidden.contains("<pre>"));

        let shown = render(
            "error",
            json!({
                "title": "Not Found",
                "status": 404,
                "message": "Genre not found",
                "detail": {"code": "not_found", "trace_id": "t1", "timestamp": "now"}
            }),
        );
        assert!(shown.contains("<p>Genre not found</p>"));
        assert!(shown.contains("code: not_found"));
    }

    #[test]
    fn form_errors_render_in_order() {
        let html = render(
            "genre_form",
            json!({
                "title": "Create Genre",
                "genre": {"name": ""},
                "errors": [{"field": "name", "message": "Genre name required"}]
            }),
        );
        assert!(html.contains("<ul class=\"errors\"><li>Genre name required</li></ul>"));
        assert!(html.contains("method=\"POST\""));
    }
}
