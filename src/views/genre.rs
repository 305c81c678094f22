use serde_json::Value;

use super::{admin_links, confirm_delete, form_errors, input, link, list_or, submit, text};

pub(super) fn list(data: &Value) -> String {
    list_or(&data["genre_list"], "There are no genres.", |genre| {
        link(&genre["url"], &genre["name"])
    })
}

fn books(books: &Value) -> String {
    list_or(books, "This genre has no books.", |book| {
        format!(
            "{}<p>{}</p>",
            link(&book["url"], &book["title"]),
            text(&book["summary"])
        )
    })
}

pub(super) fn detail(data: &Value) -> String {
    let genre = &data["genre"];
    format!(
        "<h2>Genre: {}</h2>\n<h3>Books</h3>\n{}{}",
        text(&genre["name"]),
        books(&data["genre_books"]),
        admin_links(&genre["url"]),
    )
}

pub(super) fn form(data: &Value) -> String {
    format!(
        "<form method=\"POST\" action=\"\">\n{}{}</form>\n{}",
        input("Genre:", "name", "text", &data["genre"]["name"], true),
        submit("Submit"),
        form_errors(data),
    )
}

pub(super) fn delete(data: &Value) -> String {
    let genre = &data["genre"];
    let mut body = format!("<h2>{}</h2>\n", text(&genre["name"]));
    if data["genre_books"].as_array().is_some_and(|b| !b.is_empty()) {
        body.push_str(
            "<p><strong>Delete the following books before attempting to delete \
             this genre.</strong></p>\n",
        );
        body.push_str(&books(&data["genre_books"]));
    } else {
        body.push_str(&confirm_delete("Do you really want to delete this Genre?"));
    }
    body
}
