use serde_json::Value;

use super::{admin_links, confirm_delete, form_errors, input, link, list_or, submit, text};

fn name_with_lifespan(author: &Value) -> String {
    let lifespan = text(&author["lifespan"]);
    if lifespan.is_empty() {
        link(&author["url"], &author["name"])
    } else {
        format!("{} ({lifespan})", link(&author["url"], &author["name"]))
    }
}

pub(super) fn list(data: &Value) -> String {
    list_or(&data["author_list"], "There are no authors.", name_with_lifespan)
}

fn books(books: &Value) -> String {
    list_or(books, "This author has no books.", |book| {
        format!(
            "{}<p>{}</p>",
            link(&book["url"], &book["title"]),
            text(&book["summary"])
        )
    })
}

pub(super) fn detail(data: &Value) -> String {
    let author = &data["author"];
    format!(
        "<h2>Author: {}</h2>\n<p>{}</p>\n<h3>Books</h3>\n{}{}",
        text(&author["name"]),
        text(&author["lifespan"]),
        books(&data["author_books"]),
        admin_links(&author["url"]),
    )
}

pub(super) fn form(data: &Value) -> String {
    let author = &data["author"];
    format!(
        "<form method=\"POST\" action=\"\">\n{}{}{}{}{}</form>\n{}",
        input("First Name:", "first_name", "text", &author["first_name"], true),
        input("Family Name:", "family_name", "text", &author["family_name"], true),
        input("Date of birth:", "date_of_birth", "date", &author["date_of_birth"], false),
        input("Date of death:", "date_of_death", "date", &author["date_of_death"], false),
        submit("Submit"),
        form_errors(data),
    )
}

pub(super) fn delete(data: &Value) -> String {
    let author = &data["author"];
    let mut body = format!(
        "<h2>{}</h2>\n<p>{}</p>\n",
        text(&author["name"]),
        text(&author["lifespan"])
    );
    if data["author_books"].as_array().is_some_and(|b| !b.is_empty()) {
        body.push_str(
            "<p><strong>Delete the following books before attempting to delete \
             this author.</strong></p>\n",
        );
        body.push_str(&books(&data["author_books"]));
    } else {
        body.push_str(&confirm_delete("Do you really want to delete this Author?"));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_omits_empty_lifespan() {
        let html = list(&json!({
            "author_list": [
                {
                    "name": "Asimov, Isaac",
                    "url": "/catalog/author/a1",
                    "lifespan": "Jan 2, 1920 - Apr 6, 1992"
                },
                {"name": "Rothfuss, Patrick", "url": "/catalog/author/a2", "lifespan": ""}
            ]
        }));
        assert!(html.contains("Asimov, Isaac</a> (Jan 2, 1920 - Apr 6, 1992)"));
        assert!(html.contains("Rothfuss, Patrick</a></li>"));
    }

    #[test]
    fn delete_page_lists_blocking_books_instead_of_the_form() {
        let html = delete(&json!({
            "author": {"name": "Asimov, Isaac", "lifespan": ""},
            "author_books": [{"title": "Foundation", "url": "/catalog/book/b1", "summary": "s"}]
        }));
        assert!(html.contains("Delete the following books"));
        assert!(!html.contains("<form"));
    }
}
