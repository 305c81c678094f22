use serde_json::Value;

use super::{
    admin_links, attr, confirm_delete, form_errors, input, items, link, list_or, submit, text,
};

pub(super) fn list(data: &Value) -> String {
    list_or(&data["book_list"], "There are no books.", |book| {
        let author = &book["author"]["name"];
        if author.is_null() {
            link(&book["url"], &book["title"])
        } else {
            format!("{} ({})", link(&book["url"], &book["title"]), text(author))
        }
    })
}

fn genres(book: &Value) -> String {
    items(&book["genre"])
        .iter()
        .map(|genre| link(&genre["url"], &genre["name"]))
        .collect::<Vec<_>>()
        .join(", ")
}

fn copies(copies: &Value) -> String {
    list_or(
        copies,
        "There are no copies of this book in the library.",
        |copy| {
            let mut row = format!(
                "<p class=\"status\">{}</p><p><strong>Imprint:</strong> {}</p>",
                text(&copy["status"]),
                text(&copy["imprint"])
            );
            if copy["status"] != "Available" {
                row.push_str(&format!(
                    "<p><strong>Due back:</strong> {}</p>",
                    text(&copy["due_back_formatted"])
                ));
            }
            row.push_str(&format!(
                "<p><strong>Id:</strong> {}</p>",
                link(&copy["url"], &copy["id"])
            ));
            row
        },
    )
}

fn summary(book: &Value) -> String {
    let author = link(&book["author"]["url"], &book["author"]["name"]);
    format!(
        "<p><strong>Author:</strong> {author}</p>\n\
         <p><strong>Summary:</strong> {}</p>\n\
         <p><strong>ISBN:</strong> {}</p>\n\
         <p><strong>Genre:</strong> {}</p>\n",
        text(&book["summary"]),
        text(&book["isbn"]),
        genres(book),
    )
}

pub(super) fn detail(data: &Value) -> String {
    let book = &data["book"];
    format!(
        "{}<h3>Copies</h3>\n{}{}",
        summary(book),
        copies(&data["book_instances"]),
        admin_links(&book["url"]),
    )
}

pub(super) fn form(data: &Value) -> String {
    let book = &data["book"];
    let selected = &book["author"];

    let authors: String = items(&data["authors"])
        .iter()
        .map(|author| {
            let chosen = if author["id"] == *selected { " selected" } else { "" };
            format!(
                "<option value=\"{}\"{chosen}>{}</option>",
                attr(&author["id"]),
                text(&author["name"])
            )
        })
        .collect();

    let genres: String = items(&data["genres"])
        .iter()
        .map(|genre| {
            let checked = if genre["checked"] == true { " checked" } else { "" };
            format!(
                "<div class=\"checkbox\"><input type=\"checkbox\" name=\"genre\" id=\"{id}\" value=\"{id}\"{checked}>\
                 <label for=\"{id}\">{}</label></div>",
                text(&genre["name"]),
                id = attr(&genre["id"]),
            )
        })
        .collect();

    format!(
        "<form method=\"POST\" action=\"\">\n{}\
         <div class=\"form-group\"><label for=\"author\">Author:</label>\
         <select id=\"author\" name=\"author\" required>\
         <option value=\"\">--Please select an author--</option>{authors}</select></div>\n\
         <div class=\"form-group\"><label for=\"summary\">Summary:</label>\
         <textarea id=\"summary\" name=\"summary\" required>{}</textarea></div>\n\
         {}<div class=\"form-group\"><label>Genre:</label>{genres}</div>\n{}</form>\n{}",
        input("Title:", "title", "text", &book["title"], true),
        text(&book["summary"]),
        input("ISBN:", "isbn", "text", &book["isbn"], true),
        submit("Submit"),
        form_errors(data),
    )
}

pub(super) fn delete(data: &Value) -> String {
    let book = &data["book"];
    let mut body = summary(book);
    if !items(&data["book_instances"]).is_empty() {
        body.push_str(
            "<p><strong>The following copies are deleted together with this \
             book.</strong></p>\n",
        );
        body.push_str(&copies(&data["book_instances"]));
    }
    body.push_str(&confirm_delete("Do you really want to delete this Book?"));
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn form_marks_selected_author_and_checked_genres() {
        let html = form(&json!({
            "book": {"title": "Dune", "author": "a2", "summary": "", "isbn": "", "genre": ["g1"]},
            "authors": [
                {"id": "a1", "name": "Asimov, Isaac"},
                {"id": "a2", "name": "Herbert, Frank"}
            ],
            "genres": [
                {"id": "g1", "name": "Science Fiction", "checked": true},
                {"id": "g2", "name": "Fantasy", "checked": false}
            ],
            "errors": []
        }));
        assert!(html.contains("<option value=\"a2\" selected>Herbert, Frank</option>"));
        assert!(html.contains("<option value=\"a1\">Asimov, Isaac</option>"));
        assert!(html.contains("value=\"g1\" checked>"));
        assert!(html.contains("value=\"g2\">"));
    }

    #[test]
    fn unavailable_copies_show_due_date() {
        let html = copies(&json!([
            {
                "id": "c1", "url": "/catalog/bookinstance/c1", "status": "Loaned",
                "imprint": "Ace", "due_back_formatted": "Oct 15, 2026"
            },
            {
                "id": "c2", "url": "/catalog/bookinstance/c2", "status": "Available",
                "imprint": "Ace", "due_back_formatted": ""
            }
        ]));
        assert_eq!(html.matches("Due back:").count(), 1);
        assert!(html.contains("Oct 15, 2026"));
    }
}
