use serde_json::Value;

use super::{
    admin_links, attr, confirm_delete, form_errors, input, items, link, list_or, submit, text,
};

pub(super) fn list(data: &Value) -> String {
    list_or(&data["bookinstance_list"], "There are no book copies in this library.", |copy| {
        let mut row = format!(
            "<a href=\"{}\">{} : {}</a> - <span class=\"status\">{}</span>",
            attr(&copy["url"]),
            text(&copy["book_title"]),
            text(&copy["imprint"]),
            text(&copy["status"]),
        );
        if copy["status"] != "Available" {
            row.push_str(&format!(" (Due: {})", text(&copy["due_back_formatted"])));
        }
        row
    })
}

fn summary(copy: &Value) -> String {
    let mut body = format!(
        "<p><strong>ID:</strong> {}</p>\n<p><strong>Title:</strong> {}</p>\n\
         <p><strong>Imprint:</strong> {}</p>\n<p><strong>Status:</strong> {}</p>\n",
        text(&copy["id"]),
        link(&copy["book_url"], &copy["book_title"]),
        text(&copy["imprint"]),
        text(&copy["status"]),
    );
    if copy["status"] != "Available" {
        body.push_str(&format!(
            "<p><strong>Due back:</strong> {}</p>\n",
            text(&copy["due_back_formatted"])
        ));
    }
    body
}

pub(super) fn detail(data: &Value) -> String {
    let copy = &data["bookinstance"];
    format!("{}{}", summary(copy), admin_links(&copy["url"]))
}

pub(super) fn form(data: &Value) -> String {
    let copy = &data["bookinstance"];
    let selected = &data["selected_book"];

    let books: String = items(&data["book_list"])
        .iter()
        .map(|book| {
            let chosen = if book["id"] == *selected { " selected" } else { "" };
            format!(
                "<option value=\"{}\"{chosen}>{}</option>",
                attr(&book["id"]),
                text(&book["title"])
            )
        })
        .collect();

    let statuses: String = items(&data["statuses"])
        .iter()
        .map(|status| {
            let chosen = if *status == copy["status"] { " selected" } else { "" };
            format!("<option value=\"{0}\"{chosen}>{1}</option>", attr(status), text(status))
        })
        .collect();

    format!(
        "<form method=\"POST\" action=\"\">\n\
         <div class=\"form-group\"><label for=\"book\">Book:</label>\
         <select id=\"book\" name=\"book\" required>\
         <option value=\"\">--Please select a book--</option>{books}</select></div>\n\
         {}{}<div class=\"form-group\"><label for=\"status\">Status:</label>\
         <select id=\"status\" name=\"status\" required>{statuses}</select></div>\n{}</form>\n{}",
        input("Imprint:", "imprint", "text", &copy["imprint"], true),
        input("Date when book available:", "due_back", "date", &copy["due_back"], false),
        submit("Submit"),
        form_errors(data),
    )
}

pub(super) fn delete(data: &Value) -> String {
    let copy = &data["bookinstance"];
    format!(
        "{}{}",
        summary(copy),
        confirm_delete("Do you really want to delete this BookInstance?")
    )
}
