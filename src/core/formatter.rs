//! Grouping and rendering of fetched records.
//!
//! Both renderings keep the API's arrival order: groups appear in the order their list
//! was first seen, and books keep their order within a group. Nothing is sorted.

use crate::domain::model::{BookRecord, FormattedOutput, ListGroup};

/// Groups records by list name, first-seen group first.
pub fn group_by_list(records: Vec<BookRecord>) -> Vec<ListGroup> {
    let mut groups: Vec<ListGroup> = Vec::new();

    for record in records {
        // A handful of lists per run, so a linear scan is enough.
        match groups.iter_mut().find(|g| g.list_name == record.list_name) {
            Some(group) => group.books.push(record),
            None => groups.push(ListGroup {
                list_name: record.list_name.clone(),
                books: vec![record],
            }),
        }
    }

    groups
}

pub fn render_plain(groups: &[ListGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str("## ");
        out.push_str(&group.list_name);
        out.push_str("\n\n");
        for book in &group.books {
            out.push_str("- ");
            out.push_str(&book_line(book));
            out.push('\n');
        }
        out.push_str("\n---\n\n");
    }
    out
}

pub fn render_html(groups: &[ListGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str("<h2>");
        out.push_str(&escape_html(&group.list_name));
        out.push_str("</h2>\n<ul>\n");
        for book in &group.books {
            out.push_str("<li>");
            out.push_str(&escape_html(&book_line(book)));
            out.push_str("</li>\n");
        }
        out.push_str("</ul>");
    }
    out
}

/// Groups and renders both views.
pub fn format_books(records: Vec<BookRecord>) -> FormattedOutput {
    let groups = group_by_list(records);
    for group in &groups {
        tracing::debug!("{} ({} books)", group.list_name, group.books.len());
        for book in &group.books {
            tracing::debug!("  {} by {}", book.title, book.author);
        }
    }

    FormattedOutput {
        plain_text: render_plain(&groups),
        rich_text: render_html(&groups),
    }
}

fn book_line(book: &BookRecord) -> String {
    format!(
        "{} by {} published on {}",
        book.title, book.author, book.published_date
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
