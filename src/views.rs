//! Server-rendered pages. Every function is a pure mapping from data to markup.

use axum::response::Html;
use time::{macros::format_description, Date, OffsetDateTime};

use crate::notices::repo_types::Notice;

/// Which list page is being rendered. Both show the same rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Admin,
    Users,
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/public/style.css">
</head>
<body>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    ))
}

fn format_date(d: Date) -> String {
    d.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

fn format_timestamp(t: OffsetDateTime) -> String {
    t.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute] UTC[offset_hour sign:mandatory]"
    ))
    .unwrap_or_default()
}

fn opt(v: &Option<String>) -> String {
    v.as_deref().map(escape).unwrap_or_default()
}

pub fn login_page() -> Html<String> {
    layout(
        "Log in",
        r#"<h1>Log in</h1>
<form method="POST" action="/login">
  <label>Email <input type="email" name="email" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Log in</button>
</form>
<p>No account? <a href="/signup">Sign up</a></p>"#,
    )
}

pub fn signup_page() -> Html<String> {
    layout(
        "Sign up",
        r#"<h1>Sign up</h1>
<form method="POST" action="/signup">
  <label>Username <input type="text" name="username" required></label>
  <label>Email <input type="email" name="email" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Create account</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>"#,
    )
}

pub fn notice_list(notices: &[Notice], audience: Audience) -> Html<String> {
    let mut body = String::new();
    match audience {
        Audience::Admin => {
            body.push_str("<h1>Notices (admin)</h1>\n<p><a href=\"/new\">New notice</a></p>\n")
        }
        Audience::Users => body.push_str("<h1>Notices</h1>\n"),
    }

    if notices.is_empty() {
        body.push_str("<p class=\"empty\">No notices yet.</p>\n");
    }

    for n in notices {
        body.push_str(&format!(
            r#"<article class="notice" id="notice-{id}">
  <h2>{title}</h2>
  <p>{content}</p>
  <dl>
    <dt>Category</dt><dd>{category}</dd>
    <dt>Date</dt><dd>{date}</dd>
    <dt>Venue</dt><dd>{venue}</dd>
    <dt>Interested</dt><dd class="interested">{count}</dd>
    <dt>Posted</dt><dd>{created}</dd>
  </dl>
"#,
            id = n.id,
            title = escape(&n.title),
            content = escape(&n.content),
            category = opt(&n.category),
            date = n.event_date.map(format_date).unwrap_or_default(),
            venue = opt(&n.venue),
            count = n.interested_count,
            created = format_timestamp(n.created_at),
        ));
        match audience {
            Audience::Admin => body.push_str(&format!(
                "  <p><a href=\"/edit/{id}\">Edit</a> <a href=\"/delete/{id}\">Delete</a></p>\n",
                id = n.id
            )),
            Audience::Users => body.push_str(&format!(
                "  <form method=\"POST\" action=\"/interested/{id}\"><button type=\"submit\">Interested</button></form>\n",
                id = n.id
            )),
        }
        body.push_str("</article>\n");
    }

    let title = match audience {
        Audience::Admin => "Notices (admin)",
        Audience::Users => "Notices",
    };
    layout(title, &body)
}

fn notice_fields(n: Option<&Notice>) -> String {
    let title = n.map(|n| escape(&n.title)).unwrap_or_default();
    let content = n.map(|n| escape(&n.content)).unwrap_or_default();
    let category = n.map(|n| opt(&n.category)).unwrap_or_default();
    let date = n
        .and_then(|n| n.event_date)
        .map(format_date)
        .unwrap_or_default();
    let venue = n.map(|n| opt(&n.venue)).unwrap_or_default();
    format!(
        r#"  <label>Title <input type="text" name="title" value="{title}"></label>
  <label>Content <textarea name="content">{content}</textarea></label>
  <label>Category <input type="text" name="category" value="{category}"></label>
  <label>Date <input type="date" name="event_date" value="{date}"></label>
  <label>Venue <input type="text" name="venue" value="{venue}"></label>
"#
    )
}

pub fn new_notice_page() -> Html<String> {
    let body = format!(
        "<h1>New notice</h1>\n<form method=\"POST\" action=\"/new\">\n{}  <button type=\"submit\">Publish</button>\n</form>\n<p><a href=\"/admin\">Back</a></p>",
        notice_fields(None)
    );
    layout("New notice", &body)
}

pub fn edit_notice_page(notice: &Notice) -> Html<String> {
    let body = format!(
        "<h1>Edit notice</h1>\n<form method=\"POST\" action=\"/edit/{id}?_method=PATCH\">\n  <input type=\"hidden\" name=\"_method\" value=\"PATCH\">\n{fields}  <button type=\"submit\">Save</button>\n</form>\n<p><a href=\"/admin\">Back</a></p>",
        id = notice.id,
        fields = notice_fields(Some(notice)),
    );
    layout("Edit notice", &body)
}

pub fn delete_notice_page(notice: &Notice) -> Html<String> {
    let body = format!(
        "<h1>Delete notice?</h1>\n<p>&ldquo;{title}&rdquo; will be removed permanently.</p>\n<form method=\"POST\" action=\"/delete/{id}?_method=DELETE\">\n  <input type=\"hidden\" name=\"_method\" value=\"DELETE\">\n  <button type=\"submit\">Delete</button>\n</form>\n<p><a href=\"/admin\">Cancel</a></p>",
        id = notice.id,
        title = escape(&notice.title),
    );
    layout("Delete notice", &body)
}

pub fn error_page() -> Html<String> {
    layout(
        "Error",
        "<h1>Something went wrong</h1>\n<p>Please try again later.</p>\n<p><a href=\"/login\">Home</a></p>",
    )
}
