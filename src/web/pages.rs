//! Inline HTML rendering for the server-rendered pages. User-supplied
//! text goes through `html_escape` before it reaches the markup.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::db::Movie;

/// Per-request template context: the watchlist owner (first user row),
/// any pending flash notices and whether the session is authenticated.
pub struct PageContext {
    pub owner: Option<String>,
    pub flashes: Vec<String>,
    pub logged_in: bool,
}

impl PageContext {
    fn page_title(&self) -> String {
        self.owner.as_deref().map_or_else(
            || "Watchlist".to_string(),
            |name| format!("{}'s Watchlist", encode_text(name)),
        )
    }
}

fn layout(ctx: &PageContext, body: &str) -> String {
    let title = ctx.page_title();

    let nav = if ctx.logged_in {
        r#"<nav><a href="/">Home</a> <a href="/settings">Settings</a> <a href="/logout">Logout</a></nav>"#
    } else {
        r#"<nav><a href="/">Home</a></nav>"#
    };

    let mut alerts = String::new();
    for message in &ctx.flashes {
        alerts.push_str(&format!(
            "<div class=\"alert\">{}</div>\n",
            encode_text(message)
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h2>{title}</h2>\n{nav}\n{alerts}{body}\n\
         <footer><small>Watchlist</small></footer>\n</body>\n</html>\n"
    )
}

pub fn index_page(ctx: &PageContext, movies: &[Movie]) -> String {
    let mut body = String::new();

    if ctx.logged_in {
        body.push_str(
            "<form method=\"POST\">\n\
             Name <input type=\"text\" name=\"title\" autocomplete=\"off\" required>\n\
             Year <input type=\"text\" name=\"year\" autocomplete=\"off\" required>\n\
             <input class=\"btn\" type=\"submit\" name=\"submit\" value=\"Add\">\n\
             </form>\n",
        );
    }

    body.push_str(&format!("<p>{} Titles</p>\n<ul class=\"movie-list\">\n", movies.len()));

    for movie in movies {
        body.push_str(&format!(
            "<li>{} - {}",
            encode_text(&movie.title),
            encode_text(&movie.year)
        ));
        if ctx.logged_in {
            body.push_str(&format!(
                " <a class=\"btn\" href=\"/movie/edit/{id}\">Edit</a>\n\
                 <form class=\"inline-form\" method=\"POST\" action=\"/movie/delete/{id}\">\n\
                 <input class=\"btn\" type=\"submit\" name=\"delete\" value=\"Delete\" \
                 onclick=\"return confirm('Are you sure?')\">\n</form>",
                id = movie.id
            ));
        }
        body.push_str("</li>\n");
    }

    body.push_str("</ul>");
    layout(ctx, &body)
}

pub fn login_page(ctx: &PageContext) -> String {
    let body = "<h3>Login</h3>\n\
         <form method=\"POST\" action=\"/login\">\n\
         Username <input type=\"text\" name=\"username\" required>\n\
         Password <input type=\"password\" name=\"password\" required>\n\
         <input class=\"btn\" type=\"submit\" name=\"submit\" value=\"Submit\">\n\
         </form>";
    layout(ctx, body)
}

pub fn settings_page(ctx: &PageContext, current_name: &str) -> String {
    let body = format!(
        "<h3>Settings</h3>\n\
         <form method=\"POST\" action=\"/settings\">\n\
         Your name <input type=\"text\" name=\"name\" value=\"{}\" required>\n\
         <input class=\"btn\" type=\"submit\" name=\"submit\" value=\"Save\">\n\
         </form>",
        encode_double_quoted_attribute(current_name)
    );
    layout(ctx, &body)
}

pub fn edit_page(ctx: &PageContext, movie: &Movie) -> String {
    let body = format!(
        "<h3>Edit item</h3>\n\
         <form method=\"POST\" action=\"/movie/edit/{}\">\n\
         Name <input type=\"text\" name=\"title\" value=\"{}\" required>\n\
         Year <input type=\"text\" name=\"year\" value=\"{}\" required>\n\
         <input class=\"btn\" type=\"submit\" name=\"submit\" value=\"Update\">\n\
         </form>",
        movie.id,
        encode_double_quoted_attribute(&movie.title),
        encode_double_quoted_attribute(&movie.year)
    );
    layout(ctx, &body)
}

fn error_page(heading: &str) -> String {
    let ctx = PageContext {
        owner: None,
        flashes: Vec::new(),
        logged_in: false,
    };
    let body = format!("<h3>{heading}</h3>\n<p><a href=\"/\">Go Back</a></p>");
    layout(&ctx, &body)
}

pub fn bad_request_page() -> String {
    error_page("Bad Request - 400")
}

pub fn not_found_page() -> String {
    error_page("Page Not Found - 404")
}

pub fn internal_error_page() -> String {
    error_page("Internal Server Error - 500")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anonymous_ctx() -> PageContext {
        PageContext {
            owner: Some("Test".to_string()),
            flashes: Vec::new(),
            logged_in: false,
        }
    }

    #[test]
    fn test_index_hides_controls_when_anonymous() {
        let movies = vec![Movie {
            id: 1,
            title: "Leon".to_string(),
            year: "1994".to_string(),
        }];

        let html = index_page(&anonymous_ctx(), &movies);
        assert!(html.contains("Test's Watchlist"));
        assert!(html.contains("Leon"));
        assert!(!html.contains("<form method=\"POST\">"));
        assert!(!html.contains("Logout"));
        assert!(!html.contains("Edit"));
    }

    #[test]
    fn test_index_escapes_titles() {
        let movies = vec![Movie {
            id: 1,
            title: "<script>alert(1)</script>".to_string(),
            year: "2019".to_string(),
        }];

        let html = index_page(&anonymous_ctx(), &movies);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_not_found_page_content() {
        let html = not_found_page();
        assert!(html.contains("Page Not Found - 404"));
        assert!(html.contains("Go Back"));
    }
}
