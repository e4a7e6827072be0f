//! Display string for a recommendation: linked title, authors, venue in italics, year.
//!
//! Substitution is raw by default. Recommendation text is taken as trusted, so a
//! payload containing markup is rendered as markup unless escaping is switched on.

const FONT_OPEN: &str = "<font color=#000000 size=4 face=Arial, Helvetica, sans-serif>";

pub struct DisplayFields<'a> {
    /// Already carries its terminal period when the recommendation had a url.
    pub url: &'a str,
    pub title: &'a str,
    pub authors: &'a str,
    pub journal: &'a str,
    pub year: &'a str,
}

pub fn render_html(fields: &DisplayFields<'_>, escape: bool) -> String {
    let sub = |s: &str| if escape { escape_html(s) } else { s.to_string() };
    format!(
        "<a href='{url}'>{FONT_OPEN}{title}</font></a>. {FONT_OPEN}{authors} <i>{journal}</i> {year}</font>",
        url = sub(fields.url),
        title = sub(fields.title),
        authors = sub(fields.authors),
        journal = sub(fields.journal),
        year = sub(fields.year),
    )
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
