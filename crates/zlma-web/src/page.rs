//! Page composition: the response buffer, document shell and navigation bar.
//!
//! A handler opens a [`Response`] with the page's [`Head`], appends its
//! content, and closes it with [`Response::finish`] or [`Response::reject`] /
//! [`Response::fail`]. Nothing is written anywhere until a transport takes
//! the finished buffer.

use std::borrow::Cow;
use std::fmt::Display;

use crate::config::SiteConfig;
use crate::process::INVOCATION_FAILURE_STATUS;

/// Background of the navigation buttons.
const NAV_GREEN: &str = "#8CFF66";
/// Background of the help button.
const HELP_YELLOW: &str = "#FFDB4D";

/// How a page ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Content rendered (external command failures included).
    Rendered,
    /// Input was rejected before anything ran.
    Rejected,
    /// An external command could not be run.
    Failed,
}

/// A finished or in-progress HTML page.
#[derive(Debug, Clone)]
pub struct Response {
    body: String,
    outcome: Outcome,
}

/// The `<head>` contents of a page.
#[derive(Debug, Clone, Default)]
pub struct Head {
    /// Document title.
    pub title: Option<String>,
    /// Script sources, in load order.
    pub scripts: Vec<String>,
    /// Favicon URL.
    pub icon: Option<String>,
    /// Stylesheet URLs.
    pub stylesheets: Vec<String>,
}

impl Head {
    /// A titled page with the common stylesheet.
    pub fn titled(title: impl Into<String>, site: &SiteConfig) -> Self {
        Self {
            title: Some(title.into()),
            stylesheets: vec![site.stylesheet.clone()],
            ..Self::default()
        }
    }

    /// The finder head: the editable-table script stack, favicon and icon font.
    pub fn finder(site: &SiteConfig) -> Self {
        Self {
            title: None,
            scripts: [
                "/jquery-3.7.1.slim.min.js",
                "/popper.min.js",
                "/bootstrap.min.js",
                "/bootstable.js",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            icon: Some("/finder.ico".to_string()),
            stylesheets: vec![site.stylesheet.clone(), "/glyphicons-free.css".to_string()],
        }
    }

    fn render(&self) -> String {
        let mut html = String::from("<head>");
        if let Some(title) = &self.title {
            html.push_str(&format!("<title>{title}</title>"));
        }
        html.push('\n');
        for src in &self.scripts {
            html.push_str(&format!(
                "<script type=\"text/javascript\" src=\"{src}\"></script>\n"
            ));
        }
        if let Some(icon) = &self.icon {
            html.push_str(&format!("<link rel=\"icon\" type=\"image/png\" href=\"{icon}\">\n"));
        }
        for href in &self.stylesheets {
            html.push_str(&format!("<link rel=\"stylesheet\" href=\"{href}\">\n"));
        }
        html.push_str("</head>\n");
        html
    }
}

impl Response {
    /// Open a page: doctype, head, body and the navigation bar whose help
    /// button points at `help_anchor`.
    pub fn begin(head: &Head, site: &SiteConfig, help_anchor: &str) -> Self {
        let mut body = String::from("<!DOCTYPE html>\n<html>");
        body.push_str(&head.render());
        body.push_str("<body>\n");
        body.push_str(&nav_buttons(site, help_anchor));
        Self {
            body,
            outcome: Outcome::Rendered,
        }
    }

    /// Append raw HTML.
    pub fn push(&mut self, html: &str) {
        self.body.push_str(html);
    }

    /// Append raw HTML and a newline.
    pub fn push_line(&mut self, html: &str) {
        self.body.push_str(html);
        self.body.push('\n');
    }

    /// Close the document.
    pub fn finish(mut self) -> Self {
        self.body.push_str("</body></html>\n");
        self
    }

    /// Render a rejection message and close the document.
    pub fn reject(mut self, message: &str) -> Self {
        self.push_line(&format!("<h3>{message}</h3>"));
        self.outcome = Outcome::Rejected;
        self.finish()
    }

    /// Render an invocation fault and close the document.
    pub fn fail(mut self, diagnostic: impl Display) -> Self {
        self.push_line(&format!("<h3>{diagnostic}</h3>"));
        self.outcome = Outcome::Failed;
        self.finish()
    }

    /// The HTML so far.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Take the HTML.
    pub fn into_body(self) -> String {
        self.body
    }

    /// How the page ended.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Exit status for a CGI process that served this page.
    pub fn exit_status(&self) -> i32 {
        match self.outcome {
            Outcome::Failed => INVOCATION_FAILURE_STATUS,
            Outcome::Rendered | Outcome::Rejected => 0,
        }
    }

    /// HTTP status. Always 200 unless `strict` maps failures to 400/500.
    pub fn status_code(&self, strict: bool) -> u16 {
        match (strict, self.outcome) {
            (true, Outcome::Rejected) => 400,
            (true, Outcome::Failed) => 500,
            _ => 200,
        }
    }
}

/// The row of navigation buttons shared by every page.
pub fn nav_buttons(site: &SiteConfig, help_anchor: &str) -> String {
    let mut html = String::from(
        "<br><table align=center border=\"0\" cellpadding=\"0\" cellspacing=\"0\"><tr>\n",
    );
    let buttons = [
        (site.commands_url.as_str(), "Commands"),
        (site.consoles_url.as_str(), "Consoles"),
        (site.finder_url.as_str(), "Finder"),
        (site.vif_url.as_str(), "Vif"),
    ];
    for (action, label) in buttons {
        html.push_str(&button(action, label, NAV_GREEN));
    }
    let help = format!("{}#{}", site.help_base_url, help_anchor);
    html.push_str(&button(&help, "Help", HELP_YELLOW));
    html.push_str("</tr></table>\n");
    html
}

fn button(action: &str, label: &str, color: &str) -> String {
    format!(
        "<td><form action='{action}' accept-charset=utf-8>\
         <button class=button style=\"background-color:{color}\">{label}</button>\
         </form></td>\n"
    )
}

/// A `<pre>` block listing `vars` as `KEY=value`, sorted by key.
pub fn environment_block(vars: &[(String, String)], escape: bool) -> String {
    let mut sorted: Vec<_> = vars.iter().collect();
    sorted.sort();
    let mut html = String::from("<pre>\n");
    for (key, value) in sorted {
        html.push_str(&echo(&format!("{key}={value}"), escape));
        html.push('\n');
    }
    html.push_str("</pre>\n");
    html
}

// ─────────────────────── Escaping ───────────────────────

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// `text` as it should appear on a page: verbatim, or escaped when asked.
pub fn echo(text: &str, escape: bool) -> Cow<'_, str> {
    if escape {
        escape_html(text)
    } else {
        Cow::Borrowed(text)
    }
}
