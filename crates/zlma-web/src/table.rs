//! HTML table rendering.
//!
//! Cells are written exactly as given unless escaping is switched on; rows
//! of different lengths are rendered as they are, never padded or cut.

use std::fmt::Write;

use crate::page::echo;

/// Renders a header row and data rows as an HTML `<table>`.
#[derive(Debug, Clone, Default)]
pub struct TableRenderer {
    id: Option<String>,
    escape: bool,
}

impl TableRenderer {
    /// A renderer for an anonymous, unescaped table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table's `id` attribute.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// HTML-escape headers and cells.
    pub fn escaping(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    /// Render `headers` as one `<th>` each, then one `<tr>` per row with one
    /// `<td>` per field.
    pub fn render<H, C>(&self, headers: &[H], rows: &[Vec<C>]) -> String
    where
        H: AsRef<str>,
        C: AsRef<str>,
    {
        let mut html = String::new();
        match &self.id {
            Some(id) => {
                let _ = writeln!(html, "<table id='{id}'>");
            }
            None => html.push_str("<table>\n"),
        }
        html.push_str("<tr>\n");
        for header in headers {
            let _ = writeln!(html, "  <th>{}</th>", echo(header.as_ref(), self.escape));
        }
        html.push_str("</tr>\n");
        for row in rows {
            html.push_str("<tr>\n");
            for cell in row {
                let _ = writeln!(html, "  <td>{}</td>", echo(cell.as_ref(), self.escape));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>");
        html
    }
}

/// Render a table with no attributes and no escaping.
pub fn render<H, C>(headers: &[H], rows: &[Vec<C>]) -> String
where
    H: AsRef<str>,
    C: AsRef<str>,
{
    TableRenderer::new().render(headers, rows)
}

/// A one-cell "green screen" table holding preformatted command output.
pub fn green_screen(text: &str) -> String {
    format!("<table class=\"greenScreenTable\"><tr><td><pre>{text}</pre></td></tr></table>\n")
}

/// A one-cell plain table holding preformatted text.
pub fn preformatted(text: &str) -> String {
    format!("<table><tr><td><pre>{text}</pre></td></tr></table>\n")
}
