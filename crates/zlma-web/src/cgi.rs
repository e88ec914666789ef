//! CGI transport: reads the request from the environment and writes the
//! page to standard output.

use std::io::{self, Write};

use crate::config::ZlmaConfig;
use crate::handlers::{handle_request, Page, PageContext};
use crate::page::Response;
use crate::process::CommandRunner;
use crate::query::Query;

/// Environment variable holding the raw query string.
pub const QUERY_STRING: &str = "QUERY_STRING";

/// Render `page` for the current CGI request.
pub fn render(page: Page, config: &ZlmaConfig, runner: &dyn CommandRunner) -> Response {
    let raw = std::env::var(QUERY_STRING).unwrap_or_default();
    let query = Query::parse(&raw);
    let mut ctx = PageContext::new(config, runner);
    if config.diagnostics.dump_env {
        ctx = ctx.with_environment(std::env::vars().collect());
    }
    handle_request(page, &query, &ctx)
}

/// Write the CGI header block and the page.
///
/// A `Status` header is only sent for non-200 pages under `strict_status`;
/// otherwise the web server's default applies.
pub fn write_response<W: Write>(out: &mut W, response: &Response, strict_status: bool) -> io::Result<()> {
    let status = response.status_code(strict_status);
    if status != 200 {
        writeln!(out, "Status: {} {}", status, reason_phrase(status))?;
    }
    writeln!(out, "Content-Type: text/html")?;
    writeln!(out)?;
    out.write_all(response.body().as_bytes())?;
    out.flush()
}

/// Run one CGI request end to end. Returns the exit status for the process.
pub fn run(page: Page, config: &ZlmaConfig, runner: &dyn CommandRunner) -> io::Result<i32> {
    let response = render(page, config, runner);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_response(&mut out, &response, config.render.strict_status)?;
    Ok(response.exit_status())
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        500 => "Internal Server Error",
        _ => "OK",
    }
}
