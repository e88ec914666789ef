//! Finder: search and refresh the LPAR inventory.
//!
//! - `pattern=<text>` runs `zlma query -p <text>`
//! - no pattern runs `zlma query`
//! - `action=update` runs `zlma update` first, then the search
//!
//! `zlma query` prints one comma-separated record per line; each becomes a
//! row of the editable inventory table.

use crate::handlers::{non_zero_exit_message, Page, PageContext};
use crate::page::{Head, Response};
use crate::process::Invocation;
use crate::query::{Action, Query};
use crate::table::TableRenderer;

/// `id` of the inventory table, targeted by the editing script.
pub const TABLE_ID: &str = "zlma-table";

/// Longest pattern the search box accepts.
const PATTERN_MAX_LEN: usize = 60;

/// Render the finder page.
pub fn handle(query: &Query, ctx: &PageContext<'_>) -> Response {
    let site = &ctx.config.site;
    let mut response = Response::begin(&Head::finder(site), site, Page::Finder.help_anchor());
    ctx.write_environment(&mut response);
    response.push_line("<h1>Finder search</h1>");

    if query.action() == Some(Action::Update) {
        let update = update_invocation(ctx);
        match ctx.run(&update) {
            Ok(result) if !result.success() => {
                // The refresh is best effort; the search below still runs.
                tracing::warn!(command = %update, exit_code = result.exit_code, "Inventory update failed");
            }
            Ok(_) => {}
            Err(err) => return response.fail(ctx.echo(&err.to_string())),
        }
    }

    let pattern = query.pattern();
    let search = search_invocation(ctx, pattern);
    let result = match ctx.run(&search) {
        Ok(result) => result,
        Err(err) => return response.fail(ctx.echo(&err.to_string())),
    };
    if !result.success() {
        response.push_line(&format!(
            "<p>{}</p>",
            ctx.echo(&non_zero_exit_message(&search, result.exit_code))
        ));
    }
    let rows = result.rows();
    tracing::debug!(pattern, rows = rows.len(), "Inventory search complete");

    response.push_line(&format!(
        "<form action=\"{}\" method=\"get\" enctype=\"multipart/form-data\">",
        site.finder_action
    ));
    response.push_line(&format!(
        "  Search pattern: <input maxlength=\"{PATTERN_MAX_LEN}\" size=\"{PATTERN_MAX_LEN}\" value=\"\" name=\"pattern\">"
    ));
    response.push_line("  <input value=\"Submit\" type=\"submit\">");
    response.push_line("</form><br>");

    if !pattern.is_empty() {
        response.push_line(&format!(
            "Current search pattern: {}<br><br>",
            ctx.echo(pattern)
        ));
    }

    let table = TableRenderer::new()
        .with_id(TABLE_ID)
        .escaping(ctx.config.render.escape_html)
        .render(&ctx.config.finder.headers, &rows);
    response.push_line(&table);

    let columns: Vec<String> = ctx
        .config
        .finder
        .editable_columns
        .iter()
        .map(usize::to_string)
        .collect();
    response.push_line("<script>");
    response.push_line(&format!(
        "$(\"#{TABLE_ID}\").SetEditable({{columnsEd: \"{}\", onEdit:function(){{}}}})",
        columns.join(",")
    ));
    response.push_line("</script>");
    response.finish()
}

/// `zlma query`, with `-p <pattern>` when a pattern was given.
pub fn search_invocation(ctx: &PageContext<'_>, pattern: &str) -> Invocation {
    let invocation = Invocation::new(&ctx.config.tools.zlma).arg("query");
    if pattern.is_empty() {
        invocation
    } else {
        invocation.args(["-p", pattern])
    }
}

/// `zlma update`.
pub fn update_invocation(ctx: &PageContext<'_>) -> Invocation {
    Invocation::new(&ctx.config.tools.zlma).arg("update")
}
