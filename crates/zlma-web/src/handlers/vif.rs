//! vif pages: run `vif` commands and gather arguments for the ones that
//! need more than a command and subcommand.

use crate::handlers::{non_zero_exit_message, Page, PageContext};
use crate::page::{Head, Response};
use crate::process::Invocation;
use crate::query::Query;
use crate::table::{green_screen, preformatted};

/// Syntax of `vif hypervisor disk`, shown until the page gathers its arguments.
const HYPERVISOR_DISK_SYNTAX: &str = "Vif syntax: ADD IMAGE|PAGING device volid\n            DELete IMAGE|PAGING device|volid";

/// Run `vif <cmd> [<sub_cmd>]` and show its output.
///
/// The pair is checked against the allow-list first; a rejected pair ends
/// the page with a message and nothing is run.
pub fn command(query: &Query, ctx: &PageContext<'_>) -> Response {
    let site = &ctx.config.site;
    let mut response = Response::begin(
        &Head::titled("Run a vif command", site),
        site,
        Page::VifCmd.help_anchor(),
    );
    ctx.write_environment(&mut response);

    let validated = match ctx.commands.validate(query.cmd(), query.sub_cmd()) {
        Ok(validated) => validated,
        Err(err) => {
            tracing::warn!(cmd = query.cmd(), sub_cmd = query.sub_cmd(), error = %err, "Rejected vif command");
            return response.reject(&ctx.echo(&err.to_string()));
        }
    };

    let invocation = vif_invocation(ctx, validated.args());
    let mut output = format!("Running command: {validated}\n");
    match ctx.run(&invocation) {
        Ok(result) if result.success() => output.push_str(&result.stdout),
        Ok(result) => output.push_str(&non_zero_exit_message(&invocation, result.exit_code)),
        Err(err) => return response.fail(ctx.echo(&err.to_string())),
    }

    response.push(&green_screen(&ctx.echo(&output)));
    response.finish()
}

/// `vif image set` needs memory/CPU amounts the page does not ask for yet.
pub fn image_set(query: &Query, ctx: &PageContext<'_>) -> Response {
    let site = &ctx.config.site;
    let mut response = Response::begin(
        &Head::titled("Run vif image set", site),
        site,
        Page::VifImageSet.help_anchor(),
    );
    ctx.write_environment(&mut response);

    let text = format!(
        "Arguments for 'vif image set {}' are not gathered yet: how much memory/CPU to add/delete?\n",
        ctx.echo(query.sub_cmd())
    );
    response.push(&preformatted(&text));
    response.finish()
}

/// `vif hypervisor disk` needs device and volume ids the page does not ask
/// for yet; show the command syntax instead.
pub fn hypervisor_disk(_query: &Query, ctx: &PageContext<'_>) -> Response {
    let site = &ctx.config.site;
    let mut response = Response::begin(
        &Head::titled("Run vif hypervisor disk", site),
        site,
        Page::VifHypervisorDisk.help_anchor(),
    );
    ctx.write_environment(&mut response);

    let text = format!(
        "Arguments for 'vif hypervisor disk' are not gathered yet.\n{HYPERVISOR_DISK_SYNTAX}"
    );
    response.push(&preformatted(&text));
    response.finish()
}

/// `[<interpreter>] <vif> <args...>`.
pub fn vif_invocation(ctx: &PageContext<'_>, args: Vec<String>) -> Invocation {
    let tools = &ctx.config.tools;
    match &tools.vif_interpreter {
        Some(interpreter) => Invocation::new(interpreter).arg(&tools.vif).args(args),
        None => Invocation::new(&tools.vif).args(args),
    }
}
