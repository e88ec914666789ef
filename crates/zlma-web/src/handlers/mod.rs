//! Page handlers and the router that serves them.
//!
//! Each page is a synchronous `fn(&Query, &PageContext) -> Response`. The
//! CGI transport calls [`handle_request`] directly; the router runs the same
//! call on a blocking thread per request.

pub mod finder;
pub mod vif;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::commands::CommandSpec;
use crate::config::ZlmaConfig;
use crate::page::{echo, environment_block, Response};
use crate::process::{CommandRunner, Invocation, ProcessResult};
use crate::query::Query;
use crate::state::AppState;
use crate::types::error::{ProcessError, ServeError};

/// The pages this crate serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// Inventory search and refresh.
    Finder,
    /// Run an allow-listed `vif` command.
    VifCmd,
    /// Gather arguments for `vif image set`.
    VifImageSet,
    /// Gather arguments for `vif hypervisor disk`.
    VifHypervisorDisk,
}

/// Everything a page needs besides its query.
pub struct PageContext<'a> {
    /// Page configuration.
    pub config: &'a ZlmaConfig,
    /// Runner for external commands.
    pub runner: &'a dyn CommandRunner,
    /// The `vif` allow-list.
    pub commands: CommandSpec,
    environment: Vec<(String, String)>,
}

/// A page name that is not one of [`Page::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPage(pub String);

impl Page {
    /// Every page, in navigation order.
    pub const ALL: [Page; 4] = [
        Page::Finder,
        Page::VifCmd,
        Page::VifImageSet,
        Page::VifHypervisorDisk,
    ];

    /// Page id used on the command line and in routes.
    pub fn name(self) -> &'static str {
        match self {
            Page::Finder => "finder",
            Page::VifCmd => "vif-cmd",
            Page::VifImageSet => "vif-image-set",
            Page::VifHypervisorDisk => "vif-hypervisor-disk",
        }
    }

    /// Anchor of this page's section in the help document.
    pub fn help_anchor(self) -> &'static str {
        match self {
            Page::Finder => "finder",
            Page::VifCmd | Page::VifImageSet | Page::VifHypervisorDisk => "using-vif",
        }
    }

    /// Path of the script this page replaces, kept routable so existing
    /// links and forms keep working.
    pub fn script_path(self) -> &'static str {
        match self {
            Page::Finder => "/zlmarw/finder.py",
            Page::VifCmd => "/zlmarw/vifcmd.py",
            Page::VifImageSet => "/zlmarw/vifimgset.py",
            Page::VifHypervisorDisk => "/zlmarw/vifhypdisk.py",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Page {
    type Err = UnknownPage;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|page| page.name() == s)
            .ok_or_else(|| UnknownPage(s.to_string()))
    }
}

impl fmt::Display for UnknownPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = Page::ALL.iter().map(|p| p.name()).collect();
        write!(f, "unknown page '{}' (expected one of: {})", self.0, names.join(", "))
    }
}

impl std::error::Error for UnknownPage {}

impl<'a> PageContext<'a> {
    /// Context with the `vif` allow-list and no environment dump.
    pub fn new(config: &'a ZlmaConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            commands: CommandSpec::vif(),
            environment: Vec::new(),
        }
    }

    /// Environment shown when `[diagnostics] dump_env` is on.
    pub fn with_environment(mut self, environment: Vec<(String, String)>) -> Self {
        self.environment = environment;
        self
    }

    /// `text` verbatim, or escaped when `[render] escape_html` is on.
    pub fn echo<'t>(&self, text: &'t str) -> std::borrow::Cow<'t, str> {
        echo(text, self.config.render.escape_html)
    }

    /// Run one external command.
    pub fn run(&self, invocation: &Invocation) -> std::result::Result<ProcessResult, ProcessError> {
        tracing::debug!(command = %invocation, "Running external command");
        self.runner.run(invocation)
    }

    /// Append the environment dump if it is enabled.
    pub fn write_environment(&self, response: &mut Response) {
        if self.config.diagnostics.dump_env {
            response.push(&environment_block(
                &self.environment,
                self.config.render.escape_html,
            ));
        }
    }
}

/// Render `page` for `query`.
pub fn handle_request(page: Page, query: &Query, ctx: &PageContext<'_>) -> Response {
    tracing::info!(page = %page, params = query.len(), "Handling page request");
    match page {
        Page::Finder => finder::handle(query, ctx),
        Page::VifCmd => vif::command(query, ctx),
        Page::VifImageSet => vif::image_set(query, ctx),
        Page::VifHypervisorDisk => vif::hypervisor_disk(query, ctx),
    }
}

/// Diagnostic embedded in a page when a command exits non-zero.
pub fn non_zero_exit_message(invocation: &Invocation, exit_code: i32) -> String {
    format!("Command '{invocation}' returned {exit_code}")
}

// ─────────────────────── HTTP routes ───────────────────────

/// Build the router: each page at `/<name>` and at its legacy script path.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router: Router<Arc<AppState>> = Router::new();
    for page in Page::ALL {
        let route = get(
            move |State(state): State<Arc<AppState>>, RawQuery(raw): RawQuery| {
                serve_page(state, page, raw)
            },
        );
        router = router
            .route(&format!("/{}", page.name()), route.clone())
            .route(page.script_path(), route);
    }
    router.with_state(state)
}

/// Run a page on the blocking pool and wrap its HTML.
async fn serve_page(
    state: Arc<AppState>,
    page: Page,
    raw: Option<String>,
) -> std::result::Result<axum::response::Response, ServeError> {
    let strict = state.config.render.strict_status;
    let response = tokio::task::spawn_blocking(move || {
        let query = Query::parse(raw.as_deref().unwrap_or_default());
        let mut ctx = PageContext::new(&state.config, state.runner.as_ref());
        if state.config.diagnostics.dump_env {
            ctx = ctx.with_environment(std::env::vars().collect());
        }
        handle_request(page, &query, &ctx)
    })
    .await?;

    let status = StatusCode::from_u16(response.status_code(strict)).unwrap_or(StatusCode::OK);
    Ok((
        status,
        [(header::CONTENT_TYPE, "text/html")],
        response.into_body(),
    )
        .into_response())
}
