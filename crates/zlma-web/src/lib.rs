//! # zlma web pages
//!
//! CGI pages that present the `zlma` LPAR inventory and drive the `vif`
//! virtualization-control tool through HTML forms.
//!
//! ## Pages
//!
//! - **Finder**: search the inventory (`zlma query [-p pattern]`), refresh it
//!   (`zlma update`) and show the result as an editable table
//! - **Vif command**: run an allow-listed `vif <cmd> [<sub_cmd>]` and show
//!   its output in a green-screen block
//! - **Vif image set / hypervisor disk**: argument-gathering pages
//!
//! Every page is a pure function of its [`query::Query`] and a
//! [`handlers::PageContext`], returning a [`page::Response`] buffer. Two thin
//! transports write that buffer: [`cgi`] for a web server's CGI gateway, and
//! the axum router from [`build_router`] for local serving.
//!
//! ## Example
//!
//! ```rust,no_run
//! use zlma_web::handlers::{handle_request, Page, PageContext};
//! use zlma_web::process::SystemRunner;
//! use zlma_web::query::Query;
//! use zlma_web::ZlmaConfig;
//!
//! let config = ZlmaConfig::default();
//! let runner = SystemRunner::new(config.process.timeout());
//! let ctx = PageContext::new(&config, &runner);
//! let response = handle_request(Page::Finder, &Query::parse("pattern=lpar1"), &ctx);
//! print!("{}", response.body());
//! ```

#![forbid(unsafe_code)]

pub mod cgi;
pub mod commands;
pub mod config;
pub mod handlers;
pub mod page;
pub mod process;
pub mod query;
pub mod state;
pub mod table;
pub mod types;

pub use config::ZlmaConfig;
pub use state::AppState;

use std::sync::Arc;

use process::SystemRunner;

/// Build the Axum router serving every page with the system command runner.
pub fn build_router(config: ZlmaConfig) -> axum::Router {
    let runner = Arc::new(SystemRunner::new(config.process.timeout()));
    let state = Arc::new(AppState::new(config, runner));
    handlers::build_router(state)
}
