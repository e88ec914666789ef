//! Page configuration: tool paths, process limits, rendering switches and site URLs.
//!
//! Every field defaults to the values the deployed pages use, so an absent
//! config file reproduces the stock site.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZlmaConfig {
    /// External tool locations.
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Process invocation limits.
    #[serde(default)]
    pub process: ProcessConfig,
    /// Output hardening switches.
    #[serde(default)]
    pub render: RenderConfig,
    /// Static asset and navigation URLs.
    #[serde(default)]
    pub site: SiteConfig,
    /// Finder table layout.
    #[serde(default)]
    pub finder: FinderConfig,
    /// Diagnostic page extras.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    /// Bind address for `zlma-web serve`.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Paths of the external command-line tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// The `zlma` inventory tool.
    #[serde(default = "default_zlma")]
    pub zlma: String,
    /// The `vif` control script.
    #[serde(default = "default_vif")]
    pub vif: String,
    /// Interpreter used to launch `vif`; `None` runs it directly.
    #[serde(default = "default_vif_interpreter")]
    pub vif_interpreter: Option<String>,
}

/// Limits applied to every external command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Kill the command after this many seconds. Unset waits forever.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

/// Output hardening. Both switches are off by default to keep the pages'
/// observable output unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// HTML-escape table cells, command output and echoed query values.
    #[serde(default)]
    pub escape_html: bool,
    /// Send 400 for rejected commands and 500 for invocation faults
    /// instead of the default 200.
    #[serde(default)]
    pub strict_status: bool,
}

/// URLs of shared assets and the navigation buttons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Common stylesheet.
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,
    /// Base of the help link; the page's anchor is appended after `#`.
    #[serde(default = "default_help_base_url")]
    pub help_base_url: String,
    /// "Commands" button target.
    #[serde(default = "default_commands_url")]
    pub commands_url: String,
    /// "Consoles" button target.
    #[serde(default = "default_consoles_url")]
    pub consoles_url: String,
    /// "Finder" button target.
    #[serde(default = "default_finder_url")]
    pub finder_url: String,
    /// "Vif" button target.
    #[serde(default = "default_vif_url")]
    pub vif_url: String,
    /// Action of the finder search form.
    #[serde(default = "default_finder_action")]
    pub finder_action: String,
}

/// Finder inventory table layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Column headers, in `zlma query` field order.
    #[serde(default = "default_finder_headers")]
    pub headers: Vec<String>,
    /// Zero-based columns the bootstable script makes editable.
    #[serde(default = "default_editable_columns")]
    pub editable_columns: Vec<usize>,
}

/// Extra diagnostic output on pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Prepend a dump of the process environment to every page.
    #[serde(default)]
    pub dump_env: bool,
}

/// Server binding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ZlmaConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

impl ProcessConfig {
    /// The timeout as a [`Duration`], if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            zlma: default_zlma(),
            vif: default_vif(),
            vif_interpreter: default_vif_interpreter(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            stylesheet: default_stylesheet(),
            help_base_url: default_help_base_url(),
            commands_url: default_commands_url(),
            consoles_url: default_consoles_url(),
            finder_url: default_finder_url(),
            vif_url: default_vif_url(),
            finder_action: default_finder_action(),
        }
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            headers: default_finder_headers(),
            editable_columns: default_editable_columns(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_zlma() -> String {
    "/usr/local/sbin/zlma".to_string()
}

fn default_vif() -> String {
    "/usr/local/sbin/vif".to_string()
}

fn default_vif_interpreter() -> Option<String> {
    Some("/srv/venv/bin/python3".to_string())
}

fn default_stylesheet() -> String {
    "/zlma.css".to_string()
}

fn default_help_base_url() -> String {
    "https://github.com/mike99mac/zlma".to_string()
}

fn default_commands_url() -> String {
    "/zlmarw/commands.py".to_string()
}

fn default_consoles_url() -> String {
    "/zlmarw/consolez.py".to_string()
}

fn default_finder_url() -> String {
    "/zlmarw/finder.py".to_string()
}

fn default_vif_url() -> String {
    "/zlma/vif.py".to_string()
}

fn default_finder_action() -> String {
    "/finder.py".to_string()
}

fn default_finder_headers() -> Vec<String> {
    [
        "Host name",
        "LPAR",
        "User ID",
        "IP address",
        "CPUs",
        "GB Mem",
        "Arch",
        "Common arch",
        "OS",
        "OS ver",
        "Kernel ver",
        "Kernel rel",
        "RootFS % full",
        "Last ping",
        "Created",
        "App",
        "Env",
        "Group",
        "Owner",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect()
}

fn default_editable_columns() -> Vec<usize> {
    // App, Env, Group, Owner
    vec![15, 16, 17, 18]
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}
