//! `vif` command allow-list and validation.
//!
//! Only commands and subcommands listed in [`VIF_COMMANDS`] ever reach the
//! `vif` argument vector. Anything else is rejected before a process is
//! started.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::types::error::ValidationError;

// ─────────────────────── Allow-list ───────────────────────

/// Every `vif` command the pages may run, with its allowed subcommands.
pub const VIF_COMMANDS: &[(&str, &[&str])] = &[
    (
        "hypervisor",
        &[
            "collect", "errors", "export", "import", "restart", "service", "shutdown", "verify",
            "volume",
        ],
    ),
    (
        "image",
        &["create", "delete", "network", "set", "start", "stop", "stopall"],
    ),
    ("disk", &["copy", "create", "delete", "share"]),
    (
        "query",
        &[
            "active",
            "all",
            "configuration",
            "disks",
            "errors",
            "image",
            "level",
            "network",
            "paging",
            "performance",
            "shared",
            "volumes",
        ],
    ),
];

/// Command name → allowed subcommands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    commands: BTreeMap<&'static str, BTreeSet<&'static str>>,
}

/// A command that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCommand {
    cmd: String,
    sub_cmd: Option<String>,
}

// ─────────────────────── Validation ───────────────────────

impl CommandSpec {
    /// The `vif` allow-list.
    pub fn vif() -> Self {
        Self::from_table(VIF_COMMANDS)
    }

    /// Build an allow-list from a static table. Commands with no subcommands are
    /// left out, since they could never be described by the table.
    pub fn from_table(table: &[(&'static str, &[&'static str])]) -> Self {
        let commands = table
            .iter()
            .filter(|(_, subs)| !subs.is_empty())
            .map(|(cmd, subs)| (*cmd, subs.iter().copied().collect()))
            .collect();
        Self { commands }
    }

    /// Check `cmd` and an optional `sub_cmd` (empty means none).
    ///
    /// An empty subcommand is always accepted for a known command.
    pub fn validate(
        &self,
        cmd: &str,
        sub_cmd: &str,
    ) -> std::result::Result<ValidatedCommand, ValidationError> {
        let allowed = self
            .commands
            .get(cmd)
            .ok_or_else(|| ValidationError::UnknownCommand {
                cmd: cmd.to_string(),
            })?;

        if sub_cmd.is_empty() {
            return Ok(ValidatedCommand {
                cmd: cmd.to_string(),
                sub_cmd: None,
            });
        }

        if !allowed.contains(sub_cmd) {
            return Err(ValidationError::UnknownSubcommand {
                cmd: cmd.to_string(),
                sub_cmd: sub_cmd.to_string(),
            });
        }

        Ok(ValidatedCommand {
            cmd: cmd.to_string(),
            sub_cmd: Some(sub_cmd.to_string()),
        })
    }

    /// Known command names, sorted.
    pub fn commands(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// Allowed subcommands of `cmd`, sorted.
    pub fn subcommands(&self, cmd: &str) -> Option<impl Iterator<Item = &'static str> + '_> {
        self.commands.get(cmd).map(|subs| subs.iter().copied())
    }
}

impl ValidatedCommand {
    /// The command name.
    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    /// The subcommand, if one was given.
    pub fn sub_cmd(&self) -> Option<&str> {
        self.sub_cmd.as_deref()
    }

    /// Positional arguments for the `vif` process.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.cmd.clone()];
        args.extend(self.sub_cmd.clone());
        args
    }
}

impl fmt::Display for ValidatedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub_cmd {
            Some(sub_cmd) => write!(f, "vif {} {}", self.cmd, sub_cmd),
            None => write!(f, "vif {}", self.cmd),
        }
    }
}
