//! Shared helpers for the page integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use zlma_web::process::{CommandRunner, Invocation, ProcessResult};
use zlma_web::types::ProcessError;

/// Scripted outcome of one fake invocation.
pub enum Scripted {
    /// The command ran and exited with this code and output.
    Exit(i32, &'static str),
    /// The command could not be started.
    Missing,
}

/// A runner that records every invocation and replays scripted outcomes in
/// order. Once the script runs out it answers `exit 0` with no output.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    script: Mutex<VecDeque<Scripted>>,
}

impl RecordingRunner {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    /// Every invocation so far.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Argument vectors of every invocation so far.
    pub fn call_args(&self) -> Vec<Vec<String>> {
        self.calls().into_iter().map(|inv| inv.args).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessResult, ProcessError> {
        self.calls.lock().unwrap().push(invocation.clone());
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Exit(exit_code, stdout)) => Ok(ProcessResult {
                exit_code,
                stdout: stdout.to_string(),
            }),
            Some(Scripted::Missing) => Err(ProcessError::NotFound {
                program: invocation.program.clone(),
            }),
            None => Ok(ProcessResult {
                exit_code: 0,
                stdout: String::new(),
            }),
        }
    }
}

/// Data cells of a rendered table, row by row, in document order.
///
/// Only understands the markup the table renderer writes: one `<tr>` per
/// row and one `<td>...</td>` per cell.
pub fn table_cells(html: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for row in html.split("<tr>").skip(1) {
        let row = row.split("</tr>").next().unwrap_or_default();
        if row.contains("<th>") {
            continue;
        }
        let cells = row
            .split("<td>")
            .skip(1)
            .map(|cell| cell.split("</td>").next().unwrap_or_default().to_string())
            .collect();
        rows.push(cells);
    }
    rows
}
