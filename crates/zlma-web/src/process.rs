//! External command invocation.
//!
//! Commands run synchronously from an argument vector; no shell is involved.
//! Standard output is captured for rendering. Standard error is drained and
//! logged but never shown on a page.

use std::fmt;
use std::io::Read;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::types::error::ProcessError;

/// Process exit status of a page whose command could not be run.
pub const INVOCATION_FAILURE_STATUS: i32 = 3;

/// How often a timed invocation checks whether the child has exited.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable path.
    pub program: String,
    /// Positional arguments.
    pub args: Vec<String>,
}

/// Outcome of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// Exit code; `-1` when the process was ended by a signal.
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
}

/// Runs invocations. Handlers only ever see this trait.
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` to completion.
    fn run(&self, invocation: &Invocation) -> std::result::Result<ProcessResult, ProcessError>;
}

/// Runs commands on the host with `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl Invocation {
    /// Start an invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl ProcessResult {
    /// True for exit code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Output lines, without line terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines()
    }

    /// Output as comma-separated records: one row per line, one field per
    /// comma. Fields are kept exactly, empty ones included.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.lines()
            .map(|line| line.split(',').map(str::to_string).collect())
            .collect()
    }
}

impl SystemRunner {
    /// A runner that kills commands running longer than `timeout`.
    /// `None` waits as long as the command takes.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> std::result::Result<ProcessResult, ProcessError> {
        let started = Instant::now();
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = match self.timeout {
            None => command
                .output()
                .map_err(|e| ProcessError::from_io(&invocation.program, e))?,
            Some(limit) => output_within(command, invocation, limit)?,
        };

        let exit_code = output.status.code().unwrap_or(-1);
        if !output.stderr.is_empty() {
            debug!(
                command = %invocation,
                stderr = %String::from_utf8_lossy(&output.stderr).trim_end(),
                "External command wrote to stderr"
            );
        }
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if exit_code == 0 {
            info!(command = %invocation, elapsed_ms, "External command finished");
        } else {
            warn!(command = %invocation, exit_code, elapsed_ms, "External command failed");
        }

        Ok(ProcessResult {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Spawn `command` and wait at most `limit` for it, draining both pipes on
/// helper threads so a chatty child cannot block on a full pipe.
fn output_within(
    mut command: Command,
    invocation: &Invocation,
    limit: Duration,
) -> std::result::Result<Output, ProcessError> {
    let mut child = command
        .spawn()
        .map_err(|e| ProcessError::from_io(&invocation.program, e))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_reader = thread::spawn(move || drain(stdout));
    let stderr_reader = thread::spawn(move || drain(stderr));

    let deadline = Instant::now() + limit;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                warn!(command = %invocation, timeout_s = limit.as_secs(), "External command killed after timeout");
                return Err(ProcessError::TimedOut {
                    command: invocation.to_string(),
                    seconds: limit.as_secs(),
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => {
                let _ = child.kill();
                return Err(ProcessError::Io {
                    program: invocation.program.clone(),
                    source,
                });
            }
        }
    };

    Ok(Output {
        status,
        stdout: stdout_reader.join().unwrap_or_default(),
        stderr: stderr_reader.join().unwrap_or_default(),
    })
}

fn drain(pipe: Option<impl Read>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh").args(["-c", script])
    }

    #[test]
    fn test_invocation_display() {
        let inv = Invocation::new("/usr/local/sbin/zlma").arg("query").args(["-p", "lpar1"]);
        assert_eq!(inv.to_string(), "/usr/local/sbin/zlma query -p lpar1");
        assert_eq!(Invocation::new("env").to_string(), "env");
    }

    #[test]
    fn test_rows_split_on_comma() {
        let result = ProcessResult {
            exit_code: 0,
            stdout: "host1,LPAR1,,10.0.0.1\nhost2,LPAR2\n".to_string(),
        };
        assert_eq!(
            result.rows(),
            vec![
                vec!["host1", "LPAR1", "", "10.0.0.1"],
                vec!["host2", "LPAR2"],
            ]
        );
        assert!(result.success());
    }

    #[test]
    fn test_rows_empty_output() {
        let result = ProcessResult {
            exit_code: 0,
            stdout: String::new(),
        };
        assert!(result.rows().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_stdout_only() {
        let runner = SystemRunner::new(None);
        let result = runner.run(&sh("printf 'a,b\\nc\\n'; echo noise >&2")).unwrap();
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "a,b\nc\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_non_zero_exit_is_not_an_error() {
        let runner = SystemRunner::new(None);
        let result = runner.run(&sh("echo partial; exit 4")).unwrap();
        assert_eq!(result.exit_code, 4);
        assert!(!result.success());
        assert_eq!(result.stdout, "partial\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_arguments_are_not_shell_parsed() {
        let runner = SystemRunner::new(None);
        let result = runner
            .run(&Invocation::new("echo").arg("a;b $(id) `x`"))
            .unwrap();
        assert_eq!(result.stdout, "a;b $(id) `x`\n");
    }

    #[test]
    fn test_system_runner_missing_executable() {
        let runner = SystemRunner::new(None);
        let err = runner
            .run(&Invocation::new("/nonexistent/zlma-web-test/zlma"))
            .unwrap_err();
        assert!(matches!(err, ProcessError::NotFound { .. }));

        let runner = SystemRunner::new(Some(Duration::from_secs(5)));
        let err = runner
            .run(&Invocation::new("/nonexistent/zlma-web-test/zlma"))
            .unwrap_err();
        assert!(matches!(err, ProcessError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_timeout_kills_child() {
        let runner = SystemRunner::new(Some(Duration::from_millis(200)));
        let started = Instant::now();
        let err = runner.run(&Invocation::new("sleep").arg("10")).unwrap_err();
        assert!(matches!(err, ProcessError::TimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_within_timeout() {
        let runner = SystemRunner::new(Some(Duration::from_secs(10)));
        let result = runner.run(&sh("echo done")).unwrap();
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "done\n");
    }
}
