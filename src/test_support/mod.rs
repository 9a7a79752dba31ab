//! Test utilities and mocks for Anchorage unit tests.
//!
//! The build steps never spawn processes directly; they go through a
//! [`ProcessExecutor`]. [`MockExecutor`] records every invocation and answers
//! from scripted expectations, so recipes can be driven end to end without
//! autotools or apt on the machine.
//!
//! # Example
//!
//! ```rust,ignore
//! use anchorage::test_support::{MockExecutor, MockProcessOutput};
//!
//! let exec = MockExecutor::new();
//! exec.expect_prefix("make", MockProcessOutput::failure(2, "cc1: error"));
//! exec.set_default(MockProcessOutput::success(""));
//! ```

pub mod fixtures;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::util::process::{ProcessBuilder, ProcessExecutor, ProcessOutput};

pub use fixtures::*;

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code; `None` simulates termination by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status: Some(status),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Output of a process killed by a signal.
    pub fn killed() -> Self {
        MockProcessOutput {
            status: None,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

impl From<MockProcessOutput> for ProcessOutput {
    fn from(mock: MockProcessOutput) -> Self {
        ProcessOutput {
            status: mock.status,
            stdout: mock.stdout,
            stderr: mock.stderr,
        }
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match using a regex pattern.
    Regex(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(cmd))
                .unwrap_or(false),
            CommandPattern::Any => true,
        }
    }
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    pub pattern: CommandPattern,
    pub output: MockProcessOutput,
    /// Number of times this expectation can be used (None = unlimited).
    pub times: Option<usize>,
    pub used: usize,
}

impl CommandExpectation {
    pub fn new(pattern: CommandPattern, output: MockProcessOutput) -> Self {
        CommandExpectation {
            pattern,
            output,
            times: None,
            used: 0,
        }
    }

    /// Set the number of times this expectation can be used.
    pub fn times(mut self, n: usize) -> Self {
        self.times = Some(n);
        self
    }

    fn available(&self) -> bool {
        match self.times {
            Some(n) => self.used < n,
            None => true,
        }
    }
}

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Program and arguments joined by spaces.
    pub command: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub cwd: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct MockState {
    expectations: Vec<CommandExpectation>,
    calls: Vec<RecordedCall>,
    default_output: Option<MockProcessOutput>,
    spawn_failures: Vec<CommandPattern>,
}

/// Mock process executor.
///
/// Expectations are matched in insertion order against the command string
/// (`program arg1 arg2 ...`). Commands that match nothing get the default
/// output, or fail to "spawn" when no default is set.
#[derive(Debug, Default)]
pub struct MockExecutor {
    state: Mutex<MockState>,
}

impl MockExecutor {
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// Executor that answers every command with success.
    pub fn succeeding() -> Self {
        let exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success(""));
        exec
    }

    fn push(&self, expectation: CommandExpectation) -> &Self {
        self.lock().expectations.push(expectation);
        self
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandExpectation::new(
            CommandPattern::Contains(substring.to_string()),
            output,
        ))
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&self, expectation: CommandExpectation) -> &Self {
        self.push(expectation)
    }

    /// Make matching commands fail to start, as if the program were missing.
    pub fn fail_to_spawn(&self, pattern: CommandPattern) -> &Self {
        self.lock().spawn_failures.push(pattern);
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        self.lock().default_output = Some(output);
        self
    }

    /// All recorded invocations, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Recorded command strings, in order.
    pub fn commands(&self) -> Vec<String> {
        self.lock().calls.iter().map(|c| c.command.clone()).collect()
    }

    /// First recorded call whose command starts with `prefix`.
    pub fn find_call(&self, prefix: &str) -> Option<RecordedCall> {
        self.lock()
            .calls
            .iter()
            .find(|c| c.command.starts_with(prefix))
            .cloned()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Verify that all expectations with a specific count were satisfied.
    pub fn verify(&self) -> Result<()> {
        for (i, exp) in self.lock().expectations.iter().enumerate() {
            if let Some(expected) = exp.times {
                if exp.used != expected {
                    bail!(
                        "expectation {} was used {} times, expected {}",
                        i,
                        exp.used,
                        expected
                    );
                }
            }
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProcessExecutor for MockExecutor {
    fn execute(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        let command = cmd.display_command();
        let mut state = self.lock();

        state.calls.push(RecordedCall {
            command: command.clone(),
            program: cmd.get_program().to_path_buf(),
            args: cmd.get_args().to_vec(),
            env: cmd.get_envs().clone(),
            cwd: cmd.get_cwd().map(PathBuf::from),
        });

        if state.spawn_failures.iter().any(|p| p.matches(&command)) {
            bail!("failed to spawn `{}`", cmd.get_program().display());
        }

        for exp in &mut state.expectations {
            if exp.pattern.matches(&command) && exp.available() {
                exp.used += 1;
                return Ok(exp.output.clone().into());
            }
        }

        if let Some(ref default) = state.default_output {
            return Ok(default.clone().into());
        }

        bail!("unexpected command: {}", command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_expectations() {
        let exec = MockExecutor::new();
        exec.expect("make", MockProcessOutput::failure(2, "boom"));
        exec.expect_prefix("apt-get", MockProcessOutput::success("ok"));

        let out = exec.execute(&ProcessBuilder::new("make")).unwrap();
        assert_eq!(out.status, Some(2));

        let out = exec
            .execute(&ProcessBuilder::new("apt-get").arg("update"))
            .unwrap();
        assert!(out.success());

        assert!(exec.execute(&ProcessBuilder::new("cmake")).is_err());
        assert_eq!(exec.commands(), vec!["make", "apt-get update", "cmake"]);
    }

    #[test]
    fn test_mock_executor_limited_expectation() {
        let exec = MockExecutor::succeeding();
        exec.expect_pattern(
            CommandExpectation::new(
                CommandPattern::Contains("install".to_string()),
                MockProcessOutput::failure(100, "E: Unable to locate package"),
            )
            .times(1),
        );

        let cmd = ProcessBuilder::new("apt-get").arg("install");
        assert!(!exec.execute(&cmd).unwrap().success());
        assert!(exec.execute(&cmd).unwrap().success());
        exec.verify().unwrap();
    }

    #[test]
    fn test_mock_executor_records_env_and_cwd() {
        let exec = MockExecutor::succeeding();
        exec.execute(
            &ProcessBuilder::new("./autogen.sh")
                .env("NOCONFIGURE", "1")
                .cwd("/tmp/src"),
        )
        .unwrap();

        let call = exec.find_call("./autogen.sh").unwrap();
        assert_eq!(call.env.get("NOCONFIGURE").map(String::as_str), Some("1"));
        assert_eq!(call.cwd, Some(PathBuf::from("/tmp/src")));
    }

    #[test]
    fn test_mock_executor_spawn_failure() {
        let exec = MockExecutor::succeeding();
        exec.fail_to_spawn(CommandPattern::StartsWith("apt-get".to_string()));
        assert!(exec.execute(&ProcessBuilder::new("apt-get")).is_err());
        assert!(exec.execute(&ProcessBuilder::new("make")).is_ok());
    }

    #[test]
    fn test_command_pattern_regex() {
        let pattern = CommandPattern::Regex(r"^make( install)?$".to_string());
        assert!(pattern.matches("make"));
        assert!(pattern.matches("make install"));
        assert!(!pattern.matches("cmake"));
    }
}
