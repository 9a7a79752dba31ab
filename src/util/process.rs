//! Subprocess execution.
//!
//! Commands are described as a program, an argument vector and an
//! environment map; nothing is ever passed through a shell. Execution goes
//! through [`ProcessExecutor`] so recipes can be driven against a recording
//! executor in tests.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::util::env::BuildEnv;

/// Builder for subprocess execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set every variable of a build environment.
    pub fn envs(mut self, env: &BuildEnv) -> Self {
        for (key, value) in env.iter() {
            self.env.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    pub fn get_program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    pub fn get_envs(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(&self.env);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command and wait for completion.
    pub fn exec(&self) -> Result<ProcessOutput> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("running `{}`", self.display_command());

        let output = cmd
            .output()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        Ok(ProcessOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Exit code; `None` when terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Last `lines` lines of stderr, for error reports.
    pub fn stderr_tail(&self, lines: usize) -> String {
        let all: Vec<&str> = self.stderr.lines().collect();
        let start = all.len().saturating_sub(lines);
        all[start..].join("\n")
    }
}

/// Runs processes on behalf of the build steps.
///
/// `Err` means the process could not be started at all; a non-zero exit is
/// reported through [`ProcessOutput::status`] and judged by the caller.
pub trait ProcessExecutor {
    fn execute(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput>;
}

/// Executor that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl ProcessExecutor for SystemExecutor {
    fn execute(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        let output = cmd.exec()?;
        if !output.stdout.is_empty() {
            tracing::trace!("{}", output.stdout);
        }
        Ok(output)
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
