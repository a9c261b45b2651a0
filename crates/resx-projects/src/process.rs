//! Subprocess invocation
//!
//! Commands run as argument arrays, never through a shell, so project
//! names and paths cannot be reinterpreted by a command interpreter.
//! A non-zero exit is not an error at this layer: callers get the
//! captured output either way and decide what to surface.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{info, warn};

/// Cap on captured stdout/stderr per invocation
const MAX_OUTPUT: usize = 256 * 1024;

/// Captured result of a finished subprocess
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub success: bool,
}

/// Abstraction over subprocess execution, injectable for tests
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in `cwd`, blocking until exit
    async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput>;
}

/// Real runner backed by `tokio::process::Command`
pub struct ProcessRunner {
    working_dir: PathBuf,
}

impl ProcessRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Runner rooted at the current working directory
    pub fn current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

async fn drain_pipe<R>(pipe: Option<R>) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut out = String::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_string(&mut out).await?;
    }
    Ok(out)
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        info!(program = %program, args = ?args, cwd = %cwd.display(), "Executing command");

        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| anyhow::anyhow!("Failed to spawn {}: {}", program, e))?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        // Drain both pipes together: a child blocked writing one stream
        // while the other is still open must not stall the read.
        let (stdout, stderr) = tokio::join!(drain_pipe(stdout_pipe), drain_pipe(stderr_pipe));
        let mut stdout = stdout.map_err(|e| anyhow::anyhow!("Failed to read stdout: {}", e))?;
        let mut stderr = stderr.map_err(|e| anyhow::anyhow!("Failed to read stderr: {}", e))?;

        let status = child
            .wait()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to wait for {}: {}", program, e))?;

        let exit_code = status.code().unwrap_or(-1);

        // Truncate if needed
        if stdout.len() > MAX_OUTPUT {
            stdout.truncate(MAX_OUTPUT);
            stdout.push_str("\n... (output truncated)");
        }
        if stderr.len() > MAX_OUTPUT {
            stderr.truncate(MAX_OUTPUT);
            stderr.push_str("\n... (output truncated)");
        }

        if exit_code != 0 {
            warn!(
                program = %program,
                exit_code = %exit_code,
                stderr = %stderr.lines().last().unwrap_or(""),
                "Command exited non-zero"
            );
        }

        Ok(CommandOutput {
            stdout,
            stderr,
            exit_code,
            success: exit_code == 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let runner = ProcessRunner::current_dir().unwrap();
        let out = runner
            .run("echo", &["hello", "world"], runner.working_dir())
            .await
            .unwrap();
        assert!(out.success);
        assert_eq!(out.exit_code, 0);
        assert!(out.stdout.contains("hello world"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error() {
        let runner = ProcessRunner::current_dir().unwrap();
        let out = runner
            .run("false", &[], runner.working_dir())
            .await
            .unwrap();
        assert!(!out.success);
        assert_ne!(out.exit_code, 0);
    }

    #[tokio::test]
    async fn test_large_stderr_does_not_stall_stdout() {
        let runner = ProcessRunner::current_dir().unwrap();
        // Fill stderr well past the OS pipe buffer while stdout is
        // still open, then write stdout last.
        let script = "head -c 200000 /dev/zero | tr '\\0' e 1>&2; echo done";
        let out = runner
            .run("sh", &["-c", script], runner.working_dir())
            .await
            .unwrap();
        assert!(out.success);
        assert!(out.stdout.contains("done"));
        assert!(out.stderr.len() >= 200_000);
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let runner = ProcessRunner::current_dir().unwrap();
        let result = runner
            .run("definitely-not-a-real-program-xyz", &[], runner.working_dir())
            .await;
        assert!(result.is_err());
    }
}
