//! Typed wrappers over the `dotnet` CLI
//!
//! Each wrapper is a single argv invocation against one solution file.
//! Output is returned as captured, unparsed text; the `dotnet` tool's
//! exit code is recorded but does not fail the call.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::process::{CommandOutput, CommandRunner};

/// Wrapper around `dotnet sln` / `dotnet new` for one solution file
pub struct DotnetCli {
    runner: Arc<dyn CommandRunner>,
    solution_file: String,
    working_dir: PathBuf,
}

impl DotnetCli {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        solution_file: impl Into<String>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            solution_file: solution_file.into(),
            working_dir: working_dir.into(),
        }
    }

    pub fn solution_file(&self) -> &str {
        &self.solution_file
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// `dotnet sln <solution> list`
    pub async fn sln_list(&self) -> Result<CommandOutput> {
        self.runner
            .run(
                "dotnet",
                &["sln", &self.solution_file, "list"],
                &self.working_dir,
            )
            .await
    }

    /// `dotnet sln <solution> add <project>`
    pub async fn sln_add(&self, project: &str) -> Result<CommandOutput> {
        self.runner
            .run(
                "dotnet",
                &["sln", &self.solution_file, "add", project],
                &self.working_dir,
            )
            .await
    }

    /// `dotnet sln <solution> remove <project>`
    pub async fn sln_remove(&self, project: &str) -> Result<CommandOutput> {
        self.runner
            .run(
                "dotnet",
                &["sln", &self.solution_file, "remove", project],
                &self.working_dir,
            )
            .await
    }

    /// `dotnet new console -n <name>`
    pub async fn new_console(&self, name: &str) -> Result<CommandOutput> {
        self.runner
            .run("dotnet", &["new", "console", "-n", name], &self.working_dir)
            .await
    }
}
