//! Projects workflow - solution project management
//!
//! Wraps the `dotnet` CLI to list projects in a solution, randomly grow
//! or shrink the set of throwaway projects, and seed every project with
//! the generated `.resx` files. Subcommand exit codes never fail a
//! step: captured stdout is concatenated into the step's return text
//! either way, and stderr only reaches the log.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use resx_projects::{CommandRunner, DotnetCli, FsOps, NameGenerator};

use crate::registry::{Workflow, WorkflowDefinition};
use crate::step::{string_arg, StepInfo, StepPort, StepResult};

/// Default solution manifest managed by this workflow
pub const DEFAULT_SOLUTION_FILE: &str = "resx-forge.sln";

/// The tool's own project file, never listed or removed
pub const DEFAULT_OWN_PROJECT: &str = "resx-forge.csproj";

const NO_PROJECTS_MESSAGE: &str = "No projects found in the solution.";

/// Workflow managing projects inside one solution file
pub struct ProjectsWorkflow {
    dotnet: DotnetCli,
    fs: Arc<dyn FsOps>,
    names: NameGenerator,
    own_project: String,
    working_dir: PathBuf,
}

impl ProjectsWorkflow {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        fs: Arc<dyn FsOps>,
        names: NameGenerator,
        working_dir: impl Into<PathBuf>,
        solution_file: &str,
        own_project: &str,
    ) -> Self {
        let working_dir = working_dir.into();
        Self {
            dotnet: DotnetCli::new(runner, solution_file, working_dir.clone()),
            fs,
            names,
            own_project: own_project.to_string(),
            working_dir,
        }
    }

    /// Workflow over the default `resx-forge.sln` / `resx-forge.csproj`
    pub fn with_defaults(
        runner: Arc<dyn CommandRunner>,
        fs: Arc<dyn FsOps>,
        names: NameGenerator,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self::new(
            runner,
            fs,
            names,
            working_dir,
            DEFAULT_SOLUTION_FILE,
            DEFAULT_OWN_PROJECT,
        )
    }

    fn own_stem(&self) -> &str {
        self.own_project
            .strip_suffix(".csproj")
            .unwrap_or(&self.own_project)
    }

    /// `list_projects`: enumerate projects in the solution manifest
    async fn list_projects(&self) -> Result<StepResult> {
        let out = self.dotnet.sln_list().await?;
        let own = self.own_stem();

        let projects: Vec<String> = out
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| line.ends_with(".csproj") && !line.contains(own))
            .map(String::from)
            .collect();

        info!(count = projects.len(), "Listed solution projects");

        let mut outputs = HashMap::new();
        outputs.insert("count".to_string(), json!(projects.len()));
        outputs.insert(
            "projects".to_string(),
            if projects.is_empty() {
                json!(NO_PROJECTS_MESSAGE)
            } else {
                json!(projects.join("\n"))
            },
        );
        Ok(StepResult::success(outputs))
    }

    /// `expand_solution`: scaffold and add N = max(1, count/2) projects
    async fn expand_solution(&self, projects: &str) -> Result<StepResult> {
        let listed = csproj_lines(projects);
        let to_add = (listed.len() / 2).max(1);

        let mut detail = String::new();
        let mut added = Vec::with_capacity(to_add);

        for _ in 0..to_add {
            let name = self.names.next_name();
            // Scaffold output is noise; only the sln registration output
            // is surfaced, matching the listing text callers see.
            self.dotnet.new_console(&name).await?;
            let out = self.dotnet.sln_add(&name).await?;
            detail.push_str(&out.stdout);
            if !out.stdout.ends_with('\n') {
                detail.push('\n');
            }
            added.push(name);
        }

        info!(added = to_add, "Expanded solution");

        let mut outputs = HashMap::new();
        outputs.insert("added".to_string(), json!(added));
        outputs.insert("added_count".to_string(), json!(to_add));
        outputs.insert(
            "message".to_string(),
            json!(format!(
                "Added {} projects to the solution.\n{}",
                to_add, detail
            )),
        );
        Ok(StepResult::success(outputs))
    }

    /// `contract_solution`: remove N = max(1, count/2) random projects
    ///
    /// The tool's own project is never a candidate, and sampling is
    /// without replacement, so exactly N distinct projects go away
    /// (fewer only when the solution has fewer candidates than N).
    async fn contract_solution(&self, projects: &str) -> Result<StepResult> {
        let listed = csproj_lines(projects);
        let own = self.own_stem();

        let candidates: Vec<&String> =
            listed.iter().filter(|p| !p.contains(own)).collect();
        let to_remove = (listed.len() / 2).max(1).min(candidates.len());

        let mut detail = String::new();
        let mut removed = Vec::with_capacity(to_remove);

        for idx in self.names.sample_indices(candidates.len(), to_remove) {
            let project = candidates[idx];
            let out = self.dotnet.sln_remove(project).await?;
            detail.push_str(&out.stdout);

            let dir = self.working_dir.join(project_dir(project));
            self.fs.remove_dir_all(&dir).await?;
            removed.push(project.clone());
        }

        info!(removed = removed.len(), "Contracted solution");

        let mut outputs = HashMap::new();
        outputs.insert("removed".to_string(), json!(removed));
        outputs.insert("removed_count".to_string(), json!(removed.len()));
        outputs.insert(
            "message".to_string(),
            json!(format!(
                "Removed {} projects from the solution.\n{}",
                removed.len(),
                detail
            )),
        );
        Ok(StepResult::success(outputs))
    }

    /// `distribute_resx`: copy every generated `.resx` into every project
    async fn distribute_resx(&self, projects: &str) -> Result<StepResult> {
        let resx_files = self.fs.list_resx_files(&self.working_dir).await?;
        let own = self.own_stem();

        let targets: Vec<String> = csproj_lines(projects)
            .into_iter()
            .filter(|p| !p.contains(own))
            .collect();

        let mut detail = String::new();
        for project in &targets {
            let dir = self.working_dir.join(project_dir(project));
            for resx in &resx_files {
                let file_name = resx
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("Bad resource path: {}", resx.display()))?;
                let dest = dir.join(file_name);
                self.fs.copy_file(resx, &dest).await?;
                detail.push_str(&format!("{} -> {}\n", resx.display(), dest.display()));
            }
        }

        info!(
            files = resx_files.len(),
            projects = targets.len(),
            "Distributed resource files"
        );

        let mut outputs = HashMap::new();
        outputs.insert("files".to_string(), json!(resx_files.len()));
        outputs.insert("targets".to_string(), json!(targets.len()));
        outputs.insert(
            "message".to_string(),
            json!(format!(
                "Moved {} .resx files to every project in the solution.\n{}",
                resx_files.len(),
                detail
            )),
        );
        Ok(StepResult::success(outputs))
    }
}

#[async_trait]
impl Workflow for ProjectsWorkflow {
    fn definition(&self) -> WorkflowDefinition {
        WorkflowDefinition::new(
            "projects",
            "Project Manager",
            &format!(
                "Manage adding/removing projects in {}",
                self.dotnet.solution_file()
            ),
        )
        .with_input(
            StepPort::string("projects", "Projects")
                .with_description("Newline-separated project list; filled in by list_projects."),
        )
        .with_step(StepInfo::new(
            "list_projects",
            "list all projects in the solution.",
        ))
        .with_step(
            StepInfo::new(
                "expand_solution",
                "Anti-Thanos snap: randomly increase 50% of the projects in the solution.",
            )
            .depends_on("list_projects"),
        )
        .with_step(
            StepInfo::new(
                "contract_solution",
                "Thanos snap: randomly remove 50% of the projects in the solution.",
            )
            .depends_on("list_projects"),
        )
        .with_step(
            StepInfo::new(
                "distribute_resx",
                "Move and override .resx files to every project in the solution.",
            )
            .depends_on("list_projects"),
        )
        .with_tag("solution")
    }

    async fn run_step(
        &self,
        step_id: &str,
        inputs: HashMap<String, Value>,
    ) -> Result<StepResult> {
        match step_id {
            "list_projects" => self.list_projects().await,
            "expand_solution" => {
                let projects = string_arg(&inputs, "projects", "");
                self.expand_solution(&projects).await
            }
            "contract_solution" => {
                let projects = string_arg(&inputs, "projects", "");
                self.contract_solution(&projects).await
            }
            "distribute_resx" => {
                let projects = string_arg(&inputs, "projects", "");
                self.distribute_resx(&projects).await
            }
            other => Err(anyhow::anyhow!("Unknown step: {}", other)),
        }
    }
}

/// Lines that name a project file, trimmed
fn csproj_lines(projects: &str) -> Vec<String> {
    projects
        .lines()
        .map(str::trim)
        .filter(|line| line.ends_with(".csproj"))
        .map(String::from)
        .collect()
}

/// Directory holding a listed project file.
///
/// `dotnet sln list` prints paths like `Name/Name.csproj` (or with
/// backslashes on Windows); a bare `Name.csproj` maps to `Name`.
fn project_dir(project: &str) -> PathBuf {
    let normalized = project.replace('\\', "/");
    let path = Path::new(&normalized);
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from(normalized.trim_end_matches(".csproj")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resx_projects::CommandOutput;
    use std::sync::Mutex;

    const LIST_OUTPUT: &str = "\
Project(s)
----------
AlphaOne/AlphaOne.csproj
BetaTwo/BetaTwo.csproj
GammaThree/GammaThree.csproj
resx-forge/resx-forge.csproj
";

    /// Replies to `dotnet sln list` with canned output, records all calls
    struct ScriptedRunner {
        list_stdout: String,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedRunner {
        fn new(list_stdout: &str) -> Arc<Self> {
            Arc::new(Self {
                list_stdout: list_stdout.to_string(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls_matching(&self, subcommand: &str) -> Vec<Vec<String>> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.get(2).map(String::as_str) == Some(subcommand)
                    || c.get(0).map(String::as_str) == Some(subcommand))
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(
            &self,
            _program: &str,
            args: &[&str],
            _cwd: &Path,
        ) -> Result<CommandOutput> {
            let call: Vec<String> = args.iter().map(|s| s.to_string()).collect();
            let stdout = if call.get(2).map(String::as_str) == Some("list") {
                self.list_stdout.clone()
            } else {
                format!("done: {}\n", call.join(" "))
            };
            self.calls.lock().unwrap().push(call);
            Ok(CommandOutput {
                stdout,
                stderr: String::new(),
                exit_code: 0,
                success: true,
            })
        }
    }

    /// In-memory FsOps that records mutations
    struct MemFs {
        resx_files: Vec<PathBuf>,
        removed: Mutex<Vec<PathBuf>>,
        copied: Mutex<Vec<(PathBuf, PathBuf)>>,
    }

    impl MemFs {
        fn new(resx_files: Vec<PathBuf>) -> Arc<Self> {
            Arc::new(Self {
                resx_files,
                removed: Mutex::new(Vec::new()),
                copied: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl FsOps for MemFs {
        async fn remove_dir_all(&self, path: &Path) -> Result<()> {
            self.removed.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }

        async fn copy_file(&self, src: &Path, dest: &Path) -> Result<()> {
            self.copied
                .lock()
                .unwrap()
                .push((src.to_path_buf(), dest.to_path_buf()));
            Ok(())
        }

        async fn list_resx_files(&self, _dir: &Path) -> Result<Vec<PathBuf>> {
            Ok(self.resx_files.clone())
        }
    }

    fn workflow(runner: Arc<ScriptedRunner>, fs: Arc<MemFs>) -> ProjectsWorkflow {
        ProjectsWorkflow::with_defaults(runner, fs, NameGenerator::seeded(99), "/work")
    }

    fn listed_input(projects: &str) -> HashMap<String, Value> {
        let mut inputs = HashMap::new();
        inputs.insert("projects".to_string(), json!(projects));
        inputs
    }

    #[tokio::test]
    async fn test_list_filters_noise_and_own_project() {
        let runner = ScriptedRunner::new(LIST_OUTPUT);
        let wf = workflow(runner.clone(), MemFs::new(vec![]));

        let result = wf.run_step("list_projects", HashMap::new()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.outputs["count"], json!(3));

        let projects = result.outputs["projects"].as_str().unwrap();
        assert!(projects.contains("AlphaOne/AlphaOne.csproj"));
        assert!(!projects.contains("resx-forge"));
        assert!(!projects.contains("Project(s)"));
    }

    #[tokio::test]
    async fn test_list_empty_solution_message() {
        let runner = ScriptedRunner::new("Project(s)\n----------\n");
        let wf = workflow(runner, MemFs::new(vec![]));

        let result = wf.run_step("list_projects", HashMap::new()).await.unwrap();
        assert_eq!(result.outputs["count"], json!(0));
        assert_eq!(
            result.outputs["projects"],
            json!("No projects found in the solution.")
        );
    }

    #[tokio::test]
    async fn test_expand_adds_half_rounded_down() {
        let runner = ScriptedRunner::new(LIST_OUTPUT);
        let wf = workflow(runner.clone(), MemFs::new(vec![]));

        let projects = "A/A.csproj\nB/B.csproj\nC/C.csproj\nD/D.csproj";
        let result = wf
            .run_step("expand_solution", listed_input(projects))
            .await
            .unwrap();

        assert_eq!(result.outputs["added_count"], json!(2));
        assert_eq!(runner.calls_matching("new").len(), 2);
        assert_eq!(runner.calls_matching("add").len(), 2);
        let message = result.outputs["message"].as_str().unwrap();
        assert!(message.starts_with("Added 2 projects to the solution."));
    }

    #[tokio::test]
    async fn test_expand_adds_at_least_one() {
        let runner = ScriptedRunner::new(LIST_OUTPUT);
        let wf = workflow(runner.clone(), MemFs::new(vec![]));

        let result = wf
            .run_step("expand_solution", listed_input(""))
            .await
            .unwrap();

        assert_eq!(result.outputs["added_count"], json!(1));
        assert_eq!(runner.calls_matching("new").len(), 1);
    }

    #[tokio::test]
    async fn test_contract_removes_half_distinct_never_own() {
        let runner = ScriptedRunner::new(LIST_OUTPUT);
        let fs = MemFs::new(vec![]);
        let wf = workflow(runner.clone(), fs.clone());

        let projects = "\
A/A.csproj
B/B.csproj
C/C.csproj
resx-forge/resx-forge.csproj";
        let result = wf
            .run_step("contract_solution", listed_input(projects))
            .await
            .unwrap();

        // 4 listed -> remove 2, sampled from the 3 non-own candidates
        assert_eq!(result.outputs["removed_count"], json!(2));
        let removed: Vec<String> = serde_json::from_value(result.outputs["removed"].clone()).unwrap();
        assert_eq!(removed.len(), 2);
        let mut distinct = removed.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), 2);
        assert!(removed.iter().all(|p| !p.contains("resx-forge")));

        assert_eq!(runner.calls_matching("remove").len(), 2);
        assert_eq!(fs.removed.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_contract_with_only_own_project_removes_nothing() {
        let runner = ScriptedRunner::new(LIST_OUTPUT);
        let fs = MemFs::new(vec![]);
        let wf = workflow(runner.clone(), fs.clone());

        let result = wf
            .run_step(
                "contract_solution",
                listed_input("resx-forge/resx-forge.csproj"),
            )
            .await
            .unwrap();

        assert_eq!(result.outputs["removed_count"], json!(0));
        assert!(runner.calls_matching("remove").is_empty());
        assert!(fs.removed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_distribute_copies_every_file_to_every_project() {
        let runner = ScriptedRunner::new(LIST_OUTPUT);
        let fs = MemFs::new(vec![
            PathBuf::from("/work/AutoMobile-0.resx"),
            PathBuf::from("/work/AutoMobile-1.resx"),
        ]);
        let wf = workflow(runner, fs.clone());

        let projects = "A/A.csproj\nB/B.csproj\nresx-forge/resx-forge.csproj";
        let result = wf
            .run_step("distribute_resx", listed_input(projects))
            .await
            .unwrap();

        assert_eq!(result.outputs["files"], json!(2));
        assert_eq!(result.outputs["targets"], json!(2));

        let copied = fs.copied.lock().unwrap();
        assert_eq!(copied.len(), 4);
        assert!(copied
            .iter()
            .any(|(_, dest)| dest == &PathBuf::from("/work/A/AutoMobile-0.resx")));
        assert!(copied
            .iter()
            .all(|(_, dest)| !dest.to_string_lossy().contains("resx-forge")));
    }

    #[test]
    fn test_project_dir_shapes() {
        assert_eq!(project_dir("Alpha/Alpha.csproj"), PathBuf::from("Alpha"));
        assert_eq!(project_dir("Alpha\\Alpha.csproj"), PathBuf::from("Alpha"));
        assert_eq!(project_dir("Solo.csproj"), PathBuf::from("Solo"));
    }

    #[test]
    fn test_csproj_lines_trims_and_filters() {
        let lines = csproj_lines("  A/A.csproj  \nnoise\nB/B.csproj\n");
        assert_eq!(lines, vec!["A/A.csproj", "B/B.csproj"]);
    }
}
