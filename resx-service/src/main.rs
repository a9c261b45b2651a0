//! resx-service: HTTP host for the resx-forge workflows
//!
//! Registers the built-in workflows (readme, automobile generator,
//! project manager) and serves them on a local address.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use resx_projects::{LocalFs, NameGenerator, ProcessRunner};
use resx_workflows::builtin::{AutomobileWorkflow, ProjectsWorkflow, ReadmeWorkflow};
use resx_workflows::WorkflowRegistry;

mod routes;
mod state;

use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "resx-service")]
#[command(about = "Workflow host for .resx generation and solution management")]
struct Args {
    /// Bind address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:5123")]
    bind: String,

    /// Working directory for resource files and projects
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// Disable CORS
    #[arg(long)]
    no_cors: bool,

    /// Environment file loaded instead of the default lookup paths
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("resx_service=info".parse()?)
                .add_directive("resx_workflows=info".parse()?)
                .add_directive("resx_projects=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let args = Args::parse();

    // Environment file: --env-file wins, otherwise the canonical paths
    match &args.env_file {
        Some(path) => {
            resx_core::config::load_env_file(path);
        }
        None => {
            resx_core::config::load_environment();
        }
    }

    let working_dir = match args.workdir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    info!(workdir = %working_dir.display(), "Starting workflow host");

    let registry = Arc::new(WorkflowRegistry::new());
    registry.register(Arc::new(ReadmeWorkflow)).await?;
    registry
        .register(Arc::new(AutomobileWorkflow::new(&working_dir)))
        .await?;

    let runner = Arc::new(ProcessRunner::new(&working_dir));
    registry
        .register(Arc::new(ProjectsWorkflow::with_defaults(
            runner,
            Arc::new(LocalFs),
            NameGenerator::from_entropy(),
            &working_dir,
        )))
        .await?;

    let app = routes::create_router(AppState::new(registry), !args.no_cors);

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    info!("Workflow host listening on http://{}", args.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
