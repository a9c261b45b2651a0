//! Built-in workflows
//!
//! - `readme`: informational single-step workflow
//! - `automobile`: generates `.resx` resource files with car data
//! - `projects`: lists, grows, shrinks and seeds solution projects

pub mod automobile;
pub mod projects;
pub mod readme;

pub use automobile::AutomobileWorkflow;
pub use projects::ProjectsWorkflow;
pub use readme::ReadmeWorkflow;
