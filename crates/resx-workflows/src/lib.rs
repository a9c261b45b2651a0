//! resx-workflows: step registry and built-in workflows
//!
//! A workflow is a named set of steps with declared input ports and
//! declared step dependencies. Dependencies are metadata only: steps run
//! strictly in declaration order, one at a time, each step receiving the
//! workflow inputs merged with the outputs of everything that ran before
//! it. There is no dependency solver and no concurrent execution here.

pub mod builtin;
pub mod registry;
pub mod step;

pub use registry::{Workflow, WorkflowDefinition, WorkflowRegistry, WorkflowRunResult};
pub use step::{StepInfo, StepPort, StepResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::registry::{Workflow, WorkflowDefinition, WorkflowRegistry, WorkflowRunResult};
    pub use super::step::{StepInfo, StepPort, StepResult};
}
