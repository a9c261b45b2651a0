//! Readme workflow - a single informational step

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use crate::registry::{Workflow, WorkflowDefinition};
use crate::step::{StepInfo, StepResult};

const README: &str = "\
# The generator for .resx files
Generate huge, complex, and nested .resx files with ease.";

/// Informational workflow shown first in the workflow list
pub struct ReadmeWorkflow;

#[async_trait]
impl Workflow for ReadmeWorkflow {
    fn definition(&self) -> WorkflowDefinition {
        WorkflowDefinition::new("readme", "README", README)
            .with_step(StepInfo::new("start", README))
            .with_tag("docs")
    }

    async fn run_step(
        &self,
        step_id: &str,
        _inputs: HashMap<String, Value>,
    ) -> Result<StepResult> {
        match step_id {
            "start" => {
                let mut outputs = HashMap::new();
                outputs.insert("message".to_string(), Value::String(README.to_string()));
                Ok(StepResult::success(outputs))
            }
            other => Err(anyhow::anyhow!("Unknown step: {}", other)),
        }
    }
}
