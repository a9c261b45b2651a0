//! Workflow registry and sequential runner
//!
//! The registry holds registered workflows and runs them. Running a
//! workflow executes its steps in declaration order, merging each
//! step's outputs into the input map seen by later steps, stopping at
//! the first failure. Declared dependencies are surfaced as metadata
//! only and are never solved into a schedule.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::step::{StepInfo, StepPort, StepResult};

/// Workflow definition (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// UI-exposed scalar inputs
    pub inputs: Vec<StepPort>,
    /// Steps in declaration (execution) order
    pub steps: Vec<StepInfo>,
    /// Tags for discovery
    pub tags: Vec<String>,
    /// Version
    pub version: String,
}

impl WorkflowDefinition {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            inputs: Vec::new(),
            steps: Vec::new(),
            tags: Vec::new(),
            version: "1.0.0".to_string(),
        }
    }

    /// Add an input port
    pub fn with_input(mut self, port: StepPort) -> Self {
        self.inputs.push(port);
        self
    }

    /// Add a step
    pub fn with_step(mut self, step: StepInfo) -> Self {
        self.steps.push(step);
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    /// Whether the workflow declares a step with this id
    pub fn has_step(&self, step_id: &str) -> bool {
        self.steps.iter().any(|s| s.id == step_id)
    }

    /// Validate the workflow definition
    pub fn validate(&self) -> Result<()> {
        let mut seen_ids = std::collections::HashSet::new();
        for step in &self.steps {
            if !seen_ids.insert(&step.id) {
                return Err(anyhow::anyhow!("Duplicate step ID: {}", step.id));
            }
        }

        for step in &self.steps {
            for dep in &step.depends_on {
                if !seen_ids.contains(dep) {
                    return Err(anyhow::anyhow!(
                        "Step '{}' depends on unknown step: {}",
                        step.id,
                        dep
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Trait for workflows
#[async_trait]
pub trait Workflow: Send + Sync {
    /// Get the workflow definition (metadata, inputs, step order)
    fn definition(&self) -> WorkflowDefinition;

    /// Execute one step with the given inputs
    async fn run_step(
        &self,
        step_id: &str,
        inputs: HashMap<String, Value>,
    ) -> Result<StepResult>;
}

/// Result of running all steps of a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRunResult {
    /// Unique run identifier
    pub run_id: uuid::Uuid,
    /// Workflow that was run
    pub workflow_id: String,
    /// Whether every step succeeded
    pub success: bool,
    /// Outputs of all completed steps, keyed `step.port`
    pub outputs: HashMap<String, Value>,
    /// Error message of the first failed step, if any
    pub error: Option<String>,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Total duration in milliseconds
    pub duration_ms: u64,
    /// Per-step results
    pub step_results: HashMap<String, StepResult>,
}

/// Registry of workflows, shared behind an HTTP host
pub struct WorkflowRegistry {
    workflows: Arc<RwLock<HashMap<String, Arc<dyn Workflow>>>>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self {
            workflows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a workflow; its definition must validate
    pub async fn register(&self, workflow: Arc<dyn Workflow>) -> Result<()> {
        let definition = workflow.definition();
        definition.validate()?;
        let mut workflows = self.workflows.write().await;
        info!(workflow_id = %definition.id, "Registering workflow");
        workflows.insert(definition.id.clone(), workflow);
        Ok(())
    }

    /// Get a workflow by id
    pub async fn get(&self, workflow_id: &str) -> Option<Arc<dyn Workflow>> {
        let workflows = self.workflows.read().await;
        workflows.get(workflow_id).cloned()
    }

    /// Get one workflow definition
    pub async fn get_definition(&self, workflow_id: &str) -> Option<WorkflowDefinition> {
        self.get(workflow_id).await.map(|w| w.definition())
    }

    /// List all workflow definitions, sorted by id
    pub async fn list_definitions(&self) -> Vec<WorkflowDefinition> {
        let workflows = self.workflows.read().await;
        let mut definitions: Vec<_> = workflows.values().map(|w| w.definition()).collect();
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        definitions
    }

    /// Execute a single step of a workflow
    pub async fn run_step(
        &self,
        workflow_id: &str,
        step_id: &str,
        inputs: HashMap<String, Value>,
    ) -> Result<StepResult> {
        let workflow = self
            .get(workflow_id)
            .await
            .ok_or_else(|| anyhow::anyhow!("Workflow not found: {}", workflow_id))?;

        if !workflow.definition().has_step(step_id) {
            return Err(anyhow::anyhow!(
                "Step not found: {}/{}",
                workflow_id,
                step_id
            ));
        }

        debug!(workflow_id = %workflow_id, step_id = %step_id, "Executing step");
        let start = std::time::Instant::now();
        let result = workflow.run_step(step_id, inputs).await?;
        Ok(result.with_duration(start.elapsed().as_millis() as u64))
    }

    /// Run all steps of a workflow in declaration order.
    ///
    /// Caller inputs are merged over the workflow's port defaults. Each
    /// completed step's outputs become inputs to the steps after it. The
    /// run stops at the first failed step.
    pub async fn run(
        &self,
        workflow_id: &str,
        inputs: HashMap<String, Value>,
    ) -> Result<WorkflowRunResult> {
        let workflow = self
            .get(workflow_id)
            .await
            .ok_or_else(|| anyhow::anyhow!("Workflow not found: {}", workflow_id))?;
        let definition = workflow.definition();

        let run_id = uuid::Uuid::new_v4();
        let started_at = Utc::now();
        let start = std::time::Instant::now();

        info!(workflow_id = %workflow_id, run_id = %run_id, "Starting workflow run");

        // Port defaults first, caller inputs on top
        let mut merged: HashMap<String, Value> = HashMap::new();
        for port in &definition.inputs {
            if let Some(default) = &port.default_value {
                merged.insert(port.id.clone(), default.clone());
            }
        }
        merged.extend(inputs);

        let mut step_results: HashMap<String, StepResult> = HashMap::new();
        let mut outputs: HashMap<String, Value> = HashMap::new();
        let mut error: Option<String> = None;

        for step in &definition.steps {
            let step_start = std::time::Instant::now();
            let result = match workflow.run_step(&step.id, merged.clone()).await {
                Ok(result) => result.with_duration(step_start.elapsed().as_millis() as u64),
                Err(e) => {
                    warn!(workflow_id = %workflow_id, step_id = %step.id, error = %e, "Step error");
                    StepResult::failure(e.to_string())
                        .with_duration(step_start.elapsed().as_millis() as u64)
                }
            };

            let failed = !result.success;
            if failed {
                error = result
                    .error
                    .clone()
                    .or_else(|| Some(format!("Step '{}' failed", step.id)));
            } else {
                for (port, value) in &result.outputs {
                    outputs.insert(format!("{}.{}", step.id, port), value.clone());
                    merged.insert(port.clone(), value.clone());
                }
            }

            step_results.insert(step.id.clone(), result);

            if failed {
                break;
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let success = error.is_none();

        info!(
            workflow_id = %workflow_id,
            run_id = %run_id,
            success = success,
            duration_ms = duration_ms,
            "Workflow run complete"
        );

        Ok(WorkflowRunResult {
            run_id,
            workflow_id: workflow_id.to_string(),
            success,
            outputs,
            error,
            started_at,
            duration_ms,
            step_results,
        })
    }
}

impl Default for WorkflowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Two-step workflow: `first` emits a greeting, `second` appends to it
    struct ChainWorkflow;

    #[async_trait]
    impl Workflow for ChainWorkflow {
        fn definition(&self) -> WorkflowDefinition {
            WorkflowDefinition::new("chain", "Chain", "Two chained steps")
                .with_input(
                    StepPort::string("subject", "Subject").with_default(json!("world")),
                )
                .with_step(StepInfo::new("first", "Emit greeting"))
                .with_step(StepInfo::new("second", "Extend greeting").depends_on("first"))
        }

        async fn run_step(
            &self,
            step_id: &str,
            inputs: HashMap<String, Value>,
        ) -> Result<StepResult> {
            match step_id {
                "first" => {
                    let subject = inputs.get("subject").and_then(|v| v.as_str()).unwrap_or("?");
                    let mut outputs = HashMap::new();
                    outputs.insert("greeting".to_string(), json!(format!("hello {}", subject)));
                    Ok(StepResult::success(outputs))
                }
                "second" => {
                    let greeting = inputs
                        .get("greeting")
                        .and_then(|v| v.as_str())
                        .unwrap_or("<missing>");
                    let mut outputs = HashMap::new();
                    outputs.insert("shout".to_string(), json!(format!("{}!", greeting)));
                    Ok(StepResult::success(outputs))
                }
                other => Err(anyhow::anyhow!("Unknown step: {}", other)),
            }
        }
    }

    /// Workflow whose second step always fails
    struct FailingWorkflow;

    #[async_trait]
    impl Workflow for FailingWorkflow {
        fn definition(&self) -> WorkflowDefinition {
            WorkflowDefinition::new("failing", "Failing", "Fails on the second step")
                .with_step(StepInfo::new("ok", "Succeeds"))
                .with_step(StepInfo::new("boom", "Fails"))
                .with_step(StepInfo::new("never", "Should not run"))
        }

        async fn run_step(
            &self,
            step_id: &str,
            _inputs: HashMap<String, Value>,
        ) -> Result<StepResult> {
            match step_id {
                "ok" => Ok(StepResult::success(HashMap::new())),
                "boom" => Ok(StepResult::failure("exploded")),
                _ => Ok(StepResult::success(HashMap::new())),
            }
        }
    }

    #[tokio::test]
    async fn test_register_and_list() {
        let registry = WorkflowRegistry::new();
        registry.register(Arc::new(ChainWorkflow)).await.unwrap();

        assert!(registry.get_definition("chain").await.is_some());
        assert!(registry.get_definition("missing").await.is_none());
        assert_eq!(registry.list_definitions().await.len(), 1);
    }

    #[tokio::test]
    async fn test_run_threads_outputs_and_defaults() {
        let registry = WorkflowRegistry::new();
        registry.register(Arc::new(ChainWorkflow)).await.unwrap();

        let result = registry.run("chain", HashMap::new()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.outputs["first.greeting"], json!("hello world"));
        assert_eq!(result.outputs["second.shout"], json!("hello world!"));
        assert_eq!(result.step_results.len(), 2);
    }

    #[tokio::test]
    async fn test_run_with_explicit_input() {
        let registry = WorkflowRegistry::new();
        registry.register(Arc::new(ChainWorkflow)).await.unwrap();

        let mut inputs = HashMap::new();
        inputs.insert("subject".to_string(), json!("automation"));
        let result = registry.run("chain", inputs).await.unwrap();
        assert_eq!(result.outputs["second.shout"], json!("hello automation!"));
    }

    #[tokio::test]
    async fn test_run_stops_at_first_failure() {
        let registry = WorkflowRegistry::new();
        registry.register(Arc::new(FailingWorkflow)).await.unwrap();

        let result = registry.run("failing", HashMap::new()).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("exploded"));
        assert!(result.step_results.contains_key("ok"));
        assert!(result.step_results.contains_key("boom"));
        assert!(!result.step_results.contains_key("never"));
    }

    #[tokio::test]
    async fn test_run_step_unknown_step() {
        let registry = WorkflowRegistry::new();
        registry.register(Arc::new(ChainWorkflow)).await.unwrap();

        let err = registry
            .run_step("chain", "nope", HashMap::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Step not found"));
    }

    #[test]
    fn test_validate_rejects_duplicate_steps() {
        let def = WorkflowDefinition::new("d", "D", "dup")
            .with_step(StepInfo::new("a", "first"))
            .with_step(StepInfo::new("a", "second"));
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_dependency() {
        let def = WorkflowDefinition::new("d", "D", "dep")
            .with_step(StepInfo::new("a", "first").depends_on("ghost"));
        assert!(def.validate().is_err());
    }
}
