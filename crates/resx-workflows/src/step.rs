//! Step metadata and results
//!
//! Steps are the units of work inside a workflow. Each declares its
//! identity, the steps it depends on, and produces a [`StepResult`]
//! with output values keyed by port name.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A UI-exposed scalar input on a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepPort {
    /// Port identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Data type ("string", "number")
    pub data_type: String,
    /// Description
    pub description: Option<String>,
    /// Default value if not supplied
    pub default_value: Option<Value>,
}

impl StepPort {
    /// Create a new number port
    pub fn number(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            data_type: "number".to_string(),
            description: None,
            default_value: None,
        }
    }

    /// Create a new string port
    pub fn string(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            data_type: "string".to_string(),
            description: None,
            default_value: None,
        }
    }

    /// Add description
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Add default value
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Step metadata within a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepInfo {
    /// Step identifier (unique within the workflow)
    pub id: String,
    /// Description shown to users
    pub description: String,
    /// Steps whose outputs this step consumes (metadata, not a schedule)
    pub depends_on: Vec<String>,
}

impl StepInfo {
    pub fn new(id: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            depends_on: Vec::new(),
        }
    }

    pub fn depends_on(mut self, step_id: &str) -> Self {
        self.depends_on.push(step_id.to_string());
        self
    }
}

/// Result of step execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// Whether execution succeeded
    pub success: bool,
    /// Output data keyed by port name
    pub outputs: HashMap<String, Value>,
    /// Error message if failed
    pub error: Option<String>,
    /// Execution duration in milliseconds
    pub duration_ms: u64,
}

impl StepResult {
    /// Create a successful result
    pub fn success(outputs: HashMap<String, Value>) -> Self {
        Self {
            success: true,
            outputs,
            error: None,
            duration_ms: 0,
        }
    }

    /// Create a failed result
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            outputs: HashMap::new(),
            error: Some(error.into()),
            duration_ms: 0,
        }
    }

    /// Set duration
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Fetch a numeric input, falling back to `default`.
///
/// Numbers arrive as JSON values from the UI; floats truncate and
/// negative counts clamp to zero.
pub fn number_arg(inputs: &HashMap<String, Value>, key: &str, default: f64) -> f64 {
    let value = inputs.get(key).and_then(|v| v.as_f64()).unwrap_or(default);
    if value.is_sign_negative() || value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Fetch a string input, falling back to `default`
pub fn string_arg(inputs: &HashMap<String, Value>, key: &str, default: &str) -> String {
    inputs
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_arg_defaults_and_clamps() {
        let mut inputs = HashMap::new();
        assert_eq!(number_arg(&inputs, "n", 1.0), 1.0);

        inputs.insert("n".to_string(), json!(3.7));
        assert_eq!(number_arg(&inputs, "n", 1.0), 3.7);

        inputs.insert("n".to_string(), json!(-5));
        assert_eq!(number_arg(&inputs, "n", 1.0), 0.0);

        inputs.insert("n".to_string(), json!("not a number"));
        assert_eq!(number_arg(&inputs, "n", 1.0), 1.0);
    }

    #[test]
    fn test_string_arg_default() {
        let mut inputs = HashMap::new();
        assert_eq!(string_arg(&inputs, "p", "AutoMobile"), "AutoMobile");

        inputs.insert("p".to_string(), json!("Custom"));
        assert_eq!(string_arg(&inputs, "p", "AutoMobile"), "Custom");
    }
}
