//! Automobile workflow - generates `.resx` resource files
//!
//! Writes `{prefix}-{index}.resx` files into the output directory, each
//! with a fixed six-entry header block and five entries per car slot.
//! Every car slot holds the same fixture tuple; the file is a fixed
//! demo schema, not varied data.

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::info;

use resx_format::ResxWriter;

use crate::registry::{Workflow, WorkflowDefinition};
use crate::step::{number_arg, string_arg, StepInfo, StepPort, StepResult};

/// A car record written into each resource slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automobile {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub doors: u32,
    pub cylinders: u32,
}

impl Automobile {
    pub fn new(make: &str, model: &str, year: i32, doors: u32, cylinders: u32) -> Self {
        Self {
            make: make.to_string(),
            model: model.to_string(),
            year,
            doors,
            cylinders,
        }
    }

    /// The fixture car written into every slot
    pub fn classic() -> Self {
        Self::new("Ford", "Mustang", 1967, 2, 8)
    }
}

/// Workflow generating flat car resource files
pub struct AutomobileWorkflow {
    output_dir: PathBuf,
}

impl AutomobileWorkflow {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn generate(&self, files: usize, cars: usize, prefix: &str) -> Result<StepResult> {
        for i in 0..files {
            let file_name = format!("{}-{}.resx", prefix, i);
            let mut resx = ResxWriter::new();

            resx.add_resource("Title", "Classic American Cars")?;
            resx.add_resource("HeaderString1", "Make")?;
            resx.add_resource("HeaderString2", "Model")?;
            resx.add_resource("HeaderString3", "Year")?;
            resx.add_resource("HeaderString4", "Doors")?;
            resx.add_resource("HeaderString5", "Cylinders")?;

            for j in 0..cars {
                let car = Automobile::classic();
                resx.add_resource(format!("Car{}Make", j + 1), car.make)?;
                resx.add_resource(format!("Car{}Model", j + 1), car.model)?;
                resx.add_resource(format!("Car{}Year", j + 1), car.year.to_string())?;
                resx.add_resource(format!("Car{}Doors", j + 1), car.doors.to_string())?;
                resx.add_resource(format!("Car{}Cylinders", j + 1), car.cylinders.to_string())?;
            }

            resx.write_to_file(self.output_dir.join(&file_name))?;
        }

        info!(files = files, cars = cars, prefix = %prefix, "Generated resource files");

        let mut outputs = HashMap::new();
        outputs.insert("files".to_string(), json!(files));
        outputs.insert("cars_per_file".to_string(), json!(cars));
        outputs.insert(
            "message".to_string(),
            json!(format!(
                "Generated {} resource files with {} cars each under {}-*.resx.",
                files, cars, prefix
            )),
        );
        Ok(StepResult::success(outputs))
    }
}

#[async_trait]
impl Workflow for AutomobileWorkflow {
    fn definition(&self) -> WorkflowDefinition {
        WorkflowDefinition::new(
            "automobile",
            "AutoMobile Resx Generator",
            "Generate .resx resource files filled with classic car data.",
        )
        .with_input(
            StepPort::number("number_of_files", "Number of Files")
                .with_description("The number of resource files to generate.")
                .with_default(json!(1)),
        )
        .with_input(
            StepPort::string("name_prefix", "Name Prefix")
                .with_description("The name prefix of the resource files.")
                .with_default(json!("AutoMobile")),
        )
        .with_input(
            StepPort::number("number_of_cars", "Number of Cars")
                .with_description("The number of cars in each resource file.")
                .with_default(json!(1)),
        )
        .with_step(StepInfo::new(
            "generate_resource_files",
            "Generate the resource files.",
        ))
        .with_tag("generator")
    }

    async fn run_step(
        &self,
        step_id: &str,
        inputs: HashMap<String, Value>,
    ) -> Result<StepResult> {
        match step_id {
            "generate_resource_files" => {
                let files = number_arg(&inputs, "number_of_files", 1.0) as usize;
                let cars = number_arg(&inputs, "number_of_cars", 1.0) as usize;
                let prefix = string_arg(&inputs, "name_prefix", "AutoMobile");
                self.generate(files, cars, &prefix)
            }
            other => Err(anyhow::anyhow!("Unknown step: {}", other)),
        }
    }
}
