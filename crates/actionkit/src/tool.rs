//! Tool contract for ActionKit
//!
//! [`Tool`] describes each tool (name, description, input schema) and
//! [`Toolbox`] executes calls against an [`ActionsService`].

use crate::error::Error;
use crate::service::{ActionDescriptor, ActionsService};
use crate::types::{GetActionParametersArgs, GetReadmeArgs, ToolOutput};
use crate::{GET_ACTION_PARAMETERS_DESCRIPTION, GET_README_DESCRIPTION};
use schemars::schema_for;
use serde::de::DeserializeOwned;
use std::fmt::Write;

/// Tools exposed to agents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    GetActionParameters,
    GetReadme,
}

impl Tool {
    /// All tools, in the order they are advertised
    pub const ALL: [Tool; 2] = [Tool::GetActionParameters, Tool::GetReadme];

    /// Look up a tool by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::GetActionParameters => "get_action_parameters",
            Tool::GetReadme => "get_readme",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tool::GetActionParameters => GET_ACTION_PARAMETERS_DESCRIPTION,
            Tool::GetReadme => GET_README_DESCRIPTION,
        }
    }

    /// Get input schema as JSON
    pub fn input_schema(&self) -> serde_json::Value {
        let schema = match self {
            Tool::GetActionParameters => schema_for!(GetActionParametersArgs),
            Tool::GetReadme => schema_for!(GetReadmeArgs),
        };
        serde_json::to_value(schema).unwrap_or_default()
    }
}

/// Executes tool calls
#[derive(Clone)]
pub struct Toolbox {
    service: ActionsService,
}

impl Toolbox {
    pub fn new(service: ActionsService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ActionsService {
        &self.service
    }

    /// Execute a tool by name with raw JSON arguments
    pub async fn call(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolOutput, Error> {
        let tool = Tool::from_name(name).ok_or_else(|| Error::UnknownTool(name.to_string()))?;
        tracing::debug!(tool = tool.name(), "Calling tool");

        match tool {
            Tool::GetActionParameters => self.get_action_parameters(parse_args(arguments)?).await,
            Tool::GetReadme => self.get_readme(parse_args(arguments)?).await,
        }
    }

    /// Fetch an action's descriptor; text summary plus the full map as structured content
    pub async fn get_action_parameters(
        &self,
        args: GetActionParametersArgs,
    ) -> Result<ToolOutput, Error> {
        if args.action_ref.trim().is_empty() {
            return Err(Error::MissingArgument("actionRef"));
        }

        let params = self.service.get_action_parameters(&args.action_ref).await?;
        let text = summarize_action(&args.action_ref, &params);
        Ok(ToolOutput::text(text).with_structured(serde_json::Value::Object(params)))
    }

    /// Fetch a repository README as text
    pub async fn get_readme(&self, args: GetReadmeArgs) -> Result<ToolOutput, Error> {
        if args.repo_ref.trim().is_empty() {
            return Err(Error::MissingArgument("repoRef"));
        }

        let readme = self.service.get_readme(&args.repo_ref).await?;
        Ok(ToolOutput::text(readme))
    }
}

fn parse_args<T: DeserializeOwned>(arguments: serde_json::Value) -> Result<T, Error> {
    serde_json::from_value(arguments).map_err(Error::InvalidArguments)
}

/// Short human-readable summary of a descriptor
pub fn summarize_action(action_ref: &str, params: &ActionDescriptor) -> String {
    let mut out = format!("Action: {}\n\n", action_ref);

    if let Some(name) = params.get("name").and_then(|v| v.as_str()) {
        let _ = writeln!(out, "Name: {}", name);
    }
    if let Some(desc) = params.get("description").and_then(|v| v.as_str()) {
        let _ = writeln!(out, "Description: {}", desc);
    }
    if let Some(inputs) = params.get("inputs").and_then(|v| v.as_object()) {
        let _ = writeln!(out, "\nInputs: {} defined", inputs.len());
    }
    if let Some(outputs) = params.get("outputs").and_then(|v| v.as_object()) {
        let _ = writeln!(out, "Outputs: {} defined", outputs.len());
    }

    out.push_str("\nFull action.yml structure returned in structured data.");
    out
}
