//! Tool argument and result types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Arguments for `get_action_parameters`
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetActionParametersArgs {
    /// GitHub Action reference (e.g., 'actions/checkout@v5')
    #[serde(rename = "actionRef")]
    pub action_ref: String,
}

impl GetActionParametersArgs {
    pub fn new(action_ref: impl Into<String>) -> Self {
        Self {
            action_ref: action_ref.into(),
        }
    }
}

/// Arguments for `get_readme`
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetReadmeArgs {
    /// Repository reference (e.g., 'owner/repo' or 'owner/repo@branch'); the branch defaults to 'main'
    #[serde(rename = "repoRef")]
    pub repo_ref: String,
}

impl GetReadmeArgs {
    pub fn new(repo_ref: impl Into<String>) -> Self {
        Self {
            repo_ref: repo_ref.into(),
        }
    }
}

/// Result of a tool call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Human-readable text content
    pub text: String,

    /// Machine-readable result, when the tool has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<serde_json::Value>,
}

impl ToolOutput {
    /// Text-only output
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            structured: None,
        }
    }

    /// Attach structured content
    pub fn with_structured(mut self, value: serde_json::Value) -> Self {
        self.structured = Some(value);
        self
    }
}
