//! ActionKit - AI-friendly GitHub Actions inspection library
//!
//! This crate resolves compact references such as `actions/checkout@v5`
//! and fetches the matching files from GitHub's raw-content origin:
//!
//! - `action.yml` / `action.yaml` at a release tag, decoded into a
//!   JSON-compatible map
//! - the repository README at a branch, returned as text
//!
//! ## Fetcher System
//!
//! Files are downloaded through a [`RawFileSource`]. The built-in
//! [`RawContentClient`] talks HTTP; every source gets ordered
//! candidate fallback via [`RawFileSource::fetch_first_matching`].

mod error;
pub mod fetchers;
mod reference;
mod service;
mod tool;
mod types;

pub use error::{Error, FetchError, ParseError};
pub use fetchers::{RawContentClient, RawContentClientBuilder, RawFileSource};
pub use reference::{parse_action_ref, parse_reference, parse_repo_ref, GitRef, Reference};
pub use service::{parse_action_yaml, ActionDescriptor, ActionsService};
pub use tool::{summarize_action, Tool, Toolbox};
pub use types::{GetActionParametersArgs, GetReadmeArgs, ToolOutput};

/// Origin serving unprocessed repository files
pub const DEFAULT_RAW_CONTENT_ORIGIN: &str = "https://raw.githubusercontent.com";

/// Branch used when a repository reference has no `@version`
pub const DEFAULT_BRANCH: &str = "main";

/// Action descriptor filenames, in preference order
pub const ACTION_FILENAMES: &[&str] = &["action.yml", "action.yaml"];

/// README filenames, in preference order
pub const README_FILENAMES: &[&str] = &["README.md", "readme.md", "Readme.md", "README", "readme"];

/// Description of the `get_action_parameters` tool for LLM consumption
pub const GET_ACTION_PARAMETERS_DESCRIPTION: &str = "Fetch and parse a GitHub Action's action.yml file. Returns the complete action.yml structure including inputs, outputs, runs configuration, and metadata.";

/// Description of the `get_readme` tool for LLM consumption
pub const GET_README_DESCRIPTION: &str = "Fetch the README of a GitHub repository. Accepts 'owner/repo' (uses the main branch) or 'owner/repo@branch' and returns the README text.";

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# ActionKit Tools

Inspect GitHub Actions and repositories without cloning them.

## get_action_parameters
Fetches `action.yml` (falling back to `action.yaml`) at a release tag and
returns its full structure.

### Input Parameters
- `actionRef` (required): `owner/repo@version`, e.g. `actions/checkout@v5`

### Output
- Text summary: name, description, number of inputs and outputs
- Structured content: the complete action.yml as JSON

## get_readme
Fetches the README at a branch, trying `README.md`, `readme.md`,
`Readme.md`, `README` and `readme` in that order.

### Input Parameters
- `repoRef` (required): `owner/repo` (branch `main`) or `owner/repo@branch`

### Output
- The README text

## Examples

```json
{"name": "get_action_parameters", "arguments": {"actionRef": "actions/setup-node@v4"}}
```

```json
{"name": "get_readme", "arguments": {"repoRef": "rust-lang/rust@master"}}
```

## Error Handling
- Malformed references (`owner`, `owner/group/repo`, `a/b@v1@v2`) are rejected
- Missing files report the last URL tried
- Invalid YAML is reported, never retried
"#;
