//! Error types for ActionKit

use thiserror::Error;

/// Errors produced while parsing an `owner/repo@version` reference
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input was empty or whitespace only
    #[error("reference cannot be empty")]
    Empty,

    /// No `@version` part where one is required
    #[error("invalid reference format: expected 'owner/repo@version', got '{input}'")]
    MissingVersion { input: String },

    /// More than one `@` separator
    #[error(
        "invalid reference format: expected 'owner/repo@version' or 'owner/repo', got '{input}'"
    )]
    Malformed { input: String },

    /// Repository path is not exactly `owner/repo`
    #[error("invalid repository path: expected 'owner/repo', got '{path}'")]
    MalformedRepoPath { path: String },

    /// Owner, repo or version segment is empty
    #[error("owner, repo, and version must all be non-empty, got '{input}'")]
    Incomplete { input: String },

    /// A segment is `.` or `..` and would not survive URL joining
    #[error("'.' and '..' are not valid owner, repo or version segments, got '{input}'")]
    DotSegment { input: String },
}

/// Errors produced while fetching raw files
#[derive(Debug, Error)]
pub enum FetchError {
    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Base URL cannot carry path segments
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// User-Agent is not a valid header value
    #[error("Invalid User-Agent: {0}")]
    InvalidUserAgent(String),

    /// Request never produced a response (DNS, connect, TLS, timeout, body read)
    #[error("failed to fetch {filename} from {url}: {source}")]
    Transport {
        filename: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered 404
    #[error("{filename} not found at {url} (status: 404)")]
    NotFound { filename: String, url: String },

    /// Server answered with a status other than 200 or 404
    #[error("failed to fetch {filename} from {url} (status: {status})")]
    UnexpectedStatus {
        filename: String,
        url: String,
        status: u16,
    },

    /// Every candidate filename failed; `last` holds the final attempt's error
    #[error(
        "none of [{}] could be fetched from {owner}/{repo} at {path_prefix}: {last}",
        .candidates.join(", ")
    )]
    AllCandidatesFailed {
        owner: String,
        repo: String,
        path_prefix: String,
        candidates: Vec<String>,
        #[source]
        last: Box<FetchError>,
    },
}

/// Top-level error returned by [`ActionsService`](crate::ActionsService) and the tool layer
#[derive(Debug, Error)]
pub enum Error {
    /// Required tool argument missing or blank
    #[error("{0} is required")]
    MissingArgument(&'static str),

    /// Tool arguments did not match the input schema
    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[source] serde_json::Error),

    /// Tool name not known to this server
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Reference string rejected by the parser
    #[error("invalid reference: {0}")]
    Parse(#[from] ParseError),

    /// Every candidate file failed to download
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Descriptor body is not valid YAML
    #[error("failed to parse YAML: {0}")]
    Decode(#[source] serde_yaml::Error),

    /// Descriptor body is valid YAML but not a mapping
    #[error("failed to parse YAML: expected a mapping at the top level")]
    NotAMapping,

    /// Descriptor could not be rendered as JSON
    #[error("failed to marshal to JSON: {0}")]
    Encode(#[source] serde_json::Error),
}
