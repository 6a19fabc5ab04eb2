//! GitHub Actions service
//!
//! Resolves references and fetches action descriptors and READMEs through a
//! [`RawFileSource`].

use crate::error::{Error, FetchError};
use crate::fetchers::{RawContentClient, RawFileSource};
use crate::reference::{parse_action_ref, parse_repo_ref, GitRef, Reference};
use crate::{ACTION_FILENAMES, README_FILENAMES};
use std::sync::Arc;

/// Parsed `action.yml`, as a JSON-compatible map
pub type ActionDescriptor = serde_json::Map<String, serde_json::Value>;

/// Fetches and decodes GitHub Action metadata
///
/// Cloning is cheap; clones share the same source.
#[derive(Clone)]
pub struct ActionsService {
    source: Arc<dyn RawFileSource>,
}

impl ActionsService {
    /// Create a service backed by the public raw-content origin
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self::with_source(RawContentClient::new()?))
    }

    /// Create a service backed by a custom source
    pub fn with_source(source: impl RawFileSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Fetch the descriptor bytes, trying `action.yml` then `action.yaml`
    /// at the release tag
    pub async fn fetch_action_yaml(&self, reference: &Reference) -> Result<Vec<u8>, FetchError> {
        let body = self
            .fetch_candidates(reference, &reference.tag(), ACTION_FILENAMES)
            .await?;
        Ok(body.to_vec())
    }

    /// Fetch README text at the branch named by the reference version
    pub async fn fetch_readme(&self, reference: &Reference) -> Result<String, FetchError> {
        let body = self
            .fetch_candidates(reference, &reference.branch(), README_FILENAMES)
            .await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Parse an action reference and return its decoded `action.yml`
    pub async fn get_action_parameters(&self, action_ref: &str) -> Result<ActionDescriptor, Error> {
        let reference = parse_action_ref(action_ref)?;
        let yaml = self.fetch_action_yaml(&reference).await?;
        parse_action_yaml(&yaml)
    }

    /// Same as [`get_action_parameters`](Self::get_action_parameters), rendered as pretty JSON
    pub async fn get_action_parameters_json(&self, action_ref: &str) -> Result<String, Error> {
        let params = self.get_action_parameters(action_ref).await?;
        serde_json::to_string_pretty(&params).map_err(Error::Encode)
    }

    /// Parse a repository reference and return its README text
    pub async fn get_readme(&self, repo_ref: &str) -> Result<String, Error> {
        let reference = parse_repo_ref(repo_ref)?;
        Ok(self.fetch_readme(&reference).await?)
    }

    async fn fetch_candidates(
        &self,
        reference: &Reference,
        git_ref: &GitRef,
        candidates: &[&str],
    ) -> Result<bytes::Bytes, FetchError> {
        self.source
            .fetch_first_matching(
                &reference.owner,
                &reference.repo,
                &git_ref.path_prefix(),
                candidates,
            )
            .await
    }
}

/// Decode an `action.yml` body into a JSON-compatible map
///
/// The top level must be a mapping.
pub fn parse_action_yaml(data: &[u8]) -> Result<ActionDescriptor, Error> {
    let value: serde_json::Value = serde_yaml::from_slice(data).map_err(Error::Decode)?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(Error::NotAMapping),
    }
}
