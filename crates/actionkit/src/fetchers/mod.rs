//! Raw file fetching
//!
//! Design: a [`RawFileSource`] knows how to download one file for
//! `owner/repo/<path_prefix>/<filename>`. Fallback across candidate
//! filenames is built on top of that single operation and is shared by
//! every source.

mod raw_content;

pub use raw_content::{RawContentClient, RawContentClientBuilder};

use crate::error::FetchError;
use async_trait::async_trait;
use bytes::Bytes;

/// Source of raw repository files
///
/// Implementations hold no mutable state and may be shared across
/// concurrent requests.
#[async_trait]
pub trait RawFileSource: Send + Sync {
    /// Unique identifier for this source (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Fetch a single file
    ///
    /// `path_prefix` is e.g. `refs/tags/v5` or `refs/heads/main`.
    async fn fetch_raw_file(
        &self,
        owner: &str,
        repo: &str,
        path_prefix: &str,
        filename: &str,
    ) -> Result<Bytes, FetchError>;

    /// Fetch the first candidate that succeeds, trying them in order
    ///
    /// Any failure of one candidate (not found, bad status, transport)
    /// moves on to the next. When all fail, the error keeps only the last
    /// candidate's failure.
    async fn fetch_first_matching(
        &self,
        owner: &str,
        repo: &str,
        path_prefix: &str,
        candidates: &[&str],
    ) -> Result<Bytes, FetchError> {
        let mut last = None;

        for filename in candidates {
            tracing::debug!(
                source = self.name(),
                owner,
                repo,
                path_prefix,
                filename,
                "Trying candidate"
            );
            match self
                .fetch_raw_file(owner, repo, path_prefix, filename)
                .await
            {
                Ok(body) => return Ok(body),
                Err(e) => {
                    tracing::debug!(filename, error = %e, "Candidate failed");
                    last = Some(e);
                }
            }
        }

        Err(FetchError::AllCandidatesFailed {
            owner: owner.to_string(),
            repo: repo.to_string(),
            path_prefix: path_prefix.to_string(),
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            last: Box::new(last.unwrap_or_else(|| FetchError::NotFound {
                filename: String::new(),
                url: format!("{}/{}/{}", owner, repo, path_prefix),
            })),
        })
    }
}
