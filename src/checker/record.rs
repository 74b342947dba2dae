// src/checker/record.rs
// =============================================================================
// The LinkRecord type shared by extraction, validation and stats.
//
// A record starts out with just text, url and file. Validation adds `valid`
// plus exactly one of `status` (a response came back) or `error` (the
// request never got a response). Fields that are not set are left out of the
// JSON output entirely, so an unvalidated record serializes as
// {"text", "url", "file"}.
// =============================================================================

use serde::{Deserialize, Serialize};

/// One `[text](url)` link found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The label between the square brackets (may be empty)
    pub text: String,
    /// The target between the parentheses, exactly as written
    pub url: String,
    /// The document the link came from
    pub file: String,
    /// Set once validation has run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    /// HTTP status code, only when the probe got a response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Failure reason, only when the probe got no response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LinkRecord {
    pub fn new(text: impl Into<String>, url: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
            file: file.into(),
            valid: None,
            status: None,
            error: None,
        }
    }

    /// The record after a probe that received a response.
    ///
    /// Any response counts as `valid`, even 4xx/5xx; those are still
    /// reported as broken by [`LinkRecord::is_broken`].
    pub fn reached(self, status: u16) -> Self {
        Self {
            valid: Some(true),
            status: Some(status),
            error: None,
            ..self
        }
    }

    /// The record after a probe that failed before any response.
    pub fn failed(self, error: impl Into<String>) -> Self {
        Self {
            valid: Some(false),
            status: None,
            error: Some(error.into()),
            ..self
        }
    }

    pub fn is_validated(&self) -> bool {
        self.valid.is_some()
    }

    /// Broken means an error status (>= 400) or no response at all.
    /// A record that was never validated is not broken.
    pub fn is_broken(&self) -> bool {
        self.error.is_some() || self.status.is_some_and(|code| code >= 400)
    }
}
