use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope returned by every paginated v2 list endpoint.
#[derive(Debug, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

/// Pipeline as listed by `/project/{slug}/pipeline`.
///
/// Only the fields the discovery pass reads are deserialized; payloads for
/// pipelines triggered outside a VCS push may omit `vcs` entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
    pub id: String,
    #[serde(default)]
    pub vcs: Option<VcsInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VcsInfo {
    #[serde(default)]
    pub branch: Option<String>,
}

/// Workflow as listed by `/pipeline/{id}/workflow`.
#[derive(Debug, Clone, Deserialize)]
pub struct Workflow {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Job as listed by `/workflow/{id}/job`.
///
/// Approval jobs never execute and carry no number; they are skipped
/// during discovery.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub job_number: Option<u64>,
}

/// Job metadata from `/project/{slug}/job/{job_number}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    pub job_number: u64,
    /// When the job started; null while the job is still queued
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

/// Build record from the legacy v1.1 API, holding the step/action tree.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildInfo {
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub has_output: bool,
    #[serde(default)]
    pub output_url: Option<String>,
}

impl BuildInfo {
    /// Locate the output URL of the first action named `action_name` that
    /// actually produced output, scanning steps and actions in API order.
    ///
    /// Returns `None` when no such action exists; the caller treats that as
    /// "no log available for this job", not a failure.
    pub fn find_output_url(&self, action_name: &str) -> Option<&str> {
        for step in &self.steps {
            for action in &step.actions {
                if action.has_output && action.name.as_deref() == Some(action_name) {
                    return action.output_url.as_deref();
                }
            }
        }
        None
    }
}
