use super::types::{Job, Pipeline, Workflow};

/// Acceptance test applied to pipelines during the paginated listing.
///
/// Filters are a closed set of named strategies rather than arbitrary
/// closures, so every strategy can be enumerated in tests. A missing field
/// on the payload always means "no match", never an error.
#[derive(Debug, Clone)]
pub enum PipelineFilter {
    /// Pipeline belongs to the tracked branch (e.g. a pull-request ref)
    Branch(String),
    /// Accept every pipeline
    Any,
}

impl PipelineFilter {
    pub fn matches(&self, pipeline: &Pipeline) -> bool {
        match self {
            Self::Branch(branch) => pipeline
                .vcs
                .as_ref()
                .and_then(|vcs| vcs.branch.as_deref())
                .map_or(false, |b| b == branch),
            Self::Any => true,
        }
    }
}

/// Acceptance test applied to workflows during the paginated listing.
#[derive(Debug, Clone)]
pub enum WorkflowFilter {
    /// Workflow has exactly this name (e.g. the benchmark workflow)
    Name(String),
    /// Accept every workflow
    Any,
}

impl WorkflowFilter {
    pub fn matches(&self, workflow: &Workflow) -> bool {
        match self {
            Self::Name(name) => workflow.name.as_deref().map_or(false, |n| n == name),
            Self::Any => true,
        }
    }
}

/// Acceptance test applied to jobs. Job listing needs no filtering today,
/// so the only strategy is the always-true one.
#[derive(Debug, Clone)]
pub enum JobFilter {
    Any,
}

impl JobFilter {
    pub fn matches(&self, _job: &Job) -> bool {
        match self {
            Self::Any => true,
        }
    }
}
