use futures::future;
use log::{debug, info, warn};

use crate::auth::Token;
use crate::config::{Config, DiscoveryConfig};
use crate::error::Result;
use crate::results::{self, BenchmarkResult};

use super::client::CircleClient;
use super::filters::{JobFilter, PipelineFilter, WorkflowFilter};

/// Discovers the benchmark jobs of a tracked branch and pairs each one with
/// its log artifact URL.
///
/// Discovery fans out across three paginated v2 resource levels (pipelines,
/// then workflows per pipeline, then jobs per workflow) into a single job
/// number sequence. That one sequence then drives both the v2 metadata
/// lookup and the legacy v1.1 log lookup, so the pairing is keyed by job
/// number rather than by list position.
pub struct CircleLogReader {
    client: CircleClient,
    discovery: DiscoveryConfig,
}

impl CircleLogReader {
    pub fn new(config: &Config, token: Token) -> Result<Self> {
        let client = CircleClient::new(&config.circleci, token)?;

        Ok(Self {
            client,
            discovery: config.discovery.clone(),
        })
    }

    /// Stage 1: pipelines of the tracked branch, in discovery order.
    async fn discover_pipeline_ids(&self) -> Result<Vec<String>> {
        let filter = match &self.discovery.branch {
            Some(branch) => PipelineFilter::Branch(branch.clone()),
            None => PipelineFilter::Any,
        };

        let pipelines = self
            .client
            .list_pipelines(&filter, self.discovery.pipeline_pages)
            .await?;
        info!("Discovered {} matching pipelines", pipelines.len());

        Ok(pipelines.into_iter().map(|p| p.id).collect())
    }

    /// Stage 2: benchmark workflows of every pipeline, flattened by
    /// concatenation in pipeline order.
    async fn discover_workflow_ids(&self, pipeline_ids: &[String]) -> Result<Vec<String>> {
        let filter = WorkflowFilter::Name(self.discovery.workflow_name.clone());
        let mut workflow_ids = Vec::new();

        for pipeline_id in pipeline_ids {
            let workflows = self
                .client
                .list_workflows(pipeline_id, &filter, self.discovery.workflow_pages)
                .await?;
            workflow_ids.extend(workflows.into_iter().map(|w| w.id));
        }
        info!("Discovered {} benchmark workflows", workflow_ids.len());

        Ok(workflow_ids)
    }

    /// Stage 3: every numbered job of every workflow, flattened in workflow
    /// order. This is the authoritative job sequence for assembly.
    async fn discover_job_numbers(&self, workflow_ids: &[String]) -> Result<Vec<u64>> {
        let mut job_numbers = Vec::new();

        for workflow_id in workflow_ids {
            let jobs = self
                .client
                .list_jobs(workflow_id, &JobFilter::Any, self.discovery.job_pages)
                .await?;
            for job in jobs {
                match job.job_number {
                    Some(number) => job_numbers.push(number),
                    // Approval jobs never ran and have nothing to collect
                    None => debug!("Skipping job without a number in workflow {workflow_id}"),
                }
            }
        }
        info!("Discovered {} jobs", job_numbers.len());

        Ok(job_numbers)
    }

    /// Metadata and log URL for one job, both keyed by its number.
    ///
    /// `Ok(None)` drops jobs whose metadata is gone from the v2 API; a job
    /// without a log keeps its record with `output_url: None`.
    async fn fetch_result(&self, job_number: u64) -> Result<Option<BenchmarkResult>> {
        let Some(job_info) = self.client.get_job_info(job_number).await? else {
            warn!("Job {job_number} has no retrievable metadata, dropping it");
            return Ok(None);
        };

        let output_url = self
            .client
            .get_log_output_url(job_number, &self.discovery.log_action_name)
            .await?;
        if output_url.is_none() {
            warn!(
                "Job {job_number} exposes no '{}' log",
                self.discovery.log_action_name
            );
        }

        Ok(Some(BenchmarkResult {
            job_info,
            output_url,
        }))
    }

    /// Run the full discovery and assembly pass.
    ///
    /// Per-job fetches run concurrently; any HTTP failure aborts the whole
    /// run with no partial result. The final order comes from the explicit
    /// start-time sort, not from completion order.
    pub async fn get_log_urls(&self) -> Result<Vec<BenchmarkResult>> {
        let pipeline_ids = self.discover_pipeline_ids().await?;
        let workflow_ids = self.discover_workflow_ids(&pipeline_ids).await?;
        let job_numbers = self.discover_job_numbers(&workflow_ids).await?;

        let fetches = job_numbers
            .iter()
            .map(|&job_number| self.fetch_result(job_number));
        let mut benchmark_results: Vec<BenchmarkResult> = future::try_join_all(fetches)
            .await?
            .into_iter()
            .flatten()
            .collect();

        results::sort_by_start_time(&mut benchmark_results);
        info!("Assembled {} benchmark results", benchmark_results.len());

        Ok(benchmark_results)
    }
}
