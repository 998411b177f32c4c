use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration file structure for circlog.
///
/// Identifies the CircleCI project to scan and the discovery parameters
/// (tracked branch, benchmark workflow, page budgets). Configuration files
/// are loaded from the current directory or a specified path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// CircleCI project and API settings
    #[serde(default)]
    pub circleci: CircleConfig,

    /// Discovery parameters
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CircleConfig {
    /// CircleCI API token (basic-auth username, empty password)
    pub token: Option<String>,

    /// Base URL of the modern (v2) API
    #[serde(default = "default_api_v2_url")]
    pub api_v2_url: String,

    /// Base URL of the legacy (v1.1) API
    #[serde(default = "default_api_v1_url")]
    pub api_v1_url: String,

    /// Version control system hosting the project (e.g. 'github')
    #[serde(default = "default_vcs")]
    pub vcs: String,

    /// Repository owner/organization
    pub username: Option<String>,

    /// Repository name
    pub project: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscoveryConfig {
    /// Branch whose pipelines are tracked (e.g. 'pull/9676')
    pub branch: Option<String>,

    /// Name of the workflow that runs the benchmarks
    #[serde(default = "default_workflow_name")]
    pub workflow_name: String,

    /// Name of the legacy-API action that exposes the log artifact
    #[serde(default = "default_log_action_name")]
    pub log_action_name: String,

    /// Maximum paginated calls when listing pipelines
    #[serde(default = "default_pipeline_pages")]
    pub pipeline_pages: u32,

    /// Maximum paginated calls when listing workflows per pipeline
    #[serde(default = "default_workflow_pages")]
    pub workflow_pages: u32,

    /// Maximum paginated calls when listing jobs per workflow
    #[serde(default = "default_job_pages")]
    pub job_pages: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            circleci: CircleConfig::default(),
            discovery: DiscoveryConfig::default(),
        }
    }
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_v2_url: default_api_v2_url(),
            api_v1_url: default_api_v1_url(),
            vcs: default_vcs(),
            username: None,
            project: None,
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            branch: None,
            workflow_name: default_workflow_name(),
            log_action_name: default_log_action_name(),
            pipeline_pages: default_pipeline_pages(),
            workflow_pages: default_workflow_pages(),
            job_pages: default_job_pages(),
        }
    }
}

fn default_api_v2_url() -> String {
    "https://circleci.com/api/v2".to_string()
}

fn default_api_v1_url() -> String {
    "https://circleci.com/api/v1.1".to_string()
}

fn default_vcs() -> String {
    "github".to_string()
}

fn default_workflow_name() -> String {
    "benchmark-linux".to_string()
}

fn default_log_action_name() -> String {
    "Output logs as MIME".to_string()
}

fn default_pipeline_pages() -> u32 {
    5
}

fn default_workflow_pages() -> u32 {
    20
}

fn default_job_pages() -> u32 {
    5
}

impl CircleConfig {
    /// Composite repository identifier used by project-scoped v2 endpoints.
    pub fn slug(&self) -> Result<String> {
        let username = self
            .username
            .as_deref()
            .context("Missing repository owner (username)")?;
        let project = self
            .project
            .as_deref()
            .context("Missing repository name (project)")?;
        Ok(format!("{}/{}/{}", self.vcs, username, project))
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./circlog.toml
    /// 3. ./circlog.json
    /// 4. ./circlog.yaml
    /// 5. ./circlog.yml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = ["circlog.toml", "circlog.json", "circlog.yaml", "circlog.yml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        // No config file found, return defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            _ => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}
