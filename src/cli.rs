use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::auth::Token;
use crate::config::Config;
use crate::providers::CircleLogReader;

#[derive(Parser)]
#[command(name = "circlog")]
#[command(author, version, about = "CircleCI benchmark log locator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover benchmark jobs for a branch and list their log URLs
    Discover {
        #[arg(short, long, env = "CIRCLECI_TOKEN")]
        token: Option<String>,

        /// Configuration file (circlog.toml in the current directory by default)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Repository in 'owner/project' form (e.g. facebook/rocksdb)
        #[arg(short = 'P', long)]
        project: Option<String>,

        /// Branch whose pipelines to track (e.g. pull/9676)
        #[arg(short, long)]
        branch: Option<String>,

        /// Name of the benchmark workflow
        #[arg(short, long)]
        workflow: Option<String>,
    },
}

impl Cli {
    async fn execute_discover(
        &self,
        token: &Option<String>,
        config_path: Option<&PathBuf>,
        project: Option<&str>,
        branch: Option<&str>,
        workflow: Option<&str>,
    ) -> Result<()> {
        let mut config = Config::load(config_path.map(PathBuf::as_path))?;

        if let Some(project) = project {
            let (username, name) = project
                .split_once('/')
                .filter(|(owner, name)| !owner.is_empty() && !name.contains('/'))
                .context("Project must be in 'owner/project' form")?;
            config.circleci.username = Some(username.to_string());
            config.circleci.project = Some(name.to_string());
        }
        if let Some(branch) = branch {
            config.discovery.branch = Some(branch.to_string());
        }
        if let Some(workflow) = workflow {
            config.discovery.workflow_name = workflow.to_string();
        }

        let token = token
            .clone()
            .or_else(|| config.circleci.token.clone())
            .context("Missing CircleCI API token (pass --token or set CIRCLECI_TOKEN)")?;

        info!(
            "Discovering benchmark logs for {}/{}",
            config.circleci.username.as_deref().unwrap_or("?"),
            config.circleci.project.as_deref().unwrap_or("?")
        );

        let reader = CircleLogReader::new(&config, Token::from(token))?;
        let results = reader.get_log_urls().await?;

        let json_output = if self.pretty {
            serde_json::to_string_pretty(&results)?
        } else {
            serde_json::to_string(&results)?
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, json_output)?;
            info!("Results written to: {}", output_path.display());
        } else {
            println!("{}", json_output);
        }

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Discover {
                token,
                config,
                project,
                branch,
                workflow,
            } => {
                self.execute_discover(
                    token,
                    config.as_ref(),
                    project.as_deref(),
                    branch.as_deref(),
                    workflow.as_deref(),
                )
                .await
            }
        }
    }
}
