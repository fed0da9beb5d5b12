use anyhow::Result;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::config::{Config, PipelineConfig, RunSecrets};
use crate::output::{print_fields, print_summary};
use crate::pipeline::runner::Publisher;
use crate::pipeline::{PipelineKind, PipelineRunner, RunOptions};
use crate::sheets::{ServiceAccount, SheetsClient};
use crate::tracker::JiraClient;

#[derive(Parser)]
#[command(name = "jirasheets")]
#[command(author, version, about = "Export Jira issues to Google Sheets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./jirasheets.toml and friends)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write the JSON run report to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    /// Stage the CSV and print a preview without publishing
    #[arg(long, global = true, default_value_t = false)]
    dry_run: bool,

    /// Rows shown in the dry-run preview
    #[arg(long, global = true, default_value_t = 5)]
    preview: usize,

    #[arg(long, global = true, env = "JIRA_TOKEN", hide_env_values = true)]
    jira_token: Option<String>,

    /// Destination spreadsheet id
    #[arg(long, global = true, env = "GOOGLE_SHEETS_TOKEN", hide_env_values = true)]
    spreadsheet_id: Option<String>,

    /// Service-account JSON, or a path to the key file
    #[arg(
        long,
        global = true,
        env = "GOOGLE_SERVICE_ACCOUNT_CREDENTIALS",
        hide_env_values = true
    )]
    credentials: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Specifications with lifecycle derivations
    Specs(RunArgs),
    /// Specifications with the reduced column set
    SpecsBasic(RunArgs),
    /// Working groups
    Groups(RunArgs),
    /// List the tracker's custom fields and their mapping
    Fields,
}

/// Per-run overrides of the configured variant settings.
#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Jira project key
    #[arg(short = 'P', long)]
    project: Option<String>,

    /// Destination sheet (tab) name
    #[arg(short, long)]
    sheet: Option<String>,

    /// Staging CSV path
    #[arg(long)]
    staging_file: Option<PathBuf>,

    /// JQL query replacing the default project query
    #[arg(long)]
    jql: Option<String>,
}

impl RunArgs {
    fn apply(&self, overrides: &mut PipelineConfig) {
        if let Some(project) = &self.project {
            overrides.project = Some(project.clone());
            overrides.jql = None;
        }
        if let Some(sheet) = &self.sheet {
            overrides.sheet = Some(sheet.clone());
        }
        if let Some(staging_file) = &self.staging_file {
            overrides.staging_file = Some(staging_file.clone());
        }
        if let Some(jql) = &self.jql {
            overrides.jql = Some(jql.clone());
        }
    }
}

impl Cli {
    async fn execute_pipeline(
        &self,
        mut config: Config,
        kind: PipelineKind,
        args: &RunArgs,
    ) -> Result<()> {
        let secrets = RunSecrets::validate(
            self.jira_token.as_deref(),
            self.spreadsheet_id.as_deref(),
            self.credentials.as_deref(),
            !self.dry_run,
        )?;

        args.apply(config.overrides_mut(kind));
        let settings = config.pipeline(kind);

        let publisher = match secrets.publish {
            Some(publish) => {
                let credentials = ServiceAccount::resolve(&publish.credentials)?;
                info!("Publishing as {}", credentials.client_email());
                Some(Publisher {
                    sheets: SheetsClient::new(&config.sheets.base_url, credentials)?,
                    spreadsheet_id: publish.spreadsheet_id,
                })
            }
            None => None,
        };

        let jira = JiraClient::new(
            &config.jira.base_url,
            secrets.jira_token,
            config.jira.page_size,
        )?;
        let runner = PipelineRunner::new(kind, settings, config.field_map(), jira, publisher)?;

        let outcome = runner
            .run(&RunOptions {
                now: Local::now().naive_local(),
                show_progress: true,
            })
            .await?;

        if !outcome.report.is_published() {
            info!(
                "Staged {} only; run without --dry-run to publish",
                outcome.report.staging_file
            );
        }

        let preview_rows = if self.dry_run { self.preview } else { 0 };
        print_summary(&outcome.report, &outcome.table, preview_rows);

        if let Some(output_path) = &self.output {
            let json_output = if self.pretty {
                serde_json::to_string_pretty(&outcome.report)?
            } else {
                serde_json::to_string(&outcome.report)?
            };
            std::fs::write(output_path, json_output)?;
            info!("Run report written to: {}", output_path.display());
        }

        Ok(())
    }

    async fn execute_fields(&self, config: &Config) -> Result<()> {
        let secrets = RunSecrets::validate(self.jira_token.as_deref(), None, None, false)?;
        let jira = JiraClient::new(
            &config.jira.base_url,
            secrets.jira_token,
            config.jira.page_size,
        )?;

        let fields = jira.fields().await?;
        print_fields(&fields, &config.field_map());

        if let Some(output_path) = &self.output {
            let json_output = if self.pretty {
                serde_json::to_string_pretty(&fields)?
            } else {
                serde_json::to_string(&fields)?
            };
            std::fs::write(output_path, json_output)?;
            info!("Field list written to: {}", output_path.display());
        }

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        match &self.command {
            Commands::Specs(args) => {
                self.execute_pipeline(config, PipelineKind::Specs, args)
                    .await
            }
            Commands::SpecsBasic(args) => {
                self.execute_pipeline(config, PipelineKind::SpecsBasic, args)
                    .await
            }
            Commands::Groups(args) => {
                self.execute_pipeline(config, PipelineKind::Groups, args)
                    .await
            }
            Commands::Fields => self.execute_fields(&config).await,
        }
    }
}
