use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::auth::Token;
use crate::error::SyncError;
use crate::pipeline::PipelineKind;
use crate::tracker::client::DEFAULT_PAGE_SIZE;
use crate::tracker::{Field, FieldMap};

pub const JIRA_TOKEN_VAR: &str = "JIRA_TOKEN";
pub const SPREADSHEET_ID_VAR: &str = "GOOGLE_SHEETS_TOKEN";
pub const CREDENTIALS_VAR: &str = "GOOGLE_SERVICE_ACCOUNT_CREDENTIALS";

const CONFIG_FILE_NAMES: [&str; 4] = [
    "jirasheets.toml",
    "jirasheets.json",
    "jirasheets.yaml",
    "jirasheets.yml",
];

/// Configuration file structure for jirasheets.
///
/// Everything here has a default, so a run needs no file at all. Secrets are
/// never read from the file; they come from the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub jira: JiraConfig,

    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Domain field name to tracker custom field id. An empty id removes
    /// the built-in mapping.
    #[serde(default)]
    pub fields: IndexMap<Field, String>,

    #[serde(default)]
    pub specs: PipelineConfig,

    #[serde(default)]
    pub specs_basic: PipelineConfig,

    #[serde(default)]
    pub groups: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JiraConfig {
    /// Jira instance base URL
    #[serde(default = "default_jira_base_url")]
    pub base_url: String,

    /// Issues requested per search page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SheetsConfig {
    /// Google Sheets API base URL
    #[serde(default = "default_sheets_base_url")]
    pub base_url: String,
}

/// Per-variant overrides; unset values fall back to the variant defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PipelineConfig {
    /// Jira project key (e.g., "RVS")
    pub project: Option<String>,

    /// Destination sheet (tab) name
    pub sheet: Option<String>,

    /// Local staging CSV path
    pub staging_file: Option<PathBuf>,

    /// Full JQL query, replacing the default project query
    pub jql: Option<String>,
}

/// Effective settings for one variant run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub project: String,
    pub sheet: String,
    pub staging_file: PathBuf,
    pub jql: String,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: default_jira_base_url(),
            page_size: default_page_size(),
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            base_url: default_sheets_base_url(),
        }
    }
}

fn default_jira_base_url() -> String {
    "https://jira.riscv.org".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_sheets_base_url() -> String {
    crate::sheets::client::DEFAULT_SHEETS_URL.to_string()
}

/// Open or finished top-level issues of `project`, highest priority first.
pub fn default_jql(project: &str) -> String {
    format!(
        "project = {project} AND (resolution = Unresolved OR resolution = Done) \
         AND issuetype not in subTaskIssueTypes() ORDER BY priority DESC, updated DESC"
    )
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./jirasheets.{toml,json,yaml,yml}
    /// 3. `<config dir>`/jirasheets/jirasheets.{toml,json,yaml,yml}
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let user_dir = dirs::config_dir().map(|dir| dir.join("jirasheets"));
        let search_dirs = std::iter::once(PathBuf::new()).chain(user_dir);

        for dir in search_dirs {
            for name in CONFIG_FILE_NAMES {
                let candidate = dir.join(name);
                if candidate.exists() {
                    log::debug!("Using config file {}", candidate.display());
                    return Self::load_from_path(&candidate);
                }
            }
        }

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
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }

    /// Built-in field ids with this file's overrides applied.
    pub fn field_map(&self) -> FieldMap {
        FieldMap::with_overrides(&self.fields)
    }

    /// Mutable overrides for `kind`, for command-line flags.
    pub fn overrides_mut(&mut self, kind: PipelineKind) -> &mut PipelineConfig {
        match kind {
            PipelineKind::Specs => &mut self.specs,
            PipelineKind::SpecsBasic => &mut self.specs_basic,
            PipelineKind::Groups => &mut self.groups,
        }
    }

    /// Resolves the effective settings for `kind`.
    pub fn pipeline(&self, kind: PipelineKind) -> PipelineSettings {
        let (overrides, project, sheet, staging_file) = match kind {
            PipelineKind::Specs => (&self.specs, "RVS", "Specifications", "specs.csv"),
            PipelineKind::SpecsBasic => (
                &self.specs_basic,
                "RVS",
                "Specifications",
                "specs-basic.csv",
            ),
            PipelineKind::Groups => (&self.groups, "RVG", "Groups", "groups.csv"),
        };

        let project = overrides.project.clone().unwrap_or_else(|| project.to_string());
        let jql = overrides.jql.clone().unwrap_or_else(|| default_jql(&project));

        PipelineSettings {
            sheet: overrides.sheet.clone().unwrap_or_else(|| sheet.to_string()),
            staging_file: overrides
                .staging_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(staging_file)),
            jql,
            project,
        }
    }
}

/// Secrets read from the environment, validated before any remote call.
pub struct RunSecrets {
    pub jira_token: Token,
    /// Publish secrets; absent for runs that never reach the spreadsheet
    pub publish: Option<PublishSecrets>,
}

pub struct PublishSecrets {
    pub spreadsheet_id: String,
    /// Service-account JSON or a path to a key file
    pub credentials: String,
}

impl RunSecrets {
    /// Checks every required secret at once.
    ///
    /// Empty values count as missing. When `publish` is false only the Jira
    /// token is required.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingConfig`] naming every missing variable.
    pub fn validate(
        jira_token: Option<&str>,
        spreadsheet_id: Option<&str>,
        credentials: Option<&str>,
        publish: bool,
    ) -> std::result::Result<Self, SyncError> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty())
        }

        let mut missing = Vec::new();
        if present(jira_token).is_none() {
            missing.push(JIRA_TOKEN_VAR);
        }
        if publish {
            if present(spreadsheet_id).is_none() {
                missing.push(SPREADSHEET_ID_VAR);
            }
            if present(credentials).is_none() {
                missing.push(CREDENTIALS_VAR);
            }
        }
        if !missing.is_empty() {
            return Err(SyncError::MissingConfig(missing));
        }

        let publish = match (present(spreadsheet_id), present(credentials)) {
            (Some(spreadsheet_id), Some(credentials)) if publish => Some(PublishSecrets {
                spreadsheet_id: spreadsheet_id.to_string(),
                credentials: credentials.to_string(),
            }),
            _ => None,
        };

        Ok(Self {
            jira_token: Token::from(present(jira_token).unwrap_or_default()),
            publish,
        })
    }
}
