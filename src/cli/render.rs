//! Manifest rendering commands

use crate::cli::display::TableRenderer;
use crate::domain::config::{parse_overrides, DeployConfig, EnvFile};
use crate::domain::render::{ManifestRenderer, RenderRequest};
use crate::infrastructure::constants::{DEFAULT_KUBECTL, DEFAULT_TEMPLATE_DIR};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug, Clone)]
pub struct RenderCommand {
    /// Configuration file with KEY=value assignments (sourced shell syntax)
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Suffix of the output directory: <TEMPLATE_DIR>.<SUFFIX>
    #[arg(value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Directory holding the manifest templates
    #[arg(long, value_name = "DIR", default_value = DEFAULT_TEMPLATE_DIR)]
    pub template_dir: PathBuf,

    /// Command written into apply.sh, may include flags (e.g. "kubectl --context prod")
    #[arg(long, value_name = "CMD", default_value = DEFAULT_KUBECTL)]
    pub kubectl: String,

    /// Fail on missing configuration values or leftover placeholders
    #[arg(long)]
    pub strict: bool,

    /// Check that every rendered manifest is well-formed YAML
    #[arg(long)]
    pub validate_yaml: bool,

    /// Do not fall back to environment variables for keys missing from the config file
    #[arg(long)]
    pub no_inherit_env: bool,

    /// Output format of the summary
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Override configuration values (-D KEY=VALUE)
    ///
    /// Keys: EXTERNAL_IPS, IMAGE_PREFIX, IMAGE_SUFFIX, NAMESPACE, DB_URL, NUM_PROXY,
    /// NUM_RUNTIME, NUM_FETCHD, RUNTIME_CPU_REQUEST, IMAGE_PULL_SECRET
    ///
    /// Example: -DNUM_RUNTIME=8 -DIMAGE_SUFFIX=:v0.3.1
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaceholdersCommand {
    /// Configuration file used to resolve the values
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub no_inherit_env: bool,

    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

impl RenderCommand {
    pub fn execute(&self) -> anyhow::Result<()> {
        let config_path = self.config.clone().ok_or_else(|| {
            anyhow::anyhow!("Config file not specified\n\n  Usage: rw-kube <CONFIG> <SUFFIX>")
        })?;

        let overrides = parse_overrides(&self.properties)
            .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;

        let request = RenderRequest {
            config_path,
            suffix: self.suffix.clone().unwrap_or_default(),
            template_dir: self.template_dir.clone(),
            kubectl: self.kubectl.clone(),
            strict: self.strict,
            validate_yaml: self.validate_yaml,
            inherit_env: !self.no_inherit_env,
            overrides,
        };

        let report = ManifestRenderer::new(request)
            .render()
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        match self.output {
            OutputFormat::Json => println!("{}", report.to_json()?),
            OutputFormat::Text => println!("{}", TableRenderer::new().render_report(&report)),
        }

        Ok(())
    }
}

impl PlaceholdersCommand {
    pub fn execute(&self) -> anyhow::Result<()> {
        let inherit = !self.no_inherit_env;
        let lookup = move |key: &str| {
            if inherit {
                std::env::var(key).ok()
            } else {
                None
            }
        };

        let file = match self.config {
            Some(ref path) => EnvFile::load(path, lookup)
                .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))?,
            None => EnvFile::default(),
        };

        let mut config = DeployConfig::from_env_file(&file, lookup);
        let overrides = parse_overrides(&self.properties)
            .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
        config.apply_overrides(&overrides);

        println!("{}", TableRenderer::new().render_placeholders(&config));
        Ok(())
    }
}
