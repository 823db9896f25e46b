// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::config::{DeployConfig, EnvFile};
use crate::domain::placeholder::{find_unresolved, SubstitutionSet};
use crate::domain::render::report::{ManifestReport, RenderReport};
use crate::infrastructure::apply_script::ApplyScript;
use crate::infrastructure::constants::{APPLY_SCRIPT_NAME, DEFAULT_KUBECTL, DEFAULT_TEMPLATE_DIR};
use crate::infrastructure::fs;
use crate::shared::error::{RenderError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub config_path: PathBuf,
    pub suffix: String,
    pub template_dir: PathBuf,
    pub kubectl: String,
    /// Fail on missing values and leftover placeholders instead of warning
    pub strict: bool,
    pub validate_yaml: bool,
    /// Let exported environment variables fill keys the config file leaves out
    pub inherit_env: bool,
    pub overrides: HashMap<String, String>,
}

impl RenderRequest {
    pub fn new(config_path: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            config_path: config_path.into(),
            suffix: suffix.into(),
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            kubectl: DEFAULT_KUBECTL.to_string(),
            strict: false,
            validate_yaml: false,
            inherit_env: true,
            overrides: HashMap::new(),
        }
    }

    pub fn with_template_dir(mut self, template_dir: impl Into<PathBuf>) -> Self {
        self.template_dir = template_dir.into();
        self
    }

    /// `<template-dir>.<suffix>`, next to the template directory.
    pub fn output_dir(&self) -> Result<PathBuf> {
        let name = self.template_dir.file_name().ok_or_else(|| {
            RenderError::ValidationError(format!(
                "Template directory {} has no name to derive the output directory from",
                self.template_dir.display()
            ))
        })?;

        Ok(self
            .template_dir
            .with_file_name(format!("{}.{}", name.to_string_lossy(), self.suffix)))
    }

    fn check_arguments(&self) -> Result<()> {
        if !self.config_path.is_file() {
            return Err(RenderError::ConfigNotFound(self.config_path.clone()));
        }

        if self.suffix.is_empty() {
            return Err(RenderError::EmptySuffix);
        }

        if self.suffix.contains(['/', '\\']) || self.suffix == "." || self.suffix == ".." {
            return Err(RenderError::ValidationError(format!(
                "Output suffix must be a plain name, got '{}'",
                self.suffix
            )));
        }

        Ok(())
    }
}

pub struct ManifestRenderer {
    request: RenderRequest,
}

impl ManifestRenderer {
    pub fn new(request: RenderRequest) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &RenderRequest {
        &self.request
    }

    pub fn load_config(&self) -> Result<DeployConfig> {
        let inherit = self.request.inherit_env;
        let lookup = move |key: &str| {
            if inherit {
                std::env::var(key).ok()
            } else {
                None
            }
        };

        let file = EnvFile::load(&self.request.config_path, lookup)?;
        let mut config = DeployConfig::from_env_file(&file, lookup);
        config.apply_overrides(&self.request.overrides);
        Ok(config)
    }

    pub fn render(&self) -> Result<RenderReport> {
        let request = &self.request;
        request.check_arguments()?;

        let config = self.load_config()?;
        if request.strict {
            config.validate()?;
        }

        if !request.template_dir.is_dir() {
            return Err(RenderError::TemplateNotFound(request.template_dir.clone()));
        }

        let output_dir = request.output_dir()?;
        info!(
            "Rendering {} into {}",
            request.template_dir.display(),
            output_dir.display()
        );
        let files_copied = fs::replace_dir_tree(&request.template_dir, &output_dir)?;

        let substitutions = SubstitutionSet::from_config(&config);
        let manifests = fs::find_manifests(&output_dir)?;
        let mut reports = Vec::with_capacity(manifests.len());

        for relative in &manifests {
            let path = output_dir.join(relative);
            reports.push(self.render_manifest(&path, relative, &substitutions)?);
        }

        let script = ApplyScript::new(request.kubectl.as_str()).render(&manifests);
        let apply_script = output_dir.join(APPLY_SCRIPT_NAME);
        fs::write_executable(&apply_script, &script)?;
        info!(
            "Wrote {} with {} manifests",
            apply_script.display(),
            manifests.len()
        );

        Ok(RenderReport {
            output_dir,
            apply_script,
            files_copied,
            manifests: reports,
        })
    }

    fn render_manifest(
        &self,
        path: &Path,
        relative: &Path,
        substitutions: &SubstitutionSet,
    ) -> Result<ManifestReport> {
        let content = std::fs::read_to_string(path).map_err(|e| RenderError::io_at(path, e))?;
        let (rendered, replacements) = substitutions.apply(&content);

        if replacements > 0 {
            std::fs::write(path, &rendered).map_err(|e| RenderError::io_at(path, e))?;
        }
        debug!("{}: {} replacements", relative.display(), replacements);

        let unresolved = find_unresolved(&rendered);
        if !unresolved.is_empty() {
            if self.request.strict {
                return Err(RenderError::UnresolvedPlaceholders {
                    path: relative.display().to_string(),
                    tokens: unresolved,
                });
            }
            warn!(
                "{} still contains placeholders: {}",
                relative.display(),
                unresolved.join(", ")
            );
        }

        if self.request.validate_yaml {
            check_yaml(path, &rendered)?;
        }

        Ok(ManifestReport {
            path: relative.to_path_buf(),
            replacements,
            unresolved,
        })
    }
}

/// Parses every document in `text` without interpreting it.
fn check_yaml(path: &Path, text: &str) -> Result<()> {
    for document in serde_yaml::Deserializer::from_str(text) {
        serde_yaml::Value::deserialize(document).map_err(|e| RenderError::yaml(path, e))?;
    }
    Ok(())
}
