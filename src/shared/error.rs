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

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Output suffix must not be empty")]
    EmptySuffix,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Syntax error in {path} line {line}: {message}")]
    ConfigSyntax {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Template directory not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("Missing required configuration value: {0}")]
    MissingValue(String),

    #[error("Unresolved placeholders in {path}: {}", .tokens.join(", "))]
    UnresolvedPlaceholders { path: String, tokens: Vec<String> },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error on {path}: {source}")]
    IoAt {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error in {path}: {source}")]
    YamlParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<walkdir::Error> for RenderError {
    fn from(err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        match err.into_io_error() {
            Some(source) => RenderError::IoAt { path, source },
            None => RenderError::ConfigError(format!("filesystem loop detected at {}", path)),
        }
    }
}

impl RenderError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn syntax(path: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::ConfigSyntax {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn io_at(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::IoAt {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn yaml(path: impl AsRef<Path>, source: serde_yaml::Error) -> Self {
        Self::YamlParse {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
