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

use crate::shared::error::Result;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct ManifestReport {
    /// Relative to the output directory
    pub path: PathBuf,
    pub replacements: usize,
    pub unresolved: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub output_dir: PathBuf,
    pub apply_script: PathBuf,
    pub files_copied: usize,
    pub manifests: Vec<ManifestReport>,
}

impl RenderReport {
    pub fn total_replacements(&self) -> usize {
        self.manifests.iter().map(|m| m.replacements).sum()
    }

    pub fn unresolved_count(&self) -> usize {
        self.manifests.iter().map(|m| m.unresolved.len()).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
