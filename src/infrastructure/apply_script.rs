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

use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Generator for the `apply.sh` wrapper placed next to the rendered manifests.
///
/// The script changes into its own directory first, so it can be run from anywhere.
/// The kubectl command is emitted verbatim and may carry extra flags such as
/// `kubectl --context staging`.
#[derive(Debug, Clone)]
pub struct ApplyScript {
    kubectl: String,
    generated_at: Option<DateTime<Local>>,
}

impl ApplyScript {
    pub fn new(kubectl: impl Into<String>) -> Self {
        Self {
            kubectl: kubectl.into(),
            generated_at: Some(Local::now()),
        }
    }

    pub fn without_timestamp(mut self) -> Self {
        self.generated_at = None;
        self
    }

    pub fn render(&self, manifests: &[PathBuf]) -> String {
        let mut script = String::from("#!/bin/sh\n");
        match self.generated_at {
            Some(at) => script.push_str(&format!(
                "# Generated by rw-kube {} on {}\n",
                env!("CARGO_PKG_VERSION"),
                at.format("%Y-%m-%d %H:%M:%S %z")
            )),
            None => script.push_str("# Generated by rw-kube\n"),
        }
        script.push_str("set -e\n");
        script.push_str("cd \"$(dirname \"$0\")\"\n");

        for manifest in manifests {
            let path = manifest
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            script.push_str(&format!("{} apply -f {}\n", self.kubectl, shell_quote(&path)));
        }

        script
    }
}

fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':'));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
