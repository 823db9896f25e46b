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

//! Literal placeholder substitution.
//!
//! Each pass is a global find-and-replace of one `__TOKEN__`, run in [`ConfigKey::ALL`]
//! order. The pull secret token is replaced last with either nothing or a one-line
//! `imagePullSecrets` entry, so templates keep it on a line of its own at the pod spec
//! indentation.

use crate::domain::config::{ConfigKey, DeployConfig};
use crate::infrastructure::constants::IMAGE_PULL_SECRETS_FIELD;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub key: ConfigKey,
    pub token: &'static str,
    pub replacement: String,
}

#[derive(Debug, Clone)]
pub struct SubstitutionSet {
    passes: Vec<Substitution>,
}

impl SubstitutionSet {
    pub fn from_config(config: &DeployConfig) -> Self {
        let passes = ConfigKey::ALL
            .iter()
            .map(|key| {
                let replacement = match key {
                    ConfigKey::ImagePullSecret => pull_secrets_block(config.image_pull_secret()),
                    _ => config.value_or_empty(*key).to_string(),
                };
                Substitution {
                    key: *key,
                    token: key.placeholder(),
                    replacement,
                }
            })
            .collect();

        Self { passes }
    }

    pub fn passes(&self) -> &[Substitution] {
        &self.passes
    }

    /// Returns the rewritten text and the number of tokens replaced.
    pub fn apply(&self, text: &str) -> (String, usize) {
        let mut rendered = text.to_string();
        let mut replaced = 0;

        for pass in &self.passes {
            let count = rendered.matches(pass.token).count();
            if count > 0 {
                rendered = rendered.replace(pass.token, &pass.replacement);
                replaced += count;
            }
        }

        (rendered, replaced)
    }
}

pub fn pull_secrets_block(secret: Option<&str>) -> String {
    match secret {
        Some(name) => format!("{}: [{{ name: {} }}]", IMAGE_PULL_SECRETS_FIELD, name),
        None => String::new(),
    }
}

fn token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"__[A-Z][A-Z0-9]*(?:_[A-Z0-9]+)*__").expect("token pattern is valid")
    })
}

/// Placeholder-shaped tokens still present in `text`, sorted and deduplicated.
pub fn find_unresolved(text: &str) -> Vec<String> {
    token_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
