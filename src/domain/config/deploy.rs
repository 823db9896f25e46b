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

use crate::domain::config::env_file::EnvFile;
use crate::infrastructure::constants::*;
use crate::shared::error::{RenderError, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::net::IpAddr;
use std::sync::OnceLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigKey {
    ExternalIps,
    ImagePrefix,
    ImageSuffix,
    Namespace,
    DbUrl,
    NumProxy,
    NumRuntime,
    NumFetchd,
    RuntimeCpuRequest,
    ImagePullSecret,
}

impl ConfigKey {
    /// Substitution order.
    pub const ALL: [ConfigKey; 10] = [
        ConfigKey::ExternalIps,
        ConfigKey::ImagePrefix,
        ConfigKey::ImageSuffix,
        ConfigKey::Namespace,
        ConfigKey::DbUrl,
        ConfigKey::NumProxy,
        ConfigKey::NumRuntime,
        ConfigKey::NumFetchd,
        ConfigKey::RuntimeCpuRequest,
        ConfigKey::ImagePullSecret,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::ExternalIps => "EXTERNAL_IPS",
            ConfigKey::ImagePrefix => "IMAGE_PREFIX",
            ConfigKey::ImageSuffix => "IMAGE_SUFFIX",
            ConfigKey::Namespace => "NAMESPACE",
            ConfigKey::DbUrl => "DB_URL",
            ConfigKey::NumProxy => "NUM_PROXY",
            ConfigKey::NumRuntime => "NUM_RUNTIME",
            ConfigKey::NumFetchd => "NUM_FETCHD",
            ConfigKey::RuntimeCpuRequest => "RUNTIME_CPU_REQUEST",
            ConfigKey::ImagePullSecret => "IMAGE_PULL_SECRET",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            ConfigKey::ExternalIps => TOKEN_EXTERNAL_IPS,
            ConfigKey::ImagePrefix => TOKEN_IMAGE_PREFIX,
            ConfigKey::ImageSuffix => TOKEN_IMAGE_SUFFIX,
            ConfigKey::Namespace => TOKEN_NAMESPACE,
            ConfigKey::DbUrl => TOKEN_DB_URL,
            ConfigKey::NumProxy => TOKEN_NUM_PROXY,
            ConfigKey::NumRuntime => TOKEN_NUM_RUNTIME,
            ConfigKey::NumFetchd => TOKEN_NUM_FETCHD,
            ConfigKey::RuntimeCpuRequest => TOKEN_RUNTIME_CPU_REQUEST,
            ConfigKey::ImagePullSecret => TOKEN_IMAGE_PULL_SECRETS,
        }
    }

    /// Keys checked by strict validation. The image suffix may legitimately be empty.
    pub fn is_required(&self) -> bool {
        !matches!(self, ConfigKey::ImageSuffix | ConfigKey::ImagePullSecret)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConfigKey {
    type Err = RenderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ConfigKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| RenderError::ConfigError(format!("Unknown configuration key: {}", s)))
    }
}

/// Deployment values resolved from a config file, the environment and `-D` overrides.
#[derive(Debug, Clone, Default)]
pub struct DeployConfig {
    values: BTreeMap<ConfigKey, String>,
    extra: BTreeMap<String, String>,
}

impl DeployConfig {
    /// Recognized keys missing from the file fall back to `lookup`, mirroring a sourced
    /// file that leaves exported variables visible.
    pub fn from_env_file<F>(file: &EnvFile, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        for key in ConfigKey::ALL {
            let value = file
                .get(key.as_str())
                .map(str::to_string)
                .or_else(|| lookup(key.as_str()));
            if let Some(value) = value {
                config.values.insert(key, value);
            }
        }

        for (name, value) in file.iter() {
            if name.parse::<ConfigKey>().is_err() {
                debug!("Ignoring unrecognized key {} from {}", name, file.origin());
                config.extra.insert(name.to_string(), value.to_string());
            }
        }

        config
    }

    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) {
        for (name, value) in overrides {
            match name.parse::<ConfigKey>() {
                Ok(key) => {
                    debug!("Override {}={}", key, value);
                    self.values.insert(key, value.clone());
                }
                Err(_) => {
                    debug!("Override of unrecognized key {} has no placeholder", name);
                    self.extra.insert(name.clone(), value.clone());
                }
            }
        }
    }

    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Unset values substitute as the empty string.
    pub fn value_or_empty(&self, key: ConfigKey) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn is_set(&self, key: ConfigKey) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }

    pub fn image_pull_secret(&self) -> Option<&str> {
        self.get(ConfigKey::ImagePullSecret).filter(|s| !s.is_empty())
    }

    /// Assignments that do not map to a placeholder.
    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = ConfigKey::ALL
            .iter()
            .filter(|key| key.is_required() && !self.is_set(**key))
            .map(|key| key.as_str())
            .collect();

        if !missing.is_empty() {
            return Err(RenderError::MissingValue(missing.join(", ")));
        }

        for key in [ConfigKey::NumProxy, ConfigKey::NumRuntime, ConfigKey::NumFetchd] {
            let value = self.value_or_empty(key);
            if value.parse::<u32>().is_err() {
                return Err(RenderError::ValidationError(format!(
                    "{} must be a non-negative integer, got '{}'",
                    key, value
                )));
            }
        }

        let cpu = self.value_or_empty(ConfigKey::RuntimeCpuRequest);
        if !cpu_quantity_pattern().is_match(cpu) {
            return Err(RenderError::ValidationError(format!(
                "{} must be a CPU quantity such as 500m or 1.5, got '{}'",
                ConfigKey::RuntimeCpuRequest,
                cpu
            )));
        }

        let namespace = self.value_or_empty(ConfigKey::Namespace);
        if !is_valid_k8s_name(namespace) || namespace.contains('.') || namespace.len() > 63 {
            return Err(RenderError::ValidationError(format!(
                "Invalid {}: {}",
                ConfigKey::Namespace,
                namespace
            )));
        }

        for ip in split_list(self.value_or_empty(ConfigKey::ExternalIps)) {
            if ip.parse::<IpAddr>().is_err() {
                return Err(RenderError::ValidationError(format!(
                    "{} contains an invalid address: {}",
                    ConfigKey::ExternalIps,
                    ip
                )));
            }
        }

        if let Some(secret) = self.image_pull_secret() {
            if !is_valid_k8s_name(secret) {
                return Err(RenderError::ValidationError(format!(
                    "Invalid {}: {}",
                    ConfigKey::ImagePullSecret,
                    secret
                )));
            }
        }

        Ok(())
    }
}

fn cpu_quantity_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[0-9]+m|[0-9]+(?:\.[0-9]+)?)$").expect("cpu pattern is valid")
    })
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|s| s.trim_matches(|c: char| c == '"' || c == '\''))
        .filter(|s| !s.is_empty())
}

pub(crate) fn is_valid_k8s_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 253 {
        return false;
    }

    if !name.chars().next().unwrap_or(' ').is_ascii_alphanumeric() {
        return false;
    }
    if !name.chars().last().unwrap_or(' ').is_ascii_alphanumeric() {
        return false;
    }

    name.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
}

/// Parse dynamic configuration properties from -D KEY=VALUE format
pub fn parse_overrides(properties: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for property in properties {
        let (key, value) = property.split_once('=').ok_or_else(|| {
            RenderError::config_error(format!(
                "Invalid property format: '{}'. Expected 'KEY=VALUE'",
                property
            ))
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(RenderError::config_error(format!(
                "Empty key in property: '{}'",
                property
            )));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> DeployConfig {
        let mut config = DeployConfig::default();
        config.set(ConfigKey::ExternalIps, "10.0.0.1, 10.0.0.2");
        config.set(ConfigKey::ImagePrefix, "registry.example.com/");
        config.set(ConfigKey::ImageSuffix, ":v0.3.0");
        config.set(ConfigKey::Namespace, "rusty-workers");
        config.set(ConfigKey::DbUrl, "pd.tikv.svc:2379");
        config.set(ConfigKey::NumProxy, "2");
        config.set(ConfigKey::NumRuntime, "4");
        config.set(ConfigKey::NumFetchd, "1");
        config.set(ConfigKey::RuntimeCpuRequest, "500m");
        config
    }

    #[test]
    fn test_key_round_trip_through_name() {
        for key in ConfigKey::ALL {
            assert_eq!(key.as_str().parse::<ConfigKey>().unwrap(), key);
        }
        assert!("UNKNOWN".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_from_env_file_with_fallback() {
        let file = EnvFile::parse_str(
            "NAMESPACE=rw\nNUM_PROXY=2\nEDITOR=vim\n",
            "deploy.env",
            |_| None,
        )
        .unwrap();

        let config = DeployConfig::from_env_file(&file, |k| {
            (k == "DB_URL" || k == "NAMESPACE").then(|| "from-env".to_string())
        });

        assert_eq!(config.get(ConfigKey::Namespace), Some("rw"));
        assert_eq!(config.get(ConfigKey::DbUrl), Some("from-env"));
        assert_eq!(config.get(ConfigKey::NumRuntime), None);
        assert_eq!(config.value_or_empty(ConfigKey::NumRuntime), "");
        assert_eq!(config.extra().get("EDITOR").map(String::as_str), Some("vim"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = complete_config();
        let overrides = parse_overrides(&[
            "NUM_RUNTIME=8".to_string(),
            "CUSTOM = x".to_string(),
        ])
        .unwrap();
        config.apply_overrides(&overrides);

        assert_eq!(config.get(ConfigKey::NumRuntime), Some("8"));
        assert_eq!(config.extra().get("CUSTOM").map(String::as_str), Some("x"));
    }

    #[test]
    fn test_parse_overrides_rejects_malformed() {
        assert!(parse_overrides(&["NO_EQUALS".to_string()]).is_err());
        assert!(parse_overrides(&["=value".to_string()]).is_err());
        let map = parse_overrides(&["DB_URL=a=b".to_string()]).unwrap();
        assert_eq!(map.get("DB_URL").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn test_image_pull_secret_empty_is_unset() {
        let mut config = complete_config();
        assert_eq!(config.image_pull_secret(), None);
        config.set(ConfigKey::ImagePullSecret, "");
        assert_eq!(config.image_pull_secret(), None);
        config.set(ConfigKey::ImagePullSecret, "regcred");
        assert_eq!(config.image_pull_secret(), Some("regcred"));
    }

    #[test]
    fn test_validate_complete_config() {
        assert!(complete_config().validate().is_ok());
    }

    #[test]
    fn test_validate_allows_empty_image_suffix() {
        let mut config = complete_config();
        config.set(ConfigKey::ImageSuffix, "");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_all_missing_keys() {
        let mut config = DeployConfig::default();
        config.set(ConfigKey::Namespace, "rw");
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("EXTERNAL_IPS"));
        assert!(err.contains("DB_URL"));
        assert!(err.contains("RUNTIME_CPU_REQUEST"));
        assert!(!err.contains("NAMESPACE"));
        assert!(!err.contains("IMAGE_SUFFIX"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = complete_config();
        config.set(ConfigKey::NumRuntime, "four");
        assert!(config.validate().is_err());

        let mut config = complete_config();
        config.set(ConfigKey::RuntimeCpuRequest, "half");
        assert!(config.validate().is_err());

        let mut config = complete_config();
        config.set(ConfigKey::Namespace, "Rusty_Workers");
        assert!(config.validate().is_err());

        let mut config = complete_config();
        config.set(ConfigKey::ExternalIps, "10.0.0.1,not-an-ip");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cpu_quantities() {
        for ok in ["500m", "1", "1.5", "2000m"] {
            assert!(cpu_quantity_pattern().is_match(ok), "{ok}");
        }
        for bad in ["", "m", "1.5m", "-1", "0.5 "] {
            assert!(!cpu_quantity_pattern().is_match(bad), "{bad}");
        }
    }
}
