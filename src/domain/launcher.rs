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

//! One-shot launcher for a locally built server binary.
//!
//! Flags and environment are fixed; only the binary path can be chosen.

use crate::infrastructure::constants::*;
use crate::shared::error::{RenderError, Result};
use std::path::PathBuf;
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub binary: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl LaunchPlan {
    pub fn fixed(binary: impl Into<PathBuf>) -> Self {
        let args = [
            ("--listen", LAUNCH_LISTEN_ADDR),
            ("--pd-endpoint", LAUNCH_PD_ENDPOINT),
            ("--s3-bucket", LAUNCH_S3_BUCKET),
            ("--s3-region", LAUNCH_S3_REGION),
            ("--s3-endpoint", LAUNCH_S3_ENDPOINT),
        ]
        .into_iter()
        .flat_map(|(flag, value)| [flag.to_string(), value.to_string()])
        .collect();

        let env = vec![
            ("RUST_LOG".to_string(), LAUNCH_RUST_LOG.to_string()),
            ("RUST_BACKTRACE".to_string(), LAUNCH_RUST_BACKTRACE.to_string()),
        ];

        Self {
            binary: binary.into(),
            args,
            env,
        }
    }

    /// Shell-like rendering of the invocation, for display only.
    pub fn command_line(&self) -> String {
        let mut parts: Vec<String> = self
            .env
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        parts.push(self.binary.display().to_string());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Run the binary to completion. Ctrl-C stops the child and waits for it.
    pub async fn run(&self) -> Result<ExitStatus> {
        if !self.binary.is_file() {
            return Err(RenderError::ValidationError(format!(
                "Server binary not found: {}",
                self.binary.display()
            )));
        }

        info!("Starting {}", self.binary.display());
        let mut child = Command::new(&self.binary)
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RenderError::io_at(&self.binary, e))?;

        let finished = tokio::select! {
            status = child.wait() => Some(status),
            _ = tokio::signal::ctrl_c() => None,
        };

        match finished {
            Some(status) => status.map_err(|e| RenderError::io_at(&self.binary, e)),
            None => {
                warn!("Interrupted, stopping {}", self.binary.display());
                // The child may already have exited on the same SIGINT.
                let _ = child.start_kill();
                child
                    .wait()
                    .await
                    .map_err(|e| RenderError::io_at(&self.binary, e))
            }
        }
    }
}
