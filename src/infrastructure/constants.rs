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

/// Template layout
pub const DEFAULT_TEMPLATE_DIR: &str = "k8s";
pub const MANIFEST_EXTENSION: &str = "yaml";
pub const APPLY_SCRIPT_NAME: &str = "apply.sh";
pub const APPLY_SCRIPT_MODE: u32 = 0o755;

/// Cluster CLI
pub const DEFAULT_KUBECTL: &str = "kubectl";

/// Placeholder tokens
pub const TOKEN_EXTERNAL_IPS: &str = "__EXTERNAL_IPS__";
pub const TOKEN_IMAGE_PREFIX: &str = "__IMAGE_PREFIX__";
pub const TOKEN_IMAGE_SUFFIX: &str = "__IMAGE_SUFFIX__";
pub const TOKEN_NAMESPACE: &str = "__NAMESPACE__";
pub const TOKEN_DB_URL: &str = "__DB_URL__";
pub const TOKEN_NUM_PROXY: &str = "__NUM_PROXY__";
pub const TOKEN_NUM_RUNTIME: &str = "__NUM_RUNTIME__";
pub const TOKEN_NUM_FETCHD: &str = "__NUM_FETCHD__";
pub const TOKEN_RUNTIME_CPU_REQUEST: &str = "__RUNTIME_CPU_REQUEST__";
pub const TOKEN_IMAGE_PULL_SECRETS: &str = "__IMAGE_PULL_SECRETS__";

/// Field emitted in place of the pull secret token
pub const IMAGE_PULL_SECRETS_FIELD: &str = "imagePullSecrets";

/// Launcher: listener and metadata service
pub const LAUNCH_DEFAULT_BINARY: &str = "./target/release/rusty-workers-proxy";
pub const LAUNCH_LISTEN_ADDR: &str = "0.0.0.0:3080";
pub const LAUNCH_PD_ENDPOINT: &str = "127.0.0.1:2379";

/// Launcher: object storage
pub const LAUNCH_S3_BUCKET: &str = "rusty-workers-dev";
pub const LAUNCH_S3_REGION: &str = "us-east-1";
pub const LAUNCH_S3_ENDPOINT: &str = "http://127.0.0.1:9000";

/// Launcher: environment
pub const LAUNCH_RUST_LOG: &str = "info";
pub const LAUNCH_RUST_BACKTRACE: &str = "1";
