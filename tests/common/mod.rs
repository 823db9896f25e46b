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

//! Shared fixtures: a small template tree and config files in a temp directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const FULL_CONFIG: &str = "\
EXTERNAL_IPS=\"10.1.0.5, 10.1.0.6\"
IMAGE_PREFIX=registry.example.com/
IMAGE_SUFFIX=:v0.3.0
NAMESPACE=rw-test
DB_URL=pd.tikv:2379
NUM_PROXY=2
NUM_RUNTIME=3
NUM_FETCHD=1
RUNTIME_CPU_REQUEST=250m
";

const PROXY: &str = "\
apiVersion: apps/v1
kind: Deployment
metadata:
  name: proxy
  namespace: __NAMESPACE__
spec:
  replicas: __NUM_PROXY__
  template:
    spec:
      __IMAGE_PULL_SECRETS__
      containers:
        - name: proxy
          image: __IMAGE_PREFIX__proxy__IMAGE_SUFFIX__
          args: [\"--tikv\", \"__DB_URL__\"]
---
apiVersion: v1
kind: Service
metadata:
  name: proxy
  namespace: __NAMESPACE__
spec:
  externalIPs: [__EXTERNAL_IPS__]
";

const RUNTIME: &str = "\
apiVersion: apps/v1
kind: Deployment
metadata:
  name: runtime
  namespace: __NAMESPACE__
spec:
  replicas: __NUM_RUNTIME__
  template:
    spec:
      containers:
        - name: runtime
          image: __IMAGE_PREFIX__runtime__IMAGE_SUFFIX__
          resources:
            requests:
              cpu: __RUNTIME_CPU_REQUEST__
";

const FETCHD: &str = "\
apiVersion: apps/v1
kind: Deployment
metadata:
  name: fetchd
  namespace: __NAMESPACE__
spec:
  replicas: __NUM_FETCHD__
";

pub struct Workspace {
    root: TempDir,
}

impl Workspace {
    /// Temp directory holding `k8s/` templates (one nested) and a README.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let ws = Self { root };
        ws.write("k8s/proxy.yaml", PROXY);
        ws.write("k8s/runtime.yaml", RUNTIME);
        ws.write("k8s/daemons/fetchd.yaml", FETCHD);
        ws.write("k8s/README.md", "templates for __NAMESPACE__\n");
        ws
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn templates(&self) -> PathBuf {
        self.path().join("k8s")
    }

    pub fn output(&self, suffix: &str) -> PathBuf {
        self.path().join(format!("k8s.{}", suffix))
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        fs::create_dir_all(path.parent().expect("relative path has a parent"))
            .expect("Failed to create parent directory");
        fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    pub fn config(&self, extra: &str) -> PathBuf {
        self.write("deploy.env", &format!("{}{}", FULL_CONFIG, extra))
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path().join(relative)).expect("Failed to read output")
    }
}

/// Every `.yaml` file under `root`, relative, sorted.
pub fn yaml_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    collect(root, root, &mut files);
    files.sort();
    files
}

fn collect(root: &Path, dir: &Path, files: &mut Vec<String>) {
    for entry in fs::read_dir(dir).expect("Failed to read directory") {
        let path = entry.expect("Failed to read entry").path();
        if path.is_dir() {
            collect(root, &path, files);
        } else if path.extension().is_some_and(|e| e == "yaml") {
            let relative = path.strip_prefix(root).expect("path under root");
            files.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
}
