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

use crate::infrastructure::constants::{APPLY_SCRIPT_MODE, MANIFEST_EXTENSION};
use crate::shared::error::{RenderError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Copy `src` to `dst`, removing whatever was at `dst` first. Returns the number of
/// files copied.
pub fn replace_dir_tree(src: &Path, dst: &Path) -> Result<usize> {
    remove_existing(dst)?;

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src).map_err(|_| {
            RenderError::ValidationError(format!(
                "{} is outside of {}",
                entry.path().display(),
                src.display()
            ))
        })?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| RenderError::io_at(&target, e))?;
        } else {
            // fs::copy carries the permission bits over.
            fs::copy(entry.path(), &target).map_err(|e| RenderError::io_at(entry.path(), e))?;
            copied += 1;
        }
    }

    debug!("Copied {} files from {} to {}", copied, src.display(), dst.display());
    Ok(copied)
}

fn remove_existing(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(RenderError::io_at(path, e)),
    };

    debug!("Removing previous output {}", path.display());
    if metadata.is_dir() {
        fs::remove_dir_all(path).map_err(|e| RenderError::io_at(path, e))
    } else {
        fs::remove_file(path).map_err(|e| RenderError::io_at(path, e))
    }
}

/// Every `*.yaml` file under `root`, relative to it, in sorted order.
pub fn find_manifests(root: &Path) -> Result<Vec<PathBuf>> {
    let mut manifests = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let is_manifest = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == MANIFEST_EXTENSION);
        if !is_manifest {
            continue;
        }

        if let Ok(relative) = entry.path().strip_prefix(root) {
            manifests.push(relative.to_path_buf());
        }
    }

    manifests.sort();
    Ok(manifests)
}

pub fn write_executable(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| RenderError::io_at(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(APPLY_SCRIPT_MODE))
            .map_err(|e| RenderError::io_at(path, e))?;
    }

    Ok(())
}
