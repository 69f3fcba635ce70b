/// Materialized filesystem verification
///
/// Checks that a built image root actually contains what the canonical
/// build definition promises: the working directory with the copied
/// source tree entrypoint, and every listed runtime directory. All
/// missing paths are reported, not just the first.
use crate::config::types::Result;
use crate::image::definition::BuildDefinition;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    pub ok: bool,
    pub checked: usize,
    pub missing: Vec<PathBuf>,
}

impl VerifyReport {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::config::types::DeployError::Image(e.to_string()))
    }
}

fn rebase(root: &Path, path: &str) -> PathBuf {
    // Absolute paths in the definition live under the image root.
    root.join(path.trim_start_matches('/'))
}

/// Verify a materialized root against the build definition
pub fn verify_root(def: &BuildDefinition, root: &Path) -> VerifyReport {
    let mut missing = Vec::new();
    let mut checked = 0;

    let workdir = rebase(root, &def.workdir);
    checked += 1;
    if !workdir.is_dir() {
        missing.push(workdir.clone());
    }

    checked += 1;
    let entry = workdir.join(&def.source_entrypoint);
    if !entry.is_file() {
        missing.push(entry);
    }

    for dir in &def.runtime_dirs {
        checked += 1;
        let path = if dir.starts_with('/') {
            rebase(root, dir)
        } else {
            workdir.join(dir)
        };
        if !path.is_dir() {
            missing.push(path);
        }
    }

    VerifyReport {
        ok: missing.is_empty(),
        checked,
        missing,
    }
}
