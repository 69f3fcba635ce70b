/// Canonical container build definition
///
/// The service historically shipped three near-duplicate image recipes
/// with drifting behavior. This is the single authoritative definition:
/// environment-driven port with an 8080 default, a copied-in launcher
/// instead of an inline shell string, and all runtime directories
/// pre-created at build time.
use crate::config::types::DEFAULT_PORT;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildDefinition {
    /// Base image
    pub base_image: String,
    /// OS packages installed before the dependency manifest
    pub os_packages: Vec<String>,
    /// Dependency manifest file copied and installed first (layer caching)
    pub manifest: String,
    /// Image working directory receiving the source tree
    pub workdir: String,
    /// Application entry file expected inside the working directory
    pub source_entrypoint: String,
    /// Runtime directories created at build time (relative to workdir
    /// unless absolute)
    pub runtime_dirs: Vec<String>,
    /// Default exposed port; the launcher binds the resolved PORT at run
    /// time regardless of this value
    pub expose_port: u16,
    /// Entrypoint argv (the copied-in launcher)
    pub entrypoint: Vec<String>,
}

impl Default for BuildDefinition {
    fn default() -> Self {
        Self {
            base_image: "python:3.11-slim".to_string(),
            os_packages: vec!["ffmpeg".to_string()],
            manifest: "requirements.txt".to_string(),
            workdir: "/app".to_string(),
            source_entrypoint: "app.py".to_string(),
            runtime_dirs: vec![
                "downloads".to_string(),
                "media".to_string(),
                "/tmp/stt".to_string(),
            ],
            expose_port: DEFAULT_PORT,
            entrypoint: vec!["./stt-launch".to_string()],
        }
    }
}

impl BuildDefinition {
    /// Render the definition as deterministic Dockerfile text
    pub fn render_dockerfile(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "FROM {}", self.base_image);

        if !self.os_packages.is_empty() {
            let _ = writeln!(
                out,
                "RUN apt-get update && apt-get install -y --no-install-recommends {} \\\n    && rm -rf /var/lib/apt/lists/*",
                self.os_packages.join(" ")
            );
        }

        let _ = writeln!(out, "WORKDIR {}", self.workdir);
        let _ = writeln!(out, "COPY {} .", self.manifest);
        let _ = writeln!(out, "RUN pip install --no-cache-dir -r {}", self.manifest);
        let _ = writeln!(out, "COPY . .");

        if !self.runtime_dirs.is_empty() {
            let _ = writeln!(out, "RUN mkdir -p {}", self.runtime_dirs.join(" "));
        }

        let _ = writeln!(out, "EXPOSE {}", self.expose_port);

        let argv: Vec<String> = self
            .entrypoint
            .iter()
            .map(|arg| format!("\"{}\"", arg))
            .collect();
        let _ = writeln!(out, "ENTRYPOINT [{}]", argv.join(", "));

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_contains_all_stages_in_build_order() {
        let dockerfile = BuildDefinition::default().render_dockerfile();

        let stages = [
            "FROM python:3.11-slim",
            "apt-get install -y --no-install-recommends ffmpeg",
            "WORKDIR /app",
            "COPY requirements.txt .",
            "RUN pip install --no-cache-dir -r requirements.txt",
            "COPY . .",
            "RUN mkdir -p downloads media /tmp/stt",
            "EXPOSE 8080",
            "ENTRYPOINT [\"./stt-launch\"]",
        ];

        let mut last = 0;
        for stage in stages {
            let pos = dockerfile
                .find(stage)
                .unwrap_or_else(|| panic!("missing stage: {}", stage));
            assert!(pos >= last, "stage out of order: {}", stage);
            last = pos;
        }
    }

    #[test]
    fn render_is_deterministic() {
        let def = BuildDefinition::default();
        assert_eq!(def.render_dockerfile(), def.render_dockerfile());
    }

    #[test]
    fn manifest_installs_before_source_copy() {
        // Dependency layer must cache independently of source edits.
        let dockerfile = BuildDefinition::default().render_dockerfile();
        let manifest_pos = dockerfile.find("RUN pip install").unwrap();
        let source_pos = dockerfile.find("COPY . .").unwrap();
        assert!(manifest_pos < source_pos);
    }

    #[test]
    fn no_inline_shell_entrypoint() {
        // R2: the run command is an exec-form launcher, never a shell
        // string with environment substitution.
        let dockerfile = BuildDefinition::default().render_dockerfile();
        assert!(!dockerfile.contains("CMD "));
        assert!(!dockerfile.contains("sh -c"));
    }
}
