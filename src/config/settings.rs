use crate::config::types::{DeployError, InstallProfile, Result, RuntimeDirs, ServerProfile};
/// Configuration loading from deploy.json
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional field-wise overrides for the installer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallOverrides {
    pub source: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub program: Option<String>,
    pub service_url: Option<String>,
    pub ctl_program: Option<String>,
}

/// Optional field-wise overrides for the server invocation
///
/// The concurrency parameters are part of the service contract and are
/// deliberately not overridable here; only the entry point and program
/// can vary between hosts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerOverrides {
    pub program: Option<String>,
    pub app_module: Option<String>,
}

/// Optional overrides for runtime directories
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirOverrides {
    pub download_dir: Option<PathBuf>,
    pub media_dir: Option<PathBuf>,
}

/// Full deploy.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploySettings {
    #[serde(default)]
    pub install: InstallOverrides,
    #[serde(default)]
    pub server: ServerOverrides,
    #[serde(default)]
    pub dirs: DirOverrides,
}

impl DeploySettings {
    /// Load configuration from a deploy.json file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            DeployError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let settings: DeploySettings = serde_json::from_str(&content)
            .map_err(|e| DeployError::Config(format!("Failed to parse config JSON: {}", e)))?;

        Ok(settings)
    }

    /// Load ./deploy.json if present, otherwise compiled-in defaults
    pub fn load_default() -> Result<Self> {
        let config_path = std::env::current_dir()
            .map_err(|e| DeployError::Config(format!("Failed to get current directory: {}", e)))?
            .join("deploy.json");

        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Install profile with overrides applied
    pub fn install_profile(&self) -> InstallProfile {
        let mut profile = InstallProfile::default();
        if let Some(source) = &self.install.source {
            profile.source = source.clone();
        }
        if let Some(target) = &self.install.target {
            profile.target = target.clone();
        }
        if let Some(program) = &self.install.program {
            profile.program = program.clone();
        }
        if let Some(url) = &self.install.service_url {
            profile.service_url = url.clone();
        }
        if let Some(ctl) = &self.install.ctl_program {
            profile.ctl_program = ctl.clone();
        }
        profile
    }

    /// Server profile bound to `port`, with overrides applied
    pub fn server_profile(&self, port: u16) -> ServerProfile {
        let mut profile = ServerProfile::with_port(port);
        if let Some(program) = &self.server.program {
            profile.program = program.clone();
        }
        if let Some(app_module) = &self.server.app_module {
            profile.app_module = app_module.clone();
        }
        profile
    }

    /// Runtime directories with overrides applied
    pub fn runtime_dirs(&self) -> RuntimeDirs {
        let mut dirs = RuntimeDirs::default();
        if let Some(download_dir) = &self.dirs.download_dir {
            dirs.download_dir = download_dir.clone();
        }
        if let Some(media_dir) = &self.dirs.media_dir {
            dirs.media_dir = media_dir.clone();
        }
        dirs
    }
}
