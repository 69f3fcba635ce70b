/// Runtime directory preparation
///
/// The service expects its download scratch space and media storage to
/// exist before the first request lands. Creation is idempotent so
/// repeated launches over an existing filesystem are safe.
use crate::config::types::{DeployError, Result, RuntimeDirs};
use std::fs;
use std::path::Path;

/// Permission policy for runtime directories
#[derive(Debug, Clone)]
pub struct PermissionPolicy {
    /// Umask applied before any directory creation
    pub umask: u32,
    /// Media directory permissions (served content, world-readable)
    pub media_dir_perms: u32,
    /// Download scratch permissions (owner only)
    pub download_dir_perms: u32,
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        PermissionPolicy {
            umask: 0o022,
            media_dir_perms: 0o755,
            download_dir_perms: 0o700,
        }
    }
}

/// Apply the policy umask for the current process
pub fn apply_umask(policy: &PermissionPolicy) -> Result<()> {
    #[cfg(unix)]
    {
        use nix::sys::stat::{umask, Mode};

        let mode = Mode::from_bits(policy.umask)
            .ok_or_else(|| DeployError::Config(format!("Invalid umask: {:o}", policy.umask)))?;
        umask(mode);
        log::info!("Applied umask: {:o}", policy.umask);
    }

    Ok(())
}

fn create_dir_with_perms(path: &Path, perms: u32) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        DeployError::Launch(format!(
            "Failed to create runtime directory {}: {}",
            path.display(),
            e
        ))
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(perms)).map_err(|e| {
            DeployError::Launch(format!(
                "Failed to set permissions on {}: {}",
                path.display(),
                e
            ))
        })?;
    }
    #[cfg(not(unix))]
    let _ = perms;

    log::info!("Runtime directory ready: {}", path.display());
    Ok(())
}

/// Create all runtime directories with the given policy
pub fn prepare(dirs: &RuntimeDirs, policy: &PermissionPolicy) -> Result<()> {
    apply_umask(policy)?;
    create_dir_with_perms(&dirs.download_dir, policy.download_dir_perms)?;
    create_dir_with_perms(&dirs.media_dir, policy.media_dir_perms)?;
    Ok(())
}
