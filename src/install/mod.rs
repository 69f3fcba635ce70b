//! Supervisor config installer
//!
//! Copies the program definition into the supervisor's conf.d directory,
//! verifies the copy by digest, and asks the running supervisor to apply
//! it. One error policy throughout: the first failure aborts, and no
//! supervisor command runs after a failed copy.

pub mod supervisor;

use crate::config::types::{DeployError, InstallProfile, Result};
use crate::observability::audit::{self, DeployEvent, DeployEventType};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// SHA-256 digest of a file, hex encoded
pub fn sha256_file(path: &Path) -> Result<String> {
    let content = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{:x}", hasher.finalize()))
}

fn validate_source(profile: &InstallProfile) -> Result<()> {
    if !profile.source.exists() {
        return Err(DeployError::Install(format!(
            "Supervisor config not found: {}",
            profile.source.display()
        )));
    }
    if !profile.source.is_file() {
        return Err(DeployError::Install(format!(
            "Supervisor config is not a regular file: {}",
            profile.source.display()
        )));
    }
    Ok(())
}

fn copy_verified(profile: &InstallProfile) -> Result<()> {
    let target_dir = profile.target.parent().ok_or_else(|| {
        DeployError::Install(format!(
            "Install target has no parent directory: {}",
            profile.target.display()
        ))
    })?;
    if !target_dir.is_dir() {
        return Err(DeployError::Install(format!(
            "Supervisor config directory missing: {} (is the supervisor installed?)",
            target_dir.display()
        )));
    }

    fs::copy(&profile.source, &profile.target).map_err(|e| {
        DeployError::Install(format!(
            "Failed to copy {} to {}: {}",
            profile.source.display(),
            profile.target.display(),
            e
        ))
    })?;

    // The copy is only trusted once both digests agree.
    let source_digest = sha256_file(&profile.source)?;
    let target_digest = sha256_file(&profile.target)?;
    if source_digest != target_digest {
        return Err(DeployError::Install(format!(
            "Digest mismatch after copy to {} (expected {}, got {})",
            profile.target.display(),
            source_digest,
            target_digest
        )));
    }

    log::info!(
        "Installed {} -> {} (sha256 {})",
        profile.source.display(),
        profile.target.display(),
        source_digest
    );
    Ok(())
}

/// Run the installer end to end
pub fn run_install(
    profile: &InstallProfile,
    ctl: &dyn supervisor::SupervisorControl,
) -> Result<()> {
    audit::record(DeployEvent::new(
        DeployEventType::InstallStart,
        format!("target={}", profile.target.display()),
    ));

    let outcome = install_steps(profile, ctl);
    match &outcome {
        Ok(()) => audit::record(DeployEvent::new(
            DeployEventType::InstallSuccess,
            format!("program={}", profile.program),
        )),
        Err(err) => audit::record(DeployEvent::new(
            DeployEventType::InstallFailure,
            err.to_string(),
        )),
    }
    outcome
}

fn install_steps(
    profile: &InstallProfile,
    ctl: &dyn supervisor::SupervisorControl,
) -> Result<()> {
    validate_source(profile)?;
    copy_verified(profile)?;
    ctl.reread()?;
    ctl.update()?;

    println!(
        "{}",
        supervisor::operator_guidance(&profile.ctl_program, &profile.program, &profile.service_url)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Recording mock, mirroring how supervisor interactions are
    /// asserted without a running supervisord.
    #[derive(Default)]
    pub struct MockSupervisor {
        pub reread_calls: AtomicUsize,
        pub update_calls: AtomicUsize,
        pub fail_reread: bool,
    }

    impl supervisor::SupervisorControl for MockSupervisor {
        fn reread(&self) -> Result<()> {
            self.reread_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_reread {
                return Err(DeployError::Supervisor("reread refused".to_string()));
            }
            Ok(())
        }

        fn update(&self) -> Result<()> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn profile_in(dir: &Path) -> InstallProfile {
        InstallProfile {
            source: dir.join("youtube-stt.conf"),
            target: dir.join("conf.d").join("youtube-stt.conf"),
            ..InstallProfile::default()
        }
    }

    fn write_source(profile: &InstallProfile) {
        let mut file = fs::File::create(&profile.source).unwrap();
        writeln!(file, "[program:youtube-stt]\ncommand=stt-launch").unwrap();
    }

    #[test]
    fn install_copies_and_applies() {
        let tmp = tempfile::tempdir().unwrap();
        let profile = profile_in(tmp.path());
        write_source(&profile);
        fs::create_dir_all(profile.target.parent().unwrap()).unwrap();

        let ctl = MockSupervisor::default();
        run_install(&profile, &ctl).unwrap();

        assert_eq!(
            sha256_file(&profile.source).unwrap(),
            sha256_file(&profile.target).unwrap()
        );
        assert_eq!(ctl.reread_calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctl.update_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_source_aborts_before_supervisor_calls() {
        let tmp = tempfile::tempdir().unwrap();
        let profile = profile_in(tmp.path());
        fs::create_dir_all(profile.target.parent().unwrap()).unwrap();

        let ctl = MockSupervisor::default();
        let err = run_install(&profile, &ctl).unwrap_err();

        assert!(matches!(err, DeployError::Install(_)));
        assert_eq!(ctl.reread_calls.load(Ordering::SeqCst), 0);
        assert_eq!(ctl.update_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_conf_dir_aborts_before_supervisor_calls() {
        let tmp = tempfile::tempdir().unwrap();
        let profile = profile_in(tmp.path());
        write_source(&profile);
        // conf.d deliberately not created

        let ctl = MockSupervisor::default();
        let err = run_install(&profile, &ctl).unwrap_err();

        assert!(matches!(err, DeployError::Install(_)));
        assert_eq!(ctl.reread_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_reread_aborts_before_update() {
        let tmp = tempfile::tempdir().unwrap();
        let profile = profile_in(tmp.path());
        write_source(&profile);
        fs::create_dir_all(profile.target.parent().unwrap()).unwrap();

        let ctl = MockSupervisor {
            fail_reread: true,
            ..MockSupervisor::default()
        };
        let err = run_install(&profile, &ctl).unwrap_err();

        assert!(matches!(err, DeployError::Supervisor(_)));
        assert_eq!(ctl.update_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn directory_as_source_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let mut profile = profile_in(tmp.path());
        profile.source = PathBuf::from(tmp.path());
        fs::create_dir_all(profile.target.parent().unwrap()).unwrap();

        let ctl = MockSupervisor::default();
        let err = run_install(&profile, &ctl).unwrap_err();
        assert!(matches!(err, DeployError::Install(_)));
    }
}
