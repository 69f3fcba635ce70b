/// Process supervisor control
///
/// The installer drives supervisord through this trait so tests can
/// substitute a recording mock instead of shelling out.
use crate::config::types::{DeployError, Result};
use std::process::Command;

pub trait SupervisorControl {
    /// Ask the supervisor to re-read its configuration files
    fn reread(&self) -> Result<()>;
    /// Ask the supervisor to apply configuration changes
    fn update(&self) -> Result<()>;
}

/// Real control backend shelling out to supervisorctl
pub struct SupervisorCtl {
    ctl_program: String,
}

impl SupervisorCtl {
    pub fn new(ctl_program: impl Into<String>) -> Self {
        Self {
            ctl_program: ctl_program.into(),
        }
    }

    fn run_subcommand(&self, subcommand: &str) -> Result<()> {
        let output = Command::new(&self.ctl_program)
            .arg(subcommand)
            .output()
            .map_err(|e| {
                DeployError::Supervisor(format!(
                    "Failed to run {} {}: {}",
                    self.ctl_program, subcommand, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeployError::Supervisor(format!(
                "{} {} exited with {}: {}",
                self.ctl_program,
                subcommand,
                output.status,
                stderr.trim()
            )));
        }

        log::info!("{} {} succeeded", self.ctl_program, subcommand);
        Ok(())
    }
}

impl SupervisorControl for SupervisorCtl {
    fn reread(&self) -> Result<()> {
        self.run_subcommand("reread")
    }

    fn update(&self) -> Result<()> {
        self.run_subcommand("update")
    }
}

/// Operator guidance printed after a successful install
///
/// Informational only; none of these commands are executed by the
/// installer itself.
pub fn operator_guidance(ctl_program: &str, program: &str, service_url: &str) -> String {
    format!(
        "Installed supervisor program '{program}'.\n\
         \n\
         Operate it with:\n\
         \x20 {ctl} status {program}\n\
         \x20 {ctl} start {program}\n\
         \x20 {ctl} stop {program}\n\
         \x20 {ctl} tail -f {program}\n\
         \n\
         Service URL: {url}",
        program = program,
        ctl = ctl_program,
        url = service_url,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ctl_binary_is_a_supervisor_error() {
        let ctl = SupervisorCtl::new("/nonexistent/supervisorctl");
        let err = ctl.reread().unwrap_err();
        assert!(matches!(err, DeployError::Supervisor(_)));
    }

    #[test]
    fn guidance_names_all_operator_commands() {
        let text = operator_guidance("supervisorctl", "youtube-stt", "http://localhost:8080");
        for needle in [
            "supervisorctl status youtube-stt",
            "supervisorctl start youtube-stt",
            "supervisorctl stop youtube-stt",
            "supervisorctl tail -f youtube-stt",
            "http://localhost:8080",
        ] {
            assert!(text.contains(needle), "guidance missing: {}", needle);
        }
    }
}
