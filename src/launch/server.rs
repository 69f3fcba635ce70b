/// WSGI server invocation
///
/// `build_command` is pure so the exact argv can be asserted in tests;
/// `exec` replaces the current process and only returns on failure.
use crate::config::types::{DeployError, Result, ServerProfile};
use std::process::Command;

/// Full argv for the server process
///
/// Access and error logs go to the standard streams so the supervisor
/// (or container runtime) owns log routing.
pub fn build_command(profile: &ServerProfile) -> Vec<String> {
    vec![
        profile.program.clone(),
        "--bind".to_string(),
        format!("{}:{}", profile.bind_addr, profile.port),
        "--workers".to_string(),
        profile.workers.to_string(),
        "--threads".to_string(),
        profile.threads.to_string(),
        "--timeout".to_string(),
        profile.timeout_secs.to_string(),
        "--access-logfile".to_string(),
        "-".to_string(),
        "--error-logfile".to_string(),
        "-".to_string(),
        profile.app_module.clone(),
    ]
}

/// Replace the current process with the server
///
/// On success this never returns. A returned value is always an error:
/// the exec itself failed (missing binary, permissions) and the launcher
/// must abort with a non-zero exit.
pub fn exec(profile: &ServerProfile) -> Result<()> {
    let argv = build_command(profile);
    log::info!("Exec server: {}", argv.join(" "));
    Err(exec_argv(&argv, &profile.program))
}

#[cfg(unix)]
fn exec_argv(argv: &[String], program: &str) -> DeployError {
    use std::os::unix::process::CommandExt;
    let err = Command::new(&argv[0]).args(&argv[1..]).exec();
    DeployError::Launch(format!("Failed to exec {}: {}", program, err))
}

#[cfg(not(unix))]
fn exec_argv(argv: &[String], _program: &str) -> DeployError {
    let _ = Command::new(&argv[0]);
    DeployError::Launch("Process replacement requires a Unix host".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_matches_service_contract() {
        let profile = ServerProfile::default();
        let argv = build_command(&profile);
        assert_eq!(
            argv,
            vec![
                "gunicorn",
                "--bind",
                "0.0.0.0:8080",
                "--workers",
                "2",
                "--threads",
                "4",
                "--timeout",
                "300",
                "--access-logfile",
                "-",
                "--error-logfile",
                "-",
                "app:app",
            ]
        );
    }

    #[test]
    fn command_binds_resolved_port() {
        let profile = ServerProfile::with_port(3000);
        let argv = build_command(&profile);
        assert!(argv.contains(&"0.0.0.0:3000".to_string()));
    }

    #[test]
    fn exec_of_missing_binary_reports_launch_error() {
        let profile = ServerProfile {
            program: "/nonexistent/gunicorn".to_string(),
            ..ServerProfile::default()
        };
        let err = exec(&profile).unwrap_err();
        assert!(matches!(err, DeployError::Launch(_)));
    }
}
