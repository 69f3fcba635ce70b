/// Environment resolution for the startup launcher
///
/// Everything here works on a plain variable map so the logic stays
/// testable without mutating process-global environment state; thin
/// wrappers read `std::env` for the real launch path.
use crate::config::types::{DeployError, Result, RuntimeDirs, DEFAULT_PORT};
use std::collections::HashMap;
use std::path::PathBuf;

pub const PORT_VAR: &str = "PORT";
pub const DOWNLOAD_DIR_VAR: &str = "DOWNLOAD_DIR";
pub const MEDIA_DIR_VAR: &str = "MEDIA_DIR";

/// Secrets the launcher reports on. Values are never echoed.
pub const REQUIRED_SECRETS: [&str; 3] = ["SUPABASE_URL", "SUPABASE_KEY", "OPENAI_API_KEY"];
pub const OPTIONAL_SECRETS: [&str; 2] = ["TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// Redacted presence state of one secret-bearing variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretStatus {
    pub name: &'static str,
    pub present: bool,
    pub required: bool,
}

impl SecretStatus {
    /// Human-readable presence line. Shows a `set` marker only for a
    /// non-empty value; never the value itself.
    pub fn display_line(&self) -> String {
        if self.present {
            format!("{}: set", self.name)
        } else if self.required {
            format!("{}: NOT SET", self.name)
        } else {
            format!("{}: NOT SET (optional)", self.name)
        }
    }
}

fn non_empty(vars: &HashMap<String, String>, key: &str) -> bool {
    vars.get(key).map(|v| !v.is_empty()).unwrap_or(false)
}

/// Resolve the bind port from a variable map
///
/// Unset falls back to 8080. A set-but-unparseable value is an error:
/// binding a different port than the operator asked for is never silent.
pub fn resolve_port_from(vars: &HashMap<String, String>) -> Result<u16> {
    match vars.get(PORT_VAR) {
        None => Ok(DEFAULT_PORT),
        Some(raw) if raw.is_empty() => Ok(DEFAULT_PORT),
        Some(raw) => {
            let port: u16 = raw.parse().map_err(|_| {
                DeployError::Environment(format!("PORT must be a number between 1 and 65535, got '{}'", raw))
            })?;
            if port == 0 {
                return Err(DeployError::Environment(
                    "PORT must not be 0".to_string(),
                ));
            }
            Ok(port)
        }
    }
}

/// Redacted presence report for all known secret variables
pub fn secret_report_from(vars: &HashMap<String, String>) -> Vec<SecretStatus> {
    let mut report = Vec::new();
    for name in REQUIRED_SECRETS {
        report.push(SecretStatus {
            name,
            present: non_empty(vars, name),
            required: true,
        });
    }
    for name in OPTIONAL_SECRETS {
        report.push(SecretStatus {
            name,
            present: non_empty(vars, name),
            required: false,
        });
    }
    report
}

/// Runtime directories from a variable map, with compiled-in defaults
pub fn resolve_dirs_from(vars: &HashMap<String, String>, defaults: &RuntimeDirs) -> RuntimeDirs {
    let mut dirs = defaults.clone();
    if let Some(dir) = vars.get(DOWNLOAD_DIR_VAR).filter(|v| !v.is_empty()) {
        dirs.download_dir = PathBuf::from(dir);
    }
    if let Some(dir) = vars.get(MEDIA_DIR_VAR).filter(|v| !v.is_empty()) {
        dirs.media_dir = PathBuf::from(dir);
    }
    dirs
}

/// Snapshot of the process environment as a plain map
pub fn env_snapshot() -> HashMap<String, String> {
    std::env::vars().collect()
}

pub fn resolve_port() -> Result<u16> {
    resolve_port_from(&env_snapshot())
}

pub fn secret_report() -> Vec<SecretStatus> {
    secret_report_from(&env_snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn port_defaults_to_8080_when_unset() {
        assert_eq!(resolve_port_from(&vars(&[])).unwrap(), 8080);
    }

    #[test]
    fn port_defaults_to_8080_when_empty() {
        assert_eq!(resolve_port_from(&vars(&[("PORT", "")])).unwrap(), 8080);
    }

    #[test]
    fn port_uses_exact_env_value() {
        assert_eq!(resolve_port_from(&vars(&[("PORT", "3000")])).unwrap(), 3000);
    }

    #[test]
    fn unparseable_port_aborts() {
        let err = resolve_port_from(&vars(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, DeployError::Environment(_)));
    }

    #[test]
    fn port_zero_aborts() {
        let err = resolve_port_from(&vars(&[("PORT", "0")])).unwrap_err();
        assert!(matches!(err, DeployError::Environment(_)));
    }

    #[test]
    fn out_of_range_port_aborts() {
        let err = resolve_port_from(&vars(&[("PORT", "70000")])).unwrap_err();
        assert!(matches!(err, DeployError::Environment(_)));
    }

    #[test]
    fn secret_marker_only_for_non_empty_values() {
        let report = secret_report_from(&vars(&[
            ("SUPABASE_URL", "https://example.supabase.co"),
            ("SUPABASE_KEY", ""),
        ]));

        let url = report.iter().find(|s| s.name == "SUPABASE_URL").unwrap();
        assert!(url.present);
        assert_eq!(url.display_line(), "SUPABASE_URL: set");

        // Empty string counts as not set.
        let key = report.iter().find(|s| s.name == "SUPABASE_KEY").unwrap();
        assert!(!key.present);
        assert_eq!(key.display_line(), "SUPABASE_KEY: NOT SET");

        let openai = report.iter().find(|s| s.name == "OPENAI_API_KEY").unwrap();
        assert!(!openai.present);
    }

    #[test]
    fn secret_values_never_appear_in_report_lines() {
        let secret_value = "sk-verysecretvalue";
        let report = secret_report_from(&vars(&[("OPENAI_API_KEY", secret_value)]));
        for status in &report {
            assert!(!status.display_line().contains(secret_value));
        }
    }

    #[test]
    fn telegram_vars_are_reported_as_optional() {
        let report = secret_report_from(&vars(&[]));
        let token = report.iter().find(|s| s.name == "TELEGRAM_TOKEN").unwrap();
        assert!(!token.required);
        assert_eq!(token.display_line(), "TELEGRAM_TOKEN: NOT SET (optional)");
    }

    #[test]
    fn dirs_resolve_from_env_with_defaults() {
        let defaults = RuntimeDirs::default();
        let dirs = resolve_dirs_from(&vars(&[("DOWNLOAD_DIR", "/tmp/dl")]), &defaults);
        assert_eq!(dirs.download_dir, PathBuf::from("/tmp/dl"));
        assert_eq!(dirs.media_dir, PathBuf::from("media"));
    }
}
