/// Core types and structures for the sttctl deployment tooling
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Default bind port when `PORT` is not set in the environment
pub const DEFAULT_PORT: u16 = 8080;

/// Supervisor program name used in operator guidance and config paths
pub const PROGRAM_NAME: &str = "youtube-stt";

/// Installer configuration
///
/// Paths default to the layout the service has always shipped with; a
/// `deploy.json` file can override any of them field-wise.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstallProfile {
    /// Local supervisor program definition to install
    pub source: PathBuf,
    /// Destination inside the supervisor's conf.d directory
    pub target: PathBuf,
    /// Supervisor program name (used by start/stop/status guidance)
    pub program: String,
    /// Service URL printed in the operator guidance
    pub service_url: String,
    /// supervisorctl executable (overridable for non-standard hosts)
    pub ctl_program: String,
}

impl Default for InstallProfile {
    fn default() -> Self {
        Self {
            source: PathBuf::from("deploy/youtube-stt.conf"),
            target: PathBuf::from("/etc/supervisor/conf.d/youtube-stt.conf"),
            program: PROGRAM_NAME.to_string(),
            service_url: format!("http://localhost:{}", DEFAULT_PORT),
            ctl_program: "supervisorctl".to_string(),
        }
    }
}

/// WSGI server invocation profile
///
/// The concurrency parameters are fixed by the service contract: 2 worker
/// processes, 4 threads each, 300 second request timeout, logs on the
/// standard streams.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerProfile {
    /// Server executable
    pub program: String,
    /// module:application-object entry point
    pub app_module: String,
    /// Bind address (all interfaces)
    pub bind_addr: String,
    /// Resolved bind port
    pub port: u16,
    /// Worker process count
    pub workers: u32,
    /// Threads per worker
    pub threads: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerProfile {
    fn default() -> Self {
        Self {
            program: "gunicorn".to_string(),
            app_module: "app:app".to_string(),
            bind_addr: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            workers: 2,
            threads: 4,
            timeout_secs: 300,
        }
    }
}

impl ServerProfile {
    /// Profile bound to a specific port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }
}

/// Runtime directories the service expects before the server starts
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuntimeDirs {
    /// Scratch directory for downloaded/converted audio
    pub download_dir: PathBuf,
    /// Storage directory for uploaded media
    pub media_dir: PathBuf,
}

impl Default for RuntimeDirs {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloads"),
            media_dir: PathBuf::from("media"),
        }
    }
}

/// Custom error types for sttctl
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Install error: {0}")]
    Install(String),

    #[error("Supervisor error: {0}")]
    Supervisor(String),

    #[error("Launch error: {0}")]
    Launch(String),

    #[error("Image error: {0}")]
    Image(String),
}

/// Convert deploy errors to sysexits-style exit codes
impl From<&DeployError> for i32 {
    fn from(err: &DeployError) -> i32 {
        match err {
            DeployError::Io(_) => 74,          // IO error
            DeployError::Environment(_) => 64, // Usage error
            DeployError::Config(_) => 78,      // Config error
            DeployError::Install(_) => 73,     // Can't create output
            DeployError::Supervisor(_) => 69,  // Service unavailable
            DeployError::Launch(_) => 71,      // OS error
            DeployError::Image(_) => 65,       // Data error
        }
    }
}

/// Result type alias for sttctl operations
pub type Result<T> = std::result::Result<T, DeployError>;
